use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single rental order aggregating items, payment terms and delivery info.
///
/// Referenced entities (customer, payment terms, equipment) are carried twice:
/// as the raw id the client sent, and as an optional snapshot resolved from
/// the owning service right before persistence. Snapshots are immutable copies
/// embedded into the document, never live references.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rent {
    #[serde(default)]
    pub id: String,
    pub period_id: String,
    pub payment_method_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    pub payment_condition_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_condition: Option<PaymentCondition>,
    pub payment_type_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<PaymentType>,
    #[serde(default)]
    pub carrier_id: String,
    pub customer_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub qty_days: i64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub paid_value: f64,
    #[serde(default)]
    pub bill: f64,
    #[serde(default)]
    pub observations: String,
    #[serde(default)]
    pub check_info: String,
    #[serde(default)]
    pub delivery_value: f64,
    #[serde(default)]
    pub delivery_address: String,
    #[serde(default)]
    pub usage_address: String,
}

impl Rent {
    /// Whether a carrier was picked, which enables the delivery quote stage.
    pub fn has_carrier(&self) -> bool {
        !self.carrier_id.trim().is_empty()
    }
}

/// One equipment line inside a rent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Item {
    pub equipment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Equipment>,
    pub qty: i64,
}

/// A rentable asset with a price table keyed by rental period.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Equipment {
    pub id: String,
    pub description: String,
    pub weight: f64,
    pub unit_value: f64,
    pub effective_stock: i64,
    #[serde(default)]
    pub renting_values: Vec<RentingValue>,
}

impl Equipment {
    /// Price for the given period, by linear scan of the price table.
    /// A period without an entry has no price, not an error.
    pub fn price_for_period(&self, period_id: &str) -> Option<f64> {
        self.renting_values
            .iter()
            .find(|rv| rv.period_id == period_id)
            .map(|rv| rv.value)
    }
}

/// Price of an equipment for one rental period.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RentingValue {
    pub period_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    pub value: f64,
}

/// A named rental duration (daily, weekly, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Period {
    pub id: String,
    pub name: String,
    pub qty_days: i64,
}

/// A carrier's computed delivery price for a route and item set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Quote {
    #[serde(rename = "company")]
    pub carrier: String,
    pub value: f64,
}

/// Item payload sent to the delivery service when requesting a quote.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteItem {
    pub qty: i64,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub depth: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub cpf_cnpj: String,
    #[serde(default)]
    pub rg_insc_est: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub cellphone: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentType {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<Account>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentCondition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub increment: f64,
    #[serde(default)]
    pub installments: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<PaymentType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
}
