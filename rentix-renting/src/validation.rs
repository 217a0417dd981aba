//! Validation engine for rent requests.
//!
//! Structural checks run as an explicit ordered list; referenced ids are
//! then checked against the owning services through registered [`Rule`]s.
//! Every violation is collected before returning, nothing short-circuits.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use rentix_core::clients::{CustomerClient, InventoryClient, PaymentClient};
use rentix_core::models::Rent;
use rentix_core::ValidationError;
use tokio::time::timeout;

/// Remote existence lookups get this long before counting as invalid.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

pub mod tags {
    pub const PAYMENT_TYPE: &str = "payment_type";
    pub const PAYMENT_METHOD: &str = "payment_method";
    pub const PAYMENT_CONDITION: &str = "payment_condition";
    pub const CUSTOMER: &str = "customer";
    pub const EQUIPMENT: &str = "equipment";
}

/// A referential check against a remote service. `valid` must treat network
/// failures, timeouts and not-found replies alike: the value is invalid.
#[async_trait]
pub trait Rule: Send + Sync {
    fn tag(&self) -> &'static str;

    async fn valid(&self, value: &str) -> bool;
}

fn message_for(tag: &str) -> &'static str {
    match tag {
        tags::PAYMENT_TYPE => "invalid payment type",
        tags::PAYMENT_CONDITION => "invalid payment condition",
        tags::PAYMENT_METHOD => "invalid payment method",
        tags::CUSTOMER => "invalid customer",
        tags::EQUIPMENT => "invalid equipment",
        _ => "something is not right about this field",
    }
}

const REQUIRED: &str = "this field is required";

pub struct PaymentTypeRule {
    payment: Arc<dyn PaymentClient>,
}

impl PaymentTypeRule {
    pub fn new(payment: Arc<dyn PaymentClient>) -> Self {
        Self { payment }
    }
}

#[async_trait]
impl Rule for PaymentTypeRule {
    fn tag(&self) -> &'static str {
        tags::PAYMENT_TYPE
    }

    async fn valid(&self, value: &str) -> bool {
        matches!(timeout(LOOKUP_TIMEOUT, self.payment.get_type(value)).await, Ok(Ok(_)))
    }
}

pub struct PaymentMethodRule {
    payment: Arc<dyn PaymentClient>,
}

impl PaymentMethodRule {
    pub fn new(payment: Arc<dyn PaymentClient>) -> Self {
        Self { payment }
    }
}

#[async_trait]
impl Rule for PaymentMethodRule {
    fn tag(&self) -> &'static str {
        tags::PAYMENT_METHOD
    }

    async fn valid(&self, value: &str) -> bool {
        matches!(timeout(LOOKUP_TIMEOUT, self.payment.get_method(value)).await, Ok(Ok(_)))
    }
}

pub struct PaymentConditionRule {
    payment: Arc<dyn PaymentClient>,
}

impl PaymentConditionRule {
    pub fn new(payment: Arc<dyn PaymentClient>) -> Self {
        Self { payment }
    }
}

#[async_trait]
impl Rule for PaymentConditionRule {
    fn tag(&self) -> &'static str {
        tags::PAYMENT_CONDITION
    }

    async fn valid(&self, value: &str) -> bool {
        matches!(timeout(LOOKUP_TIMEOUT, self.payment.get_condition(value)).await, Ok(Ok(_)))
    }
}

pub struct CustomerRule {
    customer: Arc<dyn CustomerClient>,
}

impl CustomerRule {
    pub fn new(customer: Arc<dyn CustomerClient>) -> Self {
        Self { customer }
    }
}

#[async_trait]
impl Rule for CustomerRule {
    fn tag(&self) -> &'static str {
        tags::CUSTOMER
    }

    async fn valid(&self, value: &str) -> bool {
        matches!(timeout(LOOKUP_TIMEOUT, self.customer.get(value)).await, Ok(Ok(_)))
    }
}

pub struct EquipmentRule {
    inventory: Arc<dyn InventoryClient>,
}

impl EquipmentRule {
    pub fn new(inventory: Arc<dyn InventoryClient>) -> Self {
        Self { inventory }
    }
}

#[async_trait]
impl Rule for EquipmentRule {
    fn tag(&self) -> &'static str {
        tags::EQUIPMENT
    }

    async fn valid(&self, value: &str) -> bool {
        matches!(
            timeout(LOOKUP_TIMEOUT, self.inventory.get_equipment(value)).await,
            Ok(Ok(_))
        )
    }
}

pub struct Validator {
    rules: Vec<Arc<dyn Rule>>,
    inventory: Arc<dyn InventoryClient>,
}

impl Validator {
    pub fn new(rules: Vec<Arc<dyn Rule>>, inventory: Arc<dyn InventoryClient>) -> Self {
        Self { rules, inventory }
    }

    /// Check a rent structurally and referentially. Read-only and
    /// idempotent; safe to call again on retry.
    pub async fn validate(&self, rent: &Rent) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();

        self.structural(rent, &mut errors);
        self.referential(rent, &mut errors).await;
        self.stock_sufficiency(rent, &mut errors).await;

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn structural(&self, rent: &Rent, errors: &mut ValidationError) {
        let required_ids = [
            ("PeriodID", &rent.period_id),
            ("PaymentMethodID", &rent.payment_method_id),
            ("PaymentConditionID", &rent.payment_condition_id),
            ("PaymentTypeID", &rent.payment_type_id),
            ("CustomerID", &rent.customer_id),
        ];
        for (field, value) in required_ids {
            if value.trim().is_empty() {
                errors.add(field, REQUIRED);
            }
        }

        match (rent.start_date, rent.end_date) {
            (None, _) => errors.add("StartDate", REQUIRED),
            (_, None) => errors.add("EndDate", REQUIRED),
            (Some(start), Some(end)) if end <= start => {
                errors.add("EndDate", "end date must be after start date");
            }
            _ => {}
        }

        if rent.items.is_empty() {
            errors.add("Items", REQUIRED);
        }
        for (i, item) in rent.items.iter().enumerate() {
            if item.equipment_id.trim().is_empty() {
                errors.add(format!("Items[{i}].EquipmentID"), REQUIRED);
            }
            if item.qty <= 0 {
                errors.add(
                    format!("Items[{i}].Qty"),
                    "this field must be greater than zero",
                );
            }
        }

        if rent.discount < 0.0 {
            errors.add("Discount", "this field must not be negative");
        }
        if rent.paid_value < 0.0 {
            errors.add("PaidValue", "this field must not be negative");
        }
        if rent.paid_value > 0.0 && rent.bill < rent.paid_value {
            errors.add("Bill", "this field must be greater than or equal to PaidValue");
        }

        if rent.has_carrier() && rent.delivery_address.trim().is_empty() {
            errors.add("DeliveryAddress", "this field is required with a carrier");
        }
    }

    fn rule(&self, tag: &str) -> Option<&Arc<dyn Rule>> {
        self.rules.iter().find(|rule| rule.tag() == tag)
    }

    async fn referential(&self, rent: &Rent, errors: &mut ValidationError) {
        let mut checks: Vec<(String, &'static str, &str)> = Vec::new();

        let id_fields = [
            ("PaymentTypeID", tags::PAYMENT_TYPE, &rent.payment_type_id),
            ("PaymentMethodID", tags::PAYMENT_METHOD, &rent.payment_method_id),
            (
                "PaymentConditionID",
                tags::PAYMENT_CONDITION,
                &rent.payment_condition_id,
            ),
            ("CustomerID", tags::CUSTOMER, &rent.customer_id),
        ];
        for (field, tag, value) in id_fields {
            if !value.trim().is_empty() {
                checks.push((field.to_string(), tag, value));
            }
        }
        for (i, item) in rent.items.iter().enumerate() {
            if !item.equipment_id.trim().is_empty() {
                checks.push((
                    format!("Items[{i}].EquipmentID"),
                    tags::EQUIPMENT,
                    &item.equipment_id,
                ));
            }
        }

        // Lookups are independent, run them all at once. Which violation is
        // recorded first is not significant.
        let results = join_all(checks.into_iter().map(|(field, tag, value)| async move {
            let valid = match self.rule(tag) {
                Some(rule) => rule.valid(value).await,
                None => true,
            };
            (field, tag, valid)
        }))
        .await;

        for (field, tag, valid) in results {
            if !valid {
                errors.add(field, message_for(tag));
            }
        }
    }

    /// Explicit named rule: an item may not ask for more than the
    /// equipment's effective stock. Existence problems are left to the
    /// equipment rule; an unreachable inventory does not double-report.
    async fn stock_sufficiency(&self, rent: &Rent, errors: &mut ValidationError) {
        let checks = rent
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.qty > 0 && !item.equipment_id.trim().is_empty());

        let results = join_all(checks.map(|(i, item)| async move {
            match timeout(LOOKUP_TIMEOUT, self.inventory.get_equipment(&item.equipment_id)).await
            {
                Ok(Ok(equipment)) if item.qty > equipment.effective_stock => Some(i),
                _ => None,
            }
        }))
        .await;

        for index in results.into_iter().flatten() {
            errors.add(
                format!("Items[{index}].Qty"),
                "insufficient stock for this equipment",
            );
        }
    }
}
