use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{Customer, Equipment, PaymentCondition, PaymentMethod, PaymentType, Quote};
use crate::BoxError;

/// Client for the payment service lookups used during validation and
/// snapshot resolution.
#[async_trait]
pub trait PaymentClient: Send + Sync {
    async fn get_type(&self, id: &str) -> Result<PaymentType, BoxError>;

    async fn get_method(&self, id: &str) -> Result<PaymentMethod, BoxError>;

    async fn get_condition(&self, id: &str) -> Result<PaymentCondition, BoxError>;
}

/// Client for the customer service.
#[async_trait]
pub trait CustomerClient: Send + Sync {
    async fn get(&self, id: &str) -> Result<Customer, BoxError>;
}

/// Client for the inventory service: equipment lookups plus the synchronous
/// stock mutations attempted by the reservation coordinator.
#[async_trait]
pub trait InventoryClient: Send + Sync {
    async fn get_equipment(&self, id: &str) -> Result<Equipment, BoxError>;

    async fn reduce_stock(&self, equipment_id: &str, qty: i64) -> Result<(), BoxError>;

    async fn restore_stock(&self, equipment_id: &str, qty: i64) -> Result<(), BoxError>;
}

/// Client for the delivery service quote endpoint.
#[async_trait]
pub trait DeliveryClient: Send + Sync {
    async fn get_quote(
        &self,
        origin: &str,
        destination: &str,
        carrier: &str,
        items: &[crate::models::QuoteItem],
    ) -> Result<Quote, BoxError>;
}

/// Payload of a deferred stock reduction.
///
/// `request_id` is the idempotency key: the consumer is expected to apply
/// the reduction at most once per `(equipment_id, qty, request_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockReduction {
    pub equipment_id: String,
    pub qty: i64,
    pub request_id: String,
}

/// Fire-and-forget publisher for stock compensation messages. The caller
/// never waits for broker acknowledgement.
#[async_trait]
pub trait StockQueue: Send + Sync {
    async fn publish(&self, reduction: &StockReduction) -> Result<(), BoxError>;
}
