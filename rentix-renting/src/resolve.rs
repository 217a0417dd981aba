//! Snapshot resolution: fetch every referenced entity once, before
//! persistence, and embed the copies into the rent document.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use rentix_core::clients::{CustomerClient, InventoryClient, PaymentClient};
use rentix_core::models::Rent;
use rentix_core::RentError;
use tokio::time::timeout;

const FETCH_TIMEOUT: Duration = Duration::from_secs(2);

pub struct SnapshotResolver {
    payment: Arc<dyn PaymentClient>,
    customer: Arc<dyn CustomerClient>,
    inventory: Arc<dyn InventoryClient>,
}

impl SnapshotResolver {
    pub fn new(
        payment: Arc<dyn PaymentClient>,
        customer: Arc<dyn CustomerClient>,
        inventory: Arc<dyn InventoryClient>,
    ) -> Self {
        Self {
            payment,
            customer,
            inventory,
        }
    }

    /// Strict resolution for writes. Payment and customer snapshots are
    /// best-effort (a rent without an embedded customer is still a rent),
    /// but every item must resolve its equipment.
    pub async fn resolve(&self, rent: &mut Rent) -> Result<(), RentError> {
        self.hydrate(rent).await;

        for (i, item) in rent.items.iter().enumerate() {
            if item.equipment.is_none() {
                return Err(RentError::NotFound(format!("Items[{i}] equipment")));
            }
        }

        Ok(())
    }

    /// Best-effort resolution for reads: whatever fetch fails, the raw ids
    /// in the document still describe the rent.
    pub async fn hydrate(&self, rent: &mut Rent) {
        let (payment_type, payment_method, payment_condition, customer) = tokio::join!(
            timeout(FETCH_TIMEOUT, self.payment.get_type(&rent.payment_type_id)),
            timeout(FETCH_TIMEOUT, self.payment.get_method(&rent.payment_method_id)),
            timeout(
                FETCH_TIMEOUT,
                self.payment.get_condition(&rent.payment_condition_id)
            ),
            timeout(FETCH_TIMEOUT, self.customer.get(&rent.customer_id)),
        );

        if let Ok(Ok(snapshot)) = payment_type {
            rent.payment_type = Some(snapshot);
        }
        if let Ok(Ok(snapshot)) = payment_method {
            rent.payment_method = Some(snapshot);
        }
        if let Ok(Ok(snapshot)) = payment_condition {
            rent.payment_condition = Some(snapshot);
        }
        if let Ok(Ok(snapshot)) = customer {
            rent.customer = Some(snapshot);
        }

        let fetched = join_all(rent.items.iter().map(|item| {
            timeout(FETCH_TIMEOUT, self.inventory.get_equipment(&item.equipment_id))
        }))
        .await;

        for (item, result) in rent.items.iter_mut().zip(fetched) {
            if let Ok(Ok(equipment)) = result {
                item.equipment = Some(equipment);
            }
        }
    }
}
