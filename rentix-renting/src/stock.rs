//! Stock reservation with an asynchronous compensation path.
//!
//! Reserving stock must never block order creation: a reduce call that
//! fails (timeout, remote error, unavailable service) is demoted to a
//! fire-and-forget message on the stock-reduction queue, to be applied
//! by the inventory service later, at least once.

use std::sync::Arc;
use std::time::Duration;

use rentix_core::clients::{InventoryClient, StockQueue, StockReduction};
use rentix_core::models::Item;
use tokio::time::timeout;
use uuid::Uuid;

/// A slow inventory service degrades one item, not the whole request.
const STOCK_TIMEOUT: Duration = Duration::from_secs(1);

pub struct StockCoordinator {
    inventory: Arc<dyn InventoryClient>,
    queue: Arc<dyn StockQueue>,
}

impl StockCoordinator {
    pub fn new(inventory: Arc<dyn InventoryClient>, queue: Arc<dyn StockQueue>) -> Self {
        Self { inventory, queue }
    }

    /// Reduce stock for each item, independently and in order. Reservation
    /// is not transactional across items: some may reduce synchronously
    /// while others end up only queued. Nothing here is observable to the
    /// caller.
    pub async fn reserve(&self, items: &[Item]) {
        for item in items {
            let reduced = timeout(
                STOCK_TIMEOUT,
                self.inventory.reduce_stock(&item.equipment_id, item.qty),
            )
            .await;

            match reduced {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    tracing::warn!(
                        equipment_id = %item.equipment_id,
                        %err,
                        "stock reduction failed, queueing compensation"
                    );
                    self.process_later(item).await;
                }
                Err(_) => {
                    tracing::warn!(
                        equipment_id = %item.equipment_id,
                        "stock reduction timed out, queueing compensation"
                    );
                    self.process_later(item).await;
                }
            }
        }
    }

    /// Give stock back, best-effort only. No queue fallback here: restoring
    /// on cancellation is allowed to be lossy by design.
    pub async fn restore(&self, items: &[Item]) {
        for item in items {
            let restored = timeout(
                STOCK_TIMEOUT,
                self.inventory.restore_stock(&item.equipment_id, item.qty),
            )
            .await;

            if !matches!(restored, Ok(Ok(()))) {
                tracing::warn!(
                    equipment_id = %item.equipment_id,
                    "stock restore failed"
                );
            }
        }
    }

    async fn process_later(&self, item: &Item) {
        let reduction = StockReduction {
            equipment_id: item.equipment_id.clone(),
            qty: item.qty,
            request_id: Uuid::new_v4().to_string(),
        };

        if let Err(err) = self.queue.publish(&reduction).await {
            tracing::error!(
                equipment_id = %reduction.equipment_id,
                %err,
                "could not queue stock compensation"
            );
        }
    }
}
