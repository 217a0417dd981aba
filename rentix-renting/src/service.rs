//! The rent orchestrator: an explicit pipeline of named stages,
//! validate -> quote -> resolve -> persist -> reserve.
//!
//! Only the first three stages and persistence can fail the operation.
//! Reservation runs after the rent is durable and its outcome is never
//! observable to the caller.

use std::sync::Arc;
use std::time::Duration;

use rentix_core::clients::DeliveryClient;
use rentix_core::models::{Quote, QuoteItem, Rent};
use rentix_core::{RentError, RentRepository, RentResult};
use tokio::time::timeout;

use crate::resolve::SnapshotResolver;
use crate::stock::StockCoordinator;
use crate::validation::Validator;

const QUOTE_TIMEOUT: Duration = Duration::from_secs(3);

pub struct RentService {
    validator: Validator,
    resolver: SnapshotResolver,
    delivery: Arc<dyn DeliveryClient>,
    repository: Arc<dyn RentRepository>,
    stock: StockCoordinator,
    /// Fixed warehouse address all deliveries are quoted from.
    quote_origin: String,
}

impl RentService {
    pub fn new(
        validator: Validator,
        resolver: SnapshotResolver,
        delivery: Arc<dyn DeliveryClient>,
        repository: Arc<dyn RentRepository>,
        stock: StockCoordinator,
        quote_origin: String,
    ) -> Self {
        Self {
            validator,
            resolver,
            delivery,
            repository,
            stock,
            quote_origin,
        }
    }

    /// The create-rent workflow. Validation and quoting abort before any
    /// write; a persistence failure surfaces as a generic internal error
    /// so storage details never leak to the client.
    pub async fn create_rent(&self, mut rent: Rent) -> RentResult<Rent> {
        self.validator.validate(&rent).await?;

        if rent.has_carrier() {
            let quote = self.quote_delivery(&rent).await?;
            rent.delivery_value = quote.value;
        }

        self.resolver.resolve(&mut rent).await?;

        let created = self.repository.create(&rent).await.map_err(|err| {
            tracing::error!(%err, "rent persistence failed");
            RentError::Internal("something went wrong creating rent".into())
        })?;

        self.stock.reserve(&created.items).await;

        Ok(created)
    }

    pub async fn get_rent(&self, id: &str) -> RentResult<Rent> {
        let mut rent = self
            .repository
            .get(id)
            .await
            .map_err(|err| {
                tracing::error!(%err, "rent lookup failed");
                RentError::Internal("something went wrong fetching rent".into())
            })?
            .ok_or_else(|| RentError::NotFound("rent".into()))?;

        self.resolver.hydrate(&mut rent).await;
        Ok(rent)
    }

    /// One page of rents plus the total count. Snapshots are re-resolved on
    /// read so listings reflect current remote state.
    pub async fn list_rents(&self, page: i64, per_page: i64) -> RentResult<(Vec<Rent>, i64)> {
        let (mut rents, total) = self.repository.list(page, per_page).await.map_err(|err| {
            tracing::error!(%err, "rent listing failed");
            RentError::Internal("something went wrong listing rents".into())
        })?;

        for rent in &mut rents {
            self.resolver.hydrate(rent).await;
        }

        Ok((rents, total))
    }

    pub async fn update_rent(&self, id: &str, mut rent: Rent) -> RentResult<Rent> {
        self.validator.validate(&rent).await?;
        self.resolver.resolve(&mut rent).await?;

        self.repository
            .update(id, &rent)
            .await
            .map_err(|err| {
                tracing::error!(%err, "rent update failed");
                RentError::Internal("something went wrong updating rent".into())
            })?
            .ok_or_else(|| RentError::NotFound("rent".into()))
    }

    /// Delete a rent, giving its stock back first. The restore is
    /// best-effort and never blocks the deletion.
    pub async fn delete_rent(&self, id: &str) -> RentResult<()> {
        let rent = self
            .repository
            .get(id)
            .await
            .map_err(|err| {
                tracing::error!(%err, "rent lookup failed");
                RentError::Internal("something went wrong deleting rent".into())
            })?
            .ok_or_else(|| RentError::NotFound("rent".into()))?;

        self.stock.restore(&rent.items).await;

        let deleted = self.repository.delete(id).await.map_err(|err| {
            tracing::error!(%err, "rent deletion failed");
            RentError::Internal("something went wrong deleting rent".into())
        })?;

        if !deleted {
            return Err(RentError::NotFound("rent".into()));
        }

        Ok(())
    }

    async fn quote_delivery(&self, rent: &Rent) -> RentResult<Quote> {
        let items: Vec<QuoteItem> = rent
            .items
            .iter()
            .map(|item| QuoteItem {
                qty: item.qty,
                weight: item
                    .equipment
                    .as_ref()
                    .map(|equipment| equipment.weight)
                    .unwrap_or(0.0),
                ..Default::default()
            })
            .collect();

        let quoted = timeout(
            QUOTE_TIMEOUT,
            self.delivery.get_quote(
                &self.quote_origin,
                &rent.delivery_address,
                &rent.carrier_id,
                &items,
            ),
        )
        .await;

        match quoted {
            Ok(Ok(quote)) => Ok(quote),
            Ok(Err(err)) => {
                tracing::error!(%err, carrier = %rent.carrier_id, "delivery quote failed");
                Err(RentError::Upstream("could not quote delivery".into()))
            }
            Err(_) => {
                tracing::error!(carrier = %rent.carrier_id, "delivery quote timed out");
                Err(RentError::Upstream("could not quote delivery".into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, Utc};
    use rentix_core::clients::{
        CustomerClient, InventoryClient, PaymentClient, StockQueue, StockReduction,
    };
    use rentix_core::models::{
        Customer, Equipment, Item, PaymentCondition, PaymentMethod, PaymentType, RentingValue,
    };
    use rentix_core::BoxError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::validation::{
        CustomerRule, EquipmentRule, PaymentConditionRule, PaymentMethodRule, PaymentTypeRule,
    };

    struct OkPayment;

    #[async_trait]
    impl PaymentClient for OkPayment {
        async fn get_type(&self, id: &str) -> Result<PaymentType, BoxError> {
            Ok(PaymentType {
                id: id.into(),
                name: "cash".into(),
            })
        }

        async fn get_method(&self, id: &str) -> Result<PaymentMethod, BoxError> {
            Ok(PaymentMethod {
                id: id.into(),
                name: "upfront".into(),
                account: None,
            })
        }

        async fn get_condition(&self, id: &str) -> Result<PaymentCondition, BoxError> {
            Ok(PaymentCondition {
                id: id.into(),
                name: "single".into(),
                ..Default::default()
            })
        }
    }

    struct OkCustomer;

    #[async_trait]
    impl CustomerClient for OkCustomer {
        async fn get(&self, id: &str) -> Result<Customer, BoxError> {
            Ok(Customer {
                id: id.into(),
                name: "Maria".into(),
                ..Default::default()
            })
        }
    }

    struct FakeInventory {
        failing_reduce: Option<String>,
        reduce_calls: Mutex<Vec<String>>,
    }

    impl FakeInventory {
        fn reliable() -> Self {
            Self {
                failing_reduce: None,
                reduce_calls: Mutex::new(Vec::new()),
            }
        }

        fn failing_reduce_for(id: &str) -> Self {
            Self {
                failing_reduce: Some(id.into()),
                reduce_calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl InventoryClient for FakeInventory {
        async fn get_equipment(&self, id: &str) -> Result<Equipment, BoxError> {
            Ok(Equipment {
                id: id.into(),
                description: "ladder".into(),
                weight: 4.0,
                unit_value: 150.0,
                effective_stock: 100,
                renting_values: vec![RentingValue {
                    period_id: "daily".into(),
                    period: None,
                    value: 10.0,
                }],
            })
        }

        async fn reduce_stock(&self, equipment_id: &str, _qty: i64) -> Result<(), BoxError> {
            self.reduce_calls.lock().unwrap().push(equipment_id.into());
            if self.failing_reduce.as_deref() == Some(equipment_id) {
                return Err("inventory unavailable".into());
            }
            Ok(())
        }

        async fn restore_stock(&self, _equipment_id: &str, _qty: i64) -> Result<(), BoxError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct CapturingQueue {
        published: Mutex<Vec<StockReduction>>,
    }

    #[async_trait]
    impl StockQueue for CapturingQueue {
        async fn publish(&self, reduction: &StockReduction) -> Result<(), BoxError> {
            self.published.lock().unwrap().push(reduction.clone());
            Ok(())
        }
    }

    struct FakeDelivery {
        value: Option<f64>,
        calls: AtomicUsize,
    }

    impl FakeDelivery {
        fn quoting(value: f64) -> Self {
            Self {
                value: Some(value),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                value: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DeliveryClient for FakeDelivery {
        async fn get_quote(
            &self,
            _origin: &str,
            _destination: &str,
            carrier: &str,
            _items: &[QuoteItem],
        ) -> Result<Quote, BoxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.value {
                Some(value) => Ok(Quote {
                    carrier: carrier.into(),
                    value,
                }),
                None => Err("address not found".into()),
            }
        }
    }

    #[derive(Default)]
    struct MemoryRepo {
        rents: Mutex<Vec<Rent>>,
        create_calls: AtomicUsize,
        fail_create: bool,
    }

    #[async_trait]
    impl RentRepository for MemoryRepo {
        async fn create(&self, rent: &Rent) -> Result<Rent, BoxError> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_create {
                return Err("connection refused".into());
            }
            let mut stored = rent.clone();
            stored.id = format!("rent-{}", self.rents.lock().unwrap().len() + 1);
            self.rents.lock().unwrap().push(stored.clone());
            Ok(stored)
        }

        async fn get(&self, id: &str) -> Result<Option<Rent>, BoxError> {
            Ok(self
                .rents
                .lock()
                .unwrap()
                .iter()
                .find(|rent| rent.id == id)
                .cloned())
        }

        async fn list(&self, _page: i64, _per_page: i64) -> Result<(Vec<Rent>, i64), BoxError> {
            let rents = self.rents.lock().unwrap().clone();
            let total = rents.len() as i64;
            Ok((rents, total))
        }

        async fn update(&self, id: &str, rent: &Rent) -> Result<Option<Rent>, BoxError> {
            let mut rents = self.rents.lock().unwrap();
            match rents.iter_mut().find(|stored| stored.id == id) {
                Some(stored) => {
                    *stored = rent.clone();
                    stored.id = id.to_string();
                    Ok(Some(stored.clone()))
                }
                None => Ok(None),
            }
        }

        async fn delete(&self, id: &str) -> Result<bool, BoxError> {
            let mut rents = self.rents.lock().unwrap();
            let before = rents.len();
            rents.retain(|rent| rent.id != id);
            Ok(rents.len() < before)
        }
    }

    struct Fixture {
        repo: Arc<MemoryRepo>,
        delivery: Arc<FakeDelivery>,
        inventory: Arc<FakeInventory>,
        queue: Arc<CapturingQueue>,
    }

    fn service(fixture: &Fixture) -> RentService {
        let payment: Arc<dyn PaymentClient> = Arc::new(OkPayment);
        let customer: Arc<dyn CustomerClient> = Arc::new(OkCustomer);
        let inventory: Arc<dyn InventoryClient> = fixture.inventory.clone();

        let validator = Validator::new(
            vec![
                Arc::new(PaymentTypeRule::new(payment.clone())),
                Arc::new(PaymentMethodRule::new(payment.clone())),
                Arc::new(PaymentConditionRule::new(payment.clone())),
                Arc::new(CustomerRule::new(customer.clone())),
                Arc::new(EquipmentRule::new(inventory.clone())),
            ],
            inventory.clone(),
        );
        let resolver = SnapshotResolver::new(payment, customer, inventory.clone());
        let stock = StockCoordinator::new(inventory, fixture.queue.clone());

        RentService::new(
            validator,
            resolver,
            fixture.delivery.clone(),
            fixture.repo.clone(),
            stock,
            "warehouse street, 100".into(),
        )
    }

    fn fixture_with(delivery: FakeDelivery, inventory: FakeInventory) -> Fixture {
        Fixture {
            repo: Arc::new(MemoryRepo::default()),
            delivery: Arc::new(delivery),
            inventory: Arc::new(inventory),
            queue: Arc::new(CapturingQueue::default()),
        }
    }

    fn valid_rent(items: &[(&str, i64)]) -> Rent {
        let start = Utc::now();
        Rent {
            period_id: "daily".into(),
            payment_method_id: "pm-1".into(),
            payment_condition_id: "pc-1".into(),
            payment_type_id: "pt-1".into(),
            customer_id: "cust-1".into(),
            start_date: Some(start),
            end_date: Some(start + ChronoDuration::days(7)),
            items: items
                .iter()
                .map(|(id, qty)| Item {
                    equipment_id: (*id).into(),
                    equipment: None,
                    qty: *qty,
                })
                .collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_without_carrier_never_quotes() {
        let fixture = fixture_with(FakeDelivery::quoting(99.0), FakeInventory::reliable());
        let service = service(&fixture);

        let created = service.create_rent(valid_rent(&[("eq-1", 2)])).await.unwrap();

        assert_eq!(fixture.delivery.calls.load(Ordering::SeqCst), 0);
        assert_eq!(created.delivery_value, 0.0);
        assert!(created.customer.is_some());
        assert!(created.items[0].equipment.is_some());
    }

    #[tokio::test]
    async fn quote_value_lands_on_the_rent_before_persistence() {
        let fixture = fixture_with(FakeDelivery::quoting(55.47), FakeInventory::reliable());
        let service = service(&fixture);

        let mut rent = valid_rent(&[("eq-1", 2)]);
        rent.carrier_id = "local".into();
        rent.delivery_address = "far away avenue, 9".into();

        let created = service.create_rent(rent).await.unwrap();

        assert_eq!(created.delivery_value, 55.47);
        let stored = fixture.repo.rents.lock().unwrap();
        assert_eq!(stored[0].delivery_value, 55.47);
    }

    #[tokio::test]
    async fn quote_failure_aborts_before_any_write() {
        let fixture = fixture_with(FakeDelivery::failing(), FakeInventory::reliable());
        let service = service(&fixture);

        let mut rent = valid_rent(&[("eq-1", 2)]);
        rent.carrier_id = "local".into();
        rent.delivery_address = "far away avenue, 9".into();

        let err = service.create_rent(rent).await.unwrap_err();

        assert!(matches!(err, RentError::Upstream(_)));
        assert_eq!(fixture.repo.create_calls.load(Ordering::SeqCst), 0);
        assert!(fixture.inventory.reduce_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn reservation_failure_does_not_fail_the_create() {
        let fixture = fixture_with(
            FakeDelivery::quoting(10.0),
            FakeInventory::failing_reduce_for("eq-1"),
        );
        let service = service(&fixture);

        let created = service
            .create_rent(valid_rent(&[("eq-1", 3), ("eq-2", 1)]))
            .await
            .unwrap();

        assert!(!created.id.is_empty());

        // both items were attempted, the failed one went to the queue
        let calls = fixture.inventory.reduce_calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["eq-1".to_string(), "eq-2".to_string()]);

        let published = fixture.queue.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].equipment_id, "eq-1");
        assert_eq!(published[0].qty, 3);
    }

    #[tokio::test]
    async fn persistence_failure_surfaces_a_generic_error() {
        let fixture = Fixture {
            repo: Arc::new(MemoryRepo {
                fail_create: true,
                ..Default::default()
            }),
            delivery: Arc::new(FakeDelivery::quoting(10.0)),
            inventory: Arc::new(FakeInventory::reliable()),
            queue: Arc::new(CapturingQueue::default()),
        };
        let service = service(&fixture);

        let err = service.create_rent(valid_rent(&[("eq-1", 1)])).await.unwrap_err();

        match err {
            RentError::Internal(message) => {
                assert_eq!(message, "something went wrong creating rent");
            }
            other => panic!("expected internal error, got {other:?}"),
        }
        // no reservation after a failed write
        assert!(fixture.inventory.reduce_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_rent_is_rejected_up_front() {
        let fixture = fixture_with(FakeDelivery::quoting(10.0), FakeInventory::reliable());
        let service = service(&fixture);

        let err = service.create_rent(Rent::default()).await.unwrap_err();

        match err {
            RentError::Validation(errors) => assert!(errors.contains("CustomerID")),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(fixture.repo.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn update_of_missing_rent_is_not_found() {
        let fixture = fixture_with(FakeDelivery::quoting(10.0), FakeInventory::reliable());
        let service = service(&fixture);

        let err = service
            .update_rent("ghost", valid_rent(&[("eq-1", 1)]))
            .await
            .unwrap_err();

        assert!(matches!(err, RentError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_restores_stock_then_removes_the_rent() {
        let fixture = fixture_with(FakeDelivery::quoting(10.0), FakeInventory::reliable());
        let service = service(&fixture);

        let created = service.create_rent(valid_rent(&[("eq-1", 2)])).await.unwrap();
        service.delete_rent(&created.id).await.unwrap();

        assert!(fixture.repo.rents.lock().unwrap().is_empty());
        let err = service.get_rent(&created.id).await.unwrap_err();
        assert!(matches!(err, RentError::NotFound(_)));
    }
}
