use std::net::SocketAddr;
use std::sync::Arc;

use rentix_api::{app, state::AppState};
use rentix_core::clients::{CustomerClient, DeliveryClient, InventoryClient, PaymentClient};
use rentix_core::RentRepository;
use rentix_delivery::{LocalCarrier, MapeiaGeocoder, MapeiaRouter, QuoteService};
use rentix_renting::{
    CustomerRule, EquipmentRule, PaymentConditionRule, PaymentMethodRule, PaymentTypeRule,
    RentService, SnapshotResolver, StockCoordinator, Validator,
};
use rentix_store::{
    HttpCustomerClient, HttpDeliveryClient, HttpInventoryClient, HttpPaymentClient,
    KafkaStockQueue, PgRentRepository,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rentix_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = rentix_store::Config::load().expect("Failed to load config");
    tracing::info!("Starting Rentix API on port {}", config.server.port);

    let pool = rentix_store::database::connect(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");

    let repository = PgRentRepository::new(pool);
    repository.migrate().await.expect("Failed to run migrations");
    let repository: Arc<dyn RentRepository> = Arc::new(repository);

    let queue = Arc::new(
        KafkaStockQueue::new(&config.kafka.brokers, &config.kafka.stock_topic)
            .expect("Failed to create Kafka producer"),
    );

    let payment: Arc<dyn PaymentClient> =
        Arc::new(HttpPaymentClient::new(config.services.payment_url.clone()));
    let customer: Arc<dyn CustomerClient> =
        Arc::new(HttpCustomerClient::new(config.services.customer_url.clone()));
    let inventory: Arc<dyn InventoryClient> = Arc::new(HttpInventoryClient::new(
        config.services.inventory_url.clone(),
    ));

    // Without a remote delivery service the reference carrier runs in-process.
    let delivery: Arc<dyn DeliveryClient> = if config.services.delivery_url.is_empty() {
        tracing::info!("No delivery service configured, quoting in-process");
        let geocoder = Arc::new(MapeiaGeocoder::new());
        let router = Arc::new(MapeiaRouter::new());
        Arc::new(QuoteService::new(vec![Arc::new(LocalCarrier::new(
            config.delivery.fuel_price,
            config.delivery.km_per_liter,
            router,
            geocoder,
        ))]))
    } else {
        Arc::new(HttpDeliveryClient::new(config.services.delivery_url.clone()))
    };

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
    let stock = StockCoordinator::new(inventory, queue);

    let service = RentService::new(
        validator,
        resolver,
        delivery,
        repository,
        stock,
        config.delivery.quote_origin.clone(),
    );

    let app = app(AppState {
        service: Arc::new(service),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
