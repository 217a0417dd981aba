pub mod app_config;
pub mod clients;
pub mod database;
pub mod events;
pub mod rent_repo;

pub use app_config::Config;
pub use clients::{
    HttpCustomerClient, HttpDeliveryClient, HttpInventoryClient, HttpPaymentClient,
};
pub use events::KafkaStockQueue;
pub use rent_repo::PgRentRepository;
