pub mod clients;
pub mod error;
pub mod models;
pub mod repository;

pub use clients::{
    CustomerClient, DeliveryClient, InventoryClient, PaymentClient, StockQueue, StockReduction,
};
pub use error::{RentError, ValidationError};
pub use models::{
    Account, Customer, Equipment, Item, PaymentCondition, PaymentMethod, PaymentType, Period,
    Quote, QuoteItem, Rent, RentingValue,
};
pub use repository::RentRepository;

/// Boxed error used at the client/repository trait seams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type RentResult<T> = Result<T, RentError>;
