pub mod resolve;
pub mod service;
pub mod stock;
pub mod validation;

pub use resolve::SnapshotResolver;
pub use service::RentService;
pub use stock::StockCoordinator;
pub use validation::{
    CustomerRule, EquipmentRule, PaymentConditionRule, PaymentMethodRule, PaymentTypeRule, Rule,
    Validator,
};
