pub mod carrier;
pub mod geo;
pub mod service;

pub use carrier::{Carrier, Coordinates, DeliveryError, Geocoder, LocalCarrier, Route, Router};
pub use geo::{MapeiaGeocoder, MapeiaRouter};
pub use service::QuoteService;
