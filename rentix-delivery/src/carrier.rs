use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use rentix_core::models::{Quote, QuoteItem};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("empty address")]
    EmptyAddress,

    #[error("address not found")]
    AddressNotFound,

    #[error("no route between addresses")]
    NoRoute,

    #[error("carrier not found")]
    CarrierNotFound,

    #[error("no items for delivery")]
    NoItems,

    #[error("no carriers")]
    NoCarriers,

    #[error("lookup failed: {0}")]
    Lookup(#[from] reqwest::Error),
}

/// Geographic point as returned by the geocoding provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coordinates {
    pub lon: String,
    pub lat: String,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lon, self.lat)
    }
}

/// One driving alternative between two points, distances in meters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
}

/// Resolves a free-form address into coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn coordinates(&self, source: &str) -> Result<Coordinates, DeliveryError>;
}

/// Fetches all alternative routes between two points.
#[async_trait]
pub trait Router: Send + Sync {
    async fn routes(&self, from: &Coordinates, to: &Coordinates)
        -> Result<Vec<Route>, DeliveryError>;
}

/// A carrier that can price a delivery between two addresses.
#[async_trait]
pub trait Carrier: Send + Sync {
    fn name(&self) -> &str;

    async fn get_quote(
        &self,
        origin: &str,
        destination: &str,
        items: &[QuoteItem],
    ) -> Result<Quote, DeliveryError>;
}

/// Reference carrier pricing on fuel cost over the cheapest route.
pub struct LocalCarrier {
    name: String,
    fuel_price: f64,
    km_per_liter: f64,
    router: Arc<dyn Router>,
    geocoder: Arc<dyn Geocoder>,
}

impl LocalCarrier {
    pub fn new(
        fuel_price: f64,
        km_per_liter: f64,
        router: Arc<dyn Router>,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        Self {
            name: "local".into(),
            fuel_price,
            km_per_liter,
            router,
            geocoder,
        }
    }

    fn route_price(&self, route: &Route) -> f64 {
        let base = route.distance / 1000.0 / self.km_per_liter * self.fuel_price * 1.15;
        (base * 100.0).round() / 100.0
    }
}

#[async_trait]
impl Carrier for LocalCarrier {
    fn name(&self) -> &str {
        &self.name
    }

    /// Geocode both ends, price every alternative route and keep the
    /// cheapest one. Any lookup failure aborts the quote; there is no
    /// partial result.
    async fn get_quote(
        &self,
        origin: &str,
        destination: &str,
        _items: &[QuoteItem],
    ) -> Result<Quote, DeliveryError> {
        let from = self.geocoder.coordinates(origin).await?;
        let to = self.geocoder.coordinates(destination).await?;

        let routes = self.router.routes(&from, &to).await?;

        let value = routes
            .iter()
            .map(|route| self.route_price(route))
            .fold(f64::INFINITY, f64::min);

        if !value.is_finite() {
            return Err(DeliveryError::NoRoute);
        }

        Ok(Quote {
            carrier: self.name.clone(),
            value,
        })
    }
}
