//! HTTP adapters for the Mapeia geocoding and routing endpoints.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::carrier::{Coordinates, DeliveryError, Geocoder, Route, Router};

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

pub struct MapeiaGeocoder {
    http: reqwest::Client,
    base_url: String,
}

impl MapeiaGeocoder {
    pub fn new() -> Self {
        Self::with_base_url("https://www.mapeia.com.br")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(LOOKUP_TIMEOUT)
                .build()
                .expect("reqwest client"),
            base_url: base_url.into(),
        }
    }
}

impl Default for MapeiaGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Geocoder for MapeiaGeocoder {
    async fn coordinates(&self, source: &str) -> Result<Coordinates, DeliveryError> {
        if source.trim().is_empty() {
            return Err(DeliveryError::EmptyAddress);
        }

        let url = format!("{}/search", self.base_url);
        let candidates: Vec<Coordinates> = self
            .http
            .get(url)
            .query(&[
                ("q", source),
                ("addressdetails", "1"),
                ("namedetails", "1"),
                ("accept-language", "pt-BR"),
                ("countrycodes", "br"),
                ("format", "jsonv2"),
                ("limit", "20"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        candidates
            .into_iter()
            .next()
            .ok_or(DeliveryError::AddressNotFound)
    }
}

pub struct MapeiaRouter {
    http: reqwest::Client,
    base_url: String,
}

impl MapeiaRouter {
    pub fn new() -> Self {
        Self::with_base_url("https://www.mapeia.com.br")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(LOOKUP_TIMEOUT)
                .build()
                .expect("reqwest client"),
            base_url: base_url.into(),
        }
    }
}

impl Default for MapeiaRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct RoutesReply {
    #[serde(default)]
    routes: Vec<Route>,
}

#[async_trait]
impl Router for MapeiaRouter {
    async fn routes(
        &self,
        from: &Coordinates,
        to: &Coordinates,
    ) -> Result<Vec<Route>, DeliveryError> {
        let url = format!("{}/route/v1/driving/{};{}", self.base_url, from, to);

        let reply: RoutesReply = self
            .http
            .get(url)
            .query(&[
                ("overview", "false"),
                ("alternatives", "true"),
                ("steps", "false"),
                ("hints", ";"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(reply.routes)
    }
}
