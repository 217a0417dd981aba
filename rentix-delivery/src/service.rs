use std::collections::HashMap;
use std::sync::Arc;

use rentix_core::models::{Quote, QuoteItem};

use crate::carrier::{Carrier, DeliveryError};

/// Quote front door: routes a request to the named carrier, or fans out to
/// every registered carrier when the caller wants to compare.
pub struct QuoteService {
    carriers: HashMap<String, Arc<dyn Carrier>>,
}

impl QuoteService {
    pub fn new(carriers: Vec<Arc<dyn Carrier>>) -> Self {
        let carriers = carriers
            .into_iter()
            .map(|carrier| (carrier.name().to_string(), carrier))
            .collect();
        Self { carriers }
    }

    pub async fn get_quote(
        &self,
        origin: &str,
        destination: &str,
        carrier_name: &str,
        items: &[QuoteItem],
    ) -> Result<Quote, DeliveryError> {
        let carrier = self
            .carriers
            .get(carrier_name)
            .ok_or(DeliveryError::CarrierNotFound)?;

        if items.is_empty() {
            return Err(DeliveryError::NoItems);
        }

        carrier.get_quote(origin, destination, items).await
    }

    /// Quotes from every carrier; carriers that fail are skipped, not fatal.
    pub async fn get_quotes(
        &self,
        origin: &str,
        destination: &str,
        items: &[QuoteItem],
    ) -> Result<Vec<Quote>, DeliveryError> {
        if self.carriers.is_empty() {
            return Err(DeliveryError::NoCarriers);
        }

        if items.is_empty() {
            return Err(DeliveryError::NoItems);
        }

        let mut quotes = Vec::new();
        for carrier in self.carriers.values() {
            match carrier.get_quote(origin, destination, items).await {
                Ok(quote) => quotes.push(quote),
                Err(err) => {
                    tracing::warn!(carrier = carrier.name(), %err, "carrier could not quote");
                }
            }
        }

        Ok(quotes)
    }
}

// The quote service can stand in for a remote delivery service when the
// platform runs the carrier logic in-process.
#[async_trait::async_trait]
impl rentix_core::clients::DeliveryClient for QuoteService {
    async fn get_quote(
        &self,
        origin: &str,
        destination: &str,
        carrier: &str,
        items: &[QuoteItem],
    ) -> Result<Quote, rentix_core::BoxError> {
        Ok(QuoteService::get_quote(self, origin, destination, carrier, items).await?)
    }
}
