//! HTTP JSON clients for the remote services the workflow consumes.
//!
//! Every client carries its own short request timeout so a slow remote
//! degrades a single lookup, never the whole request.

use std::time::Duration;

use async_trait::async_trait;
use rentix_core::clients::{CustomerClient, DeliveryClient, InventoryClient, PaymentClient};
use rentix_core::models::{
    Customer, Equipment, PaymentCondition, PaymentMethod, PaymentType, Quote, QuoteItem,
};
use rentix_core::BoxError;
use serde::Serialize;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);
const QUOTE_TIMEOUT: Duration = Duration::from_secs(3);

fn client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("reqwest client")
}

pub struct HttpPaymentClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPaymentClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: client(REQUEST_TIMEOUT),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PaymentClient for HttpPaymentClient {
    async fn get_type(&self, id: &str) -> Result<PaymentType, BoxError> {
        let url = format!("{}/types/{}", self.base_url, id);
        Ok(self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    async fn get_method(&self, id: &str) -> Result<PaymentMethod, BoxError> {
        let url = format!("{}/methods/{}", self.base_url, id);
        Ok(self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    async fn get_condition(&self, id: &str) -> Result<PaymentCondition, BoxError> {
        let url = format!("{}/conditions/{}", self.base_url, id);
        Ok(self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }
}

pub struct HttpCustomerClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCustomerClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: client(REQUEST_TIMEOUT),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CustomerClient for HttpCustomerClient {
    async fn get(&self, id: &str) -> Result<Customer, BoxError> {
        let url = format!("{}/customers/{}", self.base_url, id);
        Ok(self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }
}

#[derive(Serialize)]
struct StockRequest<'a> {
    id: &'a str,
    qty: i64,
}

pub struct HttpInventoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpInventoryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: client(REQUEST_TIMEOUT),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl InventoryClient for HttpInventoryClient {
    async fn get_equipment(&self, id: &str) -> Result<Equipment, BoxError> {
        let url = format!("{}/equipment/{}", self.base_url, id);
        Ok(self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    async fn reduce_stock(&self, equipment_id: &str, qty: i64) -> Result<(), BoxError> {
        let url = format!("{}/stock/reduce", self.base_url);
        self.http
            .post(url)
            .json(&StockRequest {
                id: equipment_id,
                qty,
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn restore_stock(&self, equipment_id: &str, qty: i64) -> Result<(), BoxError> {
        let url = format!("{}/stock/restore", self.base_url);
        self.http
            .post(url)
            .json(&StockRequest {
                id: equipment_id,
                qty,
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct QuoteRequest<'a> {
    origin: &'a str,
    destination: &'a str,
    carrier: &'a str,
    items: &'a [QuoteItem],
}

pub struct HttpDeliveryClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpDeliveryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: client(QUOTE_TIMEOUT),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DeliveryClient for HttpDeliveryClient {
    async fn get_quote(
        &self,
        origin: &str,
        destination: &str,
        carrier: &str,
        items: &[QuoteItem],
    ) -> Result<Quote, BoxError> {
        let url = format!("{}/quote", self.base_url);
        Ok(self
            .http
            .post(url)
            .json(&QuoteRequest {
                origin,
                destination,
                carrier,
                items,
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }
}
