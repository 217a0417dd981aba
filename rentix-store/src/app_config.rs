use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub kafka: KafkaConfig,
    pub services: ServicesConfig,
    pub delivery: DeliveryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    #[serde(default = "default_stock_topic")]
    pub stock_topic: String,
}

fn default_stock_topic() -> String {
    "stock.reduce".into()
}

/// Base URLs of the remote services the workflow talks to. An empty
/// delivery URL runs the reference carrier in-process instead.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    pub payment_url: String,
    pub customer_url: String,
    pub inventory_url: String,
    #[serde(default)]
    pub delivery_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DeliveryConfig {
    /// Warehouse address all delivery quotes are computed from.
    pub quote_origin: String,
    #[serde(default = "default_fuel_price")]
    pub fuel_price: f64,
    #[serde(default = "default_km_per_liter")]
    pub km_per_liter: f64,
}

fn default_fuel_price() -> f64 {
    6.0
}

fn default_km_per_liter() -> f64 {
    10.0
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("RENTIX").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
