use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rentix_core::clients::{StockQueue, StockReduction};
use rentix_core::BoxError;

/// Kafka-backed compensation queue for deferred stock reductions.
///
/// Publishing is send-and-forget: `publish` returns as soon as the message
/// sits in the local producer queue. The delivery report is consumed in a
/// background task for logging only, so the caller never waits on broker
/// acknowledgement.
#[derive(Clone)]
pub struct KafkaStockQueue {
    producer: FutureProducer,
    topic: String,
}

impl KafkaStockQueue {
    pub fn new(brokers: &str, topic: &str) -> Result<Self, rdkafka::error::KafkaError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()?;

        Ok(Self {
            producer,
            topic: topic.to_string(),
        })
    }
}

#[async_trait]
impl StockQueue for KafkaStockQueue {
    async fn publish(&self, reduction: &StockReduction) -> Result<(), BoxError> {
        let payload = serde_json::to_string(reduction)?;
        let record = FutureRecord::to(&self.topic)
            .key(reduction.equipment_id.as_str())
            .payload(payload.as_str());

        let delivery = match self.producer.send_result(record) {
            Ok(delivery) => delivery,
            Err((err, _record)) => return Err(Box::new(err)),
        };

        let topic = self.topic.clone();
        let equipment_id = reduction.equipment_id.clone();
        let qty = reduction.qty;
        tokio::spawn(async move {
            match delivery.await {
                Ok(Ok(_)) => {
                    tracing::debug!(%topic, %equipment_id, qty, "queued stock reduction");
                }
                Ok(Err((err, _message))) => {
                    tracing::error!(%topic, %equipment_id, qty, %err, "stock reduction not delivered");
                }
                Err(_) => {
                    tracing::error!(%topic, %equipment_id, qty, "stock reduction delivery dropped");
                }
            }
        });

        Ok(())
    }
}
