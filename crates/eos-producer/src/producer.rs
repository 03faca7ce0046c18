//! Transactional producer wrapper.

use crate::error::Result;
use crate::identity::generate_transactional_id;
use clap::Parser;
use eos_types::TransactionalMessage;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::ClientConfig;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for the transactional producer.
#[derive(Debug, Clone, Parser)]
pub struct ProducerConfig {
    /// Kafka bootstrap brokers (comma-separated)
    #[clap(
        long,
        env = "KAFKA_BROKERS",
        value_delimiter = ',',
        default_value = "localhost:9092,localhost:9093,localhost:9094"
    )]
    pub brokers: Vec<String>,

    /// Topic to publish to
    #[clap(long, default_value = "exactly-once-topic")]
    pub topic: String,

    /// Stable transactional id for this producer identity.
    ///
    /// The broker uses this id to fence stale producer instances across
    /// restarts, so a production deployment must keep it stable. When unset,
    /// an id is generated from the hostname and a nanosecond timestamp,
    /// which is sufficient only for one-shot runs.
    #[clap(long, env = "EOS_TRANSACTIONAL_ID")]
    pub transactional_id: Option<String>,

    /// Delivery timeout in milliseconds
    #[clap(long, default_value = "5000")]
    pub message_timeout_ms: String,

    /// Timeout in seconds for transaction init/commit/abort calls
    #[clap(long, default_value_t = 30)]
    pub transaction_timeout_secs: u64,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            brokers: vec![
                "localhost:9092".to_string(),
                "localhost:9093".to_string(),
                "localhost:9094".to_string(),
            ],
            topic: "exactly-once-topic".to_string(),
            transactional_id: None,
            message_timeout_ms: "5000".to_string(),
            transaction_timeout_secs: 30,
        }
    }
}

impl ProducerConfig {
    /// Resolve the transactional id: the configured one, or a generated one.
    pub fn resolved_transactional_id(&self) -> String {
        self.transactional_id
            .clone()
            .unwrap_or_else(generate_transactional_id)
    }

    /// Build the rdkafka client configuration for exactly-once publishing.
    ///
    /// Idempotence and all-replica acks make retries within the client safe;
    /// capping in-flight requests at one preserves ordering under those
    /// retries; the transactional id enables the begin/commit protocol.
    pub fn client_config(&self, transactional_id: &str) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", self.brokers.join(","))
            .set("acks", "all")
            .set("enable.idempotence", "true")
            .set("transactional.id", transactional_id)
            .set("max.in.flight.requests.per.connection", "1")
            .set("message.timeout.ms", &self.message_timeout_ms);
        config
    }
}

/// Kafka producer that publishes messages inside transactions.
///
/// Wraps a `FutureProducer` whose transactional capability is initialized
/// once at construction. The typical path is [`send_committed`], which runs
/// one message through begin → enqueue → commit and aborts on any failure
/// in between; the individual steps are also exposed for callers that need
/// to drive the transaction boundary themselves.
///
/// [`send_committed`]: TransactionalProducer::send_committed
pub struct TransactionalProducer {
    producer: FutureProducer,
    topic: String,
    transactional_id: String,
    transaction_timeout: Duration,
}

impl TransactionalProducer {
    /// Create a producer and initialize its transactional capability.
    ///
    /// `init_transactions` registers this producer's transactional id with
    /// the coordinator and fences any previous instance using the same id.
    /// Runs once per producer identity; any failure here is fatal.
    pub async fn new(config: &ProducerConfig) -> Result<Self> {
        let transactional_id = config.resolved_transactional_id();
        let transaction_timeout = Duration::from_secs(config.transaction_timeout_secs);

        let producer: FutureProducer = config.client_config(&transactional_id).create()?;
        producer.init_transactions(transaction_timeout)?;
        info!("Initialized transactions with transactional.id={transactional_id}");

        Ok(Self {
            producer,
            topic: config.topic.clone(),
            transactional_id,
            transaction_timeout,
        })
    }

    /// The transactional id this producer registered with the coordinator.
    pub fn transactional_id(&self) -> &str {
        &self.transactional_id
    }

    /// Begin a new transaction.
    pub fn begin(&self) -> Result<()> {
        self.producer.begin_transaction()?;
        debug!("Transaction begun");
        Ok(())
    }

    /// Serialize a message and enqueue it within the open transaction.
    ///
    /// Returns the partition and offset the record landed at. The record is
    /// written to the log immediately but stays invisible to committed-read
    /// consumers until the transaction commits.
    pub async fn enqueue(&self, message: &TransactionalMessage) -> Result<(i32, i64)> {
        let payload = eos_types::encode(message)?;
        let record = FutureRecord::to(&self.topic)
            .key(&message.id)
            .payload(&payload);

        let (partition, offset) = self
            .producer
            .send(record, Duration::from_secs(5))
            .await
            .map_err(|(err, _)| err)?;

        debug!(
            "Enqueued message {} to partition {partition} at offset {offset}",
            message.id
        );
        Ok((partition, offset))
    }

    /// Commit the open transaction, making its records visible.
    pub fn commit(&self) -> Result<()> {
        self.producer.commit_transaction(self.transaction_timeout)?;
        Ok(())
    }

    /// Abort the open transaction, discarding its records.
    pub fn abort(&self) -> Result<()> {
        self.producer.abort_transaction(self.transaction_timeout)?;
        Ok(())
    }

    /// Publish one message inside one committed transaction.
    ///
    /// begin → enqueue → commit, with no retry and no partial commit: a
    /// failure at any step aborts the whole transaction before the error
    /// surfaces. Returns the partition and offset of the committed record.
    pub async fn send_committed(&self, message: &TransactionalMessage) -> Result<(i32, i64)> {
        self.begin()?;

        let landed = match self.enqueue(message).await {
            Ok(landed) => landed,
            Err(e) => return Err(self.abort_after(e)),
        };

        if let Err(e) = self.commit() {
            return Err(self.abort_after(e));
        }

        let (partition, offset) = landed;
        info!(
            "Committed message {} to topic {} (partition {partition}, offset {offset})",
            message.id, self.topic
        );
        Ok(landed)
    }

    /// Abort the open transaction and hand back the error that caused it.
    fn abort_after(&self, cause: crate::ProducerError) -> crate::ProducerError {
        if let Err(abort_err) = self.abort() {
            warn!("Failed to abort transaction after error: {abort_err}");
        }
        cause
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_exactly_once_knobs() {
        let config = ProducerConfig::default();
        let client_config = config.client_config("txn-test-1");

        assert_eq!(
            client_config.get("bootstrap.servers"),
            Some("localhost:9092,localhost:9093,localhost:9094")
        );
        assert_eq!(client_config.get("acks"), Some("all"));
        assert_eq!(client_config.get("enable.idempotence"), Some("true"));
        assert_eq!(client_config.get("transactional.id"), Some("txn-test-1"));
        assert_eq!(
            client_config.get("max.in.flight.requests.per.connection"),
            Some("1")
        );
        assert_eq!(client_config.get("message.timeout.ms"), Some("5000"));
    }

    #[test]
    fn test_explicit_transactional_id_wins() {
        let config = ProducerConfig {
            transactional_id: Some("stable-producer-1".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolved_transactional_id(), "stable-producer-1");
    }

    #[test]
    fn test_missing_transactional_id_is_generated() {
        let config = ProducerConfig::default();
        let id = config.resolved_transactional_id();
        assert!(id.rsplit_once('-').is_some());
    }

    #[test]
    fn test_cli_defaults() {
        let config = ProducerConfig::parse_from(["produce"]);
        assert_eq!(
            config.brokers,
            vec!["localhost:9092", "localhost:9093", "localhost:9094"]
        );
        assert_eq!(config.topic, "exactly-once-topic");
        assert!(config.transactional_id.is_none());
    }
}
