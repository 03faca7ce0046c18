//! Read-committed consumer wrapper.

use crate::error::{ConsumerError, Result};
use clap::Parser;
use eos_types::TransactionalMessage;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer as RdkafkaConsumer, StreamConsumer};
use rdkafka::message::Message as RdkafkaMessage;
use rdkafka::{Offset, TopicPartitionList};

/// Configuration for the read-committed consumer.
#[derive(Debug, Clone, Parser)]
pub struct ConsumerConfig {
    /// Kafka bootstrap brokers (comma-separated)
    #[clap(
        long,
        env = "KAFKA_BROKERS",
        value_delimiter = ',',
        default_value = "localhost:9092,localhost:9093,localhost:9094"
    )]
    pub brokers: Vec<String>,

    /// Consumer group ID
    #[clap(long, default_value = "exactly-once-consumer-group")]
    pub group_id: String,

    /// Topic to consume from
    #[clap(long, default_value = "exactly-once-topic")]
    pub topic: String,

    /// Offset reset strategy when the group has no committed offset
    /// ("earliest" or "latest")
    #[clap(long, default_value = "earliest")]
    pub auto_offset_reset: String,

    /// Session timeout in milliseconds
    #[clap(long, default_value = "6000")]
    pub session_timeout_ms: String,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            brokers: vec![
                "localhost:9092".to_string(),
                "localhost:9093".to_string(),
                "localhost:9094".to_string(),
            ],
            group_id: "exactly-once-consumer-group".to_string(),
            topic: "exactly-once-topic".to_string(),
            auto_offset_reset: "earliest".to_string(),
            session_timeout_ms: "6000".to_string(),
        }
    }
}

impl ConsumerConfig {
    /// Build the rdkafka client configuration for committed reads.
    ///
    /// Auto-commit stays off so offsets only advance after processing, and
    /// `read_committed` isolation hides records of uncommitted or aborted
    /// transactions.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", self.brokers.join(","))
            .set("group.id", &self.group_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", &self.auto_offset_reset)
            .set("isolation.level", "read_committed")
            .set("session.timeout.ms", &self.session_timeout_ms)
            .set("enable.partition.eof", "false");
        config
    }
}

/// A consumed record before decoding.
///
/// Carries the raw payload bytes plus the Kafka metadata needed to commit
/// the record's offset after processing.
#[derive(Debug, Clone)]
pub struct Received {
    /// Raw payload bytes (None for tombstone records)
    pub payload: Option<Vec<u8>>,
    /// Kafka topic name
    pub topic: String,
    /// Kafka partition number
    pub partition: i32,
    /// Kafka offset within the partition
    pub offset: i64,
    /// Message key (if any)
    pub key: Option<Vec<u8>>,
    /// Message timestamp in milliseconds since epoch (if available)
    pub timestamp: Option<i64>,
}

impl Received {
    /// Decode the payload into a [`TransactionalMessage`].
    ///
    /// A missing payload decodes like empty bytes and fails the same way
    /// malformed JSON does.
    pub fn decode(&self) -> eos_types::Result<TransactionalMessage> {
        eos_types::decode(self.payload.as_deref().unwrap_or_default())
    }
}

/// Kafka consumer with committed-read isolation and manual offsets.
pub struct Consumer {
    consumer: StreamConsumer,
    config: ConsumerConfig,
}

impl Consumer {
    /// Create a consumer and subscribe to the configured topic.
    ///
    /// Construction and subscription failures are fatal.
    pub fn new(config: &ConsumerConfig) -> Result<Self> {
        let consumer: StreamConsumer = config.client_config().create()?;

        consumer
            .subscribe(&[&config.topic])
            .map_err(|e| ConsumerError::Subscribe {
                topic: config.topic.clone(),
                source: e,
            })?;

        Ok(Self {
            consumer,
            config: config.clone(),
        })
    }

    /// Receive the next committed record.
    ///
    /// Blocks until a record is available. Only transport failures surface
    /// here; the payload stays raw so the caller decides how to treat
    /// malformed bytes.
    pub async fn recv(&self) -> Result<Received> {
        let msg = self.consumer.recv().await?;

        Ok(Received {
            payload: msg.payload().map(|p| p.to_vec()),
            topic: msg.topic().to_string(),
            partition: msg.partition(),
            offset: msg.offset(),
            key: msg.key().map(|k| k.to_vec()),
            timestamp: msg.timestamp().to_millis(),
        })
    }

    /// Synchronously commit the offset cursor past one record.
    pub fn commit(&self, received: &Received) -> Result<()> {
        let mut tpl = TopicPartitionList::new();
        tpl.add_partition_offset(
            &received.topic,
            received.partition,
            Offset::Offset(received.offset + 1),
        )?;

        self.consumer.commit(&tpl, CommitMode::Sync)?;
        Ok(())
    }

    /// The configuration this consumer was built from.
    pub fn config(&self) -> &ConsumerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_committed_read_knobs() {
        let config = ConsumerConfig::default();
        let client_config = config.client_config();

        assert_eq!(
            client_config.get("bootstrap.servers"),
            Some("localhost:9092,localhost:9093,localhost:9094")
        );
        assert_eq!(
            client_config.get("group.id"),
            Some("exactly-once-consumer-group")
        );
        assert_eq!(client_config.get("enable.auto.commit"), Some("false"));
        assert_eq!(client_config.get("auto.offset.reset"), Some("earliest"));
        assert_eq!(client_config.get("isolation.level"), Some("read_committed"));
    }

    #[test]
    fn test_cli_defaults() {
        let config = ConsumerConfig::parse_from(["consume"]);
        assert_eq!(config.group_id, "exactly-once-consumer-group");
        assert_eq!(config.topic, "exactly-once-topic");
        assert_eq!(config.auto_offset_reset, "earliest");
    }

    #[test]
    fn test_received_decode_round_trip() {
        let message = TransactionalMessage::new("msg_001", "payload");
        let received = Received {
            payload: Some(eos_types::encode(&message).unwrap()),
            topic: "exactly-once-topic".to_string(),
            partition: 0,
            offset: 42,
            key: Some(b"msg_001".to_vec()),
            timestamp: Some(1_700_000_000_000),
        };
        assert_eq!(received.decode().unwrap(), message);
    }

    #[test]
    fn test_received_decode_missing_payload_fails() {
        let received = Received {
            payload: None,
            topic: "exactly-once-topic".to_string(),
            partition: 0,
            offset: 0,
            key: None,
            timestamp: None,
        };
        assert!(received.decode().is_err());
    }
}
