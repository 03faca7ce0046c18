//! Transactional Kafka producer for the exactly-once pipeline.
//!
//! This crate wraps an rdkafka `FutureProducer` configured for exactly-once
//! publishing: idempotence on, acks from all replicas, a transactional id,
//! and at most one in-flight request per connection so retries cannot
//! reorder. Messages are published inside explicit transactions; a failure
//! at any step aborts the open transaction before the error surfaces.
//!
//! # Usage
//!
//! ```rust,no_run
//! use eos_producer::{create_topic_if_not_exists, ProducerConfig, TransactionalProducer};
//! use eos_types::TransactionalMessage;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), eos_producer::ProducerError> {
//!     let config = ProducerConfig::default();
//!     create_topic_if_not_exists(&config.brokers.join(","), &config.topic, 1).await?;
//!
//!     let producer = TransactionalProducer::new(&config).await?;
//!     let message = TransactionalMessage::new("msg_001", "Hello Kafka with Exactly Once Semantics");
//!     let (partition, offset) = producer.send_committed(&message).await?;
//!     println!("committed to partition {partition} at offset {offset}");
//!     Ok(())
//! }
//! ```

pub mod admin;
pub mod error;
pub mod identity;
pub mod producer;

// Re-export main types for convenient access
pub use admin::create_topic_if_not_exists;
pub use error::{ProducerError, Result};
pub use identity::generate_transactional_id;
pub use producer::{ProducerConfig, TransactionalProducer};
