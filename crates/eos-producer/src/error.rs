//! Error types for the producer crate.

use thiserror::Error;

/// Errors that can occur while publishing transactionally.
///
/// Every variant is fatal to the produce run: the producer aborts the open
/// transaction (if any) and surfaces the error without retrying.
#[derive(Error, Debug)]
pub enum ProducerError {
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error(transparent)]
    Wire(#[from] eos_types::WireError),

    #[error("Topic creation error: {0}")]
    TopicCreation(String),
}

/// Result type alias for producer operations.
pub type Result<T> = std::result::Result<T, ProducerError>;
