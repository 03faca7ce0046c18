//! Error types for the consumer crate.

use thiserror::Error;

/// Errors that can occur while consuming.
///
/// Only construction and subscription failures abort a consumer run;
/// per-record failures are classified by the pipeline loop instead of being
/// raised through this type.
#[derive(Error, Debug)]
pub enum ConsumerError {
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("Failed to subscribe to topic '{topic}': {source}")]
    Subscribe {
        topic: String,
        #[source]
        source: rdkafka::error::KafkaError,
    },
}

/// Result type alias for consumer operations.
pub type Result<T> = std::result::Result<T, ConsumerError>;
