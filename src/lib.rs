//! Exactly-once pipeline library.
//!
//! Two independent components composed over a shared Kafka topic:
//!
//! - a transactional producer that publishes one message inside an explicit
//!   begin/commit boundary, with idempotence and all-replica acks
//! - a read-committed consumer that only sees committed records and commits
//!   its offset cursor after each record has been processed
//!
//! The broker's transaction coordinator enforces the actual exactly-once
//! invariants; this library exercises them through the client contracts.
//!
//! # CLI Usage
//!
//! ```bash
//! # Publish one message inside a committed transaction
//! eos-pipeline produce --brokers localhost:9092,localhost:9093,localhost:9094
//!
//! # Consume committed messages, committing offsets after processing
//! eos-pipeline consume --group-id exactly-once-consumer-group
//! ```

// Re-export pipeline crates for convenience
pub use eos_consumer as consumer;
pub use eos_producer as producer;
pub use eos_types as types;
