//! Read-committed Kafka consumer for the exactly-once pipeline.
//!
//! This crate wraps an rdkafka `StreamConsumer` configured for committed-read
//! isolation with manual offset management: records belonging to uncommitted
//! or aborted transactions are never delivered, and an offset is committed
//! only after the record behind it has been processed.
//!
//! The pipeline loop classifies every received record into an explicit
//! [`RecordOutcome`] and drives distinct handling from the tag: malformed
//! payloads are skipped immediately, offset-commit failures get bounded
//! retry with backoff before the record is surfaced as the documented
//! at-least-once fallback, and processing failures leave the offset
//! uncommitted so the record is redelivered rather than lost.
//!
//! # Usage
//!
//! ```rust,no_run
//! use eos_consumer::{run, Consumer, ConsumerConfig, RunOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), eos_consumer::ConsumerError> {
//!     let consumer = Consumer::new(&ConsumerConfig::default())?;
//!     let summary = run(&consumer, &RunOptions::default(), |message| async move {
//!         println!("Processing message: id={}, content={}", message.id, message.content);
//!         Ok(())
//!     })
//!     .await?;
//!     println!("processed {} messages", summary.processed);
//!     Ok(())
//! }
//! ```

pub mod consumer;
pub mod error;
pub mod pipeline;

// Re-export main types for convenient access
pub use consumer::{Consumer, ConsumerConfig, Received};
pub use error::{ConsumerError, Result};
pub use pipeline::{run, RecordOutcome, RunOptions, RunSummary};
