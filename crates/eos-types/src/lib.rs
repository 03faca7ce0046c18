//! Shared wire types for the exactly-once pipeline.
//!
//! This crate defines the message type exchanged between the transactional
//! producer and the read-committed consumer, plus its JSON codec. Both client
//! crates depend on this one; it depends on neither.
//!
//! # Wire format
//!
//! Messages are JSON objects with exactly two fields:
//!
//! ```json
//! {"id": "msg_001", "content": "Hello Kafka with Exactly Once Semantics"}
//! ```
//!
//! No schema versioning, no compression.

pub mod error;
pub mod message;

// Re-export main types for convenient access
pub use error::{Result, WireError};
pub use message::{decode, encode, TransactionalMessage};
