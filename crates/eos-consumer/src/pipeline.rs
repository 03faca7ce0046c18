//! The per-record processing loop.
//!
//! Every received record runs through decode → process → commit and is
//! classified into a [`RecordOutcome`]. The tag decides what happens next:
//! malformed input is dead-ended immediately, a failed offset commit is
//! retried with backoff before the record is given up as at-least-once,
//! and a processing failure leaves the offset uncommitted for redelivery.

use crate::consumer::{Consumer, Received};
use crate::error::Result;
use chrono::{DateTime, Utc};
use eos_types::TransactionalMessage;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// How long a single poll waits before re-checking the run bounds.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Options bounding a pipeline run.
///
/// With neither bound set the loop runs until process termination, which is
/// the demonstration default; tests and load scenarios set one of them.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Stop once this many records have been handled (processed or not)
    pub max_messages: Option<u64>,
    /// Stop once this instant passes
    pub deadline: Option<DateTime<Utc>>,
    /// Offset-commit attempts per record before giving up
    pub commit_attempts: u32,
    /// Base delay between commit attempts, doubled each retry
    pub commit_backoff: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_messages: None,
            deadline: None,
            commit_attempts: 3,
            commit_backoff: Duration::from_millis(100),
        }
    }
}

/// What happened to one received record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Decoded, processed, and its offset committed
    Processed { partition: i32, offset: i64 },
    /// Payload failed to decode; skipped without retry
    SkippedMalformed,
    /// Processed, but the offset commit failed after bounded retry.
    /// The record will be reprocessed after a restart (at-least-once).
    CommitFailedRetryable,
    /// The processor returned an error; offset left uncommitted so the
    /// record is redelivered rather than lost
    ProcessingFailed,
}

/// Aggregated counters for a bounded pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: u64,
    pub skipped_malformed: u64,
    pub commit_failures: u64,
    pub processing_failures: u64,
}

impl RunSummary {
    fn record(&mut self, outcome: &RecordOutcome) {
        match outcome {
            RecordOutcome::Processed { .. } => self.processed += 1,
            RecordOutcome::SkippedMalformed => self.skipped_malformed += 1,
            RecordOutcome::CommitFailedRetryable => self.commit_failures += 1,
            RecordOutcome::ProcessingFailed => self.processing_failures += 1,
        }
    }

    /// Total records handled, whatever their outcome.
    pub fn seen(&self) -> u64 {
        self.processed + self.skipped_malformed + self.commit_failures + self.processing_failures
    }
}

/// Delay before commit attempt `attempt + 1` (0-based), doubling each retry.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base * 2u32.saturating_pow(attempt)
}

/// Run the pipeline loop: receive, decode, process, commit.
///
/// One record at a time, no internal parallelism. Transport errors from the
/// broker are logged and the loop continues; only the bounds in `options`
/// end it. Returns the aggregated [`RunSummary`] once a bound is hit.
pub async fn run<F, Fut>(
    consumer: &Consumer,
    options: &RunOptions,
    processor: F,
) -> Result<RunSummary>
where
    F: Fn(TransactionalMessage) -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    let mut summary = RunSummary::default();

    loop {
        if let Some(max) = options.max_messages {
            if summary.seen() >= max {
                break;
            }
        }
        if let Some(deadline) = options.deadline {
            if Utc::now() >= deadline {
                break;
            }
        }

        let received = match tokio::time::timeout(POLL_INTERVAL, consumer.recv()).await {
            Ok(Ok(received)) => received,
            Ok(Err(e)) => {
                error!("Consumer error: {e}");
                continue;
            }
            Err(_) => continue, // poll timeout, re-check bounds
        };

        let outcome = handle_record(consumer, options, &processor, received).await;
        summary.record(&outcome);
    }

    info!(
        "Pipeline run finished: processed={}, skipped_malformed={}, commit_failures={}, processing_failures={}",
        summary.processed,
        summary.skipped_malformed,
        summary.commit_failures,
        summary.processing_failures
    );
    Ok(summary)
}

async fn handle_record<F, Fut>(
    consumer: &Consumer,
    options: &RunOptions,
    processor: &F,
    received: Received,
) -> RecordOutcome
where
    F: Fn(TransactionalMessage) -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    let message = match received.decode() {
        Ok(message) => message,
        Err(e) => {
            warn!(
                "Skipping malformed payload at partition {} offset {}: {e}",
                received.partition, received.offset
            );
            return RecordOutcome::SkippedMalformed;
        }
    };

    if let Err(e) = processor(message).await {
        error!(
            "Processing failed at partition {} offset {}, leaving offset uncommitted: {e:#}",
            received.partition, received.offset
        );
        return RecordOutcome::ProcessingFailed;
    }

    commit_with_retry(consumer, options, &received).await
}

/// Commit one record's offset, retrying with doubling backoff.
///
/// Exhausting the attempts yields `CommitFailedRetryable`: the processing
/// side-effect already happened, so the record becomes at-least-once across
/// a restart instead of exactly-once. The loop keeps consuming either way.
async fn commit_with_retry(
    consumer: &Consumer,
    options: &RunOptions,
    received: &Received,
) -> RecordOutcome {
    let mut attempt = 0;
    loop {
        match consumer.commit(received) {
            Ok(()) => {
                debug!(
                    "Commit success: partition={} offset={}",
                    received.partition, received.offset
                );
                return RecordOutcome::Processed {
                    partition: received.partition,
                    offset: received.offset,
                };
            }
            Err(e) if attempt + 1 < options.commit_attempts => {
                let delay = backoff_delay(options.commit_backoff, attempt);
                warn!(
                    "Offset commit failed (attempt {}/{}), retrying in {delay:?}: {e}",
                    attempt + 1,
                    options.commit_attempts
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                error!(
                    "Offset commit failed after {} attempts, message {} at partition {} offset {} \
                     will be reprocessed on restart: {e}",
                    options.commit_attempts,
                    String::from_utf8_lossy(received.key.as_deref().unwrap_or_default()),
                    received.partition,
                    received.offset
                );
                return RecordOutcome::CommitFailedRetryable;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_each_outcome() {
        let mut summary = RunSummary::default();
        summary.record(&RecordOutcome::Processed {
            partition: 0,
            offset: 1,
        });
        summary.record(&RecordOutcome::Processed {
            partition: 1,
            offset: 7,
        });
        summary.record(&RecordOutcome::SkippedMalformed);
        summary.record(&RecordOutcome::CommitFailedRetryable);
        summary.record(&RecordOutcome::ProcessingFailed);

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.skipped_malformed, 1);
        assert_eq!(summary.commit_failures, 1);
        assert_eq!(summary.processing_failures, 1);
        assert_eq!(summary.seen(), 5);
    }

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let base = Duration::from_millis(100);
        assert_eq!(backoff_delay(base, 0), Duration::from_millis(100));
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(200));
        assert_eq!(backoff_delay(base, 2), Duration::from_millis(400));
    }

    #[test]
    fn test_default_options_are_unbounded() {
        let options = RunOptions::default();
        assert!(options.max_messages.is_none());
        assert!(options.deadline.is_none());
        assert_eq!(options.commit_attempts, 3);
    }
}
