//! Command-line interface for the exactly-once pipeline.
//!
//! # Usage Examples
//!
//! ```bash
//! # Publish the demo message inside a committed transaction
//! eos-pipeline produce
//!
//! # Publish a custom message with a stable producer identity
//! eos-pipeline produce \
//!   --transactional-id orders-producer-1 \
//!   --id msg_042 --content "payload"
//!
//! # Consume until terminated
//! eos-pipeline consume
//!
//! # Consume a bounded run (useful for scripted checks)
//! eos-pipeline consume --max-messages 10 --run-for-secs 30
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use eos_consumer::{Consumer, ConsumerConfig, RunOptions};
use eos_producer::{create_topic_if_not_exists, ProducerConfig, TransactionalProducer};
use eos_types::TransactionalMessage;
use tracing::info;

#[derive(Parser)]
#[command(name = "eos-pipeline")]
#[command(about = "A transactional producer and read-committed consumer demonstrating exactly-once delivery")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish one message inside a committed transaction
    Produce {
        #[command(flatten)]
        config: ProducerConfig,

        /// Unique identifier of the logical message
        #[arg(long, default_value = "msg_001")]
        id: String,

        /// Message body
        #[arg(long, default_value = "Hello Kafka with Exactly Once Semantics")]
        content: String,

        /// Partition count used when the topic has to be created
        #[arg(long, default_value_t = 1)]
        partitions: i32,
    },
    /// Consume committed messages, committing offsets after processing
    Consume {
        #[command(flatten)]
        config: ConsumerConfig,

        /// Stop after handling this many records (default: run until terminated)
        #[arg(long)]
        max_messages: Option<u64>,

        /// Stop after this many seconds (default: run until terminated)
        #[arg(long)]
        run_for_secs: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Produce {
            config,
            id,
            content,
            partitions,
        } => {
            create_topic_if_not_exists(&config.brokers.join(","), &config.topic, partitions)
                .await
                .context("Failed to create topic")?;

            let producer = TransactionalProducer::new(&config)
                .await
                .context("Failed to create transactional producer")?;

            let message = TransactionalMessage::new(id, content);
            producer
                .send_committed(&message)
                .await
                .context("Failed to publish message transactionally")?;

            info!("Message sent successfully with exactly-once semantics");
        }
        Commands::Consume {
            config,
            max_messages,
            run_for_secs,
        } => {
            let consumer = Consumer::new(&config).context("Failed to create consumer")?;

            let options = RunOptions {
                max_messages,
                deadline: run_for_secs.map(|s| chrono::Utc::now() + chrono::Duration::seconds(s)),
                ..Default::default()
            };

            info!(
                "Consumer started, waiting for messages on topic {}...",
                config.topic
            );

            eos_consumer::run(&consumer, &options, |message| async move {
                info!(
                    "Processing message: id={}, content={}",
                    message.id, message.content
                );
                Ok(())
            })
            .await
            .context("Consumer run failed")?;
        }
    }

    Ok(())
}
