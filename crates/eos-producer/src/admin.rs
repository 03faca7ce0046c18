//! Topic administration.

use crate::error::{ProducerError, Result};
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::ClientConfig;
use std::time::Duration;
use tracing::info;

/// Create a Kafka topic if it doesn't exist.
///
/// "Already exists" is treated as success so produce runs are repeatable
/// against the same cluster.
pub async fn create_topic_if_not_exists(brokers: &str, topic: &str, partitions: i32) -> Result<()> {
    let admin_client: AdminClient<DefaultClientContext> = ClientConfig::new()
        .set("bootstrap.servers", brokers)
        .create()?;

    let new_topic = NewTopic::new(topic, partitions, TopicReplication::Fixed(1));
    let opts = AdminOptions::new().operation_timeout(Some(Duration::from_secs(5)));

    let results = admin_client
        .create_topics(&[new_topic], &opts)
        .await
        .map_err(|e| ProducerError::TopicCreation(format!("Failed to create topics: {e}")))?;

    for result in results {
        match result {
            Ok(topic_name) => info!("Topic '{topic_name}' created successfully"),
            Err((topic_name, err)) => {
                if err.to_string().contains("already exists") {
                    info!("Topic '{topic_name}' already exists");
                } else {
                    return Err(ProducerError::TopicCreation(format!(
                        "Failed to create topic '{topic_name}': {err}"
                    )));
                }
            }
        }
    }

    Ok(())
}
