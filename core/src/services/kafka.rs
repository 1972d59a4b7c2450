//! Kafka probe: create a topic through the controller, produce one record

use async_trait::async_trait;
use chrono::Utc;
use rskafka::client::partition::{Compression, UnknownTopicHandling};
use rskafka::client::ClientBuilder;
use rskafka::record::Record;
use rskafka::BackoffConfig;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

use super::{unique_name, Endpoint, ProbeDescriptor, ProbeError, ServiceProbe};
use crate::env::{get_env, get_env_u16, EnvSource};

/// Broker-side timeout for topic creation
const CREATE_TOPIC_TIMEOUT_MS: i32 = 5_000;
/// Pause between topic creation and the first produce
const TOPIC_PROPAGATION_DELAY: Duration = Duration::from_millis(500);
/// Retry budget of each client operation
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(5);
/// Client operations in one round-trip: connect, create topic, look up
/// partition, produce
const OPERATIONS: u32 = 4;

#[derive(Debug, Clone)]
pub struct KafkaProbe {
    host: String,
    port: u16,
    deadline: Duration,
}

impl KafkaProbe {
    pub const DESCRIPTOR: ProbeDescriptor = ProbeDescriptor {
        service: "Kafka",
        client: "rust-rskafka",
        enable_flag: "ENABLE_KAFKA",
        default_enabled: false,
    };

    /// Settings from `KAFKA_HOST` and `KAFKA_PORT`
    pub fn from_env(env: &dyn EnvSource) -> Self {
        Self {
            host: get_env(env, "KAFKA_HOST", "kafka"),
            port: get_env_u16(env, "KAFKA_PORT", 29092),
            deadline: DEFAULT_DEADLINE,
        }
    }

    /// Replace the per-operation retry budget
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Upper bound on a whole round-trip
    ///
    /// The client only checks its retry deadline between attempts, so a
    /// broker that accepts connections and never answers is cut off here.
    pub fn round_trip_limit(&self) -> Duration {
        self.deadline * OPERATIONS + TOPIC_PROPAGATION_DELAY
    }

    async fn produce_once(&self) -> Result<String, ProbeError> {
        let broker = self.endpoint().address();
        let backoff = BackoffConfig {
            deadline: Some(self.deadline),
            ..Default::default()
        };
        let client = ClientBuilder::new(vec![broker])
            .backoff_config(backoff)
            .build()
            .await?;

        let topic = unique_name("health-check");
        let controller = client.controller_client()?;
        controller
            .create_topic(topic.clone(), 1, 1, CREATE_TOPIC_TIMEOUT_MS)
            .await?;
        debug!("created topic {}", topic);

        tokio::time::sleep(TOPIC_PROPAGATION_DELAY).await;

        // Retries on a fresh topic are bounded by the backoff deadline.
        let partition = client
            .partition_client(topic.clone(), 0, UnknownTopicHandling::Retry)
            .await?;
        let record = Record {
            key: Some(b"test-key".to_vec()),
            value: Some(Self::DESCRIPTOR.client.as_bytes().to_vec()),
            headers: BTreeMap::new(),
            timestamp: Utc::now(),
        };
        let offsets = partition
            .produce(vec![record], Compression::NoCompression)
            .await?;
        debug!(?offsets, "produced to {}", topic);

        Ok(format!("Produced message to topic {}", topic))
    }
}

#[async_trait]
impl ServiceProbe for KafkaProbe {
    fn descriptor(&self) -> ProbeDescriptor {
        Self::DESCRIPTOR
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::new(&self.host, self.port)
    }

    async fn round_trip(&self) -> Result<String, ProbeError> {
        let limit = self.round_trip_limit();
        tokio::time::timeout(limit, self.produce_once())
            .await
            .unwrap_or(Err(ProbeError::Timeout(limit)))
    }
}
