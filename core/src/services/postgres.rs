//! PostgreSQL probe: create table, insert a UUID row, count it back

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_postgres::{Client, Config, NoTls};
use tracing::debug;
use uuid::Uuid;

use super::{Endpoint, ProbeDescriptor, ProbeError, ServiceProbe};
use crate::env::{get_env, get_env_u16, EnvSource};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS health_check_events (
    id UUID PRIMARY KEY,
    source TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

#[derive(Debug, Clone)]
pub struct PostgresProbe {
    host: String,
    port: u16,
    user: String,
    password: String,
    database: String,
}

impl PostgresProbe {
    pub const DESCRIPTOR: ProbeDescriptor = ProbeDescriptor {
        service: "PostgreSQL",
        client: "rust-tokio-postgres",
        enable_flag: "ENABLE_POSTGRES",
        default_enabled: true,
    };

    /// Settings from `POSTGRES_HOST`, `POSTGRES_PORT`, `POSTGRES_USER`,
    /// `POSTGRES_PASSWORD` and `POSTGRES_DB`
    pub fn from_env(env: &dyn EnvSource) -> Self {
        Self {
            host: get_env(env, "POSTGRES_HOST", "postgres"),
            port: get_env_u16(env, "POSTGRES_PORT", 5432),
            user: get_env(env, "POSTGRES_USER", "postgres"),
            password: get_env(env, "POSTGRES_PASSWORD", "postgres"),
            database: get_env(env, "POSTGRES_DB", "devcontainer_db"),
        }
    }

    fn config(&self) -> Config {
        let mut config = Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .user(&self.user)
            .password(&self.password)
            .dbname(&self.database);
        config
    }
}

#[async_trait]
impl ServiceProbe for PostgresProbe {
    fn descriptor(&self) -> ProbeDescriptor {
        Self::DESCRIPTOR
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::new(&self.host, self.port)
    }

    async fn round_trip(&self) -> Result<String, ProbeError> {
        let (client, connection) = self.config().connect(NoTls).await?;
        let driver = tokio::spawn(async move {
            if let Err(e) = connection.await {
                debug!("postgres connection closed with error: {}", e);
            }
        });

        let outcome = insert_and_count(&client).await;

        // Dropping the client ends the connection task.
        drop(client);
        join_driver(driver).await;
        outcome
    }
}

/// Wait for the connection task to finish, logging if it panicked
async fn join_driver(driver: JoinHandle<()>) {
    if let Err(e) = driver.await {
        debug!("postgres connection task did not finish cleanly: {}", e);
    }
}

async fn insert_and_count(client: &Client) -> Result<String, ProbeError> {
    client.batch_execute(CREATE_TABLE).await?;

    let event_id = Uuid::new_v4();
    client
        .execute(
            "INSERT INTO health_check_events (id, source) VALUES ($1, $2)",
            &[&event_id, &PostgresProbe::DESCRIPTOR.client],
        )
        .await?;

    let row = client
        .query_one(
            "SELECT COUNT(*) FROM health_check_events WHERE id = $1",
            &[&event_id],
        )
        .await?;
    let count: i64 = row.try_get(0)?;

    Ok(format!("Inserted row {} (rows_found={})", event_id, count))
}
