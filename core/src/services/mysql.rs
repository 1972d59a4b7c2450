//! MySQL probe: same round-trip as PostgreSQL in the MySQL dialect

use async_trait::async_trait;
use mysql_async::prelude::*;
use mysql_async::{Conn, OptsBuilder, Pool};
use tracing::debug;
use uuid::Uuid;

use super::{Endpoint, ProbeDescriptor, ProbeError, ServiceProbe};
use crate::env::{get_env, get_env_u16, EnvSource};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS health_check_events (
    id CHAR(36) PRIMARY KEY,
    source VARCHAR(255) NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

#[derive(Debug, Clone)]
pub struct MySqlProbe {
    host: String,
    port: u16,
    user: String,
    password: String,
    database: String,
}

impl MySqlProbe {
    pub const DESCRIPTOR: ProbeDescriptor = ProbeDescriptor {
        service: "MySQL",
        client: "rust-mysql-async",
        enable_flag: "ENABLE_MYSQL",
        default_enabled: false,
    };

    /// Settings from `MYSQL_HOST`, `MYSQL_PORT`, `MYSQL_USER`,
    /// `MYSQL_PASSWORD` and `MYSQL_DATABASE`
    pub fn from_env(env: &dyn EnvSource) -> Self {
        Self {
            host: get_env(env, "MYSQL_HOST", "mysql"),
            port: get_env_u16(env, "MYSQL_PORT", 3306),
            user: get_env(env, "MYSQL_USER", "mysql"),
            password: get_env(env, "MYSQL_PASSWORD", "mysql"),
            database: get_env(env, "MYSQL_DATABASE", "devcontainer_db"),
        }
    }

    fn opts(&self) -> OptsBuilder {
        OptsBuilder::default()
            .ip_or_hostname(self.host.clone())
            .tcp_port(self.port)
            .user(Some(self.user.clone()))
            .pass(Some(self.password.clone()))
            .db_name(Some(self.database.clone()))
    }
}

#[async_trait]
impl ServiceProbe for MySqlProbe {
    fn descriptor(&self) -> ProbeDescriptor {
        Self::DESCRIPTOR
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::new(&self.host, self.port)
    }

    async fn round_trip(&self) -> Result<String, ProbeError> {
        let pool = Pool::new(self.opts());

        let outcome = exercise(&pool).await;

        // The connection is back in the pool by now; close everything.
        if let Err(e) = pool.disconnect().await {
            debug!("mysql pool disconnect failed: {}", e);
        }
        outcome
    }
}

async fn exercise(pool: &Pool) -> Result<String, ProbeError> {
    let mut conn = pool.get_conn().await?;
    insert_and_count(&mut conn).await
}

async fn insert_and_count(conn: &mut Conn) -> Result<String, ProbeError> {
    conn.query_drop(CREATE_TABLE).await?;

    let event_id = Uuid::new_v4().to_string();
    conn.exec_drop(
        "INSERT INTO health_check_events (id, source) VALUES (?, ?)",
        (event_id.as_str(), MySqlProbe::DESCRIPTOR.client),
    )
    .await?;

    let count: Option<i64> = conn
        .exec_first(
            "SELECT COUNT(*) FROM health_check_events WHERE id = ?",
            (event_id.as_str(),),
        )
        .await?;

    Ok(format!(
        "Inserted row {} (rows_found={})",
        event_id,
        count.unwrap_or(0)
    ))
}
