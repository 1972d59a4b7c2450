//! Valkey probe: SET a random payload, GET it back, DEL the key

use async_trait::async_trait;
use redis::AsyncCommands;
use uuid::Uuid;

use super::{Endpoint, ProbeDescriptor, ProbeError, ServiceProbe};
use crate::env::{get_env, get_env_u16, EnvSource};

#[derive(Debug, Clone)]
pub struct ValkeyProbe {
    host: String,
    port: u16,
}

impl ValkeyProbe {
    pub const DESCRIPTOR: ProbeDescriptor = ProbeDescriptor {
        service: "Valkey",
        client: "rust-redis",
        enable_flag: "ENABLE_VALKEY",
        default_enabled: false,
    };

    /// `VALKEY_HOST` / `VALKEY_PORT`, falling back to `REDIS_HOST` / `REDIS_PORT`
    pub fn from_env(env: &dyn EnvSource) -> Self {
        let redis_host = get_env(env, "REDIS_HOST", "valkey");
        let redis_port = get_env_u16(env, "REDIS_PORT", 6379);
        Self {
            host: get_env(env, "VALKEY_HOST", &redis_host),
            port: get_env_u16(env, "VALKEY_PORT", redis_port),
        }
    }

    fn url(&self) -> String {
        format!("redis://{}:{}", self.host, self.port)
    }
}

#[async_trait]
impl ServiceProbe for ValkeyProbe {
    fn descriptor(&self) -> ProbeDescriptor {
        Self::DESCRIPTOR
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::new(&self.host, self.port)
    }

    async fn round_trip(&self) -> Result<String, ProbeError> {
        let client = redis::Client::open(self.url())?;
        let mut con = client.get_multiplexed_async_connection().await?;

        let payload = Uuid::new_v4().to_string();
        let key = format!("health:{}", payload);

        con.set::<_, _, ()>(&key, &payload).await?;
        let value: String = con.get(&key).await?;
        con.del::<_, ()>(&key).await?;

        verify_payload(&value, &payload)?;
        Ok(format!("SET/GET on {} succeeded", key))
    }
}

fn verify_payload(got: &str, want: &str) -> Result<(), ProbeError> {
    if got == want {
        Ok(())
    } else {
        Err(ProbeError::Verification(format!(
            "unexpected payload: got {}, want {}",
            got, want
        )))
    }
}
