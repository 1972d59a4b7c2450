//! OpenSearch probe: create an index, index one document

use async_trait::async_trait;
use opensearch::http::response::Response;
use opensearch::http::transport::Transport;
use opensearch::indices::IndicesCreateParts;
use opensearch::{IndexParts, OpenSearch};
use serde_json::json;
use uuid::Uuid;

use super::{unique_name, Endpoint, ProbeDescriptor, ProbeError, ServiceProbe};
use crate::env::{get_env, get_env_u16, EnvSource};

#[derive(Debug, Clone)]
pub struct OpenSearchProbe {
    host: String,
    port: u16,
}

impl OpenSearchProbe {
    pub const DESCRIPTOR: ProbeDescriptor = ProbeDescriptor {
        service: "OpenSearch",
        client: "rust-opensearch",
        enable_flag: "ENABLE_OPENSEARCH",
        default_enabled: false,
    };

    /// Settings from `OPENSEARCH_HOST` and `OPENSEARCH_PORT`
    pub fn from_env(env: &dyn EnvSource) -> Self {
        Self {
            host: get_env(env, "OPENSEARCH_HOST", "opensearch"),
            port: get_env_u16(env, "OPENSEARCH_PORT", 9200),
        }
    }
}

#[async_trait]
impl ServiceProbe for OpenSearchProbe {
    fn descriptor(&self) -> ProbeDescriptor {
        Self::DESCRIPTOR
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::new(&self.host, self.port)
    }

    async fn round_trip(&self) -> Result<String, ProbeError> {
        let transport = Transport::single_node(&self.endpoint().http_url())?;
        let client = OpenSearch::new(transport);

        let index = unique_name("health-check");
        let response = client
            .indices()
            .create(IndicesCreateParts::Index(&index))
            .send()
            .await?;
        ensure_success("create index", response).await?;

        let doc_id = Uuid::new_v4().to_string();
        let response = client
            .index(IndexParts::IndexId(&index, &doc_id))
            .body(json!({
                "source": Self::DESCRIPTOR.client,
                "id": doc_id,
            }))
            .send()
            .await?;
        ensure_success("index document", response).await?;

        Ok(format!("Indexed document {} in index {}", doc_id, index))
    }
}

/// Turn a non-2xx response into [`ProbeError::Rejected`] carrying the body
async fn ensure_success(operation: &'static str, response: Response) -> Result<(), ProbeError> {
    if response.status_code().is_success() {
        return Ok(());
    }
    let body = response.text().await?;
    Err(ProbeError::Rejected { operation, body })
}
