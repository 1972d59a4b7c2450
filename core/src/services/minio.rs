//! MinIO probe: create a bucket, upload one small text object

use async_trait::async_trait;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::region::Region;
use s3::BucketConfiguration;
use tracing::debug;
use uuid::Uuid;

use super::{unique_name, Endpoint, ProbeDescriptor, ProbeError, ServiceProbe};
use crate::env::{get_env, get_env_u16, EnvSource};

/// MinIO ignores the region, but request signing needs one
const REGION: &str = "us-east-1";

#[derive(Debug, Clone)]
pub struct MinioProbe {
    host: String,
    port: u16,
    access_key: String,
    secret_key: String,
}

impl MinioProbe {
    pub const DESCRIPTOR: ProbeDescriptor = ProbeDescriptor {
        service: "MinIO",
        client: "rust-s3",
        enable_flag: "ENABLE_MINIO",
        default_enabled: true,
    };

    /// Settings from `MINIO_HOST`, `MINIO_PORT`, `MINIO_ACCESS_KEY` and
    /// `MINIO_SECRET_KEY`
    pub fn from_env(env: &dyn EnvSource) -> Self {
        Self {
            host: get_env(env, "MINIO_HOST", "minio"),
            port: get_env_u16(env, "MINIO_PORT", 9000),
            access_key: get_env(env, "MINIO_ACCESS_KEY", "minio"),
            secret_key: get_env(env, "MINIO_SECRET_KEY", "minio12345"),
        }
    }

    fn region(&self) -> Region {
        Region::Custom {
            region: REGION.to_string(),
            endpoint: self.endpoint().http_url(),
        }
    }
}

#[async_trait]
impl ServiceProbe for MinioProbe {
    fn descriptor(&self) -> ProbeDescriptor {
        Self::DESCRIPTOR
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::new(&self.host, self.port)
    }

    async fn round_trip(&self) -> Result<String, ProbeError> {
        let credentials = Credentials::new(
            Some(&self.access_key),
            Some(&self.secret_key),
            None,
            None,
            None,
        )?;

        let bucket_name = unique_name("health-check");
        let created = Bucket::create_with_path_style(
            &bucket_name,
            self.region(),
            credentials,
            BucketConfiguration::default(),
        )
        .await?;
        if !(200..300).contains(&created.response_code) {
            return Err(ProbeError::Rejected {
                operation: "create bucket",
                body: created.response_text,
            });
        }
        debug!("created bucket {}", bucket_name);

        let object_name = format!("test-{}.txt", Uuid::new_v4());
        let response = created
            .bucket
            .put_object(&object_name, Self::DESCRIPTOR.client.as_bytes())
            .await?;
        if response.status_code() != 200 {
            return Err(ProbeError::Rejected {
                operation: "upload object",
                body: format!(
                    "status {}: {}",
                    response.status_code(),
                    String::from_utf8_lossy(response.as_slice())
                ),
            });
        }

        Ok(format!(
            "Uploaded object {} to bucket {}",
            object_name, bucket_name
        ))
    }
}
