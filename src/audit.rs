use crate::config::Config;
use crate::error::ServiceError;
use crate::util::upload_object_to_s3;
use async_trait::async_trait;
use rusoto_core::Client;
use rusoto_s3::S3Client;
use serde::Serialize;

pub const TRANSCODED_KEY: &str = "transcoded.json";
pub const RESULT_KEY: &str = "result.json";

/// Durable storage for raw request and response payloads. Each key is overwritten on write.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn put(&self, key: &str, object: Vec<u8>) -> Result<(), ServiceError>;
}

pub struct S3AuditLog {
    client: S3Client,
    bucket: String,
}

impl S3AuditLog {
    pub fn new(client: S3Client, bucket: String) -> Self {
        S3AuditLog { client, bucket }
    }

    pub fn from_config(config: &Config) -> Self {
        let client = S3Client::new_with_client(Client::shared(), config.region.clone());
        Self::new(client, config.audit_bucket.clone())
    }
}

#[async_trait]
impl AuditLog for S3AuditLog {
    async fn put(&self, key: &str, object: Vec<u8>) -> Result<(), ServiceError> {
        upload_object_to_s3(&self.client, object, self.bucket.clone(), key.to_string()).await
    }
}

/// Writes `data` as JSON under `key`. Failures are logged and never returned.
pub async fn log_to_file<A, T>(audit: &A, key: &str, data: &T)
where
    A: AuditLog + ?Sized,
    T: Serialize + ?Sized,
{
    let object = match serde_json::to_vec(data) {
        Ok(object) => object,
        Err(err) => {
            tracing::warn!(key, error = %err, "Unable to encode audit object");
            return;
        }
    };
    match audit.put(key, object).await {
        Ok(()) => tracing::debug!(key, "Audit object written"),
        Err(err) => tracing::warn!(key, error = %err.msg, "Audit write failed"),
    }
}
