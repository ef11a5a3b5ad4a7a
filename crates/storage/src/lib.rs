//! Object storage for persona photos.
//!
//! Handlers depend on the [`ObjectStorage`] trait, never on a concrete
//! client, so the backend is injected at startup and tests can substitute
//! failing or recording doubles. The production implementation talks to any
//! S3-compatible bucket.

use async_trait::async_trait;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;

/// Failure writing an object to the backing store.
#[derive(Debug, thiserror::Error)]
#[error("object store rejected write for '{key}': {message}")]
pub struct StorageError {
    pub key: String,
    pub message: String,
}

/// A bucket that stores photo objects and serves them publicly.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Persist `bytes` under `key`. Any backend rejection is an error; the
    /// caller must treat it as fatal for the surrounding workflow.
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Durable, publicly fetchable URL for a stored object.
    fn public_url(&self, key: &str) -> String;
}

/// Configuration for the S3-compatible photo bucket.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Bucket name (default: `fotos_personas`).
    pub bucket: String,
    /// Bucket region (default: `us-east-1`).
    pub region: String,
    /// Custom endpoint for S3-compatible services; unset means AWS proper.
    pub endpoint: Option<String>,
    /// Base URL public object URLs are built from.
    pub public_base_url: String,
}

impl StorageConfig {
    /// Load storage configuration from environment variables.
    ///
    /// | Env Var                   | Required | Default                                        |
    /// |---------------------------|----------|------------------------------------------------|
    /// | `STORAGE_BUCKET`          | no       | `fotos_personas`                               |
    /// | `STORAGE_REGION`          | no       | `us-east-1`                                    |
    /// | `STORAGE_ENDPOINT`        | no       | --                                             |
    /// | `STORAGE_PUBLIC_BASE_URL` | no       | `{endpoint}/{bucket}` or the AWS bucket URL    |
    pub fn from_env() -> Self {
        let bucket =
            std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| "fotos_personas".into());
        let region = std::env::var("STORAGE_REGION").unwrap_or_else(|_| "us-east-1".into());
        let endpoint = std::env::var("STORAGE_ENDPOINT").ok().filter(|e| !e.is_empty());

        let public_base_url = std::env::var("STORAGE_PUBLIC_BASE_URL").unwrap_or_else(|_| {
            match &endpoint {
                Some(endpoint) => format!("{}/{bucket}", endpoint.trim_end_matches('/')),
                None => format!("https://{bucket}.s3.{region}.amazonaws.com"),
            }
        });

        Self {
            bucket,
            region,
            endpoint,
            public_base_url,
        }
    }
}

/// [`ObjectStorage`] backed by an S3-compatible bucket.
pub struct S3ObjectStorage {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3ObjectStorage {
    /// Build the S3 client from configuration. Credentials come from the
    /// standard AWS environment/profile chain.
    pub async fn connect(config: StorageConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint.clone());
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        // S3-compatible services address buckets by path, not subdomain.
        if config.endpoint.is_some() {
            builder = builder.force_path_style(true);
        }
        let client = aws_sdk_s3::Client::from_conf(builder.build());

        Self {
            client,
            bucket: config.bucket,
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, key, "Photo upload failed");
                StorageError {
                    key: key.to_string(),
                    message: e.to_string(),
                }
            })?;

        tracing::debug!(key, bucket = %self.bucket, "Photo stored");
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a client without touching the network or the environment.
    fn offline_storage(public_base_url: &str) -> S3ObjectStorage {
        let conf = aws_sdk_s3::Config::builder()
            .behavior_version(aws_config::BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        S3ObjectStorage {
            client: aws_sdk_s3::Client::from_conf(conf),
            bucket: "fotos_personas".into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    #[test]
    fn test_public_url_joins_base_and_key() {
        let storage = offline_storage("http://localhost:9000/fotos_personas/");
        // Trailing slash on the base must not double up.
        assert_eq!(
            storage.public_url("7-1700000000000.jpg"),
            "http://localhost:9000/fotos_personas/7-1700000000000.jpg"
        );
    }

    #[test]
    fn test_storage_error_message_names_the_key() {
        let err = StorageError {
            key: "7-1.jpg".into(),
            message: "acceso denegado".into(),
        };
        let texto = err.to_string();
        assert!(texto.contains("7-1.jpg"));
        assert!(texto.contains("acceso denegado"));
    }
}
