//! Integration tests for Stowage against a live S3-compatible endpoint.
//!
//! These tests require a reachable endpoint (MinIO works well) and are
//! marked `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! AWS_ENDPOINT_URL=http://localhost:9000 \
//! AWS_ACCESS_KEY_ID=minioadmin \
//! AWS_SECRET_ACCESS_KEY=minioadmin \
//! cargo test -p stowage-integration -- --ignored
//! ```

use std::sync::Arc;
use std::sync::Once;

use stowage_core::{Stowage, StowageConfig};
use stowage_s3::{S3Store, S3StoreConfig};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Backend configuration for the endpoint under test.
///
/// Reads the standard `AWS_*` variables, defaulting to a local MinIO with
/// its stock credentials.
#[must_use]
pub fn store_config() -> S3StoreConfig {
    init_tracing();

    let mut config = S3StoreConfig::from_env();
    if config.endpoint_url.is_none() {
        config.endpoint_url = Some("http://localhost:9000".to_owned());
    }
    if config.access_key_id.is_empty() {
        config.access_key_id = "minioadmin".to_owned();
        config.secret_access_key = "minioadmin".to_owned();
    }
    config
}

/// A facade over the endpoint under test with the given configuration.
#[must_use]
pub fn stowage_with(config: StowageConfig) -> Stowage {
    Stowage::new(Arc::new(S3Store::connect(store_config())), config)
}

/// A facade over the endpoint under test with default configuration.
#[must_use]
pub fn stowage() -> Stowage {
    stowage_with(StowageConfig::default())
}

/// A plain SDK client for fixture setup and out-of-band verification.
#[must_use]
pub fn s3_client() -> aws_sdk_s3::Client {
    S3Store::connect(store_config()).client().clone()
}

/// Generate a unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("stowage-test-{prefix}-{id}")
}

/// Delete all objects in a bucket, then delete the bucket.
pub async fn cleanup_bucket(client: &aws_sdk_s3::Client, bucket: &str) {
    let mut continuation_token = None;
    loop {
        let mut req = client.list_objects_v2().bucket(bucket);
        if let Some(token) = continuation_token.take() {
            req = req.continuation_token(token);
        }
        let Ok(resp) = req.send().await else {
            return; // Bucket may not exist.
        };

        for obj in resp.contents() {
            if let Some(key) = obj.key() {
                let _ = client.delete_object().bucket(bucket).key(key).send().await;
            }
        }

        if resp.is_truncated() == Some(true) {
            continuation_token = resp.next_continuation_token().map(ToOwned::to_owned);
        } else {
            break;
        }
    }

    let _ = client.delete_bucket().bucket(bucket).send().await;
}

mod test_download;
mod test_provision;
mod test_upload;
