//! [`ObjectStore`] implementation backed by `aws-sdk-s3`.

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::head_bucket::HeadBucketError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use chrono::Utc;
use tracing::{debug, trace};

use stowage_store::{
    ObjectAttributes, ObjectStore, PresignGetRequest, PresignPostRequest, PutObjectRequest,
    StoreError, StoreResult, StoredObject, UploadPolicy,
};

use crate::config::S3StoreConfig;
use crate::post_policy::{self, PostPolicyParams};

/// S3 backend for Stowage.
///
/// Wraps an [`aws_sdk_s3::Client`] built from an [`S3StoreConfig`] and maps
/// the SDK's error surface onto [`StoreError`]. Cheap to clone; the inner
/// client is already reference-counted.
///
/// # Examples
///
/// ```no_run
/// use stowage_s3::{S3Store, S3StoreConfig};
/// use stowage_store::ObjectStore;
///
/// # tokio_test::block_on(async {
/// let store = S3Store::connect(S3StoreConfig::from_env());
/// store.head_bucket("media").await.unwrap();
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
    config: S3StoreConfig,
}

impl S3Store {
    /// Build a store from the given configuration.
    #[must_use]
    pub fn connect(config: S3StoreConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "stowage",
        );

        let mut builder = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(config.force_path_style);
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }

        debug!(
            region = %config.region,
            endpoint = config.endpoint_url.as_deref().unwrap_or("aws"),
            "connecting S3 store"
        );
        Self {
            client: Client::from_conf(builder.build()),
            config,
        }
    }

    /// Returns the underlying SDK client.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Returns the store configuration.
    #[must_use]
    pub fn config(&self) -> &S3StoreConfig {
        &self.config
    }

    /// URL POST uploads for `bucket` go to: path-style against a configured
    /// endpoint, virtual-hosted against AWS.
    fn post_url(&self, bucket: &str) -> String {
        match &self.config.endpoint_url {
            Some(endpoint) => format!("{}/{bucket}", endpoint.trim_end_matches('/')),
            None => format!("https://{bucket}.s3.{}.amazonaws.com", self.config.region),
        }
    }
}

/// Wrap an SDK failure that has no dedicated [`StoreError`] variant.
fn backend_error<E>(err: E) -> StoreError
where
    E: std::error::Error + Send + Sync + 'static,
{
    StoreError::Backend(anyhow::Error::new(err))
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn head_bucket(&self, bucket: &str) -> StoreResult<()> {
        self.client
            .head_bucket()
            .bucket(bucket)
            .send()
            .await
            .map(|_| ())
            .map_err(|err| {
                if err.as_service_error().is_some_and(HeadBucketError::is_not_found) {
                    StoreError::BucketNotFound {
                        bucket: bucket.to_owned(),
                    }
                } else {
                    backend_error(err)
                }
            })
    }

    async fn create_bucket(&self, bucket: &str) -> StoreResult<()> {
        let mut request = self.client.create_bucket().bucket(bucket);
        // S3 rejects a LocationConstraint of us-east-1; everywhere else
        // requires one.
        if self.config.region != "us-east-1" {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(
                        self.config.region.as_str(),
                    ))
                    .build(),
            );
        }

        request.send().await.map_err(|err| {
            let collided = err.as_service_error().is_some_and(|service| {
                service.is_bucket_already_exists() || service.is_bucket_already_owned_by_you()
            });
            if collided {
                StoreError::BucketAlreadyExists {
                    bucket: bucket.to_owned(),
                }
            } else {
                backend_error(err)
            }
        })?;
        debug!(bucket, "created bucket");
        Ok(())
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> StoreResult<()> {
        self.client
            .put_bucket_policy()
            .bucket(bucket)
            .policy(policy)
            .send()
            .await
            .map(|_| ())
            .map_err(backend_error)
    }

    async fn put_object(&self, request: PutObjectRequest) -> StoreResult<()> {
        trace!(
            bucket = %request.bucket,
            key = %request.key,
            size = request.body.len(),
            "putting object"
        );
        self.client
            .put_object()
            .bucket(request.bucket)
            .key(request.key)
            .body(ByteStream::from(request.body))
            .content_type(request.content_type)
            .set_metadata(Some(request.metadata))
            .send()
            .await
            .map(|_| ())
            .map_err(backend_error)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> StoreResult<StoredObject> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                if err.as_service_error().is_some_and(GetObjectError::is_no_such_key) {
                    StoreError::ObjectNotFound {
                        bucket: bucket.to_owned(),
                        key: key.to_owned(),
                    }
                } else {
                    backend_error(err)
                }
            })?;

        let content_type = output.content_type().map(ToOwned::to_owned);
        let metadata = output.metadata().cloned().unwrap_or_default();
        let body = output
            .body
            .collect()
            .await
            .map_err(backend_error)?
            .into_bytes();

        Ok(StoredObject {
            attributes: ObjectAttributes {
                content_type,
                content_length: body.len() as u64,
                metadata,
            },
            body,
        })
    }

    async fn head_object(&self, bucket: &str, key: &str) -> StoreResult<ObjectAttributes> {
        let output = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                if err.as_service_error().is_some_and(HeadObjectError::is_not_found) {
                    StoreError::ObjectNotFound {
                        bucket: bucket.to_owned(),
                        key: key.to_owned(),
                    }
                } else {
                    backend_error(err)
                }
            })?;

        Ok(ObjectAttributes {
            content_type: output.content_type().map(ToOwned::to_owned),
            content_length: output
                .content_length()
                .and_then(|len| u64::try_from(len).ok())
                .unwrap_or(0),
            metadata: output.metadata().cloned().unwrap_or_default(),
        })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StoreResult<()> {
        trace!(bucket, key, "deleting object");
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map(|_| ())
            .map_err(backend_error)
    }

    async fn presign_get(&self, request: PresignGetRequest) -> StoreResult<String> {
        let presigning = PresigningConfig::expires_in(request.expires_in).map_err(backend_error)?;

        let mut get = self
            .client
            .get_object()
            .bucket(request.bucket)
            .key(request.key);
        if let Some(disposition) = request.response_content_disposition {
            get = get.response_content_disposition(disposition);
        }
        if let Some(content_type) = request.response_content_type {
            get = get.response_content_type(content_type);
        }

        let presigned = get.presigned(presigning).await.map_err(backend_error)?;
        Ok(presigned.uri().to_string())
    }

    async fn presign_post(&self, request: PresignPostRequest) -> StoreResult<UploadPolicy> {
        let params = PostPolicyParams {
            bucket: &request.bucket,
            key: &request.key,
            content_length_range: request.content_length_range,
            expires_in: request.expires_in,
            access_key_id: &self.config.access_key_id,
            secret_access_key: &self.config.secret_access_key,
            region: &self.config.region,
            post_url: self.post_url(&request.bucket),
        };

        Ok(post_policy::build_upload_policy(&params, Utc::now()))
    }
}
