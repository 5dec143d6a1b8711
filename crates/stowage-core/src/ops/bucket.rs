//! Bucket provisioning.
//!
//! Operations that touch a bucket call [`Stowage::ensure_bucket`] first.
//! It probes for the bucket, creates it on absence, and attaches a
//! public-read policy so uploaded objects are directly fetchable.

use serde_json::json;
use stowage_store::StoreError;
use tracing::{debug, trace};

use crate::error::{StowageError, StowageResult};
use crate::provider::Stowage;

/// Bucket policy granting anonymous read access to every object in `bucket`.
pub(crate) fn public_read_policy(bucket: &str) -> String {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": { "AWS": ["*"] },
            "Action": ["s3:GetObject"],
            "Resource": [format!("arn:aws:s3:::{bucket}/*")],
        }]
    })
    .to_string()
}

impl Stowage {
    /// Make sure `bucket` exists and is publicly readable.
    ///
    /// Probes the bucket first and returns immediately when it is already
    /// there. On absence the bucket is created and a public-read policy is
    /// attached. Losing a creation race to a concurrent caller counts as
    /// success; the policy is still attached.
    ///
    /// # Errors
    ///
    /// Returns [`StowageError::Provisioning`] when the existence probe fails
    /// for a reason other than absence, and [`StowageError::Store`] when
    /// creation or policy application fails.
    pub async fn ensure_bucket(&self, bucket: &str) -> StowageResult<()> {
        match self.store.head_bucket(bucket).await {
            Ok(()) => {
                trace!(bucket, "bucket already present");
                return Ok(());
            }
            Err(err) if err.is_bucket_not_found() => {}
            Err(err) => {
                return Err(StowageError::Provisioning {
                    bucket: bucket.to_owned(),
                    source: err,
                });
            }
        }

        match self.store.create_bucket(bucket).await {
            Ok(()) => debug!(bucket, "created bucket"),
            Err(StoreError::BucketAlreadyExists { .. }) => {
                trace!(bucket, "bucket created concurrently");
            }
            Err(err) => return Err(err.into()),
        }

        self.store
            .put_bucket_policy(bucket, &public_read_policy(bucket))
            .await?;
        debug!(bucket, "attached public-read policy");
        Ok(())
    }
}
