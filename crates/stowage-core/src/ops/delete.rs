//! Batch deletion.
//!
//! [`Stowage::delete_many`] runs three strictly separated phases: validate
//! every address, provision every referenced bucket, then fan out the
//! deletes. The first two phases abort the whole call on failure; the
//! delete phase never does, it settles every entry and reports each
//! outcome.

use futures::StreamExt;
use futures::stream;
use stowage_store::StoreError;
use tracing::{debug, warn};

use crate::address::ObjectAddress;
use crate::error::StowageResult;
use crate::provider::Stowage;

/// Upper bound on concurrently in-flight deletes within one batch.
const MAX_CONCURRENT_DELETES: usize = 16;

/// Outcome of one entry in a batch deletion.
#[derive(Debug)]
pub struct DeleteOutcome {
    /// The address string as supplied by the caller.
    pub address: String,
    /// Whether the backend delete went through.
    pub result: Result<(), StoreError>,
}

impl DeleteOutcome {
    /// Whether this entry was deleted.
    #[must_use]
    pub fn is_fulfilled(&self) -> bool {
        self.result.is_ok()
    }
}

impl Stowage {
    /// Delete every addressed object, best-effort.
    ///
    /// Returns one [`DeleteOutcome`] per input address, in input order.
    /// Individual delete failures land in their outcome instead of failing
    /// the call; inspect each entry.
    ///
    /// # Errors
    ///
    /// The whole call fails without deleting anything when any address is
    /// malformed ([`StowageError::InvalidAddress`]) or a referenced bucket
    /// cannot be provisioned.
    ///
    /// [`StowageError::InvalidAddress`]: crate::StowageError::InvalidAddress
    pub async fn delete_many(&self, addresses: &[String]) -> StowageResult<Vec<DeleteOutcome>> {
        // Phase 1: validate everything before any backend call.
        let parsed = addresses
            .iter()
            .map(|address| ObjectAddress::parse(address))
            .collect::<StowageResult<Vec<_>>>()?;

        // Phase 2: provision each distinct bucket, in first-seen order.
        let mut buckets: Vec<&str> = Vec::new();
        for address in &parsed {
            if !buckets.contains(&address.bucket()) {
                buckets.push(address.bucket());
            }
        }
        for bucket in buckets {
            self.ensure_bucket(bucket).await?;
        }

        // Phase 3: fan out the deletes, keeping every per-item result.
        // `buffered` caps the in-flight count and yields in input order.
        let outcomes = stream::iter(addresses.iter().zip(&parsed).map(|(raw, address)| {
            async move {
                let result = self
                    .store
                    .delete_object(address.bucket(), address.key())
                    .await;
                if let Err(err) = &result {
                    warn!(address = %raw, error = %err, "delete failed, continuing batch");
                }
                DeleteOutcome {
                    address: raw.clone(),
                    result,
                }
            }
        }))
        .buffered(MAX_CONCURRENT_DELETES)
        .collect::<Vec<_>>()
        .await;

        debug!(
            total = outcomes.len(),
            fulfilled = outcomes.iter().filter(|o| o.is_fulfilled()).count(),
            "batch delete settled"
        );
        Ok(outcomes)
    }
}
