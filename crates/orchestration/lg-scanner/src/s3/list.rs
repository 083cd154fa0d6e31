//! Single-request S3 object listing.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Error;
use aws_sdk_s3::types::Object;
use lg_error::{LgError, ListError, Result};
use lg_traits::ObjectLister;
use lg_types::ObjectKey;
use tracing::{debug, warn};

/// Lists object keys with one `ListObjectsV2` call.
///
/// Continuation tokens are not followed: a prefix holding more keys than a
/// single response returns (1000 by default) is scanned partially, and a
/// warning says so.
#[derive(Debug, Clone)]
pub struct S3Lister {
    client: Client,
}

impl S3Lister {
    /// Create a lister over an existing client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectLister for S3Lister {
    async fn list(&self, bucket: &str, prefix: Option<&str>) -> Result<Vec<ObjectKey>> {
        let mut req = self.client.list_objects_v2().bucket(bucket);

        if let Some(prefix) = prefix {
            req = req.prefix(prefix);
        }

        let resp = req.send().await.map_err(|e| list_error(bucket, e))?;

        let keys = keys_from_listing(resp.contents.unwrap_or_default());

        if resp.is_truncated == Some(true) {
            warn!(
                bucket,
                prefix = ?prefix,
                keys = keys.len(),
                "Listing truncated, only the first page of objects will be scanned"
            );
        }

        debug!(bucket, prefix = ?prefix, keys = keys.len(), "Listed objects");

        Ok(keys)
    }
}

/// Extract scannable keys from a listing page, preserving order.
///
/// Directory markers (keys ending with `/`) and empty keys are skipped.
pub fn keys_from_listing(objects: Vec<Object>) -> Vec<ObjectKey> {
    objects
        .into_iter()
        .filter_map(|obj| obj.key)
        .filter(|key| !key.is_empty() && !key.ends_with('/'))
        .map(ObjectKey::from)
        .collect()
}

fn list_error(bucket: &str, error: SdkError<ListObjectsV2Error>) -> LgError {
    if let Some(service_error) = error.as_service_error() {
        if service_error.is_no_such_bucket() {
            return ListError::BucketNotFound(bucket.to_string()).into();
        }
        if service_error.code() == Some("AccessDenied") {
            return ListError::AccessDenied(format!(
                "{bucket}: {}",
                DisplayErrorContext(&error)
            ))
            .into();
        }
    }

    ListError::Request(format!("{bucket}: {}", DisplayErrorContext(&error))).into()
}
