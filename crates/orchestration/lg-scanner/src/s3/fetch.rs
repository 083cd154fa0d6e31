//! S3 object retrieval.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use bytes::Bytes;
use lg_error::{FetchError, LgError, Result};
use lg_traits::ObjectFetcher;
use lg_types::{ObjectKey, ScanTarget};
use tracing::trace;

/// Downloads whole objects with `GetObject`.
#[derive(Debug, Clone)]
pub struct S3Fetcher {
    client: Client,
}

impl S3Fetcher {
    /// Create a fetcher over an existing client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectFetcher for S3Fetcher {
    async fn fetch(&self, bucket: &str, key: &ObjectKey) -> Result<Bytes> {
        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key.as_str())
            .send()
            .await
            .map_err(|e| fetch_error(bucket, key, e))?;

        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| {
                let uri = ScanTarget::new(bucket).object_uri(key);
                FetchError::Body(format!("{uri}: {e}"))
            })?;

        let bytes = body.into_bytes();
        trace!(bucket, key = %key, bytes = bytes.len(), "Fetched object");

        Ok(bytes)
    }
}

fn fetch_error(bucket: &str, key: &ObjectKey, error: SdkError<GetObjectError>) -> LgError {
    let uri = ScanTarget::new(bucket).object_uri(key);

    if let Some(service_error) = error.as_service_error() {
        if service_error.is_no_such_key() {
            return FetchError::NotFound(uri).into();
        }
        if service_error.code() == Some("AccessDenied") {
            return FetchError::AccessDenied(uri).into();
        }
    }

    FetchError::Request(format!("{uri}: {}", DisplayErrorContext(&error))).into()
}
