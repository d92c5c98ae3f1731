use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;

use aws_utils_core::contract::{ObjectStore, PutObject};
use aws_utils_core::ProviderError;

use crate::aws::provider_error;

/// [`ObjectStore`] backed by S3 `PutObject`.
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_conf(config: &SdkConfig) -> Self {
        Self::new(Client::new(config))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, request: PutObject) -> Result<(), ProviderError> {
        let PutObject {
            bucket,
            key,
            acl,
            content_type,
            body,
        } = request;

        let body = ByteStream::read_from()
            .file(body)
            .build()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, key = %key, "Failed to stream file body");
                provider_error(e)
            })?;

        tracing::debug!(bucket = %bucket, key = %key, content_type = %content_type, "Sending PutObject");
        self.client
            .put_object()
            .bucket(&bucket)
            .key(&key)
            .acl(ObjectCannedAcl::from(acl.as_str()))
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, bucket = %bucket, key = %key, "PutObject rejected");
                provider_error(e)
            })?;
        Ok(())
    }
}
