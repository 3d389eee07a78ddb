/// S3-compatible object storage adapter for post and comment media
use super::{sniff_media, ObjectStorage, StorageError, StoredObject};
use crate::config::StorageConfig;
use crate::models::MediaKind;
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use uuid::Uuid;

pub struct S3ObjectStorage {
    client: Client,
    bucket: String,
    public_base_url: String,
    key_prefix: String,
}

impl S3ObjectStorage {
    pub fn new(client: Client, config: &StorageConfig) -> Self {
        Self {
            client,
            bucket: config.bucket.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            key_prefix: config.key_prefix.trim_matches('/').to_string(),
        }
    }

    /// Build an S3 client from configuration.
    ///
    /// Credentials come from the default provider chain; `endpoint` switches
    /// to an S3-compatible backend such as MinIO.
    pub async fn connect(config: &StorageConfig) -> Self {
        use aws_sdk_s3::config::Region;

        let mut aws_config_builder = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let Some(endpoint) = &config.endpoint {
            aws_config_builder = aws_config_builder.endpoint_url(endpoint);
        }

        let aws_config = aws_config_builder.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
            .force_path_style(config.endpoint.is_some())
            .build();

        tracing::info!(bucket = %config.bucket, "S3 media storage initialized");

        Self::new(Client::from_conf(s3_config), config)
    }

    fn object_key(&self, kind: MediaKind, extension: &str) -> String {
        format!(
            "{}/{}/{}.{}",
            self.key_prefix,
            kind.as_str(),
            Uuid::new_v4(),
            extension
        )
    }

    fn key_from_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(self.public_base_url.as_str())?
            .strip_prefix('/')
            .filter(|key| !key.is_empty())
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn put(&self, blob: Bytes) -> Result<StoredObject, StorageError> {
        let (content_type, kind) = sniff_media(&blob)?;
        let extension = content_type.rsplit('/').next().unwrap_or("bin");
        let key = self.object_key(kind, extension);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(blob))
            .send()
            .await
            .map_err(|e| StorageError::Request(format!("put {}: {}", key, e)))?;

        tracing::debug!(%key, %kind, "media object stored");

        Ok(StoredObject {
            url: format!("{}/{}", self.public_base_url, key),
            kind,
        })
    }

    async fn delete(&self, url: &str, kind: MediaKind) -> Result<bool, StorageError> {
        let Some(key) = self.key_from_url(url) else {
            tracing::warn!(%url, %kind, "media url does not belong to this bucket, skipping delete");
            return Ok(false);
        };

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Request(format!("delete {}: {}", key, e)))?;

        Ok(true)
    }
}
