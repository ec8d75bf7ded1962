use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use url::Url;

use crate::config::Config;
use crate::services::storage::{ObjectStore, StorageError};

#[derive(Clone)]
pub struct S3Service {
    client: Client,
    bucket: String,
    public_base: String,
}

impl S3Service {
    pub async fn new(config: &Config) -> Self {
        let credentials = Credentials::new(
            config.s3_access_key.clone(),
            config.s3_secret_key.clone(),
            None,
            None,
            "static",
        );

        let shared_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.s3_region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(config.s3_endpoint.clone())
            .load()
            .await;

        // Custom endpoints (MinIO, Supabase storage) need path style
        let s3_config = aws_sdk_s3::config::Builder::from(&shared_config)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(s3_config),
            bucket: config.s3_bucket_name.clone(),
            public_base: config.s3_public_url.clone(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Service {
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                let err = e.into_service_error();
                tracing::error!(bucket = %self.bucket, key, "S3 upload error: {:?}", err);
                StorageError(err.to_string())
            })?;

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        object_url(&self.public_base, &self.bucket, key)
    }
}

/// `<base>/<bucket>/<key>` with the key percent-encoded as a single segment.
pub fn object_url(base: &str, bucket: &str, key: &str) -> String {
    match Url::parse(base) {
        Ok(mut url) if !url.cannot_be_a_base() => {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop_if_empty().push(bucket).push(key);
            }
            url.to_string()
        }
        _ => format!("{}/{}/{}", base.trim_end_matches('/'), bucket, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_url_appends_bucket_and_encoded_key() {
        assert_eq!(
            object_url("http://localhost:9000", "pov-uploads", "0190-first dance.mp4"),
            "http://localhost:9000/pov-uploads/0190-first%20dance.mp4"
        );
    }

    #[test]
    fn object_url_keeps_base_path() {
        assert_eq!(
            object_url("https://xyz.supabase.co/storage/v1/object/public/", "pov-uploads", "k-cake.jpg"),
            "https://xyz.supabase.co/storage/v1/object/public/pov-uploads/k-cake.jpg"
        );
    }
}
