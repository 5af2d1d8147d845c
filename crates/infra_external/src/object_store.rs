//! Damage photo storage
//!
//! Photos are stored under their original filename. Two backends:
//!
//! - [`HttpObjectStore`]: PUTs to the bucket's regional endpoint
//!   (`https://{bucket}.s3.{region}.amazonaws.com/{filename}`) and returns
//!   `https://{bucket}.s3.amazonaws.com/{filename}`. With a custom endpoint
//!   both are the path-style endpoint URL.
//! - [`LocalImageStore`]: writes into a directory, for development

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use core_kernel::{DomainPort, OperationMetadata, PortError};
use domain_claims::ImageStorePort;

use crate::error::ExternalError;

/// Object storage settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ObjectStoreConfig {
    /// S3-compatible endpoint, e.g. `http://localhost:9000`; AWS virtual-host URLs when unset
    pub endpoint: Option<String>,
    /// Write into this directory instead of object storage
    pub local_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

/// Strips any directory part so a filename cannot escape its bucket or directory
pub fn object_key(filename: &str) -> Result<String, ExternalError> {
    let key = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if key.is_empty() || key == "." || key == ".." {
        return Err(ExternalError::Configuration(format!(
            "'{}' is not a usable object key",
            filename
        )));
    }
    Ok(key.to_string())
}

/// Public URL of an object in an AWS bucket
pub fn aws_object_url(bucket: &str, key: &str) -> String {
    format!("https://{}.s3.amazonaws.com/{}", bucket, key)
}

/// Upload URL on the bucket's regional endpoint
pub fn aws_regional_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
}

/// Image store that PUTs objects to an S3-compatible bucket
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    client: reqwest::Client,
    bucket: String,
    region: String,
    endpoint: Option<String>,
}

impl HttpObjectStore {
    pub fn new(
        bucket: impl Into<String>,
        region: impl Into<String>,
        config: &ObjectStoreConfig,
    ) -> Result<Self, ExternalError> {
        let bucket = bucket.into();
        let region = region.into();
        if bucket.trim().is_empty() {
            return Err(ExternalError::Configuration("bucket name must be set".to_string()));
        }
        if region.trim().is_empty() {
            return Err(ExternalError::Configuration("region must be set".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.unwrap_or(30)))
            .build()?;

        Ok(Self {
            client,
            bucket,
            region,
            endpoint: config
                .endpoint
                .as_ref()
                .map(|e| e.trim_end_matches('/').to_string()),
        })
    }

    /// URL the object is written to
    pub fn upload_url(&self, key: &str) -> String {
        match &self.endpoint {
            Some(endpoint) => format!("{}/{}/{}", endpoint, self.bucket, key),
            None => aws_regional_url(&self.bucket, &self.region, key),
        }
    }

    /// URL the object is later read from
    pub fn object_url(&self, key: &str) -> String {
        match &self.endpoint {
            Some(endpoint) => format!("{}/{}/{}", endpoint, self.bucket, key),
            None => aws_object_url(&self.bucket, key),
        }
    }

    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<String, ExternalError> {
        let response = self
            .client
            .put(self.upload_url(key))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExternalError::HttpStatus {
                operation: format!("PUT {}", key),
                status: status.as_u16(),
                body: body.chars().take(512).collect(),
            });
        }
        Ok(self.object_url(key))
    }
}

impl DomainPort for HttpObjectStore {}

#[async_trait]
impl ImageStorePort for HttpObjectStore {
    async fn store_image(
        &self,
        bytes: &[u8],
        filename: &str,
        content_type: &str,
        metadata: Option<OperationMetadata>,
    ) -> Result<String, PortError> {
        let submission_id = metadata.and_then(|m| m.submission_id);
        let key = object_key(filename)?;

        match self.put(&key, bytes, content_type).await {
            Ok(url) => {
                debug!(submission_id = ?submission_id, bucket = %self.bucket, region = %self.region, key = %key, size = bytes.len(), "Stored damage photo");
                Ok(url)
            }
            Err(e) => {
                warn!(submission_id = ?submission_id, bucket = %self.bucket, key = %key, error = %e, "Photo upload failed");
                Err(e.into())
            }
        }
    }
}

/// Image store that writes files into a local directory
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl DomainPort for LocalImageStore {}

#[async_trait]
impl ImageStorePort for LocalImageStore {
    async fn store_image(
        &self,
        bytes: &[u8],
        filename: &str,
        _content_type: &str,
        _metadata: Option<OperationMetadata>,
    ) -> Result<String, PortError> {
        let key = object_key(filename)?;
        let path = self.root.join(&key);

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(ExternalError::from)?;
        tokio::fs::write(&path, bytes).await.map_err(ExternalError::from)?;

        debug!(path = %path.display(), size = bytes.len(), "Stored damage photo locally");
        Ok(format!("file://{}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_strips_directories() {
        assert_eq!(object_key("dent.jpg").unwrap(), "dent.jpg");
        assert_eq!(object_key("../../etc/dent.png").unwrap(), "dent.png");
        assert_eq!(object_key("C:\\photos\\dent.jpeg").unwrap(), "dent.jpeg");
        assert!(object_key("photos/").is_err());
        assert!(object_key("..").is_err());
    }

    #[test]
    fn test_default_urls_use_aws_virtual_host() {
        let store =
            HttpObjectStore::new("auto-insurance-claims-images", "us-east-1", &ObjectStoreConfig::default()).unwrap();
        assert_eq!(
            store.object_url("dent.jpg"),
            "https://auto-insurance-claims-images.s3.amazonaws.com/dent.jpg"
        );
    }

    #[test]
    fn test_uploads_go_to_the_regional_endpoint() {
        let store = HttpObjectStore::new("claims", "eu-west-2", &ObjectStoreConfig::default()).unwrap();
        assert_eq!(store.upload_url("dent.jpg"), "https://claims.s3.eu-west-2.amazonaws.com/dent.jpg");
        assert_eq!(store.object_url("dent.jpg"), "https://claims.s3.amazonaws.com/dent.jpg");
    }

    #[test]
    fn test_custom_endpoint_uses_path_style() {
        let config = ObjectStoreConfig {
            endpoint: Some("http://localhost:9000/".to_string()),
            ..Default::default()
        };
        let store = HttpObjectStore::new("claims", "us-east-1", &config).unwrap();
        assert_eq!(store.object_url("dent.jpg"), "http://localhost:9000/claims/dent.jpg");
        assert_eq!(store.upload_url("dent.jpg"), "http://localhost:9000/claims/dent.jpg");
    }

    #[test]
    fn test_blank_bucket_is_rejected() {
        assert!(HttpObjectStore::new("", "us-east-1", &ObjectStoreConfig::default()).is_err());
        assert!(HttpObjectStore::new("claims", " ", &ObjectStoreConfig::default()).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let config = ObjectStoreConfig {
            endpoint: Some("http://127.0.0.1:1".to_string()),
            timeout_secs: Some(2),
            ..Default::default()
        };
        let store = HttpObjectStore::new("claims", "us-east-1", &config).unwrap();

        let err = store.store_image(&[1, 2, 3], "dent.jpg", "image/jpeg", None).await.unwrap_err();
        assert!(err.is_transient() || matches!(err, PortError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_local_store_writes_file() {
        let dir = std::env::temp_dir().join(format!("claims-intake-{}", std::process::id()));
        let store = LocalImageStore::new(&dir);

        let url = store.store_image(&[9, 8, 7], "dent.png", "image/png", None).await.unwrap();
        assert!(url.starts_with("file://"));
        assert_eq!(tokio::fs::read(dir.join("dent.png")).await.unwrap(), vec![9, 8, 7]);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
