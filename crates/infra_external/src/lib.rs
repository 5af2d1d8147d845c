//! External Sink Adapters
//!
//! Adapters for the collaborators of the intake pipeline that live outside
//! the database:
//!
//! - **object_store**: damage photo storage (S3-compatible HTTP or a local
//!   directory) implementing `ImageStorePort`
//! - **email**: reviewer notifications over SMTP implementing
//!   `NotificationPort`
//!
//! Every adapter is built from explicit settings; nothing is read from the
//! environment here.

pub mod email;
pub mod object_store;
pub mod error;

use std::sync::Arc;

use core_kernel::SinkConfig;
use domain_claims::ImageStorePort;

pub use email::{build_message, SmtpConfig, SmtpNotifier};
pub use object_store::{aws_object_url, aws_regional_url, object_key, HttpObjectStore, LocalImageStore, ObjectStoreConfig};
pub use error::ExternalError;

/// Picks the image store backend for the given settings
///
/// A configured `local_dir` wins over object storage.
pub fn image_store(sinks: &SinkConfig, config: &ObjectStoreConfig) -> Result<Arc<dyn ImageStorePort>, ExternalError> {
    match &config.local_dir {
        Some(dir) => Ok(Arc::new(LocalImageStore::new(dir.clone()))),
        None => Ok(Arc::new(HttpObjectStore::new(
            sinks.bucket_name.clone(),
            sinks.region.clone(),
            config,
        )?)),
    }
}
