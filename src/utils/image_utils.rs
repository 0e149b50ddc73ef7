use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("image reference `{0}` is not a relative path inside the media root")]
    InvalidReference(String),

    #[error("failed to remove image `{reference}`: {source}")]
    Io {
        reference: String,
        #[source]
        source: std::io::Error,
    },
}

/// Blob storage holding listing photos, addressed by the reference stored on
/// the listing row.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn delete(&self, reference: &str) -> Result<(), ImageStoreError>;
}

/// Photo references live under a folder named after the owning realtor's id,
/// e.g. `<realtor_id>/lake-house/main.jpg`.
pub fn is_owned_by(reference: &str, realtor_id: Uuid) -> bool {
    match reference.split_once('/') {
        Some((owner, rest)) => owner == realtor_id.to_string() && !rest.is_empty(),
        None => false,
    }
}

/// Photos kept as files below `MEDIA_ROOT`.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalImageStore { root: root.into() }
    }

    fn resolve(&self, reference: &str) -> Result<PathBuf, ImageStoreError> {
        let relative = Path::new(reference);
        let escapes_root = relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_)));

        if reference.is_empty() || escapes_root {
            return Err(ImageStoreError::InvalidReference(reference.to_string()));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn delete(&self, reference: &str) -> Result<(), ImageStoreError> {
        let path = self.resolve(reference)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "removed listing image");
                Ok(())
            }
            // already gone
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ImageStoreError::Io {
                reference: reference.to_string(),
                source,
            }),
        }
    }
}
