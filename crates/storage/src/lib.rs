//! Lesson catalog and notebook file storage
//!
//! Provides:
//! - a disk blob store for uploaded notebooks ([`BlobStore`])
//! - lesson / file metadata behind a repository seam ([`CatalogRepository`])
//! - the role-gated upload / list / download workflow ([`CatalogService`])

pub mod model;
pub mod repository;
pub mod service;

pub use model::{FileRecord, Lesson, UploadRequest};
pub use repository::{CatalogRepository, InMemoryCatalog};
pub use service::CatalogService;

use chrono::Utc;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Access denied. Only teachers can upload files.")]
    TeacherOnly,

    #[error("Access denied. Only students or teachers can view lessons.")]
    RoleNotPermitted,

    #[error("Lesson not found")]
    LessonNotFound,

    #[error("File not found")]
    FileNotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata store failure unrelated to any domain rule.
    #[error("Catalog failure: {0}")]
    Repository(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Disk store for uploaded notebook blobs.
///
/// Stored names are `<millis-timestamp>-<random>-<original-name>`: the
/// timestamp keeps the on-disk layout browsable in upload order, the random
/// component makes concurrent uploads of the same name collision-free.
pub struct BlobStore {
    base_path: PathBuf,
}

impl BlobStore {
    /// Open the store, creating the directory if absent. Creation is
    /// idempotent: losing a creation race to a concurrent upload is a
    /// no-op, not an error.
    pub async fn new<P: AsRef<Path>>(base_path: P) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).await?;
        Ok(Self { base_path })
    }

    /// Write a blob and return its stored name.
    pub async fn store(&self, data: &[u8], original_name: &str) -> Result<String> {
        let original_name = sanitized_file_name(original_name)?;
        let stored_name = format!(
            "{}-{}-{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            original_name
        );

        let file_path = self.base_path.join(&stored_name);
        let mut file = fs::File::create(&file_path).await?;
        file.write_all(data).await?;
        file.flush().await?;

        Ok(stored_name)
    }

    /// Read a blob back by its stored name.
    pub async fn read(&self, stored_name: &str) -> Result<Vec<u8>> {
        let stored_name = sanitized_file_name(stored_name)?;
        let file_path = self.base_path.join(stored_name);
        match fs::read(&file_path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CatalogError::FileNotFound)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a blob. Used as the compensating action when a metadata
    /// insert fails after the blob was written.
    pub async fn remove(&self, stored_name: &str) -> Result<()> {
        let stored_name = sanitized_file_name(stored_name)?;
        fs::remove_file(self.base_path.join(stored_name)).await?;
        Ok(())
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

/// Reduce a client-supplied name to its final path component, rejecting
/// anything that could escape the store directory.
fn sanitized_file_name(name: &str) -> Result<&str> {
    let file_name = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CatalogError::InvalidInput("Invalid file name".to_string()))?;
    if file_name != name {
        return Err(CatalogError::InvalidInput("Invalid file name".to_string()));
    }
    Ok(file_name)
}
