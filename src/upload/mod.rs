//! Attachment uploads: size and extension checks, name sanitization,
//! and storage on the local filesystem with a public URL.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use uuid::Uuid;

use crate::error::{ArsipError, Result};

/// Hard cap on attachment size.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Accepted attachment extensions, lowercase.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "jpg", "jpeg", "png"];

/// A stored attachment, as reported back to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub file_name: String,
    pub file_url: String,
}

/// Reject files that are too large or of a disallowed type. Runs before
/// any bytes are written.
pub fn validate(file_name: &str, size: u64) -> Result<()> {
    if size > MAX_UPLOAD_BYTES {
        return Err(ArsipError::Validation(format!(
            "File too large: {} bytes (maximum is {} MB)",
            size,
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ArsipError::Validation(format!(
            "File type '{}' is not allowed (accepted: {})",
            ext,
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }
    Ok(())
}

/// Strip path components and replace anything outside `[A-Za-z0-9._-]`.
fn sanitize(file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file");
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Filesystem-backed blob storage for attachments.
pub struct BlobStore {
    dir: PathBuf,
}

impl BlobStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Validate and persist an attachment. The stored name is prefixed
    /// with a fresh UUID so concurrent uploads of the same file never
    /// collide; the returned `fileName` is the caller's name, the URL
    /// points at the stored blob. The URL base is passed per call so
    /// a runtime settings change takes effect immediately.
    pub fn put(&self, public_base: &str, file_name: &str, bytes: &[u8]) -> Result<StoredFile> {
        validate(file_name, bytes.len() as u64)?;
        fs::create_dir_all(&self.dir)?;

        let stored_name = format!("{}-{}", Uuid::new_v4(), sanitize(file_name));
        fs::write(self.dir.join(&stored_name), bytes)?;

        Ok(StoredFile {
            file_url: format!(
                "{}/files/{}",
                public_base.trim_end_matches('/'),
                stored_name
            ),
            file_name: file_name.to_string(),
        })
    }

    /// Resolve a stored file name to its on-disk path, refusing names
    /// that would escape the upload directory.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        if name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(ArsipError::Validation("Invalid file name".to_string()));
        }
        let path = self.dir.join(name);
        if !path.is_file() {
            return Err(ArsipError::RecordNotFound(name.to_string()));
        }
        Ok(path)
    }
}
