#[cfg(test)]
#[path = "upload_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use tokio::fs;

/// Uploads over this size are rejected before any request is made.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// A file the user has picked for upload, alive only between selection and
/// the completion or failure of the upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub path: path::PathBuf,
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
}

impl PendingUpload {
    /// Reads size and content type off a local file. The content type is
    /// derived from the extension, matching what a browser reports for a
    /// picked file. Validation happens in the controller, not here.
    pub async fn inspect(file_path: &path::Path) -> Result<PendingUpload> {
        let meta = fs::metadata(file_path).await?;

        let file_name = file_path
            .file_name()
            .map(|name| return name.to_string_lossy().to_string())
            .unwrap_or_default();

        let content_type = match file_path
            .extension()
            .map(|ext| return ext.to_string_lossy().to_lowercase())
        {
            Some(ext) if ext == "pdf" => "application/pdf",
            _ => "application/octet-stream",
        };

        return Ok(PendingUpload {
            path: file_path.to_path_buf(),
            file_name,
            content_type: content_type.to_string(),
            size: meta.len(),
        });
    }

    pub fn is_pdf(&self) -> bool {
        return self.content_type == "application/pdf";
    }
}
