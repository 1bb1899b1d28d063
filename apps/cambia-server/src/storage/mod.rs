//! Upload persistence and file naming
//!
//! Uploaded parts land in the upload directory under a timestamp prefix so
//! concurrent requests never collide. Output names follow the first input's
//! base name, except the multi-image merge which gets its own timestamp name.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::convert::TargetFormat;

/// A multipart upload written to disk.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    /// Where the bytes were written.
    pub path: PathBuf,
    /// Sanitized client-supplied name, without the timestamp prefix.
    pub original_name: String,
}

/// Replace every character outside `[A-Za-z0-9.\-]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Persist one uploaded file under `{unix_millis}-{sanitized_name}`.
pub fn store_upload(
    upload_dir: &Path,
    original_name: &str,
    bytes: &[u8],
) -> std::io::Result<StoredUpload> {
    let sanitized = sanitize_file_name(original_name);
    let stored_name = format!("{}-{}", Utc::now().timestamp_millis(), sanitized);
    let path = upload_dir.join(stored_name);
    std::fs::write(&path, bytes)?;
    Ok(StoredUpload {
        path,
        original_name: sanitized,
    })
}

/// Output name for a single-file conversion: the input's base name with the
/// target extension.
pub fn output_file_name(original_name: &str, target: TargetFormat) -> String {
    let stem = match original_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => original_name,
    };
    format!("{}.{}", stem, target.extension())
}

/// Output name for the multi-image merge, timestamped to avoid collisions.
pub fn merged_file_name() -> String {
    format!("merged-{}.pdf", Utc::now().timestamp_millis())
}
