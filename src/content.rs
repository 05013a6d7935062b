//! Entry content loading.
//!
//! Content is always fetched fresh: archives are re-opened and searched by
//! entry name on every load, plain files are read through their own path.
//! Bytes decode as UTF-8 with lossy replacement, the way the entry names do.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::io::LocalFileReader;
use crate::scan::EntryDescriptor;
use crate::zip::ZipReader;

/// Shown for directory entries; loading one never performs I/O.
pub const DIRECTORY_PLACEHOLDER: &str = "this is a directory";

/// Load the decoded text of `descriptor`.
///
/// `source` is the originally picked file: the archive to re-open for
/// archive entries, and the fallback path for a folder entry without its own
/// locator. An archive entry whose name has vanished from the archive yields
/// empty text rather than an error.
pub async fn load_content(source: &Path, descriptor: &EntryDescriptor) -> Result<String> {
    if descriptor.is_directory {
        return Ok(DIRECTORY_PLACEHOLDER.to_string());
    }

    if descriptor.in_archive {
        let reader = Arc::new(LocalFileReader::new(source)?);
        let zip = ZipReader::new(reader);
        let bytes = match zip.read_by_name(&descriptor.name).await? {
            Some(bytes) => bytes,
            None => {
                tracing::debug!("entry {} no longer present in {}", descriptor.name, source.display());
                Vec::new()
            }
        };
        return Ok(String::from_utf8_lossy(&bytes).to_string());
    }

    let path = descriptor
        .path
        .clone()
        .unwrap_or_else(|| source.to_path_buf());
    let bytes = tokio::fs::read(&path).await?;
    Ok(String::from_utf8_lossy(&bytes).to_string())
}
