//! Entry discovery.
//!
//! A picked file is scanned in one of two modes, decided by its name:
//! `.zip` files are opened as archives and every entry header is examined;
//! anything else is treated as a plain text file whose siblings (same
//! directory, same extension) form the entry list.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use anyhow::Result;

use crate::config::{extension_of, ExtensionList};
use crate::io::LocalFileReader;
use crate::zip::ZipReader;

/// Scanning behavior for a picked file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Archive,
    Folder,
}

/// Archive mode is selected by the picked file's name alone.
pub fn source_kind(path: &Path) -> SourceKind {
    let is_zip = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase().ends_with(".zip"))
        .unwrap_or(false);
    if is_zip {
        SourceKind::Archive
    } else {
        SourceKind::Folder
    }
}

/// One discoverable entry, independent of its source.
///
/// `last_modified` is archive-native (packed DOS date/time) for archive
/// entries and epoch milliseconds for folder entries; a scan result never
/// mixes the two.
#[derive(Debug, Clone)]
pub struct EntryDescriptor {
    pub name: String,
    pub last_modified: u64,
    pub in_archive: bool,
    pub is_directory: bool,
    /// Filesystem locator for folder entries. Archive entries are re-fetched
    /// by name against the picked archive instead.
    pub path: Option<PathBuf>,
}

/// Result of one scan: the ordered entry list and the initial cursor.
#[derive(Debug)]
pub struct ScanResult {
    pub entries: Vec<EntryDescriptor>,
    pub initial: Option<usize>,
}

/// Scan a ZIP archive.
///
/// Non-directory entries qualify when their extension is on the allow-list;
/// directory entries are kept aside and appended only when `show_dirs` is
/// set. Both segments are ordered by modification time, newest first. No
/// entry payload is read.
pub async fn scan_archive(
    path: &Path,
    allow: &ExtensionList,
    show_dirs: bool,
) -> Result<ScanResult> {
    let reader = Arc::new(LocalFileReader::new(path)?);
    let zip = ZipReader::new(reader);

    let mut files = Vec::new();
    let mut folders = Vec::new();
    for entry in zip.list_entries().await? {
        let last_modified = entry.timestamp();
        if entry.is_directory {
            folders.push(EntryDescriptor {
                name: entry.name,
                last_modified,
                in_archive: true,
                is_directory: true,
                path: None,
            });
        } else if allow.is_allowed(&entry.name) {
            files.push(EntryDescriptor {
                name: entry.name,
                last_modified,
                in_archive: true,
                is_directory: false,
                path: None,
            });
        }
    }

    files.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
    let mut entries = files;
    if show_dirs {
        folders.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        entries.append(&mut folders);
    }

    let initial = if entries.is_empty() { None } else { Some(0) };
    tracing::debug!("archive scan of {} found {} entries", path.display(), entries.len());
    Ok(ScanResult { entries, initial })
}

/// Scan the folder around a picked non-archive file.
///
/// Lists the sibling files sharing the picked file's extension, ordered by
/// name ascending. When the directory cannot be read or yields no match the
/// result is the picked file alone. The initial cursor is the picked file's
/// own position, 0 when it is absent from the list.
pub async fn scan_folder(picked: &Path) -> Result<ScanResult> {
    let picked_name = picked
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let picked_ext = extension_of(&picked_name);

    let parent = match picked.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut entries = Vec::new();
    if let Ok(mut dir) = tokio::fs::read_dir(&parent).await {
        while let Ok(Some(item)) = dir.next_entry().await {
            let file_type = match item.file_type().await {
                Ok(t) => t,
                Err(_) => continue,
            };
            if !file_type.is_file() {
                continue;
            }
            let name = item.file_name().to_string_lossy().to_string();
            if extension_of(&name) != picked_ext {
                continue;
            }
            entries.push(EntryDescriptor {
                name,
                last_modified: modified_millis(&item.path()).await,
                in_archive: false,
                is_directory: false,
                path: Some(item.path()),
            });
        }
    }

    if entries.is_empty() {
        // Unreadable directory or no sibling match: the picked file stands alone.
        entries.push(EntryDescriptor {
            name: picked_name.clone(),
            last_modified: modified_millis(picked).await,
            in_archive: false,
            is_directory: false,
            path: Some(picked.to_path_buf()),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    let initial = entries
        .iter()
        .position(|e| e.name == picked_name)
        .unwrap_or(0);

    tracing::debug!("folder scan beside {} found {} entries", picked.display(), entries.len());
    Ok(ScanResult {
        entries,
        initial: Some(initial),
    })
}

async fn modified_millis(path: &Path) -> u64 {
    match tokio::fs::metadata(path).await.and_then(|m| m.modified()) {
        Ok(time) => time
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0),
        Err(_) => 0,
    }
}
