//! Entry list and cursor management.
//!
//! A [`Session`] owns the current entry list, the cursor, and the
//! directory-visibility flag. It is single-owner state: background scans and
//! content loads run as spawned tasks and report back over a channel, and
//! the list is only ever mutated by [`Session::apply`], called from the loop
//! that owns the session.
//!
//! Every spawned task captures a generation number. Overlapping operations
//! are allowed (a second pick while a scan is still running, rapid
//! navigation while a load is in flight), and the generation decides the
//! winner: a completion is applied only when it is the latest one issued,
//! everything older is discarded.

use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::config::ExtensionList;
use crate::content;
use crate::scan::{self, EntryDescriptor, ScanResult, SourceKind};

/// Completion of one background task, marshaled back to the session owner.
#[derive(Debug)]
pub enum TaskOutcome {
    Scan {
        generation: u64,
        result: Result<ScanResult>,
    },
    Load {
        generation: u64,
        result: Result<String>,
    },
}

/// What the presentation shell is told after applying a completion.
#[derive(Debug)]
pub enum Update {
    /// A scan finished; the session's list and cursor are current.
    ScanComplete { total: usize, initial: Option<usize> },
    /// Decoded text of the current entry.
    Content(String),
    /// A scan or load failed; rendered in place of content.
    Error(String),
}

pub struct Session {
    source: Option<(PathBuf, SourceKind)>,
    entries: Vec<EntryDescriptor>,
    cursor: Option<usize>,
    show_dirs: bool,
    extensions: ExtensionList,
    generation: u64,
    tx: UnboundedSender<TaskOutcome>,
}

impl Session {
    /// Create a session and the channel its background tasks complete on.
    pub fn new(extensions: ExtensionList, show_dirs: bool) -> (Self, UnboundedReceiver<TaskOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Self {
            source: None,
            entries: Vec::new(),
            cursor: None,
            show_dirs,
            extensions,
            generation: 0,
            tx,
        };
        (session, rx)
    }

    pub fn entries(&self) -> &[EntryDescriptor] {
        &self.entries
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current(&self) -> Option<&EntryDescriptor> {
        self.cursor.and_then(|i| self.entries.get(i))
    }

    pub fn show_dirs(&self) -> bool {
        self.show_dirs
    }

    pub fn source_kind(&self) -> Option<SourceKind> {
        self.source.as_ref().map(|(_, kind)| *kind)
    }

    /// Pick a file: decide the scan mode from its name and start scanning.
    pub fn open(&mut self, path: PathBuf) {
        let kind = scan::source_kind(&path);
        self.source = Some((path, kind));
        self.spawn_scan();
    }

    /// Advance the cursor; no-op at the end of the list.
    pub fn next(&mut self) {
        if let Some(c) = self.cursor {
            if c + 1 < self.entries.len() {
                self.cursor = Some(c + 1);
                self.spawn_load();
            }
        }
    }

    /// Step the cursor back; no-op at the start of the list.
    pub fn prev(&mut self) {
        if let Some(c) = self.cursor {
            if c > 0 {
                self.cursor = Some(c - 1);
                self.spawn_load();
            }
        }
    }

    /// Move the cursor to `index`; no-op out of bounds.
    pub fn jump_to(&mut self, index: usize) {
        if index < self.entries.len() {
            self.cursor = Some(index);
            self.spawn_load();
        }
    }

    /// Flip directory visibility. Archive mode re-scans with the new flag;
    /// folder results never contain directories, so only the flag changes.
    pub fn toggle_dirs(&mut self) {
        self.show_dirs = !self.show_dirs;
        if self.source_kind() == Some(SourceKind::Archive) {
            self.spawn_scan();
        }
    }

    /// Apply a task completion and report what the shell should show.
    ///
    /// Stale completions (anything but the latest issued generation) are
    /// dropped without touching list, cursor, or content. A successful scan
    /// replaces the list wholesale and schedules a load of the initial
    /// entry; a failed scan empties the list. A failed load leaves the list
    /// and cursor as they were.
    pub fn apply(&mut self, outcome: TaskOutcome) -> Vec<Update> {
        match outcome {
            TaskOutcome::Scan { generation, result } => {
                if generation != self.generation {
                    tracing::debug!("dropping stale scan (generation {generation})");
                    return Vec::new();
                }
                match result {
                    Ok(ScanResult { entries, initial }) => {
                        self.entries = entries;
                        self.cursor = initial;
                        let update = Update::ScanComplete {
                            total: self.entries.len(),
                            initial: self.cursor,
                        };
                        if self.cursor.is_some() {
                            self.spawn_load();
                        }
                        vec![update]
                    }
                    Err(err) => {
                        self.entries.clear();
                        self.cursor = None;
                        vec![Update::Error(format!("{err:#}"))]
                    }
                }
            }
            TaskOutcome::Load { generation, result } => {
                if generation != self.generation {
                    tracing::debug!("dropping stale load (generation {generation})");
                    return Vec::new();
                }
                match result {
                    Ok(text) => vec![Update::Content(text)],
                    Err(err) => vec![Update::Error(format!("{err:#}"))],
                }
            }
        }
    }

    fn issue_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn spawn_scan(&mut self) {
        let Some((path, kind)) = self.source.clone() else {
            return;
        };
        let generation = self.issue_generation();
        let allow = self.extensions.clone();
        let show_dirs = self.show_dirs;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = match kind {
                SourceKind::Archive => scan::scan_archive(&path, &allow, show_dirs).await,
                SourceKind::Folder => scan::scan_folder(&path).await,
            };
            let _ = tx.send(TaskOutcome::Scan { generation, result });
        });
    }

    fn spawn_load(&mut self) {
        let Some((path, _)) = self.source.clone() else {
            return;
        };
        let Some(descriptor) = self.current().cloned() else {
            return;
        };
        let generation = self.issue_generation();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = content::load_content(&path, &descriptor).await;
            let _ = tx.send(TaskOutcome::Load { generation, result });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::DIRECTORY_PLACEHOLDER;
    use crate::testutil::{write_archive, TestEntry};
    use tempfile::tempdir;

    fn allow(raw: &str) -> ExtensionList {
        ExtensionList::parse(raw)
    }

    fn descriptor(name: &str) -> EntryDescriptor {
        EntryDescriptor {
            name: name.to_string(),
            last_modified: 0,
            in_archive: true,
            is_directory: false,
            path: None,
        }
    }

    /// Session preloaded with entries, bypassing the scan tasks.
    fn loaded_session(names: &[&str]) -> (Session, UnboundedReceiver<TaskOutcome>) {
        let (mut session, rx) = Session::new(allow("txt"), false);
        session.source = Some((PathBuf::from("unused.zip"), SourceKind::Archive));
        session.entries = names.iter().map(|n| descriptor(n)).collect();
        session.cursor = if names.is_empty() { None } else { Some(0) };
        (session, rx)
    }

    #[tokio::test]
    async fn navigation_is_bounds_checked() {
        let (mut session, _rx) = loaded_session(&["a.txt", "b.txt"]);

        session.prev();
        assert_eq!(session.cursor(), Some(0));

        session.next();
        assert_eq!(session.cursor(), Some(1));
        session.next();
        assert_eq!(session.cursor(), Some(1));

        session.jump_to(2);
        assert_eq!(session.cursor(), Some(1));
        session.jump_to(0);
        assert_eq!(session.cursor(), Some(0));
    }

    #[tokio::test]
    async fn navigation_without_entries_is_a_no_op() {
        let (mut session, _rx) = loaded_session(&[]);
        session.next();
        session.prev();
        session.jump_to(0);
        assert_eq!(session.cursor(), None);
    }

    #[tokio::test]
    async fn stale_completions_are_discarded() {
        let (mut session, _rx) = loaded_session(&["a.txt"]);
        session.generation = 5;

        let updates = session.apply(TaskOutcome::Scan {
            generation: 4,
            result: Ok(ScanResult {
                entries: vec![descriptor("stale.txt")],
                initial: Some(0),
            }),
        });
        assert!(updates.is_empty());
        assert_eq!(session.entries().len(), 1);
        assert_eq!(session.entries()[0].name, "a.txt");

        let updates = session.apply(TaskOutcome::Load {
            generation: 4,
            result: Ok("stale".to_string()),
        });
        assert!(updates.is_empty());
    }

    #[tokio::test]
    async fn scan_failure_empties_the_list() {
        let (mut session, _rx) = loaded_session(&["a.txt", "b.txt"]);
        let generation = session.generation;

        let updates = session.apply(TaskOutcome::Scan {
            generation,
            result: Err(anyhow::anyhow!("boom")),
        });

        assert!(matches!(updates.as_slice(), [Update::Error(_)]));
        assert!(session.entries().is_empty());
        assert_eq!(session.cursor(), None);
    }

    #[tokio::test]
    async fn load_failure_leaves_list_and_cursor() {
        let (mut session, _rx) = loaded_session(&["a.txt", "b.txt"]);
        let generation = session.generation;

        let updates = session.apply(TaskOutcome::Load {
            generation,
            result: Err(anyhow::anyhow!("boom")),
        });

        assert!(matches!(updates.as_slice(), [Update::Error(_)]));
        assert_eq!(session.entries().len(), 2);
        assert_eq!(session.cursor(), Some(0));
    }

    #[tokio::test]
    async fn applied_scan_schedules_a_load_of_the_initial_entry() {
        let (mut session, mut rx) = Session::new(allow("txt"), true);
        session.source = Some((PathBuf::from("/nonexistent.zip"), SourceKind::Archive));
        let generation = session.generation;

        // A directory entry loads without touching the source.
        let updates = session.apply(TaskOutcome::Scan {
            generation,
            result: Ok(ScanResult {
                entries: vec![EntryDescriptor {
                    name: "sub/".to_string(),
                    last_modified: 0,
                    in_archive: true,
                    is_directory: true,
                    path: None,
                }],
                initial: Some(0),
            }),
        });
        assert!(matches!(
            updates.as_slice(),
            [Update::ScanComplete { total: 1, initial: Some(0) }]
        ));

        let outcome = rx.recv().await.expect("load completion");
        let updates = session.apply(outcome);
        match updates.as_slice() {
            [Update::Content(text)] => assert_eq!(text, DIRECTORY_PLACEHOLDER),
            other => panic!("unexpected updates: {other:?}"),
        }
    }

    #[tokio::test]
    async fn toggle_in_folder_mode_only_flips_the_flag() {
        let (mut session, _rx) = Session::new(allow("txt"), false);
        session.source = Some((PathBuf::from("notes.txt"), SourceKind::Folder));
        let generation = session.generation;

        session.toggle_dirs();
        assert!(session.show_dirs());
        // No re-scan was issued.
        assert_eq!(session.generation, generation);
    }

    #[tokio::test]
    async fn second_pick_wins_regardless_of_completion_order() {
        let dir = tempdir().expect("create temp dir");
        let first = write_archive(
            dir.path(),
            "first.zip",
            &[TestEntry::stored("first.txt", b"from first")],
        );
        let second = write_archive(
            dir.path(),
            "second.zip",
            &[TestEntry::stored("second.txt", b"from second")],
        );

        let (mut session, mut rx) = Session::new(allow("txt"), false);
        session.open(first);
        session.open(second);

        let mut content = None;
        while content.is_none() {
            let outcome = rx.recv().await.expect("task completion");
            for update in session.apply(outcome) {
                if let Update::Content(text) = update {
                    content = Some(text);
                }
            }
        }

        // The first pick's scan is stale by the time it completes; only the
        // second pick's entries and content survive.
        let names: Vec<_> = session.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["second.txt"]);
        assert_eq!(content.as_deref(), Some("from second"));
    }

    #[tokio::test]
    async fn open_scans_and_loads_end_to_end() {
        let dir = tempdir().expect("create temp dir");
        let path = write_archive(
            dir.path(),
            "notes.zip",
            &[
                TestEntry::stored("old.txt", b"old content").timestamp(0x5A21, 0x1000),
                TestEntry::deflated("new.txt", b"new content").timestamp(0x5A21, 0x2000),
                TestEntry::stored("skip.bin", b"binary").timestamp(0x5A21, 0x3000),
            ],
        );

        let (mut session, mut rx) = Session::new(allow("txt"), false);
        session.open(path);

        let mut content = None;
        while content.is_none() {
            let outcome = rx.recv().await.expect("task completion");
            for update in session.apply(outcome) {
                if let Update::Content(text) = update {
                    content = Some(text);
                }
            }
        }

        let names: Vec<_> = session.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["new.txt", "old.txt"]);
        assert_eq!(session.cursor(), Some(0));
        assert_eq!(content.as_deref(), Some("new content"));
    }
}
