//! # ziptext
//!
//! A text viewer for ZIP archives and the files beside them.
//!
//! This library opens either a ZIP archive or a standalone text-like file.
//! For an archive it lists the entries whose extension is on a configurable
//! allow-list; for a standalone file it lists the sibling files sharing the
//! picked file's extension. A session holds the resulting entry list together
//! with a cursor and loads the decoded UTF-8 content of the selected entry on
//! demand, re-opening the archive for every load.
//!
//! Scans and content loads run as background tasks. Each task carries a
//! generation number and the session discards completions that are no longer
//! the latest, so a stale scan can never overwrite a newer one.
//!
//! ## Example
//!
//! ```no_run
//! use ziptext::config::ExtensionList;
//! use ziptext::session::{Session, Update};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let extensions = ExtensionList::parse("txt,md,log");
//!     let (mut session, mut completions) = Session::new(extensions, false);
//!     session.open("notes.zip".into());
//!
//!     while let Some(outcome) = completions.recv().await {
//!         for update in session.apply(outcome) {
//!             if let Update::Content(text) = update {
//!                 println!("{text}");
//!                 return Ok(());
//!             }
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod content;
pub mod io;
pub mod scan;
pub mod session;
pub mod zip;

#[cfg(test)]
mod testutil;

pub use cli::Cli;
pub use config::{ExtensionList, Settings};
pub use io::{LocalFileReader, ReadAt};
pub use scan::{EntryDescriptor, ScanResult};
pub use session::{Session, TaskOutcome, Update};
pub use zip::{ZipEntry, ZipReader};
