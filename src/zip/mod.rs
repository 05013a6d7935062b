//! ZIP archive access.
//!
//! The viewer never keeps an archive open: a scan opens it, reads the entry
//! metadata, and drops the handle; a content load opens it again and looks
//! the entry up by name. The module is organized the same way as the rest of
//! the crate's layered I/O:
//!
//! - [`structures`]: the on-disk ZIP records (EOCD, ZIP64 records, entry
//!   metadata)
//! - [`parser`]: locating and walking the Central Directory
//! - [`reader`]: entry payload reading and by-name lookup
//!
//! A ZIP file ends with the End of Central Directory record, which points at
//! the Central Directory holding metadata for every entry. Reading the
//! directory gives the full entry index without touching any payload, so
//! listing an archive costs two small reads plus the directory itself.
//!
//! Supported: standard ZIP and ZIP64, STORED and DEFLATE payloads. Not
//! supported: encryption, multi-disk archives, other compression methods.

mod parser;
mod reader;
mod structures;

pub use parser::ZipParser;
pub use reader::ZipReader;
pub use structures::*;
