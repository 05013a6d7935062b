use std::io::Read;
use std::sync::Arc;

use flate2::read::DeflateDecoder;

use crate::io::ReadAt;
use anyhow::{bail, Result};

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipEntry};

/// Archive entry reader
pub struct ZipReader<R: ReadAt> {
    parser: ZipParser<R>,
}

impl<R: ReadAt> ZipReader<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            parser: ZipParser::new(reader),
        }
    }

    /// List all entries of the archive
    pub async fn list_entries(&self) -> Result<Vec<ZipEntry>> {
        self.parser.list_entries().await
    }

    /// Read an entry's payload into memory
    pub async fn read_entry(&self, entry: &ZipEntry) -> Result<Vec<u8>> {
        let data_offset = self.parser.data_offset(entry).await?;

        let mut raw = vec![0u8; entry.compressed_size as usize];
        self.parser.reader().read_at(data_offset, &mut raw).await?;

        match entry.compression_method {
            CompressionMethod::Stored => Ok(raw),
            CompressionMethod::Deflate => {
                let mut decoder = DeflateDecoder::new(raw.as_slice());
                let mut data = Vec::with_capacity(entry.uncompressed_size as usize);
                decoder.read_to_end(&mut data)?;
                Ok(data)
            }
            CompressionMethod::Unknown(_) => {
                bail!(
                    "Unsupported compression method: {}",
                    entry.compression_method.as_u16()
                )
            }
        }
    }

    /// Look an entry up by name and read it.
    ///
    /// Walks the entry list until a matching name is found. Returns
    /// `Ok(None)` when the archive no longer contains the name, leaving the
    /// caller to decide whether that is an error.
    pub async fn read_by_name(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let entries = self.parser.list_entries().await?;
        match entries.iter().find(|e| e.name == name) {
            Some(entry) => Ok(Some(self.read_entry(entry).await?)),
            None => Ok(None),
        }
    }
}
