//! Helpers for building small ZIP archives in tests.

use std::io::Write;
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::write::DeflateEncoder;
use flate2::Compression;

pub(crate) struct TestEntry {
    pub name: String,
    pub data: Vec<u8>,
    pub dos_date: u16,
    pub dos_time: u16,
    pub deflate: bool,
}

impl TestEntry {
    pub fn stored(name: &str, data: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            data: data.to_vec(),
            dos_date: 0x5A21, // 2025-01-01
            dos_time: 0x6000, // 12:00:00
            deflate: false,
        }
    }

    pub fn deflated(name: &str, data: &[u8]) -> Self {
        Self {
            deflate: true,
            ..Self::stored(name, data)
        }
    }

    pub fn directory(name: &str) -> Self {
        assert!(name.ends_with('/'), "directory names end with '/'");
        Self::stored(name, b"")
    }

    pub fn timestamp(mut self, dos_date: u16, dos_time: u16) -> Self {
        self.dos_date = dos_date;
        self.dos_time = dos_time;
        self
    }

    fn method(&self) -> u16 {
        if self.deflate { 8 } else { 0 }
    }

    fn payload(&self) -> Vec<u8> {
        if self.deflate {
            let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&self.data).expect("deflate test payload");
            encoder.finish().expect("finish deflate stream")
        } else {
            self.data.clone()
        }
    }
}

/// Serialize the entries as a ZIP archive: local headers with payloads,
/// then the Central Directory, then the EOCD record.
pub(crate) fn build_archive(entries: &[TestEntry]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut lfh_offsets = Vec::with_capacity(entries.len());
    let mut payloads = Vec::with_capacity(entries.len());

    for entry in entries {
        let payload = entry.payload();
        lfh_offsets.push(out.len() as u32);

        out.extend_from_slice(b"PK\x03\x04");
        out.write_u16::<LittleEndian>(20).unwrap(); // version needed
        out.write_u16::<LittleEndian>(0).unwrap(); // flags
        out.write_u16::<LittleEndian>(entry.method()).unwrap();
        out.write_u16::<LittleEndian>(entry.dos_time).unwrap();
        out.write_u16::<LittleEndian>(entry.dos_date).unwrap();
        out.write_u32::<LittleEndian>(0).unwrap(); // crc32, unchecked by the parser
        out.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
        out.write_u32::<LittleEndian>(entry.data.len() as u32).unwrap();
        out.write_u16::<LittleEndian>(entry.name.len() as u16).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap(); // extra field length
        out.extend_from_slice(entry.name.as_bytes());
        out.extend_from_slice(&payload);

        payloads.push(payload);
    }

    let cd_offset = out.len() as u32;
    for (i, entry) in entries.iter().enumerate() {
        out.extend_from_slice(b"PK\x01\x02");
        out.write_u16::<LittleEndian>(20).unwrap(); // version made by
        out.write_u16::<LittleEndian>(20).unwrap(); // version needed
        out.write_u16::<LittleEndian>(0).unwrap(); // flags
        out.write_u16::<LittleEndian>(entry.method()).unwrap();
        out.write_u16::<LittleEndian>(entry.dos_time).unwrap();
        out.write_u16::<LittleEndian>(entry.dos_date).unwrap();
        out.write_u32::<LittleEndian>(0).unwrap(); // crc32
        out.write_u32::<LittleEndian>(payloads[i].len() as u32).unwrap();
        out.write_u32::<LittleEndian>(entry.data.len() as u32).unwrap();
        out.write_u16::<LittleEndian>(entry.name.len() as u16).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap(); // extra field length
        out.write_u16::<LittleEndian>(0).unwrap(); // comment length
        out.write_u16::<LittleEndian>(0).unwrap(); // disk number start
        out.write_u16::<LittleEndian>(0).unwrap(); // internal attributes
        out.write_u32::<LittleEndian>(0).unwrap(); // external attributes
        out.write_u32::<LittleEndian>(lfh_offsets[i]).unwrap();
        out.extend_from_slice(entry.name.as_bytes());
    }
    let cd_size = out.len() as u32 - cd_offset;

    out.extend_from_slice(b"PK\x05\x06");
    out.write_u16::<LittleEndian>(0).unwrap(); // disk number
    out.write_u16::<LittleEndian>(0).unwrap(); // disk with CD
    out.write_u16::<LittleEndian>(entries.len() as u16).unwrap();
    out.write_u16::<LittleEndian>(entries.len() as u16).unwrap();
    out.write_u32::<LittleEndian>(cd_size).unwrap();
    out.write_u32::<LittleEndian>(cd_offset).unwrap();
    out.write_u16::<LittleEndian>(0).unwrap(); // comment length

    out
}

/// Build the archive and write it under `dir`.
pub(crate) fn write_archive(dir: &Path, name: &str, entries: &[TestEntry]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, build_archive(entries)).expect("write test archive");
    path
}
