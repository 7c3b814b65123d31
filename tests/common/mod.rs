#![allow(dead_code)]
//! Minimal ZIP writer for building test archives.

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::Compression;
use flate2::write::DeflateEncoder;
use std::io::Write;
use tempfile::NamedTempFile;

pub const STORED: u16 = 0;
pub const DEFLATE: u16 = 8;

#[derive(Default)]
pub struct ZipBuilder {
    data: Vec<u8>,
    central: Vec<u8>,
    count: usize,
    comment: Vec<u8>,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored(self, name: &str, content: &[u8]) -> Self {
        self.raw(name, STORED, content, content.len() as u32, &[])
    }

    pub fn deflated(self, name: &str, content: &[u8]) -> Self {
        let compressed = deflate(content);
        self.raw(name, DEFLATE, &compressed, content.len() as u32, &[])
    }

    pub fn directory(self, name: &str) -> Self {
        assert!(name.ends_with('/'));
        self.raw(name, STORED, &[], 0, &[])
    }

    /// Stored entry whose local header carries `extra` bytes.
    pub fn stored_with_local_extra(self, name: &str, content: &[u8], extra: &[u8]) -> Self {
        self.raw(name, STORED, content, content.len() as u32, extra)
    }

    /// Entry with an arbitrary method, payload and declared size.
    pub fn raw(
        mut self,
        name: &str,
        method: u16,
        payload: &[u8],
        size: u32,
        local_extra: &[u8],
    ) -> Self {
        let lfh_offset = self.data.len() as u32;
        let name = name.as_bytes();

        let w = &mut self.data;
        w.write_all(b"PK\x03\x04").unwrap();
        w.write_u16::<LittleEndian>(20).unwrap(); // version needed
        w.write_u16::<LittleEndian>(0).unwrap(); // flags
        w.write_u16::<LittleEndian>(method).unwrap();
        w.write_u16::<LittleEndian>(0).unwrap(); // time
        w.write_u16::<LittleEndian>(0).unwrap(); // date
        w.write_u32::<LittleEndian>(0).unwrap(); // crc32
        w.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
        w.write_u32::<LittleEndian>(size).unwrap();
        w.write_u16::<LittleEndian>(name.len() as u16).unwrap();
        w.write_u16::<LittleEndian>(local_extra.len() as u16).unwrap();
        w.write_all(name).unwrap();
        w.write_all(local_extra).unwrap();
        w.write_all(payload).unwrap();

        let c = &mut self.central;
        c.write_all(b"PK\x01\x02").unwrap();
        c.write_u16::<LittleEndian>(20).unwrap(); // version made by
        c.write_u16::<LittleEndian>(20).unwrap(); // version needed
        c.write_u16::<LittleEndian>(0).unwrap(); // flags
        c.write_u16::<LittleEndian>(method).unwrap();
        c.write_u16::<LittleEndian>(0).unwrap(); // time
        c.write_u16::<LittleEndian>(0).unwrap(); // date
        c.write_u32::<LittleEndian>(0).unwrap(); // crc32
        c.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
        c.write_u32::<LittleEndian>(size).unwrap();
        c.write_u16::<LittleEndian>(name.len() as u16).unwrap();
        c.write_u16::<LittleEndian>(0).unwrap(); // extra length
        c.write_u16::<LittleEndian>(0).unwrap(); // comment length
        c.write_u16::<LittleEndian>(0).unwrap(); // disk number start
        c.write_u16::<LittleEndian>(0).unwrap(); // internal attrs
        c.write_u32::<LittleEndian>(0).unwrap(); // external attrs
        c.write_u32::<LittleEndian>(lfh_offset).unwrap();
        c.write_all(name).unwrap();

        self.count += 1;
        self
    }

    pub fn comment(mut self, comment: &[u8]) -> Self {
        self.comment = comment.to_vec();
        self
    }

    pub fn finish(self) -> Vec<u8> {
        let mut out = self.data;
        let cd_offset = out.len() as u32;
        let cd_size = self.central.len() as u32;
        out.extend_from_slice(&self.central);

        let count = self.count.min(0xFFFF) as u16;
        out.write_all(b"PK\x05\x06").unwrap();
        out.write_u16::<LittleEndian>(0).unwrap(); // disk number
        out.write_u16::<LittleEndian>(0).unwrap(); // disk with CD
        out.write_u16::<LittleEndian>(count).unwrap();
        out.write_u16::<LittleEndian>(count).unwrap();
        out.write_u32::<LittleEndian>(cd_size).unwrap();
        out.write_u32::<LittleEndian>(cd_offset).unwrap();
        out.write_u16::<LittleEndian>(self.comment.len() as u16).unwrap();
        out.write_all(&self.comment).unwrap();
        out
    }

    pub fn write_temp(self) -> NamedTempFile {
        write_temp(&self.finish())
    }
}

pub fn write_temp(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Text that compresses well.
pub fn hello_text() -> Vec<u8> {
    b"hello world ".repeat(200)
}
