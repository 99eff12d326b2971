//! Low-level PBO stream writer.
//!
//! Layout:
//!
//! ```text
//! properties entry   "\0" | EntryHeader(mime = Vers) | key\0value\0 ... | "\0"
//! file entries       path\0 | EntryHeader
//! end of header      "\0" | EntryHeader(all zero)
//! file contents      raw bytes, in entry order
//! trailer            0x00 | SHA-1 of everything above (20 bytes)
//! ```

use std::io::{self, Read, Write};

use byteorder::WriteBytesExt;
use sha1::{Digest, Sha1};
use zerocopy::byteorder::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::file::MimeType;
use crate::properties::Properties;

/// Content is copied in chunks of this many bytes.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Length of the SHA-1 digest in the trailer.
pub const DIGEST_SIZE: usize = 20;

/// Fixed fields following every entry name.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct EntryHeader {
    pub mime: U32,
    pub original_size: U32,
    /// Always zero; content follows the header in entry order.
    pub offset: U32,
    pub timestamp: U32,
    pub data_size: U32,
}

impl EntryHeader {
    pub const SIZE: usize = 20;

    pub fn new(mime: MimeType, original_size: u32, timestamp: u32, data_size: u32) -> Self {
        Self {
            mime: U32::new(mime.as_u32()),
            original_size: U32::new(original_size),
            offset: U32::new(0),
            timestamp: U32::new(timestamp),
            data_size: U32::new(data_size),
        }
    }

    /// Header with only the mime field set.
    pub fn empty(mime: MimeType) -> Self {
        Self::new(mime, 0, 0, 0)
    }
}

/// Writer that feeds every byte it forwards into a SHA-1 hasher.
pub struct HashingWriter<W> {
    inner: W,
    hasher: Sha1,
    written: u64,
}

impl<W: Write> HashingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha1::new(),
            written: 0,
        }
    }

    /// Bytes forwarded so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Return the inner writer and the digest of everything written.
    pub fn finish(self) -> (W, [u8; DIGEST_SIZE]) {
        let mut digest = [0u8; DIGEST_SIZE];
        digest.copy_from_slice(&self.hasher.finalize());
        (self.inner, digest)
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Sequential PBO writer.
pub struct PboWriter<W> {
    output: HashingWriter<W>,
}

impl<W: Write> PboWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            output: HashingWriter::new(inner),
        }
    }

    /// Bytes written so far, trailer excluded.
    pub fn position(&self) -> u64 {
        self.output.written()
    }

    /// Write a NUL-terminated string.
    pub fn write_asciiz(&mut self, value: &str) -> io::Result<()> {
        self.output.write_all(value.as_bytes())?;
        self.output.write_u8(0)
    }

    /// Write the properties entry and its key/value pairs.
    pub fn write_properties(&mut self, properties: &Properties) -> io::Result<()> {
        self.write_entry("", &EntryHeader::empty(MimeType::Properties))?;
        for (key, value) in properties.iter() {
            self.write_asciiz(key)?;
            self.write_asciiz(value)?;
        }
        self.output.write_u8(0)
    }

    /// Write one file entry.
    pub fn write_entry(&mut self, path: &str, header: &EntryHeader) -> io::Result<()> {
        self.write_asciiz(path)?;
        self.output.write_all(header.as_bytes())
    }

    /// Write the empty entry that ends the header.
    pub fn write_header_end(&mut self) -> io::Result<()> {
        self.write_entry("", &EntryHeader::empty(MimeType::Uncompressed))
    }

    /// Copy `source` to the output in [`CHUNK_SIZE`] chunks, returning the byte count.
    pub fn copy_content(&mut self, source: &mut impl Read) -> io::Result<u64> {
        let mut buffer = vec![0u8; CHUNK_SIZE];
        let mut total = 0u64;
        loop {
            let read = match source.read(&mut buffer) {
                Ok(0) => break,
                Ok(read) => read,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            self.output.write_all(&buffer[..read])?;
            total += read as u64;
        }
        Ok(total)
    }

    /// Append the hash trailer and return the inner writer.
    pub fn finish(self) -> io::Result<W> {
        let (mut inner, digest) = self.output.finish();
        inner.write_u8(0)?;
        inner.write_all(&digest)?;
        inner.flush()?;
        Ok(inner)
    }
}
