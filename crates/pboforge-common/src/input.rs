//! Character input readers.
//!
//! An [`InputReader`] is a forward-only character source with arbitrary
//! lookahead. Once the underlying data is exhausted every read yields
//! [`END_OF_INPUT`], so callers never deal with I/O failures mid-lex.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use log::{debug, warn};

use crate::{Result, RingBuffer};

/// Sentinel returned once the input is exhausted.
pub const END_OF_INPUT: char = '\0';

/// Size of a single read from disk, in bytes.
const CHUNK_SIZE: usize = 50;

/// Forward-only character source with lookahead.
pub trait InputReader {
    /// Look at the character `n` positions ahead without consuming anything.
    fn peek_nth(&mut self, n: usize) -> char;

    /// Consume and return the next character.
    fn consume(&mut self) -> char;

    /// Look at the next character.
    fn peek(&mut self) -> char {
        self.peek_nth(0)
    }

    /// Look at the next `count` characters, padded with [`END_OF_INPUT`].
    fn peek_n(&mut self, count: usize) -> String {
        (0..count).map(|n| self.peek_nth(n)).collect()
    }

    /// Consume the next `count` characters, padded with [`END_OF_INPUT`].
    fn consume_n(&mut self, count: usize) -> String {
        (0..count).map(|_| self.consume()).collect()
    }
}

/// [`InputReader`] over an in-memory string.
///
/// # Example
///
/// ```
/// use pboforge_common::{InputReader, StringReader};
///
/// let mut reader = StringReader::new("ab");
/// assert_eq!(reader.peek_n(3), "ab\0");
/// assert_eq!(reader.consume(), 'a');
/// assert_eq!(reader.consume(), 'b');
/// assert_eq!(reader.consume(), '\0');
/// ```
#[derive(Debug, Clone)]
pub struct StringReader {
    chars: Vec<char>,
    position: usize,
}

impl StringReader {
    /// Create a reader over `text`.
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            position: 0,
        }
    }
}

impl InputReader for StringReader {
    fn peek_nth(&mut self, n: usize) -> char {
        self.chars
            .get(self.position + n)
            .copied()
            .unwrap_or(END_OF_INPUT)
    }

    fn consume(&mut self) -> char {
        let c = self.peek();
        if self.position < self.chars.len() {
            self.position += 1;
        }
        c
    }
}

/// [`InputReader`] that streams a file in small chunks.
///
/// Bytes are decoded as UTF-8 incrementally, so multi-byte sequences split
/// across chunk boundaries decode correctly; invalid sequences become
/// U+FFFD. The file handle is released as soon as end-of-file is reached.
#[derive(Debug)]
pub struct FileReader {
    file: Option<File>,
    window: RingBuffer<char>,
    pending: Vec<u8>,
}

impl FileReader {
    /// Open `path` for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Opening {} for reading", path.display());
        Ok(Self::from_file(File::open(path)?))
    }

    /// Wrap an already opened file.
    pub fn from_file(file: File) -> Self {
        Self {
            file: Some(file),
            window: RingBuffer::new(CHUNK_SIZE),
            pending: Vec::new(),
        }
    }

    /// Returns true while the file handle is still held.
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Read chunks until `count` characters are buffered or the file ends.
    fn fill(&mut self, count: usize) {
        while self.window.len() < count && self.file.is_some() {
            self.read_chunk();
        }
    }

    fn read_chunk(&mut self) {
        let Some(file) = self.file.as_mut() else {
            return;
        };

        let mut chunk = [0u8; CHUNK_SIZE];
        match file.read(&mut chunk) {
            Ok(0) => self.close(),
            Ok(read) => {
                self.pending.extend_from_slice(&chunk[..read]);
                self.decode_pending();
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => {
                warn!("Read failed, treating as end of input: {e}");
                self.close();
            }
        }
    }

    /// Move every complete character from `pending` into the window.
    fn decode_pending(&mut self) {
        loop {
            let (valid, invalid) = match std::str::from_utf8(&self.pending) {
                Ok(_) => (self.pending.len(), None),
                Err(e) => (e.valid_up_to(), Some(e.error_len())),
            };

            if let Ok(text) = std::str::from_utf8(&self.pending[..valid]) {
                self.window.extend(text.chars());
            }

            match invalid {
                None => {
                    self.pending.clear();
                    return;
                }
                Some(Some(bad)) => {
                    self.window.add(char::REPLACEMENT_CHARACTER);
                    self.pending.drain(..valid + bad);
                }
                // Incomplete sequence at the end of the chunk.
                Some(None) => {
                    self.pending.drain(..valid);
                    return;
                }
            }
        }
    }

    fn close(&mut self) {
        if !self.pending.is_empty() {
            self.window.add(char::REPLACEMENT_CHARACTER);
            self.pending.clear();
        }
        self.file = None;
    }
}

impl InputReader for FileReader {
    fn peek_nth(&mut self, n: usize) -> char {
        self.fill(n + 1);
        self.window.get(n).copied().unwrap_or(END_OF_INPUT)
    }

    fn consume(&mut self) -> char {
        self.fill(1);
        self.window.pop().unwrap_or(END_OF_INPUT)
    }
}
