//! Files packed into an archive.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use pboforge_config::{Config, ParseError, ParseResult};

use crate::pbo_path;

/// Packing method recorded in an entry header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum MimeType {
    #[default]
    Uncompressed = 0,
    /// Marks the properties block (`Vers`).
    Properties = 0x5665_7273,
    /// `Cprs`; recorded only, never produced by the writer.
    Compressed = 0x4370_7273,
}

impl MimeType {
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// A parsed config together with the errors recovered while parsing it.
#[derive(Debug, Clone)]
pub struct ParsedConfig {
    pub config: Config,
    pub errors: Vec<ParseError>,
}

impl ParsedConfig {
    /// Returns true if the config parsed without errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl From<ParseResult> for ParsedConfig {
    fn from(result: ParseResult) -> Self {
        Self {
            config: result.config,
            errors: result.errors,
        }
    }
}

/// Where a file's bytes come from.
#[derive(Debug, Clone)]
pub enum FileContent {
    /// A file on disk, opened only while it is copied.
    Disk(PathBuf),
    /// Bytes held in memory.
    Memory(Vec<u8>),
    /// A config encoded at pack time.
    Config(ParsedConfig),
}

/// One file entry of an archive.
#[derive(Debug, Clone)]
pub struct PboFile {
    directory: String,
    name: String,
    pub content: FileContent,
    pub mime: MimeType,
    pub timestamp: u32,
    pub original_size: u32,
    pub data_size: u32,
}

impl PboFile {
    /// Create an entry at `path` (archive-relative).
    ///
    /// # Panics
    ///
    /// Panics if `path` has no file name.
    pub fn new(path: &str, content: FileContent) -> Self {
        let (directory, name) = pbo_path::split(path);
        assert!(!name.is_empty(), "archive path '{path}' has no file name");
        Self {
            directory,
            name: name.to_string(),
            content,
            mime: MimeType::Uncompressed,
            timestamp: 0,
            original_size: 0,
            data_size: 0,
        }
    }

    /// Entry backed by a file on disk, sized from its metadata. An unreadable
    /// file is sized 0 and re-measured by the packer.
    pub fn disk(source: impl Into<PathBuf>, path: &str) -> Self {
        let source = source.into();
        let size = match fs::metadata(&source) {
            Ok(metadata) => u32::try_from(metadata.len()).unwrap_or_else(|_| {
                warn!("{} is larger than 4 GiB, size recorded as {}", source.display(), u32::MAX);
                u32::MAX
            }),
            Err(e) => {
                warn!("Cannot read size of {}, recorded as 0: {e}", source.display());
                0
            }
        };
        let mut file = Self::new(path, FileContent::Disk(source));
        file.original_size = size;
        file.data_size = size;
        file
    }

    /// Entry backed by in-memory bytes.
    pub fn memory(path: &str, bytes: Vec<u8>) -> Self {
        let size = u32::try_from(bytes.len()).unwrap_or(u32::MAX);
        let mut file = Self::new(path, FileContent::Memory(bytes));
        file.original_size = size;
        file.data_size = size;
        file
    }

    pub fn config(path: &str, parsed: impl Into<ParsedConfig>) -> Self {
        Self::new(path, FileContent::Config(parsed.into()))
    }

    /// Standard-form directory inside the archive; empty at the root.
    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn set_directory(&mut self, directory: &str) {
        self.directory = pbo_path::to_standard_form(directory);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        assert!(!name.is_empty(), "file name must not be empty");
        self.name = name;
    }

    /// Full standard-form path, as written to the entry header.
    pub fn full_path(&self) -> String {
        pbo_path::combine([self.directory.as_str(), self.name.as_str()])
    }

    /// Source file on disk, if any.
    pub fn source_path(&self) -> Option<&Path> {
        match &self.content {
            FileContent::Disk(path) => Some(path),
            _ => None,
        }
    }

    pub fn parsed_config(&self) -> Option<&ParsedConfig> {
        match &self.content {
            FileContent::Config(parsed) => Some(parsed),
            _ => None,
        }
    }

    pub fn parsed_config_mut(&mut self) -> Option<&mut ParsedConfig> {
        match &mut self.content {
            FileContent::Config(parsed) => Some(parsed),
            _ => None,
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self.content, FileContent::Config(_))
    }
}
