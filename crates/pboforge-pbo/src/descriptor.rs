//! Archive descriptor: the set of files that make up one PBO.

use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use pboforge_config::parse_file;

use crate::error::Result;
use crate::file::{ParsedConfig, PboFile};

/// Files to be packed from one source directory.
#[derive(Debug, Clone)]
pub struct PboDescriptor {
    directory: PathBuf,
    pub files: Vec<PboFile>,
}

impl PboDescriptor {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            files: Vec::new(),
        }
    }

    /// Build a descriptor from scanned `(absolute path, archive path)` pairs.
    ///
    /// `config` designates at most one config source; it is parsed here and
    /// its errors are kept alongside the tree.
    pub fn load<I>(directory: impl Into<PathBuf>, entries: I, config: Option<(PathBuf, String)>) -> Result<Self>
    where
        I: IntoIterator<Item = (PathBuf, String)>,
    {
        let directory = directory.into();
        if !directory.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("'{}' is not a directory", directory.display()),
            )
            .into());
        }

        let mut descriptor = Self::new(directory);
        for (source, path) in entries {
            descriptor.files.push(PboFile::disk(source, &path));
        }

        if let Some((source, path)) = config {
            let parsed = ParsedConfig::from(parse_file(&source)?);
            debug!(
                "Parsed {} with {} error(s)",
                source.display(),
                parsed.errors.len()
            );
            descriptor.files.push(PboFile::config(&path, parsed));
        }

        debug!(
            "Loaded {} file(s) from {}",
            descriptor.files.len(),
            descriptor.directory.display()
        );
        Ok(descriptor)
    }

    /// Source directory on disk.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Config entries, in file order.
    pub fn configs(&self) -> impl Iterator<Item = &PboFile> {
        self.files.iter().filter(|file| file.is_config())
    }

    /// The config located at the archive root.
    pub fn root_config(&self) -> Option<&ParsedConfig> {
        self.files
            .iter()
            .filter(|file| file.directory().is_empty())
            .find_map(PboFile::parsed_config)
    }

    pub fn root_config_mut(&mut self) -> Option<&mut ParsedConfig> {
        self.files
            .iter_mut()
            .filter(|file| file.directory().is_empty())
            .find_map(PboFile::parsed_config_mut)
    }

    /// Find a file by archive path, ignoring case and separator style.
    pub fn find(&self, path: &str) -> Option<&PboFile> {
        let wanted = crate::pbo_path::to_standard_form(path);
        self.files.iter().find(|file| file.full_path() == wanted)
    }

    /// Remove and return a file by archive path.
    pub fn remove(&mut self, path: &str) -> Option<PboFile> {
        let wanted = crate::pbo_path::to_standard_form(path);
        let index = self.files.iter().position(|file| file.full_path() == wanted)?;
        Some(self.files.remove(index))
    }

    /// Returns true if any config recovered from parse errors.
    pub fn has_config_errors(&self) -> bool {
        self.configs()
            .filter_map(PboFile::parsed_config)
            .any(|parsed| !parsed.is_valid())
    }
}
