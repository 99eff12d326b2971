//! Mod directory scanning.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use log::debug;
use walkdir::{DirEntry, WalkDir};

/// Root-level file treated as the mod's config.
const CONFIG_FILE: &str = "config.cpp";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// What to include when walking a mod directory.
#[derive(Debug, Default)]
pub struct ScanOptions {
    pub hidden_files: bool,
    pub hidden_dirs: bool,
    exclude: Vec<Pattern>,
}

impl ScanOptions {
    pub fn new(hidden_files: bool, hidden_dirs: bool, exclude: &[String]) -> Result<Self> {
        let exclude = exclude
            .iter()
            .map(|pattern| pattern.trim())
            .filter(|pattern| !pattern.is_empty())
            .map(|pattern| {
                Pattern::new(&pattern.replace('\\', "/"))
                    .with_context(|| format!("Invalid exclusion pattern '{pattern}'"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            hidden_files,
            hidden_dirs,
            exclude,
        })
    }

    /// Returns true if `archive_path` (relative, either separator) matches an exclusion pattern.
    pub fn is_excluded(&self, archive_path: &str) -> bool {
        let normalized = archive_path.replace('\\', "/");
        self.exclude
            .iter()
            .any(|pattern| pattern.matches_with(&normalized, MATCH_OPTIONS))
    }
}

/// Files found in one mod directory.
#[derive(Debug)]
pub struct ScannedMod {
    pub directory: PathBuf,
    /// `(absolute path, archive path)` pairs, sorted by path.
    pub entries: Vec<(PathBuf, String)>,
    pub config: Option<(PathBuf, String)>,
}

/// Walk `directory` and collect the files to pack.
pub fn scan(directory: &Path, options: &ScanOptions) -> Result<ScannedMod> {
    let directory = directory
        .canonicalize()
        .with_context(|| format!("'{}' is not a valid directory", directory.display()))?;

    let mut entries = Vec::new();
    let mut config = None;

    let walker = WalkDir::new(&directory)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || !entry.file_type().is_dir() || options.hidden_dirs || !is_hidden(entry)
        });

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", directory.display()))?;
        if !entry.file_type().is_file() || (!options.hidden_files && is_hidden(&entry)) {
            continue;
        }

        let relative = entry.path().strip_prefix(&directory)?;
        let archive_path = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if options.is_excluded(&archive_path) {
            debug!("Excluded {archive_path}");
            continue;
        }

        let is_config = entry.depth() == 1 && entry.file_name().to_string_lossy().eq_ignore_ascii_case(CONFIG_FILE);
        if is_config && config.is_none() {
            config = Some((entry.into_path(), archive_path));
        } else {
            entries.push((entry.into_path(), archive_path));
        }
    }

    debug!(
        "Scanned {}: {} file(s), config: {}",
        directory.display(),
        entries.len(),
        config.is_some()
    );
    Ok(ScannedMod {
        directory,
        entries,
        config,
    })
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}
