//! Packing a descriptor into a `.pbo` file.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use pboforge_config::{rapify, render_text, Scope};
use tempfile::NamedTempFile;

use crate::component::PackerComponent;
use crate::descriptor::PboDescriptor;
use crate::error::{PackError, Result};
use crate::file::{FileContent, ParsedConfig, PboFile};
use crate::properties::Properties;
use crate::writer::{EntryHeader, PboWriter};

/// Prefix used when none can be found.
pub const DEFAULT_PREFIX: &str = "UnnamedPBO";

/// Name of the file whose content sets the prefix.
pub const PREFIX_FILE: &str = "$prefix$";

const PATCHES_CLASS: &str = "CfgPatches";

/// Packs descriptors into archives.
///
/// # Example
///
/// ```no_run
/// use pboforge_pbo::{Packer, PboDescriptor, PboFile};
///
/// let mut descriptor = PboDescriptor::new("MyMod");
/// descriptor.files.push(PboFile::memory("readme.txt", b"hello".to_vec()));
///
/// let packer = Packer::new().with_prefix("MyMod");
/// let output = packer.pack(&mut descriptor, "out".as_ref())?;
/// println!("Wrote {}", output.display());
/// # Ok::<(), pboforge_pbo::PackError>(())
/// ```
#[derive(Debug, Default)]
pub struct Packer {
    /// Overrides the prefix derived from the descriptor.
    pub prefix: Option<String>,
    /// Rapify configs instead of rendering them as text.
    pub binarize: bool,
    /// Fail with [`PackError::MissingPrefix`] instead of using [`DEFAULT_PREFIX`].
    pub require_prefix: bool,
    /// Applied in order after content has been attached.
    pub components: Vec<Box<dyn PackerComponent>>,
}

impl Packer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn binarize(mut self, binarize: bool) -> Self {
        self.binarize = binarize;
        self
    }

    pub fn require_prefix(mut self, require: bool) -> Self {
        self.require_prefix = require;
        self
    }

    pub fn component(mut self, component: Box<dyn PackerComponent>) -> Self {
        self.components.push(component);
        self
    }

    /// Write `descriptor` to `<output_dir>/<prefix>.pbo` and return that path.
    ///
    /// The archive is written to a temporary file in `output_dir` and only
    /// moved into place once complete.
    pub fn pack(&self, descriptor: &mut PboDescriptor, output_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(output_dir).map_err(|source| PackError::AccessDenied {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let prefix = self.resolve_prefix(descriptor)?;
        let target = output_dir.join(format!("{}.pbo", sanitize_file_name(&prefix)));
        debug!("Packing {} as '{prefix}'", descriptor.directory().display());

        let mut properties = Properties::new();
        properties.insert("prefix", prefix);

        let config_name = if self.binarize { "config.bin" } else { "config.cpp" };
        for file in &mut descriptor.files {
            if file.is_config() {
                file.set_name(config_name);
            }
        }
        measure(descriptor)?;

        for component in &self.components {
            debug!("Applying component {}", component.name());
            component.apply(descriptor, &mut properties)?;
        }

        let encoded = self.encode_configs(descriptor)?;
        measure(descriptor)?;

        let mut temp = NamedTempFile::new_in(output_dir).map_err(|source| PackError::AccessDenied {
            path: output_dir.to_path_buf(),
            source,
        })?;
        {
            let mut writer = PboWriter::new(BufWriter::new(temp.as_file_mut()));
            write_archive(&mut writer, descriptor, &properties, &encoded)?;
            writer.finish()?.flush()?;
        }
        temp.persist(&target).map_err(|e| PackError::AccessDenied {
            path: target.clone(),
            source: e.error,
        })?;

        info!("Packed {} file(s) into {}", descriptor.files.len(), target.display());
        Ok(target)
    }

    /// Override, then `$prefix$` file, then the first `CfgPatches` class.
    ///
    /// A `$prefix$` file is always removed from the archive.
    fn resolve_prefix(&self, descriptor: &mut PboDescriptor) -> Result<String> {
        let from_file = take_prefix_file(descriptor)?;
        if let Some(prefix) = &self.prefix {
            return Ok(prefix.clone());
        }
        if let Some(prefix) = from_file {
            return Ok(prefix);
        }

        let patched = descriptor
            .root_config()
            .and_then(|parsed| parsed.config.class(PATCHES_CLASS))
            .and_then(|patches| patches.classes().next())
            .map(|class| class.identifier().to_string());
        match patched {
            Some(prefix) => Ok(prefix),
            None if self.require_prefix => Err(PackError::MissingPrefix {
                directory: descriptor.directory().to_path_buf(),
            }),
            None => Ok(DEFAULT_PREFIX.to_string()),
        }
    }

    /// Encode every config, indexed like `descriptor.files`.
    fn encode_configs(&self, descriptor: &PboDescriptor) -> Result<Vec<Option<Vec<u8>>>> {
        descriptor
            .files
            .iter()
            .map(|file| match file.parsed_config() {
                Some(parsed) => self.encode(parsed).map(Some),
                None => Ok(None),
            })
            .collect()
    }

    fn encode(&self, parsed: &ParsedConfig) -> Result<Vec<u8>> {
        if self.binarize {
            Ok(rapify(&parsed.config)?)
        } else {
            Ok(render_text(&parsed.config))
        }
    }
}

/// Remove the `$prefix$` file and return its trimmed content, if non-empty.
fn take_prefix_file(descriptor: &mut PboDescriptor) -> Result<Option<String>> {
    let Some(index) = descriptor
        .files
        .iter()
        .position(|file| !file.is_config() && file.name().eq_ignore_ascii_case(PREFIX_FILE))
    else {
        return Ok(None);
    };

    let file = descriptor.files.remove(index);
    let content = match &file.content {
        FileContent::Disk(path) => fs::read_to_string(path)?,
        FileContent::Memory(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        FileContent::Config(_) => String::new(),
    };
    let prefix = content.trim();
    Ok((!prefix.is_empty()).then(|| prefix.to_string()))
}

/// Refresh the sizes of disk and memory files.
fn measure(descriptor: &mut PboDescriptor) -> Result<()> {
    for file in &mut descriptor.files {
        let size = match &file.content {
            FileContent::Disk(path) => fs::metadata(path)?.len(),
            FileContent::Memory(bytes) => bytes.len() as u64,
            FileContent::Config(_) => continue,
        };
        set_size(file, size)?;
    }
    Ok(())
}

fn set_size(file: &mut PboFile, size: u64) -> Result<()> {
    let size = u32::try_from(size).map_err(|_| PackError::SizeMismatch {
        path: file.full_path(),
        expected: u64::from(u32::MAX),
        actual: size,
    })?;
    file.original_size = size;
    file.data_size = size;
    Ok(())
}

fn write_archive<W: Write>(
    writer: &mut PboWriter<W>,
    descriptor: &mut PboDescriptor,
    properties: &Properties,
    encoded: &[Option<Vec<u8>>],
) -> Result<()> {
    for (file, bytes) in descriptor.files.iter_mut().zip(encoded) {
        if let Some(bytes) = bytes {
            set_size(file, bytes.len() as u64)?;
        }
    }

    writer.write_properties(properties)?;
    for file in &descriptor.files {
        let header = EntryHeader::new(file.mime, file.original_size, file.timestamp, file.data_size);
        writer.write_entry(&file.full_path(), &header)?;
    }
    writer.write_header_end()?;

    for (file, config_bytes) in descriptor.files.iter().zip(encoded) {
        let written = match &file.content {
            FileContent::Disk(path) => {
                let mut source = File::open(path)?;
                writer.copy_content(&mut source)?
            }
            FileContent::Memory(bytes) => writer.copy_content(&mut bytes.as_slice())?,
            FileContent::Config(_) => {
                let bytes = config_bytes.as_deref().unwrap_or_default();
                writer.copy_content(&mut &bytes[..])?
            }
        };
        if written != u64::from(file.data_size) {
            return Err(PackError::SizeMismatch {
                path: file.full_path(),
                expected: u64::from(file.data_size),
                actual: written,
            });
        }
    }
    Ok(())
}

/// Replace characters that are not allowed in file names with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentRegistry;
    use crate::component::ComponentProperties;
    use pboforge_config::parse_str;
    use sha1::{Digest, Sha1};

    const CONFIG: &str = r#"
        class CfgPatches { class MyMod { units[] = {}; requiredAddons[] = {"DZ_Data"}; }; };
        class CfgMods { class MyMod { dir = "x"; }; };
    "#;

    fn descriptor_with(dir: &Path) -> PboDescriptor {
        fs::write(dir.join("a.txt"), b"abcd").unwrap();
        let mut descriptor = PboDescriptor::new(dir);
        descriptor.files.push(PboFile::disk(dir.join("a.txt"), "a.txt"));
        descriptor.files.push(PboFile::config("config.cpp", parse_str(CONFIG)));
        descriptor
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|window| window == needle)
    }

    #[test]
    fn test_trailer_is_sha1_of_archive() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let mut descriptor = descriptor_with(source.path());

        let path = Packer::new().pack(&mut descriptor, output.path()).unwrap();
        assert_eq!(path, output.path().join("MyMod.pbo"));

        let bytes = fs::read(&path).unwrap();
        let body = bytes.len() - 21;
        assert_eq!(bytes[body], 0);
        assert_eq!(&bytes[body + 1..], Sha1::digest(&bytes[..body]).as_slice());
    }

    #[test]
    fn test_header_layout() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let mut descriptor = descriptor_with(source.path());

        let path = Packer::new().pack(&mut descriptor, output.path()).unwrap();
        let bytes = fs::read(&path).unwrap();

        assert_eq!(&bytes[..5], b"\0sreV");
        assert_eq!(&bytes[21..41], b"prefix\0MyMod\0\0a.txt\0");

        // a.txt entry: mime, original size, offset, timestamp, data size.
        assert_eq!(&bytes[41..61], &[0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0]);
        assert_eq!(&bytes[61..72], b"config.cpp\0");

        let config_size = u32::from_le_bytes([bytes[88], bytes[89], bytes[90], bytes[91]]) as usize;
        let content = 72 + 20 + 21;
        assert_eq!(&bytes[92..113], &[0u8; 21]);
        assert_eq!(&bytes[content..content + 4], b"abcd");

        let text = &bytes[content + 4..content + 4 + config_size];
        let reparsed = parse_str(std::str::from_utf8(text).unwrap());
        assert!(reparsed.is_success());
        assert_eq!(content + 4 + config_size + 21, bytes.len());
    }

    #[test]
    fn test_binarized_config() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let mut descriptor = descriptor_with(source.path());

        let path = Packer::new()
            .binarize(true)
            .pack(&mut descriptor, output.path())
            .unwrap();
        let bytes = fs::read(&path).unwrap();

        assert!(find(&bytes, b"config.bin\0").is_some());
        assert!(find(&bytes, b"config.cpp").is_none());
        assert!(find(&bytes, b"\0raP").is_some());
    }

    #[test]
    fn test_prefix_file_wins_over_patches() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let mut descriptor = descriptor_with(source.path());
        descriptor.files.push(PboFile::memory("$PREFIX$", b"  mods\\my_mod\r\n".to_vec()));

        let path = Packer::new().pack(&mut descriptor, output.path()).unwrap();
        assert_eq!(path, output.path().join("mods_my_mod.pbo"));
        assert!(descriptor.find(PREFIX_FILE).is_none());

        let bytes = fs::read(&path).unwrap();
        assert!(find(&bytes, b"prefix\0mods\\my_mod\0").is_some());
    }

    #[test]
    fn test_prefix_override_and_fallback() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();

        let mut descriptor = descriptor_with(source.path());
        let path = Packer::new()
            .with_prefix("Custom")
            .pack(&mut descriptor, output.path())
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "Custom.pbo");

        let mut empty = PboDescriptor::new(source.path());
        let path = Packer::new().pack(&mut empty, output.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "UnnamedPBO.pbo");
    }

    #[test]
    fn test_require_prefix() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let mut empty = PboDescriptor::new(source.path());

        let result = Packer::new().require_prefix(true).pack(&mut empty, output.path());
        assert!(matches!(result, Err(PackError::MissingPrefix { .. })));
    }

    #[test]
    fn test_failure_leaves_no_output() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let mut descriptor = descriptor_with(source.path());
        descriptor
            .files
            .push(PboFile::disk(source.path().join("missing.txt"), "missing.txt"));

        assert!(Packer::new().pack(&mut descriptor, output.path()).is_err());
        assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_components_run_before_encoding() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let mut descriptor = descriptor_with(source.path());

        let registry = ComponentRegistry::with_builtins();
        let settings: ComponentProperties = [("product", "dayz")].into_iter().collect();
        let packer = Packer::new()
            .component(registry.create("ForceDirName", &ComponentProperties::new()).unwrap())
            .component(registry.create("SetProperties", &settings).unwrap());

        let path = packer.pack(&mut descriptor, output.path()).unwrap();
        let bytes = fs::read(&path).unwrap();

        assert!(find(&bytes, b"prefix\0MyMod\0product\0dayz\0\0").is_some());
        assert!(find(&bytes, b"dir = \"MyMod\";").is_some());
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("a<b>c:d\"e/f\\g|h?i*j\tk"), "a_b_c_d_e_f_g_h_i_j_k");
        assert_eq!(sanitize_file_name("MyMod"), "MyMod");
    }
}
