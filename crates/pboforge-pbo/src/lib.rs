//! PBO archive support for pboforge.
//!
//! This crate models and writes PBO archives:
//!
//! - [`PboDescriptor`] - The files of one archive, built from scanner output
//! - [`PackerComponent`] - Steps run on a descriptor before writing, selected
//!   by name through a [`ComponentRegistry`]
//! - [`Packer`] - Prefix resolution, config encoding and atomic output
//! - [`PboWriter`] - The low-level entry and trailer writer
//!
//! # Example
//!
//! ```no_run
//! use pboforge_pbo::{ComponentProperties, ComponentRegistry, Packer, PboDescriptor};
//!
//! let entries = vec![("MyMod/data/icon.paa".into(), "data/icon.paa".to_string())];
//! let config = Some(("MyMod/config.cpp".into(), "config.cpp".to_string()));
//! let mut descriptor = PboDescriptor::load("MyMod", entries, config)?;
//!
//! let registry = ComponentRegistry::with_builtins();
//! let mut packer = Packer::new().binarize(true);
//! if let Some(component) = registry.create("ForceDirName", &ComponentProperties::new()) {
//!     packer.components.push(component);
//! }
//!
//! let output = packer.pack(&mut descriptor, "out".as_ref())?;
//! println!("Wrote {}", output.display());
//! # Ok::<(), pboforge_pbo::PackError>(())
//! ```

mod component;
pub mod components;
mod descriptor;
mod error;
mod file;
mod packer;
pub mod pbo_path;
mod properties;
mod writer;

pub use component::{ComponentFactory, ComponentProperties, ComponentRegistry, PackerComponent};
pub use descriptor::PboDescriptor;
pub use error::{PackError, Result};
pub use file::{FileContent, MimeType, ParsedConfig, PboFile};
pub use packer::{sanitize_file_name, Packer, DEFAULT_PREFIX, PREFIX_FILE};
pub use properties::Properties;
pub use writer::{EntryHeader, HashingWriter, PboWriter, CHUNK_SIZE, DIGEST_SIZE};
