//! pboforge - DayZ mod config and PBO tooling.
//!
//! This crate provides a unified interface to the pboforge library crates.
//!
//! # Crates
//!
//! - [`pboforge_common`] - Ring buffer and character input readers
//! - [`pboforge_config`] - Config lexer, error-recovering parser, renderer and rapify encoder
//! - [`pboforge_pbo`] - Archive descriptor, packer components and PBO writer
//!
//! # Example
//!
//! ```no_run
//! use pboforge::prelude::*;
//!
//! let result = parse_file("MyMod/config.cpp")?;
//! for error in &result.errors {
//!     eprintln!("{error}");
//! }
//!
//! let mut descriptor = PboDescriptor::new("MyMod");
//! descriptor.files.push(PboFile::config("config.cpp", result));
//!
//! let output = Packer::new().binarize(true).pack(&mut descriptor, "out".as_ref())?;
//! println!("Wrote {}", output.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use pboforge_common as common;
pub use pboforge_config as config;
pub use pboforge_pbo as pbo;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use pboforge_common::{FileReader, InputReader, RingBuffer, StringReader};
    pub use pboforge_config::{
        parse, parse_file, parse_str, rapify, render_text, Config, ConfigClass, ConfigExpression, ConfigValue,
        Lexer, ParseError, ParseResult, Scope,
    };
    pub use pboforge_pbo::{
        ComponentProperties, ComponentRegistry, PackError, Packer, PackerComponent, PboDescriptor, PboFile,
        Properties,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
