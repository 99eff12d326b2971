//! Config language support for pboforge.
//!
//! This crate handles the class-based configuration language used by mod
//! `config.cpp` files:
//!
//! - [`Lexer`] - Streaming tokenizer over any [`InputReader`](pboforge_common::InputReader)
//! - [`parse`] - Recursive-descent parser that recovers from every syntax error
//! - [`Config`] - The parsed tree
//! - [`render_text`] - Canonical text output
//! - [`rapify`] - Binary class-table encoding
//!
//! # Example
//!
//! ```
//! use pboforge_config::{parse_str, rapify, Scope};
//!
//! let result = parse_str("class CfgMods { class MyMod { dir = \"MyMod\" }; };");
//!
//! // The missing semicolon is reported and repaired.
//! assert_eq!(result.errors.len(), 1);
//! println!("{}", result.errors[0]);
//!
//! let my_mod = result.config.class("CfgMods").unwrap().class("MyMod").unwrap();
//! assert_eq!(my_mod.variable("dir").and_then(|v| v.as_str()), Some("MyMod"));
//!
//! let binary = rapify(&result.config)?;
//! assert_eq!(&binary[..4], b"\0raP");
//! # Ok::<(), pboforge_config::Error>(())
//! ```

mod error;
mod lexer;
mod model;
mod parser;
mod rapify;
mod render;
mod resolver;
mod stream;
mod token;
mod value;

pub use error::{Error, Result};
pub use lexer::Lexer;
pub use model::{ArrayOperator, Config, ConfigClass, ConfigExpression, Scope};
pub use parser::{parse, parse_file, parse_str, ParseError, ParseErrorKind, ParseResult, Parser, ParserState};
pub use rapify::{rapify, Rapifier, RAP_MAGIC};
pub use render::render_text;
pub use resolver::{ErrorResolver, ErrorSite, FailFast, Halt, RecoveringResolver, Repair, RECOVERED_IDENTIFIER};
pub use stream::{PreviewStream, TokenStream};
pub use token::{Token, TokenKind};
pub use value::ConfigValue;
