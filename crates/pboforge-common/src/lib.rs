//! Common utilities for pboforge.
//!
//! This crate provides the foundational types shared by the config and archive
//! crates:
//!
//! - [`RingBuffer`] - Growable circular buffer used for lookahead queues
//! - [`InputReader`] - Character source with unbounded peeking
//! - [`StringReader`] - In-memory [`InputReader`]
//! - [`FileReader`] - Chunked, incrementally decoded file [`InputReader`]

mod error;
mod input;
mod ring_buffer;

pub use error::{Error, Result};
pub use input::{FileReader, InputReader, StringReader, END_OF_INPUT};
pub use ring_buffer::RingBuffer;
