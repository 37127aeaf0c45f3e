#![warn(missing_docs)]

//! Wirestream: a small public API facade for the workspace.
//!
//! This crate re-exports the surface needed to produce and consume the
//! big-endian RPC wire format:
//!
//! - Encoding (`OutputStream`, `BlockMark`)
//! - Decoding (`InputStream`)
//! - Configuration and error kinds (`Config`, `ErrorKind`)
//!
//! Example
//! ```
//! use wirestream::{InputStream, OutputStream};
//!
//! let mut out = OutputStream::new();
//! out.put_int(7);
//! let mark = out.begin_block_size().unwrap();
//! out.put_byte(0xAB);
//! out.end_block_size(mark).unwrap();
//! assert!(!out.is_error());
//!
//! let bytes = out.to_vec();
//! let mut input = InputStream::new(&bytes);
//! assert_eq!(input.get_int(), 7);
//! assert_eq!(input.get_int(), 1); // patched block size
//! assert_eq!(input.get_byte(), 0xAB);
//! assert!(!input.is_error());
//! ```

// Codec: the encoder/decoder pair and output segments
pub use wirestream_codec::{BlockMark, InputStream, OutputStream, Segment};
// Core: configuration, error kinds, wire constants
pub use wirestream_core::{config::Config, constants, error::ErrorKind};

/// Convenience prelude with the most commonly used items.
pub mod prelude {
    pub use crate::{BlockMark, Config, ErrorKind, InputStream, OutputStream};
}
