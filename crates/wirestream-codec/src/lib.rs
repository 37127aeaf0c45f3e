#![warn(missing_docs)]

//! wirestream-codec: binary RPC wire-format encoding and decoding.
//!
//! The codec is a producer/consumer pair around a fixed wire format in which
//! every multi-byte scalar travels big endian:
//! - [`OutputStream`] serializes values into a chain of fixed-capacity
//!   segments, growing the chain instead of reallocating, and supports
//!   deferred-size blocks whose length is patched in retroactively.
//! - [`InputStream`] parses values back out of a borrowed byte buffer with
//!   bounds checks in front of every read.
//!
//! Both directions use sticky error semantics: once a stream fails, every
//! later operation short-circuits to a documented safe default, so a caller
//! can issue an unconditional sequence of calls and check for failure once.

/// Wire-format parsing from a borrowed buffer.
pub mod decoder;
/// Wire-format serialization into a segment chain.
pub mod encoder;
/// Fixed-capacity output segments.
pub mod segment;


pub use decoder::InputStream;
pub use encoder::{BlockMark, OutputStream};
pub use segment::Segment;
