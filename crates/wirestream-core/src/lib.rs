#![warn(missing_docs)]

//! wirestream-core: foundational types shared by the codec crates.
//!
//! This crate provides the minimal set of definitions the encoder and
//! decoder agree on:
//! - Wire-format constants (element widths, segment sizing)
//! - Configuration options
//! - Error kinds for block-marker misuse

/// Wire-format constants shared by the encoder and decoder.
pub mod constants {
    /// Width of a byte on the wire.
    pub const BYTE_WIRE_SIZE: usize = 1;
    /// Width of a bool on the wire (one byte, 0 or 1 canonical on encode).
    pub const BOOL_WIRE_SIZE: usize = 1;
    /// Width of a 32-bit integer on the wire (big endian).
    pub const INT_WIRE_SIZE: usize = 4;
    /// Width of a 64-bit integer on the wire (big endian).
    pub const LONG_WIRE_SIZE: usize = 8;
    /// Width of a double on the wire (the IEEE-754 bit pattern, big endian).
    pub const DOUBLE_WIRE_SIZE: usize = 8;
    /// Width of the count prefix in front of every array.
    pub const ARRAY_COUNT_SIZE: usize = 4;
    /// Width of the reserved slot a deferred-size block is patched into.
    pub const BLOCK_SIZE_FIELD_SIZE: usize = 4;
    /// Capacity of each output segment unless overridden via `Config`.
    pub const DEFAULT_SEGMENT_CAPACITY: usize = 24480;
}

/// Configuration options for the codec.
pub mod config;
/// Error kinds reported for block-marker misuse.
pub mod error;
