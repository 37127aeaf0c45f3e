//! Fixed-capacity byte segments forming an encoder's output chain.
//!
//! Segments live in an arena owned by the encoder and are append-only:
//! once a segment fills up, writing continues in a fresh one, so bytes
//! already written are never moved or reallocated.

use std::collections::TryReserveError;

/// One fixed-capacity chunk of an encoder's owned output chain.
#[derive(Debug)]
pub struct Segment {
    data: Vec<u8>,
    capacity: usize,
}

impl Segment {
    /// Allocates an empty segment with the given capacity, reporting
    /// allocation failure instead of aborting.
    pub(crate) fn with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)?;
        Ok(Self { data, capacity })
    }

    /// Number of valid bytes written into this segment.
    pub fn valid_bytes(&self) -> usize {
        self.data.len()
    }

    /// Number of free bytes remaining in this segment.
    pub fn space_left(&self) -> usize {
        self.capacity - self.data.len()
    }

    /// The valid bytes of this segment.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Appends bytes that are known to fit.
    pub(crate) fn put_slice(&mut self, bytes: &[u8]) {
        debug_assert!(bytes.len() <= self.space_left());
        self.data.extend_from_slice(bytes);
    }

    /// Appends `len` zeroed bytes and returns them for in-place encoding.
    pub(crate) fn alloc(&mut self, len: usize) -> &mut [u8] {
        debug_assert!(len <= self.space_left());
        let start = self.data.len();
        self.data.resize(start + len, 0);
        &mut self.data[start..]
    }

    /// Overwrites already-written bytes at `offset`. Used to patch the
    /// reserved slot of a deferred-size block.
    pub(crate) fn patch(&mut self, offset: usize, bytes: &[u8]) {
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
    }
}
