//! Serialization of wire values into a chain of fixed-capacity segments.

use std::{
    io::{self, Write},
    sync::atomic::{AtomicU64, Ordering},
};

use byteorder::{BigEndian, ByteOrder};

use wirestream_core::{
    config::Config,
    constants::{BLOCK_SIZE_FIELD_SIZE, BYTE_WIRE_SIZE, INT_WIRE_SIZE, LONG_WIRE_SIZE},
    error::ErrorKind,
};

use crate::segment::Segment;

/// Process-wide mark id source, so a mark can never match a block opened on
/// a different stream.
static NEXT_MARK_ID: AtomicU64 = AtomicU64::new(0);

/// Handle for a deferred-size block opened with
/// [`OutputStream::begin_block_size`].
///
/// The handle is deliberately neither `Clone` nor `Copy`: closing the block
/// consumes it, so a block cannot be closed twice. Marks are only meaningful
/// for the stream that minted them.
#[derive(Debug)]
#[must_use = "an open block must be closed with end_block_size"]
pub struct BlockMark {
    id: u64,
}

/// State of the one block that may be open at a time.
#[derive(Debug)]
struct OpenBlock {
    mark_id: u64,
    /// Arena index of the segment holding the reserved size slot.
    segment: usize,
    /// Offset of the reserved slot within that segment.
    offset: usize,
    /// Bytes written since the block was opened, excluding the slot itself.
    size: u32,
}

/// Encodes wire values into canonical big-endian form across an owned chain
/// of fixed-capacity segments.
///
/// An `OutputStream` is created per outgoing message, accumulates writes,
/// and is drained to a transport via [`segments`](Self::segments) or
/// [`write_to`](Self::write_to). A write that overflows the tail segment
/// appends a new one and continues there; bytes already written never move.
///
/// Failure is sticky: once the chain cannot grow, every later write is a
/// no-op and [`is_error`](Self::is_error) reports `true`.
#[derive(Debug)]
pub struct OutputStream {
    /// Owned segment arena; never empty unless construction itself failed.
    segments: Vec<Segment>,
    error: bool,
    /// Total valid bytes across all segments.
    total_size: usize,
    open_block: Option<OpenBlock>,
    segment_capacity: usize,
    max_segments: usize,
}

impl OutputStream {
    /// Creates an output stream with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// Creates an output stream tuned by `config`. A segment capacity below
    /// the widest scalar is raised to it, so every value has a segment it
    /// fits in whole.
    pub fn with_config(config: &Config) -> Self {
        let mut stream = Self {
            segments: Vec::new(),
            error: false,
            total_size: 0,
            open_block: None,
            segment_capacity: config.segment_capacity.max(LONG_WIRE_SIZE),
            max_segments: config.max_segments,
        };
        stream.push_segment();
        stream
    }

    /// Returns true if a previous write failed; all writes after a failure
    /// are no-ops.
    pub fn is_error(&self) -> bool {
        self.error
    }

    /// Total number of valid bytes across the whole chain.
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Returns true if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.total_size == 0
    }

    /// Number of segments currently in the chain.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Iterates over the segments of the chain in write order.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// Concatenates the chain into a single buffer.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.total_size);
        for segment in &self.segments {
            out.extend_from_slice(segment.as_slice());
        }
        out
    }

    /// Writes the chain to a transport in segment order.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for segment in &self.segments {
            writer.write_all(segment.as_slice())?;
        }
        Ok(())
    }

    /// Appends one byte verbatim.
    pub fn put_byte(&mut self, val: u8) {
        if self.error {
            return;
        }
        self.ensure_space(BYTE_WIRE_SIZE);
        if self.error {
            return;
        }
        self.tail_mut().put_slice(&[val]);
        self.advance(BYTE_WIRE_SIZE);
    }

    /// Appends a 32-bit integer in big-endian order.
    pub fn put_int(&mut self, val: u32) {
        if self.error {
            return;
        }
        self.ensure_space(INT_WIRE_SIZE);
        if self.error {
            return;
        }
        let mut buf = [0u8; INT_WIRE_SIZE];
        BigEndian::write_u32(&mut buf, val);
        self.tail_mut().put_slice(&buf);
        self.advance(INT_WIRE_SIZE);
    }

    /// Appends a 64-bit integer in big-endian order.
    pub fn put_long(&mut self, val: u64) {
        if self.error {
            return;
        }
        self.ensure_space(LONG_WIRE_SIZE);
        if self.error {
            return;
        }
        let mut buf = [0u8; LONG_WIRE_SIZE];
        BigEndian::write_u64(&mut buf, val);
        self.tail_mut().put_slice(&buf);
        self.advance(LONG_WIRE_SIZE);
    }

    /// Appends a double as its raw IEEE-754 bit pattern. NaN payloads and
    /// signed zero survive the trip exactly.
    pub fn put_double(&mut self, val: f64) {
        self.put_long(val.to_bits());
    }

    /// Appends a bool as one byte, 1 for true and 0 for false.
    pub fn put_bool(&mut self, val: bool) {
        self.put_byte(if val { 1 } else { 0 });
    }

    /// Appends the count prefix that leads every array.
    pub fn put_array_count(&mut self, count: usize) {
        self.put_int(count as u32);
    }

    /// Appends a count-prefixed byte array. A write that overflows the tail
    /// segment is split; the remainder continues in a fresh segment.
    pub fn put_byte_array(&mut self, src: &[u8]) {
        if self.error {
            return;
        }
        self.put_array_count(src.len());

        let mut src = src;
        while !src.is_empty() {
            if self.error {
                return;
            }
            let count = src.len().min(self.tail().space_left());
            if count > 0 {
                let (head, rest) = src.split_at(count);
                self.tail_mut().put_slice(head);
                self.advance(count);
                src = rest;
            }
            if !src.is_empty() {
                self.push_segment();
            }
        }
    }

    /// Appends a count-prefixed array of 32-bit integers, byte-order
    /// converted per element. Splits across segments at element granularity.
    pub fn put_int_array(&mut self, src: &[u32]) {
        if self.error {
            return;
        }
        self.put_array_count(src.len());

        let mut src = src;
        while !src.is_empty() {
            if self.error {
                return;
            }
            let count = src.len().min(self.tail().space_left() / INT_WIRE_SIZE);
            if count > 0 {
                let (head, rest) = src.split_at(count);
                let bytes = count * INT_WIRE_SIZE;
                BigEndian::write_u32_into(head, self.tail_mut().alloc(bytes));
                self.advance(bytes);
                src = rest;
            }
            if !src.is_empty() {
                self.push_segment();
            }
        }
    }

    /// Appends a count-prefixed array of 64-bit integers, byte-order
    /// converted per element. Splits across segments at element granularity.
    pub fn put_long_array(&mut self, src: &[u64]) {
        if self.error {
            return;
        }
        self.put_array_count(src.len());

        let mut src = src;
        while !src.is_empty() {
            if self.error {
                return;
            }
            let count = src.len().min(self.tail().space_left() / LONG_WIRE_SIZE);
            if count > 0 {
                let (head, rest) = src.split_at(count);
                let bytes = count * LONG_WIRE_SIZE;
                BigEndian::write_u64_into(head, self.tail_mut().alloc(bytes));
                self.advance(bytes);
                src = rest;
            }
            if !src.is_empty() {
                self.push_segment();
            }
        }
    }

    /// Appends a count-prefixed array of doubles as raw bit patterns.
    pub fn put_double_array(&mut self, src: &[f64]) {
        if self.error {
            return;
        }
        self.put_array_count(src.len());
        for &val in src {
            self.put_long(val.to_bits());
        }
    }

    /// Appends a string as a count-prefixed array of its UTF-8 bytes.
    pub fn put_str(&mut self, val: &str) {
        self.put_byte_array(val.as_bytes());
    }

    /// Reserves a 4-byte slot at the current position and starts counting
    /// the bytes written after it. [`end_block_size`](Self::end_block_size)
    /// patches the tally into the slot; the slot itself is not counted.
    ///
    /// Only one block may be open at a time; blocks do not nest.
    pub fn begin_block_size(&mut self) -> Result<BlockMark, ErrorKind> {
        if self.error {
            return Err(ErrorKind::StreamPoisoned);
        }
        if self.open_block.is_some() {
            tracing::warn!("begin_block_size with a block already open");
            return Err(ErrorKind::BlockAlreadyOpen);
        }
        self.ensure_space(BLOCK_SIZE_FIELD_SIZE);
        if self.error {
            return Err(ErrorKind::StreamPoisoned);
        }

        let segment = self.segments.len() - 1;
        let offset = self.tail().valid_bytes();
        self.tail_mut().put_slice(&[0u8; BLOCK_SIZE_FIELD_SIZE]);
        // Not routed through advance(): the slot must not count itself.
        self.total_size += BLOCK_SIZE_FIELD_SIZE;

        let id = NEXT_MARK_ID.fetch_add(1, Ordering::Relaxed);
        self.open_block = Some(OpenBlock { mark_id: id, segment, offset, size: 0 });
        Ok(BlockMark { id })
    }

    /// Closes the block identified by `mark`, patching the number of bytes
    /// written since [`begin_block_size`](Self::begin_block_size) into the
    /// reserved slot.
    pub fn end_block_size(&mut self, mark: BlockMark) -> Result<(), ErrorKind> {
        if self.error {
            return Err(ErrorKind::StreamPoisoned);
        }
        let block = match self.open_block.take() {
            Some(block) => block,
            None => return Err(ErrorKind::NoOpenBlock),
        };
        if block.mark_id != mark.id {
            tracing::warn!(
                presented = mark.id,
                open = block.mark_id,
                "block mark does not belong to the open block"
            );
            self.open_block = Some(block);
            return Err(ErrorKind::NoOpenBlock);
        }

        let mut buf = [0u8; BLOCK_SIZE_FIELD_SIZE];
        BigEndian::write_u32(&mut buf, block.size);
        self.segments[block.segment].patch(block.offset, &buf);
        Ok(())
    }

    fn tail(&self) -> &Segment {
        let tail = self.segments.len() - 1;
        &self.segments[tail]
    }

    fn tail_mut(&mut self) -> &mut Segment {
        let tail = self.segments.len() - 1;
        &mut self.segments[tail]
    }

    /// Moves to a fresh segment if the tail cannot hold `width` more bytes.
    /// Scalars and the reserved block slot never straddle a boundary.
    fn ensure_space(&mut self, width: usize) {
        if self.tail().space_left() < width {
            self.push_segment();
        }
    }

    /// Appends a segment to the chain, poisoning the stream if the chain
    /// cannot grow.
    fn push_segment(&mut self) {
        if self.max_segments != 0 && self.segments.len() >= self.max_segments {
            tracing::warn!(
                segments = self.segments.len(),
                max_segments = self.max_segments,
                "segment cap reached, poisoning output stream"
            );
            self.error = true;
            return;
        }
        match Segment::with_capacity(self.segment_capacity) {
            Ok(segment) => self.segments.push(segment),
            Err(err) => {
                tracing::error!(%err, "segment allocation failed, poisoning output stream");
                self.error = true;
            }
        }
    }

    /// Accounts for `bytes` just written: the running total, and the tally
    /// of the open block if there is one.
    fn advance(&mut self, bytes: usize) {
        if let Some(block) = self.open_block.as_mut() {
            block.size += bytes as u32;
        }
        self.total_size += bytes;
    }
}

impl Default for OutputStream {
    fn default() -> Self {
        Self::new()
    }
}
