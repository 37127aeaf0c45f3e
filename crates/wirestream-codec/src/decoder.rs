//! Parsing of wire values from a borrowed byte buffer.

use byteorder::{BigEndian, ByteOrder};

use wirestream_core::constants::{BYTE_WIRE_SIZE, INT_WIRE_SIZE, LONG_WIRE_SIZE};

/// Decodes wire values out of a caller-supplied buffer it does not own.
///
/// Every read checks the remaining length first. On shortfall the stream
/// enters the sticky error state: the failing read and every read after it
/// return the type's zero value without moving the cursor, so a caller can
/// issue an unconditional sequence of reads and check
/// [`is_error`](Self::is_error) once at the end. No value decoded from a
/// message where the flag was ever set can be trusted.
///
/// The decoder performs no allocation; views handed out by
/// [`raw_bytes`](Self::raw_bytes) and [`get_str`](Self::get_str) borrow the
/// underlying buffer directly.
#[derive(Debug)]
pub struct InputStream<'a> {
    buf: &'a [u8],
    pos: usize,
    error: bool,
}

impl<'a> InputStream<'a> {
    /// Binds a decoder to `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0, error: false }
    }

    /// Rebinds the decoder to `buf`, resetting cursor and error flag.
    /// Equivalent to constructing a fresh decoder.
    pub fn reset(&mut self, buf: &'a [u8]) {
        self.buf = buf;
        self.pos = 0;
        self.error = false;
    }

    /// Returns true if any read has failed on this stream.
    pub fn is_error(&self) -> bool {
        self.error
    }

    /// Size of the underlying buffer in bytes.
    pub fn total_size(&self) -> usize {
        self.buf.len()
    }

    /// Number of bytes not yet consumed.
    pub fn bytes_remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Reads one byte; 0 if the stream is in error.
    pub fn get_byte(&mut self) -> u8 {
        if self.bytes_remaining() < BYTE_WIRE_SIZE {
            self.fail();
        }
        if self.error {
            return 0;
        }
        let val = self.buf[self.pos];
        self.pos += BYTE_WIRE_SIZE;
        val
    }

    /// Reads a big-endian 32-bit integer; 0 if the stream is in error.
    pub fn get_int(&mut self) -> u32 {
        if self.bytes_remaining() < INT_WIRE_SIZE {
            self.fail();
        }
        if self.error {
            return 0;
        }
        let val = BigEndian::read_u32(&self.buf[self.pos..]);
        self.pos += INT_WIRE_SIZE;
        val
    }

    /// Reads a big-endian 64-bit integer; 0 if the stream is in error.
    pub fn get_long(&mut self) -> u64 {
        if self.bytes_remaining() < LONG_WIRE_SIZE {
            self.fail();
        }
        if self.error {
            return 0;
        }
        let val = BigEndian::read_u64(&self.buf[self.pos..]);
        self.pos += LONG_WIRE_SIZE;
        val
    }

    /// Reads a double from its raw bit pattern; 0.0 if the stream is in
    /// error.
    pub fn get_double(&mut self) -> f64 {
        f64::from_bits(self.get_long())
    }

    /// Reads a bool; any nonzero byte decodes true.
    pub fn get_bool(&mut self) -> bool {
        self.get_byte() != 0
    }

    /// Reads the count prefix that leads every array.
    ///
    /// The safe way to extract an array is to read the count, size the
    /// destination from it, then call the matching array getter.
    pub fn get_array_count(&mut self) -> usize {
        self.get_int() as usize
    }

    /// Copies `dest.len()` bytes into `dest`. On shortfall the error flag is
    /// set and nothing is copied or consumed.
    pub fn get_byte_array(&mut self, dest: &mut [u8]) {
        if self.error {
            return;
        }
        if self.bytes_remaining() < dest.len() {
            self.fail();
            return;
        }
        dest.copy_from_slice(&self.buf[self.pos..self.pos + dest.len()]);
        self.pos += dest.len();
    }

    /// Copies `dest.len()` 32-bit integers into `dest`, converting byte
    /// order per element. On shortfall the error flag is set and nothing is
    /// copied or consumed.
    pub fn get_int_array(&mut self, dest: &mut [u32]) {
        if self.error {
            return;
        }
        let size = dest.len() * INT_WIRE_SIZE;
        if self.bytes_remaining() < size {
            self.fail();
            return;
        }
        BigEndian::read_u32_into(&self.buf[self.pos..self.pos + size], dest);
        self.pos += size;
    }

    /// Copies `dest.len()` 64-bit integers into `dest`, converting byte
    /// order per element. On shortfall the error flag is set and nothing is
    /// copied or consumed.
    pub fn get_long_array(&mut self, dest: &mut [u64]) {
        if self.error {
            return;
        }
        let size = dest.len() * LONG_WIRE_SIZE;
        if self.bytes_remaining() < size {
            self.fail();
            return;
        }
        BigEndian::read_u64_into(&self.buf[self.pos..self.pos + size], dest);
        self.pos += size;
    }

    /// Copies `dest.len()` doubles into `dest` from their raw bit patterns.
    /// On shortfall the error flag is set and nothing is copied or consumed.
    pub fn get_double_array(&mut self, dest: &mut [f64]) {
        if self.error {
            return;
        }
        let size = dest.len() * LONG_WIRE_SIZE;
        if self.bytes_remaining() < size {
            self.fail();
            return;
        }
        for slot in dest.iter_mut() {
            *slot = f64::from_bits(BigEndian::read_u64(&self.buf[self.pos..]));
            self.pos += LONG_WIRE_SIZE;
        }
    }

    /// Reads a count-prefixed UTF-8 string as a view borrowed from the
    /// underlying buffer. Invalid UTF-8 sets the error flag; in any error
    /// case the result is `""`.
    pub fn get_str(&mut self) -> &'a str {
        if self.error {
            return "";
        }
        let count = self.get_array_count();
        let bytes = match self.raw_bytes(count) {
            Some(bytes) => bytes,
            None => return "",
        };
        match std::str::from_utf8(bytes) {
            Ok(val) => val,
            Err(_) => {
                self.fail();
                ""
            }
        }
    }

    /// Borrows the next `count` bytes and advances past them, or returns
    /// `None` and sets the error flag if fewer remain.
    ///
    /// No copy is made; the view lives as long as the underlying buffer.
    pub fn raw_bytes(&mut self, count: usize) -> Option<&'a [u8]> {
        if self.bytes_remaining() < count {
            self.fail();
        }
        if self.error {
            return None;
        }
        let view = &self.buf[self.pos..self.pos + count];
        self.pos += count;
        Some(view)
    }

    /// Reads and discards `count` bytes, for skipping fields.
    pub fn discard_bytes(&mut self, count: usize) {
        let _ = self.raw_bytes(count);
    }

    fn fail(&mut self) {
        if !self.error {
            tracing::warn!(
                pos = self.pos,
                remaining = self.bytes_remaining(),
                "poisoning input stream"
            );
            self.error = true;
        }
    }
}
