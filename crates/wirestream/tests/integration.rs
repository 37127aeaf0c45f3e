//! Integration tests for the wirestream facade.
//!
//! These tests exercise complete encode/decode conversations the way a
//! dispatch layer would drive them: a reply built field by field, drained to
//! a transport buffer, then consumed by an unconditional sequence of reads
//! checked once at the end.

use wirestream::{Config, ErrorKind, InputStream, OutputStream};

#[test]
fn worked_example_message() {
    let mut out = OutputStream::new();
    out.put_int(7);
    let mark = out.begin_block_size().unwrap();
    out.put_byte(0xAB);
    out.put_int_array(&[1, 2]);
    out.end_block_size(mark).unwrap();
    out.put_long(0xFF);
    assert!(!out.is_error());

    let bytes = out.to_vec();
    let mut input = InputStream::new(&bytes);
    assert_eq!(input.get_int(), 7);
    assert_eq!(input.get_int(), 13);
    assert_eq!(input.get_byte(), 0xAB);
    let count = input.get_array_count();
    assert_eq!(count, 2);
    let mut elements = vec![0u32; count];
    input.get_int_array(&mut elements);
    assert_eq!(elements, [1, 2]);
    assert_eq!(input.get_long(), 0xFF);
    assert_eq!(input.bytes_remaining(), 0);
    assert!(!input.is_error());
}

#[test]
fn reply_with_status_block_like_a_shift_method() {
    // The shape a hardware-shift method reply takes: a deferred-size block
    // wrapping a status int and the captured data bytes.
    let captured: Vec<u8> = (0..200u8).collect();

    let mut out = OutputStream::with_config(&Config { segment_capacity: 64, max_segments: 0 });
    let mark = out.begin_block_size().unwrap();
    out.put_int(0); // status: ok
    out.put_byte_array(&captured);
    out.end_block_size(mark).unwrap();
    assert!(!out.is_error());
    assert!(out.segment_count() > 1);

    let bytes = out.to_vec();
    let mut input = InputStream::new(&bytes);
    let block_size = input.get_int() as usize;
    assert_eq!(block_size, input.bytes_remaining());
    assert_eq!(input.get_int(), 0);
    let count = input.get_array_count();
    let mut dest = vec![0u8; count];
    input.get_byte_array(&mut dest);
    assert_eq!(dest, captured);
    assert_eq!(input.bytes_remaining(), 0);
    assert!(!input.is_error());
}

#[test]
fn multi_segment_message_decodes_whether_drained_whole_or_per_segment() {
    let mut out = OutputStream::with_config(&Config { segment_capacity: 32, max_segments: 0 });
    out.put_long_array(&[10, 20, 30, 40, 50, 60, 70]);
    out.put_str("end of message");
    assert!(out.segment_count() > 1);

    // Drained whole.
    let whole = out.to_vec();

    // Drained segment by segment, the way a transport walks the chain.
    let mut stitched = Vec::new();
    for segment in out.segments() {
        stitched.extend_from_slice(segment.as_slice());
    }
    assert_eq!(whole, stitched);

    let mut input = InputStream::new(&whole);
    let count = input.get_array_count();
    let mut dest = vec![0u64; count];
    input.get_long_array(&mut dest);
    assert_eq!(dest, [10, 20, 30, 40, 50, 60, 70]);
    assert_eq!(input.get_str(), "end of message");
    assert!(!input.is_error());
}

#[test]
fn unconditional_read_sequence_reports_failure_once() {
    // A truncated message: the caller runs the full read sequence anyway and
    // checks the flag at the end, trusting nothing that was decoded.
    let mut out = OutputStream::new();
    out.put_int(1);
    out.put_int(2);
    let mut bytes = out.to_vec();
    bytes.truncate(6);

    let mut input = InputStream::new(&bytes);
    let first = input.get_int();
    let second = input.get_int();
    let tail = input.get_long();
    assert!(input.is_error());
    assert_eq!((first, second, tail), (1, 0, 0));
}

#[test]
fn block_misuse_is_an_explicit_error() {
    let mut out = OutputStream::new();
    let mark = out.begin_block_size().unwrap();
    assert_eq!(out.begin_block_size().unwrap_err(), ErrorKind::BlockAlreadyOpen);
    out.end_block_size(mark).unwrap();

    let mut other = OutputStream::new();
    let stray = other.begin_block_size().unwrap();
    assert_eq!(out.end_block_size(stray).unwrap_err(), ErrorKind::NoOpenBlock);
}
