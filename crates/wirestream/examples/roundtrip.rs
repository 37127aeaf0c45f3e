//! Builds a small reply message, prints the shape of the segment chain, and
//! decodes it back.
//!
//! Run with:
//! - cargo run -p wirestream --example roundtrip

use wirestream::{Config, InputStream, OutputStream};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    // A small segment capacity so the chain growth is visible.
    let config = Config { segment_capacity: 64, max_segments: 0 };
    let mut out = OutputStream::with_config(&config);

    out.put_int(7);
    let mark = out.begin_block_size()?;
    out.put_str("sample reply");
    out.put_int_array(&[1, 2, 3, 4, 5]);
    out.put_double(-0.5);
    out.end_block_size(mark)?;
    out.put_bool(true);
    assert!(!out.is_error());

    println!("encoded {} bytes over {} segments:", out.total_size(), out.segment_count());
    for (index, segment) in out.segments().enumerate() {
        println!("  segment {}: {} bytes used, {} free", index, segment.valid_bytes(), segment.space_left());
    }

    let bytes = out.to_vec();
    let mut input = InputStream::new(&bytes);
    let id = input.get_int();
    let block_size = input.get_int();
    let label = input.get_str().to_owned();
    let count = input.get_array_count();
    let mut values = vec![0u32; count];
    input.get_int_array(&mut values);
    let scale = input.get_double();
    let done = input.get_bool();
    assert!(!input.is_error());

    println!("decoded: id={id} block={block_size}B label={label:?} values={values:?} scale={scale} done={done}");
    Ok(())
}
