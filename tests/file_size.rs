mod common;

use rayon::prelude::*;

use onboarding_report::{RenderOptions, render_submission};

fn human_size(bytes: usize) -> String {
    if bytes >= 1_000_000 {
        format!("{:.1}MB", bytes as f64 / 1_000_000.0)
    } else if bytes >= 1_000 {
        format!("{:.0}kB", bytes as f64 / 1_000.0)
    } else {
        format!("{bytes}B")
    }
}

fn render(value: serde_json::Value, compress: bool) -> Vec<u8> {
    let options = RenderOptions {
        compress_streams: compress,
        ..common::options()
    };
    render_submission(&common::request(value), &options)
        .expect("render")
        .bytes
}

#[test]
fn compression_shrinks_output() {
    let _ = env_logger::try_init();
    println!();
    for seats in [0, 20, 120] {
        let plain = render(common::large_submission(seats), false);
        let packed = render(common::large_submission(seats), true);
        println!(
            "  {seats:>4} seats: {} uncompressed, {} compressed",
            human_size(plain.len()),
            human_size(packed.len())
        );
        assert!(packed.len() < plain.len());
        assert!(common::contains(&packed, b"/FlateDecode"));
        assert!(!common::contains(&plain, b"/FlateDecode"));
    }
}

#[test]
fn builtin_font_output_stays_small() {
    let bytes = render(common::full_submission(), true);
    assert!(bytes.len() < 64 * 1024, "{}", human_size(bytes.len()));
}

#[test]
fn parallel_renders_are_independent_and_deterministic() {
    let _ = env_logger::try_init();
    let inputs: Vec<serde_json::Value> = (0..16)
        .map(|i| if i % 2 == 0 { common::full_submission() } else { common::large_submission(i * 5) })
        .collect();
    let sequential: Vec<Vec<u8>> = inputs.iter().map(|v| render(v.clone(), false)).collect();
    let parallel: Vec<Vec<u8>> = inputs.par_iter().map(|v| render(v.clone(), false)).collect();
    assert_eq!(sequential, parallel);
}

/// Bytes of the first stream whose dictionary names `/FlateDecode`.
fn first_flate_stream(pdf: &[u8]) -> Option<&[u8]> {
    let find = |from: usize, needle: &[u8]| {
        pdf[from..].windows(needle.len()).position(|w| w == needle).map(|i| from + i)
    };
    let filter = find(0, b"/FlateDecode")?;
    let start = find(filter, b"stream\n")? + b"stream\n".len();
    let end = find(start, b"\nendstream")?;
    Some(&pdf[start..end])
}

#[test]
fn compressed_content_inflates_to_drawing_operators() {
    let _ = env_logger::try_init();
    let packed = render(common::full_submission(), true);
    let stream = first_flate_stream(&packed).expect("a compressed stream");
    let plain = miniz_oxide::inflate::decompress_to_vec_zlib(stream).expect("valid zlib data");
    assert!(common::contains(&plain, b" re"), "rectangles drawn");
    assert!(common::contains(&plain, b"Tj") || common::contains(&plain, b"TJ"));
}
