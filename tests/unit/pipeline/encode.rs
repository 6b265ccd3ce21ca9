use image::Rgb;

use super::*;

fn sample() -> RgbImage {
    RgbImage::from_fn(16, 8, |x, y| Rgb([(x * 15) as u8, (y * 30) as u8, 128]))
}

#[test]
fn png_bytes_decode_back_to_the_same_pixels() {
    let img = sample();
    let bytes = encode_image(&img, OutputFormat::Png).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
    assert_eq!(decoded, img);
}

#[test]
fn every_format_produces_its_own_signature() {
    let img = sample();
    let jpeg = encode_image(&img, OutputFormat::Jpeg).unwrap();
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    let bmp = encode_image(&img, OutputFormat::Bmp).unwrap();
    assert_eq!(&bmp[..2], b"BM");
    for fmt in [OutputFormat::Jpeg, OutputFormat::Bmp] {
        let bytes = encode_image(&img, fmt).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }
}

#[test]
fn extensions_map_to_formats() {
    assert_eq!(OutputFormat::from_extension("PNG"), Some(OutputFormat::Png));
    assert_eq!(OutputFormat::from_extension("jpeg"), Some(OutputFormat::Jpeg));
    assert_eq!(OutputFormat::from_extension("jpg"), Some(OutputFormat::Jpeg));
    assert_eq!(OutputFormat::from_extension("gif"), None);
    assert_eq!(
        OutputFormat::from_path(Path::new("out/captcha.bmp")),
        Some(OutputFormat::Bmp)
    );
    assert_eq!(OutputFormat::from_path(Path::new("noext")), None);
}

#[test]
fn serde_uses_lowercase_names() {
    assert_eq!(serde_json::to_string(&OutputFormat::Jpeg).unwrap(), "\"jpeg\"");
    let f: OutputFormat = serde_json::from_str("\"bmp\"").unwrap();
    assert_eq!(f, OutputFormat::Bmp);
}

#[test]
fn writing_into_a_missing_directory_is_an_io_error() {
    let path = std::env::temp_dir()
        .join("captcha-synth-missing-dir")
        .join("nested")
        .join("x.png");
    let err = write_image(&sample(), &path, OutputFormat::Png).unwrap_err();
    assert!(matches!(err, CaptchaError::Io(_)));
}

#[test]
fn write_creates_the_file() {
    let dir = std::env::temp_dir().join(format!("captcha-synth-encode-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("ok.png");
    write_image(&sample(), &path, OutputFormat::Png).unwrap();
    let decoded = image::open(&path).unwrap().to_rgb8();
    assert_eq!(decoded, sample());
    std::fs::remove_dir_all(&dir).unwrap();
}
