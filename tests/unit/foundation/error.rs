use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CaptchaError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(CaptchaError::font("x").to_string().contains("font error:"));
    assert!(
        CaptchaError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        CaptchaError::encode("x")
            .to_string()
            .contains("encode error:")
    );
}

#[test]
fn io_errors_convert_and_keep_message() {
    let err: CaptchaError = std::io::Error::other("disk full").into();
    assert!(matches!(err, CaptchaError::Io(_)));
    assert!(err.to_string().contains("disk full"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CaptchaError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
