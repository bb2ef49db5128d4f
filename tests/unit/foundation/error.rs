use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        NewsreelError::layout("x")
            .to_string()
            .contains("layout error:")
    );
    assert!(
        NewsreelError::narration("x")
            .to_string()
            .contains("narration error:")
    );
    assert!(
        NewsreelError::timeline("x")
            .to_string()
            .contains("timeline error:")
    );
    assert!(NewsreelError::sync("x").to_string().contains("sync error:"));
    assert!(
        NewsreelError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        NewsreelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = NewsreelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
