use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        KeeperError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(KeeperError::asset("x").to_string().contains("asset error:"));
    assert!(KeeperError::media("x").to_string().contains("media error:"));
    assert!(
        KeeperError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = KeeperError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
