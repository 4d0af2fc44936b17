//! Integration tests for weft-types.

use weft_types::{Module, WeftError};

#[test]
fn error_display_includes_detail() {
    let e = WeftError::Factorization("non-positive pivot at row 3".into());
    assert_eq!(
        e.to_string(),
        "Factorization failed: non-positive pivot at row 3"
    );

    let e = WeftError::InvalidConfig("frame_steps must be > 0".into());
    assert!(e.to_string().contains("frame_steps"));
}

#[test]
fn io_error_converts() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let e: WeftError = io.into();
    assert!(matches!(e, WeftError::Io(_)));
}

#[test]
fn module_indices_match_all_order() {
    assert_eq!(Module::ALL.len(), Module::COUNT);
    for (i, module) in Module::ALL.iter().enumerate() {
        assert_eq!(module.index(), i);
    }
}
