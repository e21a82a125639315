use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        QuizSceneError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        QuizSceneError::extraction("x")
            .to_string()
            .contains("extraction error:")
    );
    assert!(
        QuizSceneError::generation("x")
            .to_string()
            .contains("generation error:")
    );
    assert!(
        QuizSceneError::catalog("x")
            .to_string()
            .contains("catalog error:")
    );
    assert!(
        QuizSceneError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = QuizSceneError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
