use serde_json::json;

use super::*;

#[test]
fn fenced_block_wins_over_surrounding_braces() {
    let text = "Here {is} the scene:\n```json\n{\"a\": 1}\n```\nand {more}";
    assert_eq!(extract_json(text).unwrap(), json!({"a": 1}));
}

#[test]
fn greedy_brace_span_is_the_fallback() {
    let text = "Sure! {\"outer\": {\"inner\": true}} Hope that helps.";
    assert_eq!(
        extract_json(text).unwrap(),
        json!({"outer": {"inner": true}})
    );
    let unterminated = "```json\n{\"a\": 2}";
    assert_eq!(extract_json(unterminated).unwrap(), json!({"a": 2}));
}

#[test]
fn malformed_fenced_block_does_not_fall_back() {
    let text = "```json\n{not json}\n```\n{\"ok\": true}";
    let err = extract_json(text).unwrap_err();
    assert!(matches!(
        err,
        ExtractError::Parse {
            source_kind: CandidateKind::FencedBlock,
            ..
        }
    ));
}

#[test]
fn text_without_json_is_not_found() {
    for text in ["no json here", "} backwards {", ""] {
        let err = extract_json(text).unwrap_err();
        assert_eq!(err.to_string(), "no valid JSON found in response");
    }
    let err: QuizSceneError = ExtractError::NotFound.into();
    assert_eq!(
        err.to_string(),
        "extraction error: no valid JSON found in response"
    );
}

#[test]
fn typed_parsers_validate_before_deserializing() {
    let scene = parse_scene_response(
        "```json\n{\"id\": \"s\", \"version\": 1, \"blocks\": []}\n```",
    )
    .unwrap();
    assert_eq!(scene.id, "s");

    let err = parse_scene_response("{\"id\": \"s\"}").unwrap_err();
    assert!(err.to_string().contains("missing required property 'version'"), "{err}");

    let err = parse_component_response("nothing").unwrap_err();
    assert!(matches!(err, QuizSceneError::Extraction(_)));
}
