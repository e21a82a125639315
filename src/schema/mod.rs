//! Structural and referential validation.

pub mod references;
pub mod report;
pub mod validate;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::catalog::model::ComponentDescriptor;
use crate::foundation::error::{QuizSceneError, QuizSceneResult};
use crate::scene::model::SceneJson;

/// Structurally validate a raw component, then deserialize it.
pub fn decode_component(raw: Value) -> QuizSceneResult<ComponentDescriptor> {
    decode(raw, validate::validate_component, "component")
}

/// Parse, validate and deserialize a component from JSON text.
pub fn decode_component_str(text: &str) -> QuizSceneResult<ComponentDescriptor> {
    decode_component(parse(text)?)
}

/// Structurally validate a raw scene, then deserialize it. References are not checked.
pub fn decode_scene(raw: Value) -> QuizSceneResult<SceneJson> {
    decode(raw, validate::validate_scene, "scene")
}

/// Parse, validate and deserialize a scene from JSON text.
pub fn decode_scene_str(text: &str) -> QuizSceneResult<SceneJson> {
    decode_scene(parse(text)?)
}

/// Parse and deserialize a scene for rendering, returning it with its structural report.
///
/// Blocks whose content does not decode are kept as placeholders instead of failing the
/// whole document, so only a malformed envelope (ids, block list, block tags) is an error.
pub fn decode_scene_lenient(
    text: &str,
) -> QuizSceneResult<(SceneJson, report::ValidationReport)> {
    let raw = parse(text)?;
    let report = validate::validate_scene(&raw);
    let scene = serde_json::from_value(raw).map_err(|e| QuizSceneError::serde(e.to_string()))?;
    Ok((scene, report))
}

fn parse(text: &str) -> QuizSceneResult<Value> {
    serde_json::from_str(text).map_err(|e| QuizSceneError::serde(e.to_string()))
}

fn decode<T: DeserializeOwned>(
    raw: Value,
    validate: fn(&Value) -> report::ValidationReport,
    what: &str,
) -> QuizSceneResult<T> {
    let report = validate(&raw);
    if !report.is_valid() {
        return Err(QuizSceneError::validation(format!(
            "{what} does not match schema: {}",
            report.messages().join("; ")
        )));
    }
    serde_json::from_value(raw).map_err(|e| QuizSceneError::serde(e.to_string()))
}
