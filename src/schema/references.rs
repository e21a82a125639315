use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::catalog::registry::ComponentLookup;
use crate::schema::report::{ValidationIssue, ValidationReport};
use crate::schema::validate::validate_scene;

/// An object that references a component id absent from the catalog.
///
/// `Display` renders the canonical message
/// `Object <object_id> references non-existent component: <component_id>`, and `FromStr` parses
/// it back.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MissingReference {
    /// Id of the referencing object (or block, for card images).
    pub object_id: String,
    /// The unresolved component id.
    pub component_id: String,
}

const MESSAGE_PREFIX: &str = "Object ";
const MESSAGE_INFIX: &str = " references non-existent component: ";

impl fmt::Display for MissingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{MESSAGE_PREFIX}{}{MESSAGE_INFIX}{}",
            self.object_id, self.component_id
        )
    }
}

/// Error returned when a string is not a missing-reference message.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("not a missing component message: {0:?}")]
pub struct ParseMissingReferenceError(String);

impl FromStr for MissingReference {
    type Err = ParseMissingReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix(MESSAGE_PREFIX)
            .ok_or_else(|| ParseMissingReferenceError(s.to_string()))?;
        let (object_id, component_id) = rest
            .split_once(MESSAGE_INFIX)
            .filter(|(o, c)| !o.is_empty() && !c.is_empty())
            .ok_or_else(|| ParseMissingReferenceError(s.to_string()))?;
        Ok(Self {
            object_id: object_id.to_string(),
            component_id: component_id.to_string(),
        })
    }
}

/// Which component references the referential check covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferencePolicy {
    /// Only `road_scene` object `component_id`s.
    #[default]
    RoadSceneObjects,
    /// Road scene objects plus `definition_card.image_component_id`.
    AllReferences,
}

/// Schema-validate `raw`, then check its component references against `catalog`.
///
/// A schema failure is returned unchanged, without any referential findings.
pub fn validate_scene_with_catalog(raw: &Value, catalog: &dyn ComponentLookup) -> ValidationReport {
    validate_scene_with_policy(raw, catalog, ReferencePolicy::default())
}

/// [`validate_scene_with_catalog`] with an explicit [`ReferencePolicy`].
#[tracing::instrument(skip(raw, catalog))]
pub fn validate_scene_with_policy(
    raw: &Value,
    catalog: &dyn ComponentLookup,
    policy: ReferencePolicy,
) -> ValidationReport {
    let report = validate_scene(raw);
    if !report.is_valid() {
        return report;
    }
    let missing = find_missing_references(raw, catalog, policy);
    if !missing.is_empty() {
        tracing::debug!(count = missing.len(), "scene references missing components");
    }
    ValidationReport::from_issues(
        missing
            .into_iter()
            .map(ValidationIssue::MissingComponent)
            .collect(),
    )
}

/// Every unresolved component reference in a schema-valid scene, in document order.
///
/// Works on raw JSON so that it can run on documents that have not been deserialized; values of
/// an unexpected shape are skipped.
pub fn find_missing_references(
    raw: &Value,
    catalog: &dyn ComponentLookup,
    policy: ReferencePolicy,
) -> Vec<MissingReference> {
    let mut missing = Vec::new();
    let blocks = raw
        .get("blocks")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for block in blocks {
        let content = block.get("content");
        match block.get("type").and_then(Value::as_str) {
            Some("road_scene") => {
                let objects = content
                    .and_then(|c| c.get("objects"))
                    .and_then(Value::as_array)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                for object in objects {
                    let object_id = object.get("id").and_then(Value::as_str).unwrap_or_default();
                    if let Some(component_id) = object.get("component_id").and_then(Value::as_str)
                        && !catalog.contains(component_id)
                    {
                        missing.push(MissingReference {
                            object_id: object_id.to_string(),
                            component_id: component_id.to_string(),
                        });
                    }
                }
            }
            Some("definition_card") if policy == ReferencePolicy::AllReferences => {
                let image = content
                    .and_then(|c| c.get("image_component_id"))
                    .and_then(Value::as_str);
                if let Some(component_id) = image
                    && !catalog.contains(component_id)
                {
                    let block_id = block.get("id").and_then(Value::as_str).unwrap_or_default();
                    missing.push(MissingReference {
                        object_id: block_id.to_string(),
                        component_id: component_id.to_string(),
                    });
                }
            }
            _ => {}
        }
    }
    missing
}

#[cfg(test)]
#[path = "../../tests/unit/schema/references.rs"]
mod tests;
