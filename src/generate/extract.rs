//! Pull a JSON document out of free-form model output.

use serde_json::Value;

use crate::catalog::model::ComponentDescriptor;
use crate::foundation::error::{QuizSceneError, QuizSceneResult};
use crate::scene::model::SceneJson;

/// Why no document could be extracted.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Neither a fenced block nor a brace-delimited span was found.
    #[error("no valid JSON found in response")]
    NotFound,
    /// A candidate was found but is not valid JSON.
    #[error("invalid JSON in {source_kind}: {error}")]
    Parse {
        /// Where the candidate came from.
        source_kind: CandidateKind,
        /// Parser error.
        error: serde_json::Error,
    },
}

/// Origin of an extraction candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandidateKind {
    /// A ```` ```json ```` fenced block.
    FencedBlock,
    /// The span from the first `{` to the last `}`.
    BraceSpan,
}

impl std::fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::FencedBlock => "fenced json block",
            Self::BraceSpan => "response body",
        })
    }
}

impl From<ExtractError> for QuizSceneError {
    fn from(e: ExtractError) -> Self {
        Self::extraction(e.to_string())
    }
}

const FENCE_OPEN: &str = "```json";
const FENCE: &str = "```";

/// Locate the JSON candidate in `text` without parsing it.
///
/// The first ```` ```json ```` block wins, even when it is malformed. Otherwise the greedy span
/// from the first `{` to the last `}` is used.
pub fn find_json_candidate(text: &str) -> Option<(CandidateKind, &str)> {
    if let Some(start) = text.find(FENCE_OPEN) {
        let body = &text[start + FENCE_OPEN.len()..];
        if let Some(end) = body.find(FENCE) {
            return Some((CandidateKind::FencedBlock, body[..end].trim()));
        }
    }
    let open = text.find('{')?;
    let close = text.rfind('}')?;
    (close > open).then(|| (CandidateKind::BraceSpan, &text[open..=close]))
}

/// Extract and parse the JSON document embedded in model output.
pub fn extract_json(text: &str) -> Result<Value, ExtractError> {
    let (source_kind, candidate) = find_json_candidate(text).ok_or(ExtractError::NotFound)?;
    serde_json::from_str(candidate).map_err(|error| ExtractError::Parse { source_kind, error })
}

/// Extract, structurally validate and deserialize a scene.
pub fn parse_scene_response(text: &str) -> QuizSceneResult<SceneJson> {
    crate::schema::decode_scene(extract_json(text)?)
}

/// Extract, structurally validate and deserialize a component descriptor.
pub fn parse_component_response(text: &str) -> QuizSceneResult<ComponentDescriptor> {
    crate::schema::decode_component(extract_json(text)?)
}

#[cfg(test)]
#[path = "../../tests/unit/generate/extract.rs"]
mod tests;
