//! quizscene validates, composes and renders driving-quiz scenes built from a catalog of
//! parametric SVG components.
//!
//! The typical flow:
//!
//! - Load a [`CatalogRegistry`] (built-in components plus an optional directory)
//! - Validate a scene with [`validate_scene_with_catalog`]
//! - Render it with [`render_scene`] and write [`RenderedScene::to_svg_document`]
//!
//! [`EditorSession`] ties these together with an external [`GenerationService`], turning chat
//! prompts into scenes and generating components the catalog lacks.
#![forbid(unsafe_code)]

/// Component descriptors, the registry and persistence.
pub mod catalog;
mod foundation;
/// Text generation seam and auto-heal.
pub mod generate;
/// SVG composition of scenes.
pub mod render;
/// Scene document model.
pub mod scene;
/// Structural and referential validation.
pub mod schema;
/// Editing session.
pub mod session;
/// Prop merging and template expansion.
pub mod template;

pub use crate::foundation::error::{QuizSceneError, QuizSceneResult};
pub use crate::foundation::format::{escape_xml, js_number};

pub use crate::catalog::lint::{LintIssue, lint_component};
pub use crate::catalog::model::{ComponentCategory, ComponentDescriptor, ComponentKind};
pub use crate::catalog::registry::{
    Catalog, CatalogEvent, CatalogRegistry, ComponentLookup, SubscriptionId,
};
pub use crate::catalog::store::{ComponentStore, DirectoryStore};
pub use crate::generate::extract::{ExtractError, extract_json};
pub use crate::generate::heal::{AutoHealer, HealOptions, HealReport};
pub use crate::generate::queue::{GenerationJob, GenerationQueue, JobId, JobStatus};
pub use crate::generate::service::{
    ChatMessage, ChatRole, ComponentRequest, GenerationService, SceneRequest,
};
pub use crate::render::scene::{RenderOptions, RenderedBlock, RenderedScene, render_scene};
pub use crate::scene::model::{BlockContent, SceneBlock, SceneJson, SceneObject};
pub use crate::schema::references::{
    MissingReference, ReferencePolicy, validate_scene_with_catalog, validate_scene_with_policy,
};
pub use crate::schema::report::{ValidationIssue, ValidationReport};
pub use crate::schema::validate::{validate_component, validate_scene};
pub use crate::session::{ChatOutcome, EditorSession};
pub use crate::template::interpolate::render_template;
pub use crate::template::props::{PropMap, PropValue, merge_props};
