use serde_json::Value;

use crate::catalog::model::ComponentDescriptor;
use crate::catalog::registry::CatalogRegistry;
use crate::catalog::store::ComponentStore;
use crate::foundation::error::{QuizSceneError, QuizSceneResult};
use crate::generate::extract::extract_json;
use crate::generate::heal::{AutoHealer, HealOptions, HealReport};
use crate::generate::queue::GenerationQueue;
use crate::generate::service::{ChatMessage, GenerationService, SceneRequest};
use crate::render::scene::{RenderOptions, RenderedScene, render_scene};
use crate::scene::model::SceneJson;
use crate::schema::references::{ReferencePolicy, validate_scene_with_policy};
use crate::schema::report::ValidationReport;

/// Result of one [`EditorSession::chat`] turn.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatOutcome {
    /// Whether the generated scene replaced the current one.
    pub scene_replaced: bool,
    /// Validation of the generated scene.
    pub report: ValidationReport,
    /// Components the generated scene references but the catalog lacks.
    pub missing_components: Vec<String>,
    /// Raw generator reply.
    pub reply: String,
}

/// Editing state for one scene: its catalog, the scene text and its last validation.
///
/// The scene text is the source of truth. The typed scene is replaced only when the text
/// validates, so [`scene`](Self::scene) always holds the last accepted document.
#[derive(Debug)]
pub struct EditorSession {
    registry: CatalogRegistry,
    queue: GenerationQueue,
    scene: Option<SceneJson>,
    text: String,
    report: ValidationReport,
    history: Vec<ChatMessage>,
    policy: ReferencePolicy,
}

impl EditorSession {
    pub fn new(registry: CatalogRegistry) -> Self {
        Self {
            registry,
            queue: GenerationQueue::new(),
            scene: None,
            text: String::new(),
            report: ValidationReport::valid(),
            history: Vec::new(),
            policy: ReferencePolicy::default(),
        }
    }

    /// Session editing `scene`. The scene is accepted as-is and then validated.
    pub fn with_scene(registry: CatalogRegistry, scene: SceneJson) -> QuizSceneResult<Self> {
        let mut session = Self::new(registry);
        session.text = pretty(&scene)?;
        session.scene = Some(scene);
        session.revalidate();
        Ok(session)
    }

    pub fn with_policy(mut self, policy: ReferencePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn registry(&self) -> &CatalogRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CatalogRegistry {
        &mut self.registry
    }

    pub fn queue(&self) -> &GenerationQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut GenerationQueue {
        &mut self.queue
    }

    /// Last accepted scene.
    pub fn scene(&self) -> Option<&SceneJson> {
        self.scene.as_ref()
    }

    /// Current scene text, accepted or not.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Replace the scene text and validate it against the catalog.
    ///
    /// Unparseable text yields a single syntax issue; text with schema or reference issues is
    /// kept but does not replace the current scene.
    pub fn apply_text(&mut self, text: impl Into<String>) -> &ValidationReport {
        self.text = text.into();
        self.revalidate()
    }

    /// Validate the current text again, e.g. after the catalog changed.
    pub fn revalidate(&mut self) -> &ValidationReport {
        self.report = if self.text.trim().is_empty() {
            ValidationReport::valid()
        } else {
            match serde_json::from_str::<Value>(&self.text) {
                Err(e) => ValidationReport::syntax_error(e.to_string()),
                Ok(raw) => {
                    let report = validate_scene_with_policy(&raw, &self.registry, self.policy);
                    if report.is_valid() {
                        match serde_json::from_value::<SceneJson>(raw) {
                            Ok(scene) => {
                                self.scene = Some(scene);
                                report
                            }
                            Err(e) => ValidationReport::syntax_error(e.to_string()),
                        }
                    } else {
                        report
                    }
                }
            }
        };
        &self.report
    }

    /// Distinct missing component ids from the last validation, in first-seen order.
    pub fn missing_components(&self) -> Vec<String> {
        self.report.missing_components()
    }

    /// Ask `service` for a new scene.
    ///
    /// A reply holding a structurally valid scene replaces the current scene even when it
    /// references missing components; those are reported for [`heal`](Self::heal). A reply
    /// without JSON, or a failing service, leaves the session unchanged and returns the error.
    #[tracing::instrument(skip(self, service))]
    pub fn chat(
        &mut self,
        prompt: &str,
        service: &dyn GenerationService,
    ) -> QuizSceneResult<ChatOutcome> {
        let request = SceneRequest::new(prompt, self.registry.list())
            .with_current_scene(self.scene.clone())
            .with_history(self.history.clone());
        let reply = service
            .generate_scene(&request)
            .map_err(|e| QuizSceneError::generation(format!("{e:#}")))?;
        let raw = extract_json(&reply)?;

        let report = validate_scene_with_policy(&raw, &self.registry, self.policy);
        let structurally_valid = report.schema_errors().next().is_none();
        let mut scene_replaced = false;
        if structurally_valid {
            let scene: SceneJson =
                serde_json::from_value(raw).map_err(|e| QuizSceneError::serde(e.to_string()))?;
            self.text = pretty(&scene)?;
            self.scene = Some(scene);
            self.report = report.clone();
            scene_replaced = true;
        } else {
            tracing::warn!(%report, "generated scene rejected");
        }

        self.history.push(ChatMessage::user(prompt));
        self.history.push(ChatMessage::assistant(reply.clone()));
        Ok(ChatOutcome {
            scene_replaced,
            missing_components: report.missing_components(),
            report,
            reply,
        })
    }

    /// Drop a component from the catalog and revalidate.
    pub fn remove_component(&mut self, id: &str) -> Option<ComponentDescriptor> {
        let removed = self.registry.remove(id);
        if removed.is_some() {
            self.revalidate();
        }
        removed
    }

    /// Generate the components the current text is missing, then revalidate.
    pub fn heal(
        &mut self,
        service: &dyn GenerationService,
        store: Option<&dyn ComponentStore>,
        options: &HealOptions,
    ) -> QuizSceneResult<HealReport> {
        let missing = self.missing_components();
        let mut healer = AutoHealer::new(options.clone());
        if let Some(scene) = &self.scene {
            healer = healer.with_context(format!("used in scene '{}'", scene.id));
        }
        let report = healer.heal(
            &missing,
            &mut self.registry,
            &mut self.queue,
            service,
            store,
        )?;
        self.revalidate();
        Ok(report)
    }

    /// Render the last accepted scene against the current catalog.
    pub fn render(&self, options: &RenderOptions) -> Option<RenderedScene> {
        self.scene
            .as_ref()
            .map(|scene| render_scene(scene, &self.registry, options))
    }
}

fn pretty(scene: &SceneJson) -> QuizSceneResult<String> {
    serde_json::to_string_pretty(scene).map_err(|e| QuizSceneError::serde(e.to_string()))
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
