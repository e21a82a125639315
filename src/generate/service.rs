//! Requests handed to an external text generator, and the seam it plugs into.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::catalog::model::{ComponentCategory, ComponentDescriptor};
use crate::scene::model::SceneJson;

/// External text generator producing scene or component documents.
///
/// Implementations talk to whatever backend they like; the returned text is free-form and is
/// handed to [`crate::generate::extract`] afterwards.
pub trait GenerationService: Send + Sync {
    /// Produce a scene for `request`.
    fn generate_scene(&self, request: &SceneRequest) -> anyhow::Result<String>;

    /// Produce a component descriptor for `request`.
    fn generate_component(&self, request: &ComponentRequest) -> anyhow::Result<String>;
}

/// Speaker of a [`ChatMessage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The person editing the scene.
    User,
    /// The generator.
    Assistant,
    /// Instructions prepended by the caller.
    System,
}

/// One turn of a conversation with the generator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }
}

/// Catalog entry as shown to the generator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntrySummary {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl From<&ComponentDescriptor> for CatalogEntrySummary {
    fn from(d: &ComponentDescriptor) -> Self {
        Self {
            id: d.id.clone(),
            name: d.name.clone(),
            description: d.description.clone(),
        }
    }
}

/// Request for a new or modified scene.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SceneRequest {
    pub prompt: String,
    pub catalog: Vec<CatalogEntrySummary>,
    pub current_scene: Option<SceneJson>,
    pub history: Vec<ChatMessage>,
}

impl SceneRequest {
    pub fn new<'a>(
        prompt: impl Into<String>,
        catalog: impl IntoIterator<Item = &'a ComponentDescriptor>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            catalog: catalog.into_iter().map(CatalogEntrySummary::from).collect(),
            current_scene: None,
            history: Vec::new(),
        }
    }

    pub fn with_current_scene(mut self, scene: Option<SceneJson>) -> Self {
        self.current_scene = scene;
        self
    }

    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.history = history;
        self
    }

    /// Instructions listing the usable components and the output contract.
    pub fn system_prompt(&self) -> String {
        let mut out = String::from(
            "You are the scene director for driving-licence quiz illustrations.\n\
             Rules:\n\
             1. Use only component ids from the catalog below.\n\
             2. Answer with a single JSON scene inside a ```json fenced block.\n\
             3. Coordinates are normalized to 0..100 with the origin at the top left.\n\
             4. Layer with z_index: roads 0-5, vehicles 10-19, signs 20-29.\n\
             Block types: road_scene, definition_card, gauge, timeline, comparison_table.\n\
             \nAvailable components:\n",
        );
        for entry in &self.catalog {
            let _ = writeln!(out, "- {}: {} - {}", entry.id, entry.name, entry.description);
        }
        if let Some(scene) = &self.current_scene
            && let Ok(json) = serde_json::to_string_pretty(scene)
        {
            let _ = write!(out, "\nCurrent scene:\n```json\n{json}\n```\n");
        }
        out
    }

    /// Full message list: system prompt, prior history, then the prompt.
    pub fn messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(ChatMessage::system(self.system_prompt()));
        messages.extend(self.history.iter().cloned());
        messages.push(ChatMessage::user(self.prompt.clone()));
        messages
    }
}

/// Request for a component descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentRequest {
    pub component_id: String,
    pub name: String,
    pub category: ComponentCategory,
    pub context: Option<String>,
}

impl ComponentRequest {
    /// Request for a component a scene referenced but the catalog lacks.
    pub fn for_missing(component_id: impl Into<String>) -> Self {
        let component_id = component_id.into();
        Self {
            name: readable_name(&component_id),
            category: infer_category(&component_id),
            component_id,
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Request text sent to the generator.
    pub fn describe(&self) -> String {
        let mut out = format!(
            "Create a component named \"{}\" (ID: {}) in category \"{}\"",
            self.name, self.component_id, self.category
        );
        if let Some(context) = &self.context {
            let _ = write!(out, ".\n\nContext: {context}");
        }
        out.push_str(
            "\n\nGenerate an appropriate SVG component, simple but visually effective, \
             centered on (0, 0) and seen from above. Answer with the descriptor JSON only.",
        );
        out
    }
}

/// `vehicle_truck` -> `Vehicle Truck`.
pub fn readable_name(component_id: &str) -> String {
    component_id
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Category guessed from the id prefix.
pub fn infer_category(component_id: &str) -> ComponentCategory {
    const PREFIXES: [(&str, ComponentCategory); 4] = [
        ("vehicle_", ComponentCategory::Vehicle),
        ("sign_", ComponentCategory::Sign),
        ("road_", ComponentCategory::RoadSurface),
        ("pedestrian_", ComponentCategory::Pedestrian),
    ];
    PREFIXES
        .iter()
        .find(|(prefix, _)| component_id.starts_with(prefix))
        .map_or(ComponentCategory::Abstract, |(_, category)| *category)
}

#[cfg(test)]
#[path = "../../tests/unit/generate/service.rs"]
mod tests;
