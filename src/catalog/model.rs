use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::template::props::PropMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A catalog entry describing one reusable visual component.
///
/// Descriptors are pure data: they can be authored by hand, produced by a generation service, or
/// loaded from the built-in catalog. Rendering merges instance props over
/// [`default_props`](Self::default_props) and expands the [`render`](Self::render) template.
pub struct ComponentDescriptor {
    /// Unique catalog key referenced by scene objects.
    pub id: String,
    /// Free-form version string.
    pub version: String,
    /// Structural kind of the component.
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    /// Catalog grouping.
    pub category: ComponentCategory,
    /// Display name.
    pub name: String,
    /// Display description, also shown to generation services.
    pub description: String,
    /// Optional free-form tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Authoring schema for the configurable props (documentation only).
    pub props_schema: serde_json::Value,
    /// Default prop values; the base layer of every render.
    pub default_props: PropMap,
    /// Visual template; `None` renders nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render: Option<RenderSpec>,
    /// Child components of a composite descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<CompositeChild>>,
}

impl ComponentDescriptor {
    /// SVG template string, if the descriptor carries one.
    pub fn svg_template(&self) -> Option<&str> {
        self.render.as_ref().and_then(|r| r.svg.as_deref())
    }

    /// Structured layers, if the descriptor carries them.
    pub fn layers(&self) -> Option<&[RenderLayer]> {
        self.render.as_ref().and_then(|r| r.layers.as_deref())
    }

    /// Composite children (empty for non-composite descriptors).
    pub fn children(&self) -> &[CompositeChild] {
        self.children.as_deref().unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Structural kind of a component descriptor.
pub enum ComponentKind {
    /// Self-contained template.
    Primitive,
    /// Built from child components.
    Composite,
    /// Non-visual or behavioural component.
    Logic,
}

impl ComponentKind {
    /// All kinds, in schema order.
    pub const ALL: [Self; 3] = [Self::Primitive, Self::Composite, Self::Logic];

    /// Wire name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primitive => "primitive",
            Self::Composite => "composite",
            Self::Logic => "logic",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Catalog category of a component.
pub enum ComponentCategory {
    /// Cars, motorcycles, trucks, buses.
    Vehicle,
    /// People on foot.
    Pedestrian,
    /// Vertical road signs.
    Sign,
    /// Roads, lanes and road markings.
    RoadSurface,
    /// Traffic lights, street lamps, guard rails.
    Infrastructure,
    /// Abstract icons.
    Icon,
    /// Arrows and indicators.
    Abstract,
    /// Interface elements.
    Ui,
}

impl ComponentCategory {
    /// All categories, in schema order.
    pub const ALL: [Self; 8] = [
        Self::Vehicle,
        Self::Pedestrian,
        Self::Sign,
        Self::RoadSurface,
        Self::Infrastructure,
        Self::Icon,
        Self::Abstract,
        Self::Ui,
    ];

    /// Wire name of the category.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vehicle => "vehicle",
            Self::Pedestrian => "pedestrian",
            Self::Sign => "sign",
            Self::RoadSurface => "road_surface",
            Self::Infrastructure => "infrastructure",
            Self::Icon => "icon",
            Self::Abstract => "abstract",
            Self::Ui => "ui",
        }
    }

    /// Parse a wire name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl std::fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
/// How a descriptor draws itself.
pub struct RenderSpec {
    /// Parametric SVG fragment with `{prop}` placeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,
    /// Structured shape layers, used when there is no `svg` template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layers: Option<Vec<RenderLayer>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// One tagged shape primitive of a layered descriptor.
pub struct RenderLayer {
    /// Shape kind.
    #[serde(rename = "type")]
    pub kind: LayerKind,
    /// Shape attributes; string values may contain placeholders.
    #[serde(default)]
    pub props: PropMap,
    /// Prop name (optionally prefixed with `!`) gating whether the layer draws.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Shape kind of a [`RenderLayer`].
pub enum LayerKind {
    /// `<rect>`.
    Rect,
    /// `<circle>`.
    Circle,
    /// `<path>`.
    Path,
    /// `<text>`.
    Text,
    /// `<image>`.
    Image,
    /// Anything else; renders nothing.
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A child reference inside a composite descriptor.
pub struct CompositeChild {
    /// Referenced catalog id.
    pub component_id: String,
    /// Position of the child relative to the parent origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<ChildOffset>,
    /// Child prop name -> parent prop name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props_mapping: Option<IndexMap<String, String>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
/// Offset of a composite child.
pub struct ChildOffset {
    /// Horizontal offset in parent units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Vertical offset in parent units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Rotation in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/model.rs"]
mod tests;
