use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::template::props::PropMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// A quiz scene: ordered visual blocks plus optional question metadata.
pub struct SceneJson {
    /// Scene identifier.
    pub id: String,
    /// Document version (non-negative integer).
    pub version: u64,
    /// Question metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SceneMetadata>,
    /// Blocks in paint order.
    pub blocks: Vec<SceneBlock>,
}

impl SceneJson {
    /// Question text from the metadata, if any.
    pub fn question_text(&self) -> Option<&str> {
        self.metadata.as_ref()?.question_text.as_deref()
    }

    /// Every object of every `road_scene` block, in document order.
    pub fn road_objects(&self) -> impl Iterator<Item = (&SceneBlock, &SceneObject)> {
        self.blocks.iter().flat_map(|block| {
            let objects = match &block.content {
                BlockContent::RoadScene(content) => content.objects.as_slice(),
                _ => &[],
            };
            objects.iter().map(move |object| (block, object))
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
/// Optional question metadata.
pub struct SceneMetadata {
    /// Question shown with the scene.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_text: Option<String>,
    /// Free-form tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Difficulty rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Recognised block type tags.
pub enum BlockKind {
    /// `road_scene`
    RoadScene,
    /// `definition_card`
    DefinitionCard,
    /// `gauge`
    Gauge,
    /// `timeline`
    Timeline,
    /// `comparison_table`
    ComparisonTable,
    /// `cause_effect`
    CauseEffect,
    /// `icon_grid`
    IconGrid,
}

impl BlockKind {
    /// All recognised kinds, in schema order.
    pub const ALL: [Self; 7] = [
        Self::RoadScene,
        Self::DefinitionCard,
        Self::Gauge,
        Self::Timeline,
        Self::ComparisonTable,
        Self::CauseEffect,
        Self::IconGrid,
    ];

    /// Wire tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RoadScene => "road_scene",
            Self::DefinitionCard => "definition_card",
            Self::Gauge => "gauge",
            Self::Timeline => "timeline",
            Self::ComparisonTable => "comparison_table",
            Self::CauseEffect => "cause_effect",
            Self::IconGrid => "icon_grid",
        }
    }

    /// Parse a wire tag.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

/// One visual block of a scene.
///
/// The wire form is `{ id, type, title?, layout?, content }`; `type` selects the
/// [`BlockContent`] variant. Unrecognised types are kept as [`BlockContent::Unknown`] and
/// recognised types with undecodable content as [`BlockContent::Invalid`], so that a document
/// survives a load/save cycle unchanged.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneBlock {
    /// Block identifier.
    pub id: String,
    /// Optional title.
    pub title: Option<String>,
    /// Placement in percent of the container; `None` fills it.
    pub layout: Option<BlockLayout>,
    /// Typed content.
    pub content: BlockContent,
}

impl SceneBlock {
    /// Wire `type` tag of the block.
    pub fn type_tag(&self) -> &str {
        match &self.content {
            BlockContent::Unknown { kind, .. } => kind.as_str(),
            other => other.kind().map(BlockKind::as_str).unwrap_or_default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
/// Block rectangle in percentage units (0-100) of the container.
pub struct BlockLayout {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

#[derive(Clone, Debug, PartialEq)]
/// Content of a block, one variant per block type.
pub enum BlockContent {
    /// Road diagram with positioned component instances.
    RoadScene(RoadSceneContent),
    /// Text card with an optional illustrative component.
    DefinitionCard(DefinitionCardContent),
    /// Dial gauge.
    Gauge(GaugeContent),
    /// Ordered events.
    Timeline(TimelineContent),
    /// Header row plus labelled value rows.
    ComparisonTable(ComparisonTableContent),
    /// Cause and effect diagram (free-form, not rendered yet).
    CauseEffect(serde_json::Value),
    /// Icon grid (free-form, not rendered yet).
    IconGrid(serde_json::Value),
    /// Recognised `type` whose content does not decode. The raw content is kept.
    Invalid {
        /// The block type.
        kind: BlockKind,
        /// Raw content.
        content: serde_json::Value,
        /// Decode error.
        error: String,
    },
    /// Block with an unrecognised `type`.
    Unknown {
        /// The unrecognised type tag.
        kind: String,
        /// Raw content.
        content: serde_json::Value,
    },
}

impl BlockContent {
    /// Recognised kind, or `None` for [`BlockContent::Unknown`].
    pub fn kind(&self) -> Option<BlockKind> {
        Some(match self {
            Self::RoadScene(_) => BlockKind::RoadScene,
            Self::DefinitionCard(_) => BlockKind::DefinitionCard,
            Self::Gauge(_) => BlockKind::Gauge,
            Self::Timeline(_) => BlockKind::Timeline,
            Self::ComparisonTable(_) => BlockKind::ComparisonTable,
            Self::CauseEffect(_) => BlockKind::CauseEffect,
            Self::IconGrid(_) => BlockKind::IconGrid,
            Self::Invalid { kind, .. } => *kind,
            Self::Unknown { .. } => return None,
        })
    }

    fn from_wire(kind: &str, content: serde_json::Value) -> Self {
        let Some(known) = BlockKind::parse(kind) else {
            return Self::Unknown {
                kind: kind.to_string(),
                content,
            };
        };
        let decoded = match known {
            BlockKind::RoadScene => RoadSceneContent::deserialize(&content).map(Self::RoadScene),
            BlockKind::DefinitionCard => {
                DefinitionCardContent::deserialize(&content).map(Self::DefinitionCard)
            }
            BlockKind::Gauge => GaugeContent::deserialize(&content).map(Self::Gauge),
            BlockKind::Timeline => TimelineContent::deserialize(&content).map(Self::Timeline),
            BlockKind::ComparisonTable => {
                ComparisonTableContent::deserialize(&content).map(Self::ComparisonTable)
            }
            BlockKind::CauseEffect => return Self::CauseEffect(content),
            BlockKind::IconGrid => return Self::IconGrid(content),
        };
        decoded.unwrap_or_else(|e| Self::Invalid {
            kind: known,
            content,
            error: e.to_string(),
        })
    }
}

#[derive(Deserialize)]
struct WireBlock {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    layout: Option<BlockLayout>,
    #[serde(default)]
    content: serde_json::Value,
}

#[derive(Serialize)]
struct WireBlockRef<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    layout: Option<&'a BlockLayout>,
    content: WireContentRef<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum WireContentRef<'a> {
    RoadScene(&'a RoadSceneContent),
    DefinitionCard(&'a DefinitionCardContent),
    Gauge(&'a GaugeContent),
    Timeline(&'a TimelineContent),
    ComparisonTable(&'a ComparisonTableContent),
    Raw(&'a serde_json::Value),
}

impl<'de> Deserialize<'de> for SceneBlock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireBlock::deserialize(deserializer)?;
        let content = BlockContent::from_wire(&wire.kind, wire.content);
        Ok(Self {
            id: wire.id,
            title: wire.title,
            layout: wire.layout,
            content,
        })
    }
}

impl Serialize for SceneBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let content = match &self.content {
            BlockContent::RoadScene(c) => WireContentRef::RoadScene(c),
            BlockContent::DefinitionCard(c) => WireContentRef::DefinitionCard(c),
            BlockContent::Gauge(c) => WireContentRef::Gauge(c),
            BlockContent::Timeline(c) => WireContentRef::Timeline(c),
            BlockContent::ComparisonTable(c) => WireContentRef::ComparisonTable(c),
            BlockContent::CauseEffect(v)
            | BlockContent::IconGrid(v)
            | BlockContent::Invalid { content: v, .. }
            | BlockContent::Unknown { content: v, .. } => WireContentRef::Raw(v),
        };
        WireBlockRef {
            id: &self.id,
            kind: self.type_tag(),
            title: self.title.as_deref(),
            layout: self.layout.as_ref(),
            content,
        }
        .serialize(serializer)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
/// Content of a `road_scene` block.
pub struct RoadSceneContent {
    /// Background keyword (`grass`, `asphalt`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Component instances.
    pub objects: Vec<SceneObject>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// A component instance placed in a road scene.
pub struct SceneObject {
    /// Object identifier.
    pub id: String,
    /// Catalog id of the component to draw.
    pub component_id: String,
    /// Placement.
    pub transform: ObjectTransform,
    /// Instance overrides of the component's default props.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<PropMap>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
/// Placement of a [`SceneObject`] in scene units (0-100, origin top-left).
pub struct ObjectTransform {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Rotation in degrees (default 0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// Uniform scale (default 1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    /// Paint order within the block (default 0, ascending).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
}

impl ObjectTransform {
    /// Effective paint order.
    pub fn z(&self) -> i32 {
        self.z_index.unwrap_or(0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
/// Content of a `definition_card` block.
pub struct DefinitionCardContent {
    /// Card heading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Body text.
    pub text: String,
    /// Optional illustrative component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_component_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
/// Content of a `gauge` block.
pub struct GaugeContent {
    /// Current value.
    pub value: f64,
    /// Upper bound.
    pub max: f64,
    /// Lower bound (default 0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Caption under the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Unit appended to the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Colored ranges drawn on the dial.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zones: Option<Vec<GaugeZone>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// A colored range of a gauge.
pub struct GaugeZone {
    /// Range start.
    pub min: f64,
    /// Range end.
    pub max: f64,
    /// CSS color.
    pub color: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
/// Content of a `timeline` block.
pub struct TimelineContent {
    /// Events in display order.
    pub events: Vec<TimelineEvent>,
    /// Layout direction (default vertical).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<TimelineOrientation>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// One timeline entry.
pub struct TimelineEvent {
    /// Event identifier.
    pub id: String,
    /// Event heading.
    pub title: String,
    /// Time label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Icon text or emoji drawn in the marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Timeline layout direction.
pub enum TimelineOrientation {
    /// Events left to right.
    Horizontal,
    /// Events top to bottom.
    #[default]
    Vertical,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
/// Content of a `comparison_table` block.
pub struct ComparisonTableContent {
    /// Column headers (excluding the label column).
    pub headers: Vec<String>,
    /// Labelled rows.
    pub rows: Vec<ComparisonRow>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// One comparison table row.
pub struct ComparisonRow {
    /// Row label.
    pub label: String,
    /// Cell values, one per header.
    pub values: Vec<String>,
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
