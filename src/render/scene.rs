use std::fmt::Write as _;

use indexmap::IndexSet;
use kurbo::{Rect, Size};

use crate::catalog::registry::ComponentLookup;
use crate::foundation::format::{escape_xml_into, js_number, push_attr, push_num_attr};
use crate::render::blocks::render_block;
use crate::render::layout::block_rect;
use crate::render::object::{ComponentResolver, RenderedObject};
use crate::scene::model::SceneJson;

/// Height of the question banner drawn above the blocks.
pub const QUESTION_BANNER_HEIGHT: f64 = 48.0;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Options controlling scene composition and document output.
pub struct RenderOptions {
    /// Document width in user units.
    pub width: f64,
    /// Document height in user units.
    pub height: f64,
    /// Draw block titles in a strip above the block content.
    pub block_titles: bool,
    /// Reserve a banner for the question text and draw it in the document.
    pub question_banner: bool,
    /// Header of the label column of comparison tables.
    pub label_column_header: String,
    /// Document background fill.
    pub background: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            block_titles: true,
            question_banner: true,
            label_column_header: "Feature".to_string(),
            background: "#f9fafb".to_string(),
        }
    }
}

/// One composed block.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedBlock {
    /// Block id.
    pub id: String,
    /// Block `type` tag.
    pub kind: String,
    /// Placement in document coordinates.
    pub rect: Rect,
    /// Coordinate system of [`markup`](Self::markup).
    pub view_box: Rect,
    /// Block content in view box coordinates.
    pub markup: String,
    /// Road scene objects in paint order (empty for other block types).
    pub objects: Vec<RenderedObject>,
}

/// Result of [`render_scene`].
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedScene {
    /// Document size the blocks were placed in.
    pub size: Size,
    /// Question text, used as the document title.
    pub question_text: Option<String>,
    /// Blocks in document order.
    pub blocks: Vec<RenderedBlock>,
    /// Component ids that could not be resolved, first-encountered order, deduplicated.
    pub missing_components: Vec<String>,
}

/// Compose `scene` against `catalog`.
///
/// Never fails: unresolved components become placeholder glyphs (and are listed in
/// [`RenderedScene::missing_components`]) and unrecognised blocks render a fixed panel.
#[tracing::instrument(skip(scene, catalog, options), fields(scene = %scene.id))]
pub fn render_scene(
    scene: &SceneJson,
    catalog: &dyn ComponentLookup,
    options: &RenderOptions,
) -> RenderedScene {
    let size = Size::new(options.width.max(1.0), options.height.max(1.0));
    let question_text = scene.question_text().map(str::to_string);
    let banner = if options.question_banner && question_text.is_some() {
        QUESTION_BANNER_HEIGHT.min(size.height)
    } else {
        0.0
    };
    let container = Rect::new(0.0, banner, size.width, size.height);

    let mut missing = IndexSet::new();
    let mut resolver = ComponentResolver::new(catalog, &mut missing);
    let blocks = scene
        .blocks
        .iter()
        .map(|block| {
            let view = render_block(block, &mut resolver, options);
            RenderedBlock {
                id: block.id.clone(),
                kind: block.type_tag().to_string(),
                rect: block_rect(block.layout.as_ref(), container),
                view_box: view.view_box,
                markup: view.markup,
                objects: view.objects,
            }
        })
        .collect::<Vec<_>>();

    if !missing.is_empty() {
        tracing::debug!(missing = missing.len(), "scene rendered with placeholders");
    }
    RenderedScene {
        size,
        question_text,
        blocks,
        missing_components: missing.into_iter().collect(),
    }
}

impl RenderedScene {
    /// Look up a block by id.
    pub fn block(&self, id: &str) -> Option<&RenderedBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Number of placeholder glyphs drawn for scene objects.
    pub fn placeholder_count(&self) -> usize {
        self.blocks
            .iter()
            .flat_map(|b| &b.objects)
            .filter(|o| !o.resolved)
            .count()
    }

    /// Standalone SVG document with one nested viewport per block.
    pub fn to_svg_document(&self, options: &RenderOptions) -> String {
        let (w, h) = (self.size.width, self.size.height);
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = js_number(w),
            h = js_number(h),
        );
        if let Some(question) = &self.question_text {
            out.push_str("<title>");
            escape_xml_into(&mut out, question);
            out.push_str("</title>");
        }
        out.push_str("<rect");
        push_num_attr(&mut out, "width", w);
        push_num_attr(&mut out, "height", h);
        push_attr(&mut out, "fill", &options.background);
        out.push_str("/>");

        if options.question_banner
            && let Some(question) = &self.question_text
        {
            out.push_str("<rect");
            push_num_attr(&mut out, "width", w);
            push_num_attr(&mut out, "height", QUESTION_BANNER_HEIGHT.min(h));
            out.push_str(r##" fill="#2563eb"/>"##);
            out.push_str(r##"<text x="12" y="29" font-size="14" font-weight="500" fill="#ffffff">"##);
            escape_xml_into(&mut out, question);
            out.push_str("</text>");
        }

        for block in &self.blocks {
            out.push_str("<svg");
            push_attr(&mut out, "id", &format!("block-{}", block.id));
            push_attr(&mut out, "data-block-type", &block.kind);
            push_num_attr(&mut out, "x", block.rect.x0);
            push_num_attr(&mut out, "y", block.rect.y0);
            push_num_attr(&mut out, "width", block.rect.width());
            push_num_attr(&mut out, "height", block.rect.height());
            let vb = block.view_box;
            push_attr(
                &mut out,
                "viewBox",
                &format!(
                    "{} {} {} {}",
                    js_number(vb.x0),
                    js_number(vb.y0),
                    js_number(vb.width()),
                    js_number(vb.height())
                ),
            );
            out.push_str(r#" preserveAspectRatio="xMidYMid meet">"#);
            out.push_str(&block.markup);
            out.push_str("</svg>");
        }
        out.push_str("</svg>\n");
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/scene.rs"]
mod tests;
