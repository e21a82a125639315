//! Per-type block renderers. Each renderer draws in its own local view box.

use std::fmt::Write as _;

use kurbo::Rect;

use crate::foundation::format::{escape_xml_into, js_number, push_attr, push_num_attr};
use crate::render::gauge::{GAUGE_VIEW_BOX, render_gauge};
use crate::render::layout::paint_order;
use crate::render::object::{ComponentResolver, RenderedObject};
use crate::render::scene::RenderOptions;
use crate::scene::model::{
    BlockContent, ComparisonTableContent, DefinitionCardContent, RoadSceneContent, SceneBlock,
    TimelineContent, TimelineOrientation,
};

/// Fill used for a road scene `background` keyword.
pub fn background_fill(background: Option<&str>) -> &'static str {
    match background {
        Some("grass") => "#86efac",
        _ => "#71717a",
    }
}

pub(crate) struct BlockView {
    pub(crate) view_box: Rect,
    pub(crate) markup: String,
    pub(crate) objects: Vec<RenderedObject>,
}

impl BlockView {
    fn panel(view_box: Rect, markup: String) -> Self {
        Self {
            view_box,
            markup,
            objects: Vec::new(),
        }
    }
}

pub(crate) fn render_block(
    block: &SceneBlock,
    resolver: &mut ComponentResolver<'_>,
    options: &RenderOptions,
) -> BlockView {
    let mut view = match &block.content {
        BlockContent::RoadScene(content) => road_scene(content, resolver),
        BlockContent::DefinitionCard(content) => definition_card(content, resolver),
        BlockContent::Gauge(content) => BlockView::panel(GAUGE_VIEW_BOX, render_gauge(content)),
        BlockContent::Timeline(content) => timeline(content),
        BlockContent::ComparisonTable(content) => comparison_table(content, options),
        BlockContent::CauseEffect(_) => {
            not_implemented("Cause-effect diagram (not yet implemented)")
        }
        BlockContent::IconGrid(_) => not_implemented("Icon grid (not yet implemented)"),
        BlockContent::Invalid { kind, error, .. } => {
            tracing::debug!(block = %block.id, kind = kind.as_str(), %error, "undecodable block");
            error_panel(&format!("Invalid block: {}", kind.as_str()))
        }
        BlockContent::Unknown { kind, .. } => error_panel(&format!("Unknown block: {kind}")),
    };
    if options.block_titles
        && let Some(title) = block.title.as_deref().filter(|t| !t.is_empty())
    {
        add_title_strip(&mut view, title);
    }
    view
}

fn add_title_strip(view: &mut BlockView, title: &str) {
    let vb = view.view_box;
    let h = vb.width() / 10.0;
    let mut strip = String::new();
    strip.push_str("<rect");
    push_num_attr(&mut strip, "x", vb.x0);
    push_num_attr(&mut strip, "y", vb.y0 - h);
    push_num_attr(&mut strip, "width", vb.width());
    push_num_attr(&mut strip, "height", h);
    strip.push_str(r##" fill="#f3f4f6"/>"##);
    push_text(
        &mut strip,
        vb.x0 + h * 0.3,
        vb.y0 - h * 0.3,
        &format!(r##"font-size="{}" font-weight="600" fill="#111827""##, js_number(h * 0.5)),
        title,
    );
    strip.push_str(&view.markup);
    view.markup = strip;
    view.view_box = Rect::new(vb.x0, vb.y0 - h, vb.x1, vb.y1);
}

fn road_scene(content: &RoadSceneContent, resolver: &mut ComponentResolver<'_>) -> BlockView {
    let mut markup = String::new();
    let _ = write!(
        markup,
        r#"<rect x="0" y="0" width="100" height="100" fill="{}"/>"#,
        background_fill(content.background.as_deref())
    );
    let mut objects = Vec::with_capacity(content.objects.len());
    for object in paint_order(&content.objects, |o| o.transform.z()) {
        let rendered = resolver.render_object(object);
        markup.push_str(&rendered.markup);
        objects.push(rendered);
    }
    BlockView {
        view_box: Rect::new(0.0, 0.0, 100.0, 100.0),
        markup,
        objects,
    }
}

fn definition_card(
    content: &DefinitionCardContent,
    resolver: &mut ComponentResolver<'_>,
) -> BlockView {
    let mut markup = String::from(
        r##"<rect x="1" y="1" width="198" height="118" rx="8" fill="#ffffff" stroke="#e5e7eb" stroke-width="1"/>"##,
    );
    let mut y = 24.0;
    if let Some(title) = content.title.as_deref() {
        push_text(
            &mut markup,
            12.0,
            y,
            r##"font-size="14" font-weight="bold" fill="#111827""##,
            title,
        );
        y += 20.0;
    }
    let columns = if content.image_component_id.is_some() { 24 } else { 34 };
    for line in wrap_text(&content.text, columns) {
        push_text(&mut markup, 12.0, y, r##"font-size="10" fill="#374151""##, &line);
        y += 13.0;
    }
    if let Some(id) = content.image_component_id.as_deref() {
        markup.push_str(r#"<g transform="translate(165, 60) scale(3)">"#);
        resolver.push_component(&mut markup, id, None, &mut Vec::new());
        markup.push_str("</g>");
    }
    BlockView::panel(Rect::new(0.0, 0.0, 200.0, 120.0), markup)
}

fn timeline(content: &TimelineContent) -> BlockView {
    let n = content.events.len();
    let mut markup = String::new();
    match content.orientation.unwrap_or_default() {
        TimelineOrientation::Vertical => {
            let height = (20 + n * 44).max(60) as f64;
            let _ = write!(
                markup,
                r##"<line x1="20" y1="10" x2="20" y2="{}" stroke="#93c5fd" stroke-width="2"/>"##,
                js_number(height - 10.0)
            );
            for (i, event) in content.events.iter().enumerate() {
                let cy = 26.0 + 44.0 * i as f64;
                push_marker(&mut markup, 20.0, cy, i, event.icon.as_deref());
                let _ = write!(
                    markup,
                    r##"<rect x="38" y="{}" width="154" height="36" rx="4" fill="#ffffff" stroke="#e5e7eb"/>"##,
                    js_number(cy - 18.0)
                );
                if let Some(time) = event.time.as_deref() {
                    push_text(&mut markup, 44.0, cy - 8.0, r##"font-size="7" fill="#6b7280""##, time);
                }
                push_text(
                    &mut markup,
                    44.0,
                    cy + 2.0,
                    r##"font-size="9" font-weight="600" fill="#111827""##,
                    &event.title,
                );
                if let Some(description) = event.description.as_deref() {
                    push_text(
                        &mut markup,
                        44.0,
                        cy + 12.0,
                        r##"font-size="7" fill="#4b5563""##,
                        description,
                    );
                }
            }
            BlockView::panel(Rect::new(0.0, 0.0, 200.0, height), markup)
        }
        TimelineOrientation::Horizontal => {
            let width = (20 + n * 90).max(100) as f64;
            for (i, event) in content.events.iter().enumerate() {
                let cx = 65.0 + 90.0 * i as f64;
                push_marker(&mut markup, cx, 24.0, i, event.icon.as_deref());
                let _ = write!(
                    markup,
                    r##"<rect x="{}" y="40" width="80" height="3" fill="#93c5fd"/>"##,
                    js_number(cx - 40.0)
                );
                let centered = |style: &str| format!(r#"text-anchor="middle" {style}"#);
                if let Some(time) = event.time.as_deref() {
                    push_text(&mut markup, cx, 56.0, &centered(r##"font-size="7" fill="#6b7280""##), time);
                }
                push_text(
                    &mut markup,
                    cx,
                    70.0,
                    &centered(r##"font-size="9" font-weight="600" fill="#111827""##),
                    &event.title,
                );
                if let Some(description) = event.description.as_deref() {
                    push_text(
                        &mut markup,
                        cx,
                        84.0,
                        &centered(r##"font-size="7" fill="#4b5563""##),
                        description,
                    );
                }
            }
            BlockView::panel(Rect::new(0.0, 0.0, width, 110.0), markup)
        }
    }
}

fn push_marker(out: &mut String, cx: f64, cy: f64, index: usize, icon: Option<&str>) {
    out.push_str("<circle");
    push_num_attr(out, "cx", cx);
    push_num_attr(out, "cy", cy);
    out.push_str(r##" r="9" fill="#3b82f6"/>"##);
    let label = match icon {
        Some(icon) if !icon.is_empty() => icon.to_string(),
        _ => (index + 1).to_string(),
    };
    push_text(
        out,
        cx,
        cy + 3.0,
        r##"text-anchor="middle" font-size="8" font-weight="bold" fill="#ffffff""##,
        &label,
    );
}

const LABEL_COLUMN: f64 = 70.0;
const VALUE_COLUMN: f64 = 60.0;
const ROW_HEIGHT: f64 = 20.0;

fn comparison_table(content: &ComparisonTableContent, options: &RenderOptions) -> BlockView {
    let columns = content
        .rows
        .iter()
        .map(|r| r.values.len())
        .chain([content.headers.len()])
        .max()
        .unwrap_or(0);
    let width = LABEL_COLUMN + VALUE_COLUMN * columns as f64;
    let height = ROW_HEIGHT * (content.rows.len() + 1) as f64;
    let mut markup = String::new();

    let header_style = r##"font-size="9" font-weight="600" fill="#ffffff""##;
    push_cell(&mut markup, 0.0, 0.0, LABEL_COLUMN, "#3b82f6", "#2563eb");
    push_text(&mut markup, 6.0, 13.0, header_style, &options.label_column_header);
    for (i, header) in content.headers.iter().enumerate() {
        let x = LABEL_COLUMN + VALUE_COLUMN * i as f64;
        push_cell(&mut markup, x, 0.0, VALUE_COLUMN, "#3b82f6", "#2563eb");
        push_text(&mut markup, x + 6.0, 13.0, header_style, header);
    }

    for (r, row) in content.rows.iter().enumerate() {
        let y = ROW_HEIGHT * (r + 1) as f64;
        let fill = if r % 2 == 0 { "#f9fafb" } else { "#ffffff" };
        push_cell(&mut markup, 0.0, y, LABEL_COLUMN, fill, "#d1d5db");
        push_text(
            &mut markup,
            6.0,
            y + 13.0,
            r##"font-size="9" font-weight="500" fill="#374151""##,
            &row.label,
        );
        for c in 0..columns {
            let x = LABEL_COLUMN + VALUE_COLUMN * c as f64;
            push_cell(&mut markup, x, y, VALUE_COLUMN, fill, "#d1d5db");
            if let Some(value) = row.values.get(c) {
                push_text(&mut markup, x + 6.0, y + 13.0, r##"font-size="9" fill="#4b5563""##, value);
            }
        }
    }
    BlockView::panel(Rect::new(0.0, 0.0, width.max(1.0), height), markup)
}

fn push_cell(out: &mut String, x: f64, y: f64, w: f64, fill: &str, stroke: &str) {
    out.push_str("<rect");
    push_num_attr(out, "x", x);
    push_num_attr(out, "y", y);
    push_num_attr(out, "width", w);
    push_num_attr(out, "height", ROW_HEIGHT);
    push_attr(out, "fill", fill);
    push_attr(out, "stroke", stroke);
    out.push_str(r#" stroke-width="0.5"/>"#);
}

fn not_implemented(message: &str) -> BlockView {
    let mut markup = String::from(
        r##"<rect x="1" y="1" width="198" height="58" rx="6" fill="#ffffff" stroke="#e5e7eb"/>"##,
    );
    push_text(
        &mut markup,
        100.0,
        34.0,
        r##"text-anchor="middle" font-size="9" fill="#4b5563""##,
        message,
    );
    BlockView::panel(Rect::new(0.0, 0.0, 200.0, 60.0), markup)
}

fn error_panel(message: &str) -> BlockView {
    let mut markup = String::from(
        r##"<rect x="1" y="1" width="198" height="58" rx="4" fill="#fee2e2" stroke="#fca5a5"/>"##,
    );
    push_text(
        &mut markup,
        100.0,
        34.0,
        r##"text-anchor="middle" font-size="10" font-weight="500" fill="#b91c1c""##,
        message,
    );
    BlockView::panel(Rect::new(0.0, 0.0, 200.0, 60.0), markup)
}

fn push_text(out: &mut String, x: f64, y: f64, style: &str, text: &str) {
    out.push_str("<text");
    push_num_attr(out, "x", x);
    push_num_attr(out, "y", y);
    out.push(' ');
    out.push_str(style);
    out.push('>');
    escape_xml_into(out, text);
    out.push_str("</text>");
}

/// Greedy word wrap at `columns` characters; explicit newlines are kept.
pub(crate) fn wrap_text(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if line.is_empty() {
                word.chars().count()
            } else {
                line.chars().count() + 1 + word.chars().count()
            };
            if needed > columns && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

#[cfg(test)]
#[path = "../../tests/unit/render/blocks.rs"]
mod tests;
