use indexmap::IndexSet;
use serde_json::json;

use super::*;
use crate::catalog::registry::{Catalog, CatalogRegistry};

fn block(value: serde_json::Value) -> SceneBlock {
    serde_json::from_value(value).unwrap()
}

fn render(block: &SceneBlock, catalog: &Catalog) -> (BlockView, Vec<String>) {
    let mut missing = IndexSet::new();
    let view = {
        let mut resolver = ComponentResolver::new(catalog, &mut missing);
        render_block(block, &mut resolver, &RenderOptions::default())
    };
    (view, missing.into_iter().collect())
}

#[test]
fn background_table_is_fixed() {
    assert_eq!(background_fill(Some("grass")), "#86efac");
    assert_eq!(background_fill(Some("asphalt")), "#71717a");
    assert_eq!(background_fill(Some("sand")), "#71717a");
    assert_eq!(background_fill(None), "#71717a");
}

#[test]
fn road_scene_paints_background_then_objects_by_z_index() {
    let catalog = CatalogRegistry::with_builtin().unwrap().snapshot();
    let b = block(json!({
        "id": "r", "type": "road_scene",
        "content": {"background": "grass", "objects": [
            {"id": "five", "component_id": "sign_stop", "transform": {"x": 1, "y": 1, "z_index": 5}},
            {"id": "one", "component_id": "vehicle_sedan", "transform": {"x": 2, "y": 2, "z_index": 1}},
            {"id": "three", "component_id": "sign_yield", "transform": {"x": 3, "y": 3, "z_index": 3}},
            {"id": "one_b", "component_id": "vehicle_motorcycle", "transform": {"x": 4, "y": 4, "z_index": 1}}
        ]}
    }));
    let (view, missing) = render(&b, &catalog);
    assert!(missing.is_empty());
    assert_eq!(view.view_box, Rect::new(0.0, 0.0, 100.0, 100.0));
    assert!(view.markup.starts_with(r##"<rect x="0" y="0" width="100" height="100" fill="#86efac"/>"##));
    let order: Vec<&str> = view.objects.iter().map(|o| o.object_id.as_str()).collect();
    assert_eq!(order, ["one", "one_b", "three", "five"]);

    let positions: Vec<usize> = order
        .iter()
        .map(|id| view.markup.find(&format!(r#"data-object-id="{id}""#)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn definition_card_wraps_text_and_draws_image_component() {
    let catalog = CatalogRegistry::with_builtin().unwrap().snapshot();
    let b = block(json!({
        "id": "d", "type": "definition_card",
        "content": {"title": "Stop", "text": "Always come to a complete halt at the line", "image_component_id": "sign_stop"}
    }));
    let (view, missing) = render(&b, &catalog);
    assert!(missing.is_empty());
    assert!(view.markup.contains(">Stop</text>"));
    assert!(view.markup.contains(r#"<g transform="translate(165, 60) scale(3)">"#));
    assert!(view.markup.contains("STOP"));

    let (view, missing) = render(&b, &Catalog::default());
    assert_eq!(missing, ["sign_stop"]);
    assert!(view.markup.contains("<title>Missing: sign_stop</title>"));
}

#[test]
fn word_wrap_respects_columns_and_newlines() {
    assert_eq!(
        wrap_text("one two three four\nfive", 9),
        ["one two", "three", "four", "five"]
    );
    assert_eq!(wrap_text("unbreakableword", 4), ["unbreakableword"]);
}

#[test]
fn timeline_orientations_change_the_view_box() {
    let events = json!([
        {"id": "a", "title": "Brake", "time": "t0"},
        {"id": "b", "title": "Stop", "description": "car halts", "icon": "!"}
    ]);
    let (vertical, _) = render(
        &block(json!({"id": "t", "type": "timeline", "content": {"events": events}})),
        &Catalog::default(),
    );
    assert_eq!(vertical.view_box, Rect::new(0.0, 0.0, 200.0, 108.0));
    assert!(vertical.markup.contains(">1</text>"));
    assert!(vertical.markup.contains(">!</text>"));
    assert!(vertical.markup.contains(">car halts</text>"));

    let (horizontal, _) = render(
        &block(json!({"id": "t", "type": "timeline", "content": {"events": events, "orientation": "horizontal"}})),
        &Catalog::default(),
    );
    assert_eq!(horizontal.view_box, Rect::new(0.0, 0.0, 200.0, 110.0));
    assert!(horizontal.markup.contains(r#"text-anchor="middle""#));
}

#[test]
fn comparison_table_has_label_column_and_ragged_rows() {
    let (view, _) = render(
        &block(json!({"id": "c", "type": "comparison_table", "content": {
            "headers": ["Car", "Bike"],
            "rows": [{"label": "Wheels", "values": ["4", "2"]}, {"label": "Helmet", "values": ["no"]}]
        }})),
        &Catalog::default(),
    );
    assert_eq!(view.view_box, Rect::new(0.0, 0.0, 190.0, 60.0));
    assert!(view.markup.contains(">Feature</text>"));
    assert!(view.markup.contains(">Bike</text>"));
    assert!(view.markup.contains(">Helmet</text>"));
    assert_eq!(view.markup.matches("<rect").count(), 9);
}

#[test]
fn placeholder_panels_for_unimplemented_and_unknown_blocks() {
    let (cause, _) = render(
        &block(json!({"id": "x", "type": "cause_effect", "content": {}})),
        &Catalog::default(),
    );
    assert!(cause.markup.contains("not yet implemented"));

    let (unknown, _) = render(
        &block(json!({"id": "y", "type": "hologram", "content": {"a": 1}})),
        &Catalog::default(),
    );
    assert!(unknown.markup.contains(">Unknown block: hologram</text>"));

    let (invalid, _) = render(
        &block(json!({"id": "g", "type": "gauge", "content": {"value": 50}})),
        &Catalog::default(),
    );
    assert!(invalid.markup.contains(">Invalid block: gauge</text>"));
    assert_eq!(invalid.view_box, Rect::new(0.0, 0.0, 200.0, 60.0));
}

#[test]
fn titles_extend_the_view_box_upwards() {
    let (view, _) = render(
        &block(json!({"id": "g", "type": "gauge", "title": "Speed & limit", "content": {"value": 1, "max": 2}})),
        &Catalog::default(),
    );
    assert_eq!(view.view_box, Rect::new(0.0, -20.0, 200.0, 200.0));
    assert!(view.markup.starts_with(r#"<rect x="0" y="-20" width="200" height="20""#));
    assert!(view.markup.contains(">Speed &amp; limit</text>"));
}
