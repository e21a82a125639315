use serde_json::json;

use super::*;
use crate::catalog::registry::{Catalog, CatalogRegistry};

fn scene(value: serde_json::Value) -> SceneJson {
    serde_json::from_value(value).unwrap()
}

#[test]
fn blocks_are_placed_below_the_question_banner() {
    let s = scene(json!({
        "id": "s", "version": 1,
        "metadata": {"question_text": "Who passes first?"},
        "blocks": [
            {"id": "left", "type": "road_scene", "layout": {"x": 0, "y": 0, "w": 50, "h": 100}, "content": {"objects": []}},
            {"id": "full", "type": "icon_grid", "content": {}}
        ]
    }));
    let rendered = render_scene(&s, &Catalog::default(), &RenderOptions::default());
    assert_eq!(rendered.question_text.as_deref(), Some("Who passes first?"));
    assert_eq!(rendered.block("left").unwrap().rect, Rect::new(0.0, 48.0, 400.0, 600.0));
    assert_eq!(rendered.block("full").unwrap().rect, Rect::new(0.0, 48.0, 800.0, 600.0));
    assert_eq!(rendered.block("full").unwrap().kind, "icon_grid");

    let no_banner = RenderOptions {
        question_banner: false,
        ..RenderOptions::default()
    };
    let rendered = render_scene(&s, &Catalog::default(), &no_banner);
    assert_eq!(rendered.block("full").unwrap().rect, Rect::new(0.0, 0.0, 800.0, 600.0));
}

#[test]
fn missing_components_are_deduplicated_in_encounter_order() {
    let s = scene(json!({
        "id": "s", "version": 1,
        "blocks": [
            {"id": "a", "type": "road_scene", "content": {"objects": [
                {"id": "1", "component_id": "vehicle_truck", "transform": {"x": 1, "y": 1, "z_index": 9}},
                {"id": "2", "component_id": "sign_danger", "transform": {"x": 1, "y": 1}},
                {"id": "3", "component_id": "vehicle_sedan", "transform": {"x": 1, "y": 1}}
            ]}},
            {"id": "b", "type": "definition_card", "content": {"text": "t", "image_component_id": "vehicle_truck"}}
        ]
    }));
    let catalog = CatalogRegistry::with_builtin().unwrap();
    let rendered = render_scene(&s, &catalog, &RenderOptions::default());
    assert_eq!(rendered.missing_components, ["sign_danger", "vehicle_truck"]);
    assert_eq!(rendered.placeholder_count(), 2);
}

#[test]
fn document_nests_one_viewport_per_block() {
    let s = scene(json!({
        "id": "s", "version": 1,
        "metadata": {"question_text": "A < B?"},
        "blocks": [
            {"id": "g", "type": "gauge", "layout": {"x": 50, "y": 50, "w": 50, "h": 50}, "content": {"value": 1, "max": 2}},
            {"id": "u", "type": "mystery", "content": {}}
        ]
    }));
    let options = RenderOptions::default();
    let doc = render_scene(&s, &Catalog::default(), &options).to_svg_document(&options);
    assert!(doc.starts_with(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="800" height="600" viewBox="0 0 800 600"><title>A &lt; B?</title>"#
    ));
    assert!(doc.contains(
        r#"<svg id="block-g" data-block-type="gauge" x="400" y="324" width="400" height="276" viewBox="0 0 200 200" preserveAspectRatio="xMidYMid meet">"#
    ));
    assert!(doc.contains(r#"id="block-u" data-block-type="mystery""#));
    assert_eq!(doc.matches("<svg").count(), 3);
    assert!(doc.ends_with("</svg></svg>\n"));
}

#[test]
fn parsed_document_is_well_formed() {
    let s = scene(json!({
        "id": "s", "version": 1,
        "blocks": [
            {"id": "r", "type": "road_scene", "title": "Junction", "content": {"objects": [
                {"id": "car", "component_id": "vehicle_sedan", "transform": {"x": 30, "y": 50}, "props": {"headlights": true}},
                {"id": "ghost", "component_id": "ghost_car", "transform": {"x": 60, "y": 50}}
            ]}},
            {"id": "t", "type": "comparison_table", "content": {"headers": ["A"], "rows": [{"label": "x", "values": ["<1>"]}]}}
        ]
    }));
    let catalog = CatalogRegistry::with_builtin().unwrap();
    let options = RenderOptions::default();
    let doc = render_scene(&s, &catalog, &options).to_svg_document(&options);
    assert!(usvg::Tree::from_str(&doc, &usvg::Options::default()).is_ok());
}
