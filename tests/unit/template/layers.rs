use super::*;

fn layers(json: &str) -> Vec<RenderLayer> {
    serde_json::from_str(json).unwrap()
}

fn props(json: &str) -> PropMap {
    serde_json::from_str(json).unwrap()
}

#[test]
fn per_type_defaults_fill_missing_geometry() {
    let out = render_layers(
        &layers(r#"[{"type":"rect","props":{"x":1}},{"type":"circle","props":{}},{"type":"path","props":{"d":"M 0 0 L 1 1"}}]"#),
        &PropMap::new(),
    );
    assert_eq!(
        out,
        concat!(
            r#"<rect x="1" width="10" height="10" fill="gray"/>"#,
            r#"<circle r="5" fill="gray"/>"#,
            r#"<path d="M 0 0 L 1 1" fill="none" stroke="black"/>"#,
        )
    );
}

#[test]
fn component_props_fill_attributes_the_layer_leaves_out() {
    let out = render_layers(
        &layers(r#"[{"type":"rect","props":{"height":4}},{"type":"text","props":{"text":"hi"}}]"#),
        &props(r#"{"width":30,"fill":"red","height":99,"fontSize":6}"#),
    );
    assert_eq!(
        out,
        concat!(
            r#"<rect height="4" width="30" fill="red"/>"#,
            r#"<text font-size="6" fill="red">hi</text>"#,
        )
    );
}

#[test]
fn string_props_are_interpolated_against_merged_props() {
    let out = render_layers(
        &layers(r#"[{"type":"rect","props":{"fill":"{color}","strokeWidth":0.5}}]"#),
        &props(r##"{"color":"#ef4444"}"##),
    );
    assert_eq!(
        out,
        r##"<rect fill="#ef4444" stroke-width="0.5" width="10" height="10"/>"##
    );
}

#[test]
fn conditions_gate_layers_and_support_negation() {
    let spec = layers(
        r#"[{"type":"circle","props":{"r":1},"condition":"lights"},
            {"type":"circle","props":{"r":2},"condition":"!lights"}]"#,
    );
    let on = render_layers(&spec, &props(r#"{"lights":true}"#));
    assert!(on.contains(r#"r="1""#));
    assert!(!on.contains(r#"r="2""#));

    let off = render_layers(&spec, &props(r#"{"lights":0}"#));
    assert!(!off.contains(r#"r="1""#));
    assert!(off.contains(r#"r="2""#));

    let absent = render_layers(&spec, &PropMap::new());
    assert!(absent.contains(r#"r="2""#));
}

#[test]
fn text_layers_carry_escaped_content() {
    let out = render_layers(
        &layers(r#"[{"type":"text","props":{"text":"{label} & co","y":3}}]"#),
        &props(r#"{"label":"<STOP>"}"#),
    );
    assert_eq!(
        out,
        r#"<text y="3" font-size="2" fill="black">&lt;STOP&gt; &amp; co</text>"#
    );
}

#[test]
fn unknown_layer_types_render_nothing() {
    let out = render_layers(
        &layers(r#"[{"type":"hexagon","props":{"size":4}},{"type":"image","props":{"href":"a.png"}}]"#),
        &PropMap::new(),
    );
    assert_eq!(out, r#"<image href="a.png" width="10" height="10"/>"#);
}
