use super::*;
use crate::template::props::{PropMap, PropValue};

fn props(pairs: &[(&str, PropValue)]) -> PropMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn conditional_picks_branch_by_truthiness() {
    let t = r#"{x ? "A" : "B"}"#;
    assert_eq!(render_template(t, &props(&[("x", 0.into())])), "B");
    assert_eq!(render_template(t, &props(&[("x", 1.into())])), "A");
    assert_eq!(render_template(t, &props(&[("x", "".into())])), "B");
    assert_eq!(render_template(t, &props(&[("x", "on".into())])), "A");
    assert_eq!(render_template(t, &props(&[("x", false.into())])), "B");
}

#[test]
fn conditional_with_absent_key_is_left_alone() {
    let t = r#"{x ? "A" : "B"}"#;
    assert_eq!(render_template(t, &props(&[("y", 1.into())])), t);
    assert_eq!(render_template(t, &PropMap::new()), t);
}

#[test]
fn conditional_tolerates_whitespace_variants() {
    let p = props(&[("lights", true.into())]);
    assert_eq!(render_template(r#"{lights?"on":"off"}"#, &p), "on");
    assert_eq!(render_template("{lights  ?  \"on\"\n:\t\"off\"}", &p), "on");
}

#[test]
fn conditional_requires_non_empty_literals() {
    let p = props(&[("x", true.into())]);
    let t = r#"{x ? "" : "B"}"#;
    assert_eq!(render_template(t, &p), t);
}

#[test]
fn conditional_does_not_match_longer_key_names() {
    let p = props(&[("key", true.into())]);
    let t = r#"{keyboard ? "A" : "B"}"#;
    assert_eq!(render_template(t, &p), t);
}

#[test]
fn simple_placeholders_use_display_strings() {
    let p = props(&[
        ("color", "#3b82f6".into()),
        ("width", 20.into()),
        ("scale", 0.75.into()),
        ("lit", true.into()),
    ]);
    assert_eq!(
        render_template("<rect fill='{color}' width='{width}' s='{scale}' l='{lit}'/>", &p),
        "<rect fill='#3b82f6' width='20' s='0.75' l='true'/>"
    );
}

#[test]
fn unknown_simple_placeholder_is_left_alone() {
    let p = props(&[("color", "red".into())]);
    assert_eq!(render_template("{color}{size}", &p), "red{size}");
}

#[test]
fn sedan_template_renders_with_defaults_and_overrides() {
    let svg = r##"<g><rect fill='{color}'/><circle fill='{headlights ? "#fef08a" : "#666"}'/></g>"##;
    let defaults = props(&[("color", "#3b82f6".into()), ("headlights", false.into())]);
    assert_eq!(
        render_template(svg, &defaults),
        "<g><rect fill='#3b82f6'/><circle fill='#666'/></g>"
    );

    let overrides = props(&[("headlights", true.into()), ("color", "#ef4444".into())]);
    let merged = crate::template::props::merge_props(&defaults, Some(&overrides));
    assert_eq!(
        render_template(svg, &merged),
        "<g><rect fill='#ef4444'/><circle fill='#fef08a'/></g>"
    );
}

#[test]
fn conditional_pass_runs_before_simple_pass() {
    // `{a}` is only replaced after every conditional has been expanded.
    let p = props(&[("a", "".into())]);
    assert_eq!(render_template(r#"[{a}] {a ? "on" : "off"}"#, &p), "[] off");

    // A conditional branch may introduce a simple placeholder for another key.
    let p = props(&[("a", true.into()), ("b", "x".into())]);
    assert_eq!(render_template(r#"{a ? "{b}" : "none"}"#, &p), "x");
}

#[test]
fn simple_pass_follows_key_insertion_order() {
    // `a` expands to `{b}`, which `b` then rewrites because it comes later.
    let p = props(&[("a", "{b}".into()), ("b", "x".into())]);
    assert_eq!(render_template("{a}", &p), "x");

    // With `b` first, its rewrite has already happened when `{b}` appears.
    let p = props(&[("b", "x".into()), ("a", "{b}".into())]);
    assert_eq!(render_template("{a}", &p), "{b}");
}

#[test]
fn keys_are_matched_literally() {
    let p = props(&[("a.b", "dot".into()), ("(x)", 1.into())]);
    assert_eq!(
        render_template(r#"{a.b} {(x) ? "yes" : "no"}"#, &p),
        "dot yes"
    );
    assert_eq!(render_template("{aXb}", &p), "{aXb}");
}

#[test]
fn no_placeholder_survives_for_present_keys() {
    let svg = r##"<g fill="{color}" stroke-width="{width}" opacity='{ghost ? "0.5" : "1"}'>{label}{color}</g>"##;
    let p = props(&[
        ("color", "red".into()),
        ("width", 2.into()),
        ("ghost", false.into()),
        ("label", "car".into()),
    ]);
    let out = render_template(svg, &p);
    for key in p.keys() {
        assert!(!out.contains(&format!("{{{key}}}")), "{key} left in {out}");
    }
    assert_eq!(out, r#"<g fill="red" stroke-width="2" opacity='1'>carred</g>"#);
}

#[test]
fn placeholder_keys_lists_both_forms_once() {
    let keys = placeholder_keys(r##"<g fill="{color}" o='{ghost ? "a" : "b"}'>{color}{ not a key }{}</g>"##);
    assert_eq!(keys, ["color", "ghost"]);
}
