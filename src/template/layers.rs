//! Structured `layers` rendering for descriptors without an SVG template.

use crate::catalog::model::{LayerKind, RenderLayer};
use crate::foundation::format::{escape_xml_into, push_attr};
use crate::template::interpolate::render_template;
use crate::template::props::{PropMap, PropValue};

/// Render `layers` against the merged component props.
///
/// Layers draw in array order. Each attribute is read from the layer's own props, then from the
/// merged component props of the same name, then from the per-type default. A layer whose `condition` is not satisfied, or whose type is not
/// recognised, produces no output.
pub fn render_layers(layers: &[RenderLayer], props: &PropMap) -> String {
    let mut out = String::new();
    for layer in layers {
        if !condition_holds(layer.condition.as_deref(), props) {
            continue;
        }
        render_layer(&mut out, layer, props);
    }
    out
}

/// `condition` names a prop that must be truthy; a leading `!` negates it. Absent props are
/// falsy.
pub(crate) fn condition_holds(condition: Option<&str>, props: &PropMap) -> bool {
    let Some(condition) = condition.map(str::trim).filter(|c| !c.is_empty()) else {
        return true;
    };
    let (negate, key) = match condition.strip_prefix('!') {
        Some(rest) => (true, rest.trim()),
        None => (false, condition),
    };
    let truthy = props.get(key).is_some_and(PropValue::is_truthy);
    truthy != negate
}

type Defaults = &'static [(&'static str, &'static str)];

const RECT_DEFAULTS: Defaults = &[("width", "10"), ("height", "10"), ("fill", "gray")];
const CIRCLE_DEFAULTS: Defaults = &[("r", "5"), ("fill", "gray")];
const PATH_DEFAULTS: Defaults = &[("fill", "none"), ("stroke", "black")];
const TEXT_DEFAULTS: Defaults = &[("font-size", "2"), ("fill", "black")];
const IMAGE_DEFAULTS: Defaults = &[("width", "10"), ("height", "10")];

fn render_layer(out: &mut String, layer: &RenderLayer, props: &PropMap) {
    let (tag, defaults) = match layer.kind {
        LayerKind::Rect => ("rect", RECT_DEFAULTS),
        LayerKind::Circle => ("circle", CIRCLE_DEFAULTS),
        LayerKind::Path => ("path", PATH_DEFAULTS),
        LayerKind::Text => ("text", TEXT_DEFAULTS),
        LayerKind::Image => ("image", IMAGE_DEFAULTS),
        LayerKind::Unknown => return,
    };

    let mut text_body = None;
    let mut written = Vec::with_capacity(layer.props.len());
    out.push('<');
    out.push_str(tag);
    for (key, value) in &layer.props {
        let value = match value {
            PropValue::Text(s) => render_template(s, props),
            other => other.to_string(),
        };
        if layer.kind == LayerKind::Text && matches!(key.as_str(), "text" | "content") {
            text_body = Some(value);
            continue;
        }
        let name = attr_name(key);
        push_attr(out, &name, &value);
        written.push(name);
    }
    for (name, default) in defaults {
        if written.iter().any(|w| w == name) {
            continue;
        }
        match component_prop(props, name) {
            Some(value) => push_attr(out, name, &value.to_string()),
            None => push_attr(out, name, default),
        }
    }
    match text_body {
        Some(body) => {
            out.push('>');
            escape_xml_into(out, &body);
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        None => out.push_str("/>"),
    }
}

/// Merged component prop for a defaulted attribute, by attribute name or its camelCase form.
fn component_prop<'a>(props: &'a PropMap, name: &str) -> Option<&'a PropValue> {
    props.get(name).or_else(|| {
        let (head, tail) = name.split_once('-')?;
        let mut camel = head.to_string();
        for word in tail.split('-') {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                camel.push(first.to_ascii_uppercase());
                camel.push_str(chars.as_str());
            }
        }
        props.get(camel.as_str())
    })
}

/// Layer props may use camelCase (`strokeWidth`); SVG attributes are kebab-case.
fn attr_name(key: &str) -> String {
    if key == "href" || key.starts_with("xlink:") || !key.chars().any(|c| c.is_ascii_uppercase())
    {
        return key.to_string();
    }
    let mut name = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            name.push('-');
            name.push(c.to_ascii_lowercase());
        } else {
            name.push(c);
        }
    }
    name
}

#[cfg(test)]
#[path = "../../tests/unit/template/layers.rs"]
mod tests;
