//! Component instance rendering: prop merging, composite expansion and the missing-component
//! placeholder.

use indexmap::IndexSet;

use crate::catalog::model::{ComponentKind, CompositeChild};
use crate::catalog::registry::ComponentLookup;
use crate::foundation::format::{escape_xml_into, js_number, push_attr};
use crate::scene::model::{ObjectTransform, SceneObject};
use crate::template::props::{PropMap, merge_props};
use crate::template::render_descriptor;

/// Outcome of rendering one scene object.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedObject {
    /// Scene object id.
    pub object_id: String,
    /// Referenced component id.
    pub component_id: String,
    /// Effective paint order.
    pub z_index: i32,
    /// `false` when the placeholder glyph was drawn instead of the component.
    pub resolved: bool,
    /// The object's `<g>` element.
    pub markup: String,
}

/// `transform` attribute value of a placed object.
pub fn object_transform(t: &ObjectTransform) -> String {
    format!(
        "translate({}, {}) rotate({}) scale({})",
        js_number(t.x),
        js_number(t.y),
        js_number(t.rotation.unwrap_or(0.0)),
        js_number(t.scale.unwrap_or(1.0)),
    )
}

/// Append the fixed placeholder glyph drawn for an unresolved component.
pub fn push_placeholder(out: &mut String, title: &str) {
    out.push_str(concat!(
        r##"<rect x="-5" y="-5" width="10" height="10" fill="#fee2e2" stroke="#dc2626" "##,
        r##"stroke-width="0.5" stroke-dasharray="1,1" rx="1"/>"##,
        r##"<text x="0" y="0" text-anchor="middle" dominant-baseline="middle" font-size="2" "##,
        r##"fill="#dc2626" font-weight="bold">?</text>"##,
    ));
    out.push_str("<title>");
    escape_xml_into(out, title);
    out.push_str("</title>");
}

/// Resolves component ids against a catalog and records the ones that are missing.
pub(crate) struct ComponentResolver<'a> {
    catalog: &'a dyn ComponentLookup,
    missing: &'a mut IndexSet<String>,
}

impl<'a> ComponentResolver<'a> {
    pub(crate) fn new(catalog: &'a dyn ComponentLookup, missing: &'a mut IndexSet<String>) -> Self {
        Self { catalog, missing }
    }

    /// Render a scene object wrapped in its placement transform.
    pub(crate) fn render_object(&mut self, object: &SceneObject) -> RenderedObject {
        let mut markup = String::new();
        markup.push_str("<g");
        push_attr(&mut markup, "transform", &object_transform(&object.transform));
        push_attr(&mut markup, "data-object-id", &object.id);
        let resolved = self.catalog.contains(&object.component_id);
        if !resolved {
            push_attr(&mut markup, "data-missing-component", &object.component_id);
        }
        markup.push('>');
        self.push_component(
            &mut markup,
            &object.component_id,
            object.props.as_ref(),
            &mut Vec::new(),
        );
        markup.push_str("</g>");

        RenderedObject {
            object_id: object.id.clone(),
            component_id: object.component_id.clone(),
            z_index: object.transform.z(),
            resolved,
            markup,
        }
    }

    /// Append the visual of component `id` with `overrides` merged over its defaults.
    ///
    /// Composite descriptors expand their children below their own template. `visited` holds the
    /// chain of ids currently being expanded; re-entering one of them draws the placeholder.
    pub(crate) fn push_component(
        &mut self,
        out: &mut String,
        id: &str,
        overrides: Option<&PropMap>,
        visited: &mut Vec<String>,
    ) {
        let catalog = self.catalog;
        let Some(descriptor) = catalog.lookup(id) else {
            if self.missing.insert(id.to_string()) {
                tracing::debug!(component_id = id, "component missing from catalog");
            }
            push_placeholder(out, &format!("Missing: {id}"));
            return;
        };
        if visited.iter().any(|v| v == id) {
            tracing::warn!(component_id = id, chain = ?visited, "composite cycle");
            push_placeholder(out, &format!("Cycle: {id}"));
            return;
        }

        let props = merge_props(&descriptor.default_props, overrides);
        out.push_str(&render_descriptor(descriptor, &props));

        if descriptor.kind != ComponentKind::Composite {
            return;
        }
        visited.push(id.to_string());
        for child in descriptor.children() {
            self.push_child(out, child, &props, visited);
        }
        visited.pop();
    }

    fn push_child(
        &mut self,
        out: &mut String,
        child: &CompositeChild,
        parent_props: &PropMap,
        visited: &mut Vec<String>,
    ) {
        let mapped: PropMap = child
            .props_mapping
            .iter()
            .flatten()
            .filter_map(|(child_prop, parent_prop)| {
                let value = parent_props.get(parent_prop)?;
                Some((child_prop.clone(), value.clone()))
            })
            .collect();
        let offset = child.offset.unwrap_or_default();

        out.push_str("<g");
        push_attr(
            out,
            "transform",
            &format!(
                "translate({}, {}) rotate({})",
                js_number(offset.x.unwrap_or(0.0)),
                js_number(offset.y.unwrap_or(0.0)),
                js_number(offset.rotation.unwrap_or(0.0)),
            ),
        );
        out.push('>');
        self.push_component(out, &child.component_id, Some(&mapped), visited);
        out.push_str("</g>");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/object.rs"]
mod tests;
