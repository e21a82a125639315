//! Semantic checks on component descriptors beyond their JSON shape.

use std::fmt;

use crate::catalog::model::{ComponentDescriptor, ComponentKind};
use crate::template::interpolate::{placeholder_keys, render_template};

/// A finding reported by [`lint_component`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LintIssue {
    /// The SVG template references a prop with no default value.
    UnboundPlaceholder {
        /// Placeholder key.
        key: String,
    },
    /// The SVG template expanded with the default props is not well-formed SVG.
    InvalidSvg {
        /// Parser message.
        message: String,
    },
    /// A composite descriptor with no children.
    CompositeWithoutChildren,
    /// A non-composite descriptor declaring children.
    UnexpectedChildren,
}

impl LintIssue {
    /// Whether the issue makes the descriptor unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidSvg { .. })
    }
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundPlaceholder { key } => {
                write!(f, "placeholder {{{key}}} has no default value")
            }
            Self::InvalidSvg { message } => write!(f, "svg template does not parse: {message}"),
            Self::CompositeWithoutChildren => f.write_str("composite component has no children"),
            Self::UnexpectedChildren => {
                f.write_str("only composite components may declare children")
            }
        }
    }
}

/// Lint a descriptor. An empty result means no findings.
pub fn lint_component(descriptor: &ComponentDescriptor) -> Vec<LintIssue> {
    let mut issues = Vec::new();

    if let Some(svg) = descriptor.svg_template() {
        for key in placeholder_keys(svg) {
            if !descriptor.default_props.contains_key(&key) {
                issues.push(LintIssue::UnboundPlaceholder { key });
            }
        }
        let fragment = render_template(svg, &descriptor.default_props);
        if let Err(message) = parse_fragment(&fragment) {
            issues.push(LintIssue::InvalidSvg { message });
        }
    }

    let has_children = !descriptor.children().is_empty();
    match descriptor.kind {
        ComponentKind::Composite if !has_children => {
            issues.push(LintIssue::CompositeWithoutChildren)
        }
        ComponentKind::Primitive | ComponentKind::Logic if has_children => {
            issues.push(LintIssue::UnexpectedChildren)
        }
        _ => {}
    }

    issues
}

fn parse_fragment(fragment: &str) -> Result<(), String> {
    let doc = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="-50 -50 100 100">{fragment}</svg>"#
    );
    usvg::Tree::from_str(&doc, &usvg::Options::default())
        .map(|_| ())
        .map_err(|e| e.to_string())
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/lint.rs"]
mod tests;
