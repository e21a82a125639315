//! Template expansion for component descriptors.

pub mod interpolate;
pub mod layers;
pub mod props;

use crate::catalog::model::ComponentDescriptor;

/// Render a descriptor's own visual with already merged props.
///
/// The SVG template wins over structured layers; a descriptor with neither renders nothing.
/// Composite children are not expanded here.
pub fn render_descriptor(descriptor: &ComponentDescriptor, props: &props::PropMap) -> String {
    if let Some(svg) = descriptor.svg_template() {
        return interpolate::render_template(svg, props);
    }
    match descriptor.layers() {
        Some(layers) => layers::render_layers(layers, props),
        None => String::new(),
    }
}
