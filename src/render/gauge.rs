//! Dial gauge geometry and markup.
//!
//! The dial spans 270 degrees, from -135 (minimum) to +135 (maximum), measured clockwise from
//! twelve o'clock, in a `0 0 200 200` view box centred on (100, 100).

use std::fmt::Write as _;

use kurbo::{Point, Rect};

use crate::foundation::format::{escape_xml_into, js_number, push_attr};
use crate::scene::model::GaugeContent;

/// Local view box of a gauge block.
pub const GAUGE_VIEW_BOX: Rect = Rect::new(0.0, 0.0, 200.0, 200.0);

const CENTER: Point = Point::new(100.0, 100.0);
const RADIUS: f64 = 70.0;
const NEEDLE_LENGTH: f64 = 60.0;

/// Dial angle in degrees for `value` within `[min, max]`, clamped to the dial.
///
/// A degenerate range maps every value to the minimum angle.
pub fn gauge_angle(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    let fraction = if span > 0.0 && span.is_finite() && value.is_finite() {
        ((value - min) / span).clamp(0.0, 1.0)
    } else {
        0.0
    };
    fraction * 270.0 - 135.0
}

/// Point at `angle` degrees (clockwise from twelve o'clock) on a circle.
pub fn polar_to_cartesian(center: Point, radius: f64, angle: f64) -> Point {
    let rad = (angle - 90.0).to_radians();
    Point::new(center.x + radius * rad.cos(), center.y + radius * rad.sin())
}

/// SVG path data of the arc from `start_angle` to `end_angle`.
pub fn describe_arc(center: Point, radius: f64, start_angle: f64, end_angle: f64) -> String {
    let start = polar_to_cartesian(center, radius, end_angle);
    let end = polar_to_cartesian(center, radius, start_angle);
    let large_arc = if end_angle - start_angle <= 180.0 { 0 } else { 1 };
    format!(
        "M {} {} A {r} {r} 0 {large_arc} 0 {} {}",
        js_number(start.x),
        js_number(start.y),
        js_number(end.x),
        js_number(end.y),
        r = js_number(radius),
    )
}

/// Gauge markup in [`GAUGE_VIEW_BOX`] coordinates.
pub fn render_gauge(content: &GaugeContent) -> String {
    let min = content.min.unwrap_or(0.0);
    let angle = gauge_angle(content.value, min, content.max);
    let mut out = String::new();

    out.push_str(concat!(
        r##"<path d="M 30 150 A 70 70 0 1 1 170 150" fill="none" stroke="#e5e7eb" "##,
        r##"stroke-width="20" stroke-linecap="round"/>"##,
    ));
    for zone in content.zones.iter().flatten() {
        let start = gauge_angle(zone.min, min, content.max);
        let end = gauge_angle(zone.max, min, content.max);
        push_arc(&mut out, &describe_arc(CENTER, RADIUS, start, end), &zone.color);
    }
    push_arc(&mut out, &describe_arc(CENTER, RADIUS, -135.0, angle), "#3b82f6");

    out.push_str(r##"<text x="100" y="110" text-anchor="middle" font-size="32" font-weight="bold" fill="#1f2937">"##);
    out.push_str(&js_number(content.value));
    out.push_str("</text>");
    out.push_str(r##"<text x="100" y="130" text-anchor="middle" font-size="14" fill="#6b7280">"##);
    escape_xml_into(&mut out, content.unit.as_deref().unwrap_or_default());
    out.push_str("</text>");

    let tip = polar_to_cartesian(CENTER, NEEDLE_LENGTH, angle);
    let _ = write!(
        out,
        r##"<line x1="100" y1="100" x2="{}" y2="{}" stroke="#dc2626" stroke-width="3" stroke-linecap="round"/>"##,
        js_number(tip.x),
        js_number(tip.y),
    );
    out.push_str(r##"<circle cx="100" cy="100" r="5" fill="#dc2626"/>"##);

    if let Some(label) = &content.label {
        out.push_str(r##"<text x="100" y="185" text-anchor="middle" font-size="14" font-weight="500" fill="#374151">"##);
        escape_xml_into(&mut out, label);
        out.push_str("</text>");
    }
    out
}

fn push_arc(out: &mut String, d: &str, color: &str) {
    out.push_str("<path");
    push_attr(out, "d", d);
    out.push_str(r#" fill="none""#);
    push_attr(out, "stroke", color);
    out.push_str(r#" stroke-width="20" stroke-linecap="round"/>"#);
}

#[cfg(test)]
#[path = "../../tests/unit/render/gauge.rs"]
mod tests;
