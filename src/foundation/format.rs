use std::fmt::Write as _;

/// Format a number the way JavaScript's `String(n)` does (`20` not `20.0`, `0.5`, `1e+21`).
///
/// Non-finite values format as `0` so generated markup never contains `NaN`/`inf`.
pub fn js_number(v: f64) -> String {
    let mut buf = ryu_js::Buffer::new();
    js_number_with(v, &mut buf).to_string()
}

pub(crate) fn js_number_with(mut v: f64, buf: &mut ryu_js::Buffer) -> &str {
    if !v.is_finite() {
        return "0";
    }
    if v == -0.0 {
        v = 0.0;
    }
    buf.format_finite(v)
}

/// Append `v` in JavaScript number formatting.
pub(crate) fn push_number(out: &mut String, v: f64) {
    let mut buf = ryu_js::Buffer::new();
    out.push_str(js_number_with(v, &mut buf));
}

/// Escape text for use in XML character data or a double-quoted attribute.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_xml_into(&mut out, text);
    out
}

pub(crate) fn escape_xml_into(out: &mut String, text: &str) {
    let bytes = text.as_bytes();
    let mut start = 0usize;
    for (i, &b) in bytes.iter().enumerate() {
        let esc = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#39;",
            _ => continue,
        };
        if start < i {
            out.push_str(&text[start..i]);
        }
        out.push_str(esc);
        start = i + 1;
    }
    if start < text.len() {
        out.push_str(&text[start..]);
    }
}

/// Append ` name="value"` with the value escaped.
pub(crate) fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    escape_xml_into(out, value);
    out.push('"');
}

/// Append ` name="n"` for a numeric attribute.
pub(crate) fn push_num_attr(out: &mut String, name: &str, value: f64) {
    let _ = write!(out, " {name}=\"");
    push_number(out, value);
    out.push('"');
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/format.rs"]
mod tests;
