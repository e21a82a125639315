//! Placeholder expansion for component SVG templates.
//!
//! Two placeholder forms are recognised:
//!
//! - conditional: `{key ? "when truthy" : "when falsy"}`
//! - simple: `{key}`
//!
//! Expansion runs the conditional pass for every key (in property insertion order) before the
//! simple pass for every key. Each key rewrites the whole current string, so text produced by an
//! earlier rewrite is seen by later ones. Keys are matched literally.

use indexmap::IndexSet;

use crate::template::props::PropMap;

/// Expand conditional, then simple placeholders of `template` against `props`.
///
/// Placeholders naming keys absent from `props` are left untouched.
pub fn render_template(template: &str, props: &PropMap) -> String {
    let mut out = template.to_string();
    for (key, value) in props {
        out = expand_conditionals(&out, key, value.is_truthy());
    }
    for (key, value) in props {
        out = expand_simple(&out, key, &value.to_string());
    }
    out
}

fn expand_conditionals(input: &str, key: &str, truthy: bool) -> String {
    let opener = format!("{{{key}");
    if !input.contains(&opener) {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find(&opener) {
        out.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        match parse_conditional_tail(&candidate[opener.len()..]) {
            Some(tail) => {
                out.push_str(if truthy { tail.when_true } else { tail.when_false });
                rest = &candidate[opener.len() + tail.consumed..];
            }
            None => {
                out.push('{');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn expand_simple(input: &str, key: &str, value: &str) -> String {
    input.replace(&format!("{{{key}}}"), value)
}

struct ConditionalTail<'a> {
    when_true: &'a str,
    when_false: &'a str,
    consumed: usize,
}

/// Parse `\s*?\s*"A"\s*:\s*"B"}` at the start of `s`.
fn parse_conditional_tail(s: &str) -> Option<ConditionalTail<'_>> {
    let mut cur = Cursor { s, pos: 0 };
    cur.skip_ws();
    cur.expect('?')?;
    cur.skip_ws();
    let when_true = cur.quoted()?;
    cur.skip_ws();
    cur.expect(':')?;
    cur.skip_ws();
    let when_false = cur.quoted()?;
    cur.expect('}')?;
    Some(ConditionalTail {
        when_true,
        when_false,
        consumed: cur.pos,
    })
}

struct Cursor<'a> {
    s: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.s[self.pos..]
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
    }

    fn expect(&mut self, c: char) -> Option<()> {
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            Some(())
        } else {
            None
        }
    }

    /// A double-quoted literal with at least one character and no embedded quote.
    fn quoted(&mut self) -> Option<&'a str> {
        self.expect('"')?;
        let rest = self.rest();
        let end = rest.find('"')?;
        if end == 0 {
            return None;
        }
        let body = &rest[..end];
        self.pos += end + 1;
        Some(body)
    }
}

/// Keys referenced by placeholders in `template`, in first-appearance order.
///
/// A key is the text between `{` and the closing `}` (simple form) or the `?` (conditional
/// form), trimmed. Braces that do not look like placeholders are ignored.
pub fn placeholder_keys(template: &str) -> Vec<String> {
    let mut keys = IndexSet::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let end = after.find(['}', '?', '{']);
        match end {
            Some(end) if !after[end..].starts_with('{') => {
                let key = after[..end].trim();
                if !key.is_empty() && key.chars().all(is_key_char) {
                    keys.insert(key.to_string());
                }
                rest = &after[end..];
            }
            Some(end) => rest = &after[end..],
            None => break,
        }
    }
    keys.into_iter().collect()
}

fn is_key_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
}

#[cfg(test)]
#[path = "../../tests/unit/template/interpolate.rs"]
mod tests;
