//! Structural validation of raw component and scene JSON.
//!
//! The checks mirror the fixed document shapes accepted by the typed model; nothing here looks at
//! the catalog. Every violation is collected (the walk never stops at the first error) together
//! with the JSON path it was found at.

use std::fmt;

use serde_json::{Map, Value};

use crate::catalog::model::{ComponentCategory, ComponentKind};
use crate::scene::model::BlockKind;
use crate::schema::report::{ValidationIssue, ValidationReport};

#[derive(Debug, Clone, PartialEq, Eq)]
/// One step of a JSON path.
pub enum SchemaPathElem {
    /// Object member.
    Field(String),
    /// Array element.
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A structural violation at a JSON location.
pub struct SchemaError {
    /// Location of the offending value.
    pub path: Vec<SchemaPathElem>,
    /// Violated constraint.
    pub message: String,
}

impl SchemaError {
    fn at(path: &[SchemaPathElem], message: impl Into<String>) -> Self {
        Self {
            path: path.to_vec(),
            message: message.into(),
        }
    }

    /// Location formatted as `$.blocks[0].content`.
    pub fn location(&self) -> String {
        format_path(&self.path)
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", format_path(&self.path), self.message)
    }
}

fn format_path(path: &[SchemaPathElem]) -> String {
    let mut s = String::from("$");
    for p in path {
        match p {
            SchemaPathElem::Field(name) => {
                s.push('.');
                s.push_str(name);
            }
            SchemaPathElem::Index(i) => {
                s.push('[');
                s.push_str(&i.to_string());
                s.push(']');
            }
        }
    }
    s
}

/// Validate a raw component descriptor.
pub fn validate_component(raw: &Value) -> ValidationReport {
    let mut w = Walker::default();
    component(&mut w, raw);
    w.finish()
}

/// Validate a raw scene document.
pub fn validate_scene(raw: &Value) -> ValidationReport {
    let mut w = Walker::default();
    scene(&mut w, raw);
    w.finish()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Presence {
    Required,
    Optional,
}

use Presence::{Optional, Required};

#[derive(Default)]
struct Walker {
    path: Vec<SchemaPathElem>,
    errors: Vec<SchemaError>,
}

impl Walker {
    fn finish(self) -> ValidationReport {
        ValidationReport::from_issues(self.errors.into_iter().map(ValidationIssue::Schema).collect())
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(SchemaError::at(&self.path, message));
    }

    fn prop(
        &mut self,
        obj: &Map<String, Value>,
        name: &str,
        presence: Presence,
        check: impl FnOnce(&mut Self, &Value),
    ) {
        match obj.get(name) {
            Some(v) => {
                self.path.push(SchemaPathElem::Field(name.to_string()));
                check(self, v);
                self.path.pop();
            }
            None if presence == Required => {
                self.error(format!("missing required property '{name}'"));
            }
            None => {}
        }
    }

    fn each(&mut self, v: &Value, mut check: impl FnMut(&mut Self, &Value)) {
        let Some(items) = self.array(v) else {
            return;
        };
        for (i, item) in items.iter().enumerate() {
            self.path.push(SchemaPathElem::Index(i));
            check(self, item);
            self.path.pop();
        }
    }

    fn object<'v>(&mut self, v: &'v Value) -> Option<&'v Map<String, Value>> {
        let obj = v.as_object();
        if obj.is_none() {
            self.error(format!("expected object, found {}", type_name(v)));
        }
        obj
    }

    fn array<'v>(&mut self, v: &'v Value) -> Option<&'v Vec<Value>> {
        let arr = v.as_array();
        if arr.is_none() {
            self.error(format!("expected array, found {}", type_name(v)));
        }
        arr
    }

    fn string(&mut self, v: &Value) -> Option<String> {
        match v.as_str() {
            Some(s) => Some(s.to_string()),
            None => {
                self.error(format!("expected string, found {}", type_name(v)));
                None
            }
        }
    }

    fn non_empty_string(&mut self, v: &Value) {
        if self.string(v).is_some_and(|s| s.is_empty()) {
            self.error("must not be empty");
        }
    }

    fn number(&mut self, v: &Value) -> Option<f64> {
        let n = v.as_f64();
        if n.is_none() {
            self.error(format!("expected number, found {}", type_name(v)));
        }
        n
    }

    fn percentage(&mut self, v: &Value) {
        if let Some(n) = self.number(v)
            && !(0.0..=100.0).contains(&n)
        {
            self.error(format!("must be between 0 and 100, found {n}"));
        }
    }

    fn one_of(&mut self, v: &Value, allowed: &[&str]) -> Option<String> {
        let s = self.string(v)?;
        if allowed.contains(&s.as_str()) {
            Some(s)
        } else {
            self.error(format!("must be one of: {}", allowed.join(", ")));
            None
        }
    }

    fn string_array(&mut self, v: &Value) {
        self.each(v, |w, item| {
            w.string(item);
        });
    }

    fn scalar_map(&mut self, v: &Value) {
        let Some(obj) = self.object(v) else {
            return;
        };
        for (key, value) in obj {
            if !matches!(value, Value::Bool(_) | Value::Number(_) | Value::String(_)) {
                self.path.push(SchemaPathElem::Field(key.clone()));
                self.error(format!(
                    "expected string, number or boolean, found {}",
                    type_name(value)
                ));
                self.path.pop();
            }
        }
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn component(w: &mut Walker, raw: &Value) {
    let Some(obj) = w.object(raw) else {
        return;
    };
    let kinds = ComponentKind::ALL.map(ComponentKind::as_str);
    let categories = ComponentCategory::ALL.map(ComponentCategory::as_str);

    w.prop(obj, "id", Required, Walker::non_empty_string);
    w.prop(obj, "version", Required, |w, v| {
        w.string(v);
    });
    w.prop(obj, "type", Required, |w, v| {
        w.one_of(v, &kinds);
    });
    w.prop(obj, "category", Required, |w, v| {
        w.one_of(v, &categories);
    });
    w.prop(obj, "name", Required, |w, v| {
        w.string(v);
    });
    w.prop(obj, "description", Required, |w, v| {
        w.string(v);
    });
    w.prop(obj, "tags", Optional, Walker::string_array);
    w.prop(obj, "propsSchema", Required, |w, v| {
        w.object(v);
    });
    w.prop(obj, "defaultProps", Required, Walker::scalar_map);
    w.prop(obj, "render", Optional, render_spec);
    w.prop(obj, "children", Optional, |w, v| w.each(v, composite_child));
}

fn render_spec(w: &mut Walker, v: &Value) {
    let Some(obj) = w.object(v) else {
        return;
    };
    w.prop(obj, "svg", Optional, |w, v| {
        w.string(v);
    });
    w.prop(obj, "layers", Optional, |w, v| {
        w.each(v, |w, layer| {
            let Some(obj) = w.object(layer) else {
                return;
            };
            w.prop(obj, "type", Required, |w, v| {
                w.string(v);
            });
            w.prop(obj, "props", Optional, Walker::scalar_map);
            w.prop(obj, "condition", Optional, |w, v| {
                w.string(v);
            });
        })
    });
}

fn composite_child(w: &mut Walker, v: &Value) {
    let Some(obj) = w.object(v) else {
        return;
    };
    w.prop(obj, "componentId", Required, Walker::non_empty_string);
    w.prop(obj, "offset", Optional, |w, v| {
        let Some(obj) = w.object(v) else {
            return;
        };
        for name in ["x", "y", "rotation"] {
            w.prop(obj, name, Optional, |w, v| {
                w.number(v);
            });
        }
    });
    w.prop(obj, "propsMapping", Optional, |w, v| {
        let Some(obj) = w.object(v) else {
            return;
        };
        for name in obj.keys() {
            w.prop(obj, name, Required, |w, v| {
                w.string(v);
            });
        }
    });
}

fn scene(w: &mut Walker, raw: &Value) {
    let Some(obj) = w.object(raw) else {
        return;
    };
    w.prop(obj, "id", Required, Walker::non_empty_string);
    w.prop(obj, "version", Required, |w, v| {
        if !v.is_u64() {
            w.error(format!("expected non-negative integer, found {}", describe(v)));
        }
    });
    w.prop(obj, "metadata", Optional, |w, v| {
        let Some(obj) = w.object(v) else {
            return;
        };
        w.prop(obj, "question_text", Optional, |w, v| {
            w.string(v);
        });
        w.prop(obj, "tags", Optional, Walker::string_array);
        w.prop(obj, "difficulty", Optional, |w, v| {
            w.number(v);
        });
    });
    w.prop(obj, "blocks", Required, |w, v| w.each(v, block));
}

fn describe(v: &Value) -> String {
    match v {
        Value::Number(n) => n.to_string(),
        other => type_name(other).to_string(),
    }
}

fn block(w: &mut Walker, v: &Value) {
    let Some(obj) = w.object(v) else {
        return;
    };
    let kinds = BlockKind::ALL.map(BlockKind::as_str);

    w.prop(obj, "id", Required, Walker::non_empty_string);
    let mut kind = None;
    w.prop(obj, "type", Required, |w, v| {
        kind = w.one_of(v, &kinds).and_then(|s| BlockKind::parse(&s));
    });
    w.prop(obj, "title", Optional, |w, v| {
        w.string(v);
    });
    w.prop(obj, "layout", Optional, |w, v| {
        let Some(obj) = w.object(v) else {
            return;
        };
        for name in ["x", "y", "w", "h"] {
            w.prop(obj, name, Required, Walker::percentage);
        }
    });
    w.prop(obj, "content", Required, |w, v| {
        let Some(content) = w.object(v) else {
            return;
        };
        match kind {
            Some(BlockKind::RoadScene) => road_scene(w, content),
            Some(BlockKind::DefinitionCard) => definition_card(w, content),
            Some(BlockKind::Gauge) => gauge(w, content),
            Some(BlockKind::Timeline) => timeline(w, content),
            Some(BlockKind::ComparisonTable) => comparison_table(w, content),
            Some(BlockKind::CauseEffect | BlockKind::IconGrid) | None => {}
        }
    });
}

fn road_scene(w: &mut Walker, obj: &Map<String, Value>) {
    w.prop(obj, "background", Optional, |w, v| {
        w.string(v);
    });
    w.prop(obj, "objects", Required, |w, v| w.each(v, scene_object));
}

fn scene_object(w: &mut Walker, v: &Value) {
    let Some(obj) = w.object(v) else {
        return;
    };
    w.prop(obj, "id", Required, Walker::non_empty_string);
    w.prop(obj, "component_id", Required, Walker::non_empty_string);
    w.prop(obj, "transform", Required, |w, v| {
        let Some(obj) = w.object(v) else {
            return;
        };
        w.prop(obj, "x", Required, |w, v| {
            w.number(v);
        });
        w.prop(obj, "y", Required, |w, v| {
            w.number(v);
        });
        w.prop(obj, "rotation", Optional, |w, v| {
            w.number(v);
        });
        w.prop(obj, "scale", Optional, |w, v| {
            w.number(v);
        });
        w.prop(obj, "z_index", Optional, |w, v| {
            let fits = v.as_i64().is_some_and(|n| i32::try_from(n).is_ok());
            if !fits {
                w.error(format!("expected integer, found {}", describe(v)));
            }
        });
    });
    w.prop(obj, "props", Optional, Walker::scalar_map);
}

fn definition_card(w: &mut Walker, obj: &Map<String, Value>) {
    w.prop(obj, "title", Optional, |w, v| {
        w.string(v);
    });
    w.prop(obj, "text", Required, |w, v| {
        w.string(v);
    });
    w.prop(obj, "image_component_id", Optional, |w, v| {
        w.string(v);
    });
}

fn gauge(w: &mut Walker, obj: &Map<String, Value>) {
    for (name, presence) in [("value", Required), ("max", Required), ("min", Optional)] {
        w.prop(obj, name, presence, |w, v| {
            w.number(v);
        });
    }
    w.prop(obj, "label", Optional, |w, v| {
        w.string(v);
    });
    w.prop(obj, "unit", Optional, |w, v| {
        w.string(v);
    });
    w.prop(obj, "zones", Optional, |w, v| {
        w.each(v, |w, zone| {
            let Some(obj) = w.object(zone) else {
                return;
            };
            w.prop(obj, "min", Required, |w, v| {
                w.number(v);
            });
            w.prop(obj, "max", Required, |w, v| {
                w.number(v);
            });
            w.prop(obj, "color", Required, |w, v| {
                w.string(v);
            });
        })
    });
}

fn timeline(w: &mut Walker, obj: &Map<String, Value>) {
    w.prop(obj, "events", Required, |w, v| {
        w.each(v, |w, event| {
            let Some(obj) = w.object(event) else {
                return;
            };
            w.prop(obj, "id", Required, |w, v| {
                w.string(v);
            });
            w.prop(obj, "title", Required, |w, v| {
                w.string(v);
            });
            for name in ["time", "description", "icon"] {
                w.prop(obj, name, Optional, |w, v| {
                    w.string(v);
                });
            }
        })
    });
    w.prop(obj, "orientation", Optional, |w, v| {
        w.one_of(v, &["horizontal", "vertical"]);
    });
}

fn comparison_table(w: &mut Walker, obj: &Map<String, Value>) {
    w.prop(obj, "headers", Required, Walker::string_array);
    w.prop(obj, "rows", Required, |w, v| {
        w.each(v, |w, row| {
            let Some(obj) = w.object(row) else {
                return;
            };
            w.prop(obj, "label", Required, |w, v| {
                w.string(v);
            });
            w.prop(obj, "values", Required, Walker::string_array);
        })
    });
}

#[cfg(test)]
#[path = "../../tests/unit/schema/validate.rs"]
mod tests;
