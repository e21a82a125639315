use std::fmt;

use indexmap::IndexSet;

use crate::schema::references::MissingReference;
use crate::schema::validate::SchemaError;

/// One problem found while validating a document.
#[derive(Clone, Debug, PartialEq)]
pub enum ValidationIssue {
    /// The input text is not JSON at all.
    Syntax {
        /// Parser message.
        message: String,
    },
    /// A structural (shape) violation.
    Schema(SchemaError),
    /// An object referencing a component the catalog does not contain.
    MissingComponent(MissingReference),
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax { message } => write!(f, "invalid JSON syntax: {message}"),
            Self::Schema(e) => write!(f, "{e}"),
            Self::MissingComponent(r) => write!(f, "{r}"),
        }
    }
}

/// Outcome of validating a component or scene document.
///
/// A report with no issues is valid. Issues are kept in discovery order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// A report with no issues.
    pub fn valid() -> Self {
        Self::default()
    }

    /// A report holding `issues`.
    pub fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    /// A report for text that failed to parse as JSON.
    pub fn syntax_error(message: impl Into<String>) -> Self {
        Self::from_issues(vec![ValidationIssue::Syntax {
            message: message.into(),
        }])
    }

    /// Whether no issue was found.
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// All issues in discovery order.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Issue messages, or `None` for a valid report.
    pub fn errors(&self) -> Option<Vec<String>> {
        (!self.is_valid()).then(|| self.messages())
    }

    /// Issue messages (empty for a valid report).
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    /// Structural errors only.
    pub fn schema_errors(&self) -> impl Iterator<Item = &SchemaError> {
        self.issues.iter().filter_map(|i| match i {
            ValidationIssue::Schema(e) => Some(e),
            _ => None,
        })
    }

    /// Missing references only, in discovery order.
    pub fn missing_references(&self) -> impl Iterator<Item = &MissingReference> {
        self.issues.iter().filter_map(|i| match i {
            ValidationIssue::MissingComponent(r) => Some(r),
            _ => None,
        })
    }

    /// Distinct missing component ids, first-seen order.
    pub fn missing_components(&self) -> Vec<String> {
        let ids: IndexSet<&str> = self
            .missing_references()
            .map(|r| r.component_id.as_str())
            .collect();
        ids.into_iter().map(str::to_string).collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return f.write_str("valid");
        }
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schema/report.rs"]
mod tests;
