// # Diagnostics
//
// Every reconciler reports its outcome to the host as a list of diagnostics.
// An empty list means success; any entry with `Severity::Error` means the
// operation failed.
//
// ## Translation Rules
//
// - API validation error → one error diagnostic per field message
// - API error without field messages → one error diagnostic (top-level message)
// - Anything that is not an API error → one "Unknown error" diagnostic

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Summary used when an error did not originate from the StatusCake API
pub const UNKNOWN_ERROR_SUMMARY: &str =
    "Unknown error (received error that unexpectedly not an api error)";

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The operation failed
    Error,
    /// The operation succeeded but the operator should know something
    Warning,
}

/// A structured message surfaced to the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Resource attribute the message refers to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: None,
            attribute: None,
        }
    }

    pub fn warning(summary: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: None,
            attribute: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Ordered list of diagnostics returned by every reconciler call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether any diagnostic has error severity
    pub fn has_errors(&self) -> bool {
        self.0.iter().any(Diagnostic::is_error)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    /// Surface an error verbatim as a single error diagnostic
    pub fn from_err(err: &Error) -> Self {
        Self(vec![Diagnostic::error(err.to_string())])
    }

    /// Flatten a remote error into field-level diagnostics
    ///
    /// Errors that did not come from the API surface are never dropped; they
    /// become a single unknown-error diagnostic carrying the original text
    /// as detail.
    pub fn from_api_error(err: &Error) -> Self {
        let Some(api_error) = err.as_api() else {
            return Self(vec![
                Diagnostic::error(UNKNOWN_ERROR_SUMMARY).with_detail(err.to_string()),
            ]);
        };

        let mut diags = Self::new();
        for (field, messages) in &api_error.errors {
            for message in messages {
                diags.push(Diagnostic::error(message.clone()).with_attribute(field.clone()));
            }
        }

        if diags.is_empty() {
            let summary = if api_error.message.is_empty() {
                api_error.to_string()
            } else {
                api_error.message.clone()
            };
            diags.push(Diagnostic::error(summary));
        }

        diags
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        Self(vec![diagnostic])
    }
}

impl From<Vec<Diagnostic>> for Diagnostics {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self(diagnostics)
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
