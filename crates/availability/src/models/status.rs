use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Three-valued outcome of a resolution attempt.
///
/// The severity is the only field downstream code should branch on; the
/// status text is free-form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Found or available.
    Ok,
    /// Confirmed absent.
    NotFound,
    /// Indeterminate, needs confirmation, or failed.
    Warn,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Ok => "ok",
            Severity::NotFound => "not_found",
            Severity::Warn => "warn",
        }
    }

    /// Presentation class for this severity.
    pub fn presentation_class(&self) -> &'static str {
        match self {
            Severity::Ok => "border-ok",
            Severity::NotFound => "border-ng",
            Severity::Warn => "border-warn",
        }
    }

    /// Default glyph for this severity.
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Ok => "⭕️",
            Severity::NotFound => "❌",
            Severity::Warn => "⚠️",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Availability status reported for one source.
///
/// Immutable once constructed. The text is guaranteed non-empty: [`Status::new`]
/// substitutes the severity name for a blank label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    text: Cow<'static, str>,
    severity: Severity,
    icon: Cow<'static, str>,
}

impl Status {
    /// Create a status with the default glyph for its severity.
    pub fn new(text: impl Into<Cow<'static, str>>, severity: Severity) -> Self {
        let text = text.into();
        let text = if text.trim().is_empty() {
            Cow::Borrowed(severity.as_str())
        } else {
            text
        };
        Self {
            text,
            severity,
            icon: Cow::Borrowed(severity.icon()),
        }
    }

    /// Replace the presentation glyph.
    pub fn with_icon(mut self, icon: impl Into<Cow<'static, str>>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn in_stock() -> Self {
        Self::new("in stock", Severity::Ok)
    }

    pub fn available() -> Self {
        Self::new("available", Severity::Ok)
    }

    pub fn not_found() -> Self {
        Self::new("not found", Severity::NotFound)
    }

    pub fn checked_out() -> Self {
        Self::new("checked out", Severity::Warn)
    }

    /// A hit exists but no definitive marker was found.
    pub fn undetermined() -> Self {
        Self::new("undetermined", Severity::Warn)
    }

    /// Hits were counted but no stock marks were present; needs confirmation.
    pub fn hit_count(count: u64) -> Self {
        Self::new(format!("{} hits", count), Severity::Warn)
    }

    /// Transport or parse failure.
    pub fn error() -> Self {
        Self::new("error", Severity::Warn)
    }

    /// The keyword was blank, so nothing was queried.
    pub fn empty_keyword() -> Self {
        Self::new("empty keyword", Severity::Warn)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn presentation_class(&self) -> &'static str {
        self.severity.presentation_class()
    }

    pub fn is_ok(&self) -> bool {
        self.severity == Severity::Ok
    }
}
