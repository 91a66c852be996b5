//! UI message — the single transient notice shown on the dashboard.

/// Severity of a [`Message`], rendered as a visual class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.css_class())
    }
}

/// A message with its severity. Showing a new one replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub severity: Severity,
}

impl Message {
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Info)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Success)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Error)
    }

    fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }
}
