//! Collection of messages written to the engine's diagnostic channel.

use std::collections::VecDeque;
use std::fmt;

use crate::types::enums::MessageKind;

/// A single diagnostic message.
///
/// Diagnostics carry the message text, the section (for this crate, the name
/// of the function being marshaled or invoked) and a severity level. Row and
/// column are kept for parity with compiler-sourced messages and are zero
/// for messages produced at invocation time.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub section: Option<String>,
    pub row: u32,
    pub col: u32,
}

/// The severity level of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Error,
    Warning,
    Info,
}

impl From<MessageKind> for DiagnosticKind {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Error => DiagnosticKind::Error,
            MessageKind::Warning => DiagnosticKind::Warning,
            MessageKind::Information => DiagnosticKind::Info,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            DiagnosticKind::Error => "error",
            DiagnosticKind::Warning => "warning",
            DiagnosticKind::Info => "info",
        };
        match &self.section {
            Some(section) => write!(
                f,
                "{}:{}:{}: {}: {}",
                section, self.row, self.col, kind, self.message
            ),
            None => write!(f, "{}: {}", kind, self.message),
        }
    }
}

/// An accumulating collection of diagnostics.
///
/// Host applications install this behind their engine's message callback and
/// inspect it after a batch of calls; the error flag is tracked separately so
/// `has_errors` stays cheap.
#[derive(Debug, Default)]
pub struct Diagnostics {
    diagnostics: VecDeque<Diagnostic>,
    has_errors: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        if diagnostic.kind == DiagnosticKind::Error {
            self.has_errors = true;
        }
        self.diagnostics.push_back(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn error_count(&self) -> usize {
        self.iter()
            .filter(|d| d.kind == DiagnosticKind::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.iter()
            .filter(|d| d.kind == DiagnosticKind::Warning)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.iter().filter(|d| d.kind == DiagnosticKind::Error)
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
        self.has_errors = false;
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.diagnostics {
            writeln!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag(kind: DiagnosticKind, message: &str) -> Diagnostic {
        Diagnostic {
            kind,
            message: message.to_string(),
            section: Some("on_tick".to_string()),
            row: 0,
            col: 0,
        }
    }

    #[test]
    fn tracks_error_flag() {
        let mut diagnostics = Diagnostics::new();
        assert!(!diagnostics.has_errors());

        diagnostics.add(diag(DiagnosticKind::Warning, "narrowing"));
        assert!(!diagnostics.has_errors());
        assert_eq!(diagnostics.warning_count(), 1);

        diagnostics.add(diag(DiagnosticKind::Error, "category mismatch"));
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn clear_resets_flag() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add(diag(DiagnosticKind::Error, "boom"));
        diagnostics.clear();
        assert!(!diagnostics.has_errors());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn display_includes_section() {
        let rendered = diag(DiagnosticKind::Error, "no cast").to_string();
        assert_eq!(rendered, "on_tick:0:0: error: no cast");
    }
}
