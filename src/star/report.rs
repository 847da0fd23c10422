//! Diagnostics collected while resolving a star against a dataset.
//!
//! Each diagnostic is also sent to the `log` facade at the matching level,
//! so callers can either inspect the report or just read the logs.

use std::fmt;

use log::{error, info, warn};
use serde::Serialize;

use super::resolve::ParameterFamily;

/// How serious a diagnostic is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Stable code for each kind of diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCode {
    StarFound,
    StarNotFound,
    DuplicateStar,
    FamilyUnavailable,
    ParametersResolved,
    ParametersNotFound,
    MissingOptionalColumn,
    AdditionalAttributes,
    InvalidValue,
    LinesAttached,
    NoLineData,
    NoEquivalentWidths,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "[{level}] {:?}: {}", self.code, self.message)
    }
}

/// Outcome of [`Star::resolve`](super::Star::resolve).
#[derive(Clone, Debug, Default, Serialize)]
pub struct ResolveReport {
    pub diagnostics: Vec<Diagnostic>,
    /// Row of the star in the stellar parameters table.
    pub row: Option<usize>,
    /// Family that supplied Teff, logg and [Fe/H].
    pub family: Option<ParameterFamily>,
    /// Families tried before one succeeded (or all failed), in order.
    pub attempted: Vec<ParameterFamily>,
    /// Additional attribute columns copied onto the star.
    pub additional: Vec<&'static str>,
    /// Number of lines attached, if a line list was built.
    pub lines: Option<usize>,
}

impl ResolveReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        let message = message.into();
        info!("{message}");
        self.push(Severity::Info, code, message);
    }

    pub fn warning(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.push(Severity::Warning, code, message);
    }

    pub fn error(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        let message = message.into();
        error!("{message}");
        self.push(Severity::Error, code, message);
    }

    fn push(&mut self, severity: Severity, code: DiagnosticCode, message: String) {
        self.diagnostics.push(Diagnostic {
            severity,
            code,
            message,
        });
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// True if nothing went wrong at error level.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    pub fn has(&self, code: DiagnosticCode) -> bool {
        self.diagnostics.iter().any(|d| d.code == code)
    }
}

impl fmt::Display for ResolveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Resolved with {} error(s) and {} warning(s):",
            self.error_count(),
            self.warning_count()
        )?;
        for diagnostic in &self.diagnostics {
            writeln!(f, "  {diagnostic}")?;
        }
        Ok(())
    }
}
