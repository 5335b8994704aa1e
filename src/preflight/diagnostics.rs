//! Findings collected during a preflight run

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which check produced a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    /// Simultaneous multithreading
    Hyperthreading,
    /// Logical processor count
    Cores,
    /// Free memory
    Memory,
    /// NIC binding state
    Devices,
}

impl CheckKind {
    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hyperthreading => "hyperthreading",
            Self::Cores => "cores",
            Self::Memory => "memory",
            Self::Devices => "devices",
        }
    }
}

/// Severity level of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, goes to stdout
    Info,
    /// Advisory, does not change the exit status
    Warning,
    /// Problem; fatal only when the check stops the run
    Error,
}

impl Severity {
    /// Whether the finding is written to stderr
    pub fn is_diagnostic(&self) -> bool {
        !matches!(self, Self::Info)
    }
}

/// A single finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Originating check
    pub check: CheckKind,
    /// Severity
    pub severity: Severity,
    /// Operator-facing message
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Ordered list of findings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finding
    pub fn push(&mut self, check: CheckKind, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        // The report prints findings itself; keep the log quiet
        tracing::debug!("[{}] {:?}: {}", check.name(), severity, message);
        self.0.push(Diagnostic {
            check,
            severity,
            message,
        });
    }

    /// Append an informational finding
    pub fn info(&mut self, check: CheckKind, message: impl Into<String>) {
        self.push(check, Severity::Info, message);
    }

    /// Append a warning
    pub fn warn(&mut self, check: CheckKind, message: impl Into<String>) {
        self.push(check, Severity::Warning, message);
    }

    /// Append an error
    pub fn error(&mut self, check: CheckKind, message: impl Into<String>) {
        self.push(check, Severity::Error, message);
    }

    /// Iterate in collection order
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    /// Findings of one severity
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(move |d| d.severity == severity)
    }

    /// Findings of one check
    pub fn for_check(&self, check: CheckKind) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(move |d| d.check == check)
    }

    /// Number of findings
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
