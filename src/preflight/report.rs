//! Preflight results and their presentation

use super::diagnostics::{Diagnostics, Severity};
use crate::error::Result;
use crate::system::DeviceReport;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Overall outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreflightStatus {
    /// Every hard requirement holds (advisories may exist)
    Passed,
    /// A hard requirement failed; later checks were not run
    Failed,
}

impl PreflightStatus {
    /// Process exit code for this outcome
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Passed => 0,
            Self::Failed => 1,
        }
    }
}

/// Everything learned during one preflight run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreflightReport {
    /// Overall outcome
    pub status: PreflightStatus,
    /// Hyperthreading detected, `None` if the topology was unavailable
    pub hyperthreading: Option<bool>,
    /// Logical processor count, if checked
    pub cores: Option<usize>,
    /// Free memory in decimal gigabytes, if checked
    pub free_memory_gb: Option<f64>,
    /// Device classification, if checked
    pub devices: Option<DeviceReport>,
    /// Findings in collection order
    pub diagnostics: Diagnostics,
}

impl PreflightReport {
    pub(crate) fn new() -> Self {
        Self {
            status: PreflightStatus::Passed,
            hyperthreading: None,
            cores: None,
            free_memory_gb: None,
            devices: None,
            diagnostics: Diagnostics::new(),
        }
    }

    /// True if the run passed
    pub fn is_success(&self) -> bool {
        self.status == PreflightStatus::Passed
    }

    /// Process exit code for this report
    pub fn exit_code(&self) -> i32 {
        self.status.exit_code()
    }

    /// Flush findings: info to stdout, warnings and errors to stderr
    pub fn print(&self) {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        // Closed pipes are ignored
        let _ = self.write_text(&mut stdout.lock(), &mut stderr.lock());
    }

    /// Write findings in collection order to the given streams
    pub fn write_text<O: Write, E: Write>(&self, out: &mut O, err: &mut E) -> std::io::Result<()> {
        for diag in self.diagnostics.iter() {
            if !diag.severity.is_diagnostic() {
                writeln!(out, "{}", diag)?;
                continue;
            }
            let label = match diag.severity {
                Severity::Error => "error",
                _ => "warning",
            };
            writeln!(err, "{}: {}", label, diag)?;
        }
        out.flush()?;
        err.flush()
    }

    /// Serialize the report as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
