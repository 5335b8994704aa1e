//! Host preflight checks
//!
//! Evaluates hyperthreading, core count, free memory and NIC binding state,
//! collecting findings into a [`PreflightReport`] that the CLI flushes at the
//! end of the run.

mod checker;
mod diagnostics;
mod report;

pub use checker::{run_preflight, PreflightChecker, NO_HYPERTHREAD_HINT};
pub use diagnostics::{CheckKind, Diagnostic, Diagnostics, Severity};
pub use report::{PreflightReport, PreflightStatus};
