//! # dpdk-preflight - Host checks before launching a DPDK application
//!
//! A DPDK dataplane wants dedicated cores, plenty of free memory, and NICs it
//! can take over without cutting the host off the network. dpdk-preflight
//! checks those properties up front and exits non-zero when a hard
//! requirement is missing.
//!
//! ## Checks
//!
//! - **Hyperthreading**: warns if sibling threads share physical cores
//! - **Core count**: at least 4 logical processors
//! - **Free memory**: at least 4 GB free
//! - **Devices**: primary NICs (off the active card) and backup NICs (on it)
//!
//! ## Quick Start
//!
//! ```no_run
//! use dpdk_preflight::config::PreflightConfig;
//! use dpdk_preflight::preflight::run_preflight;
//! use dpdk_preflight::system::HostSystem;
//!
//! let config = PreflightConfig::default();
//! let host = HostSystem::new(&config);
//!
//! let report = run_preflight(&host, &config);
//! report.print();
//! std::process::exit(report.exit_code());
//! ```
//!
//! ## Testing Against Fixtures
//!
//! ```
//! use dpdk_preflight::config::PreflightConfig;
//! use dpdk_preflight::preflight::run_preflight;
//! use dpdk_preflight::system::StaticSource;
//!
//! let source = StaticSource::healthy().with_cores(2);
//! let report = run_preflight(&source, &PreflightConfig::default());
//! assert_eq!(report.exit_code(), 1);
//! ```
//!
//! ## Linker Flags
//!
//! ```no_run
//! use dpdk_preflight::dpdk::LinkLibraries;
//! use std::path::Path;
//!
//! let libs = LinkLibraries::from_dir(Path::new("/opt/dpdk/build/lib")).unwrap();
//! println!("{}", libs.linker_flags());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod dpdk;
pub mod error;
pub mod preflight;
pub mod system;

// Re-export commonly used types
pub use config::PreflightConfig;
pub use error::{PreflightError, Result};
pub use preflight::{run_preflight, PreflightReport, PreflightStatus};
pub use system::{HostSystem, StaticSource, SystemSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use dpdk_preflight::prelude::*;
    //! ```

    pub use crate::config::{PreflightConfig, MIN_CORES, MIN_FREE_MEMORY_GB};
    pub use crate::dpdk::LinkLibraries;
    pub use crate::error::{PreflightError, Result};
    pub use crate::preflight::{
        run_preflight, CheckKind, Diagnostic, PreflightChecker, PreflightReport, PreflightStatus,
        Severity,
    };
    pub use crate::system::{
        CpuTopology, DeviceReport, FreeMemory, HostSummary, HostSystem, StaticSource, SystemSource,
    };
}
