//! Configuration settings for dpdk-preflight
//!
//! CLI arguments, thresholds, and the runtime configuration derived from
//! them.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Minimum logical processor count for a DPDK host
pub const MIN_CORES: usize = 4;

/// Minimum free memory, in decimal gigabytes
pub const MIN_FREE_MEMORY_GB: f64 = 4.0;

/// Default memory-info table location
pub const DEFAULT_MEMINFO_PATH: &str = "/proc/meminfo";

/// dpdk-preflight - check a host before launching a DPDK application
#[derive(Parser, Debug, Clone)]
#[command(name = "dpdk-preflight")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Preflight checks for DPDK hosts")]
#[command(long_about = r#"
dpdk-preflight verifies a host before a DPDK application is launched.

Checks:
  - Hyperthreading (warning only)
  - Logical core count (at least 4)
  - Free memory (at least 4 GB)
  - NIC binding state (primary and backup devices)

Examples:
  dpdk-preflight                         # Run all checks
  RTE_SDK=/opt/dpdk dpdk-preflight       # Locate dpdk-devbind.py
  dpdk-preflight --format json           # Machine-readable report
  dpdk-preflight libs --cargo            # Linker flags for installed DPDK libs
"#)]
pub struct CliArgs {
    /// DPDK installation root
    #[arg(long, env = "RTE_SDK", value_name = "PATH")]
    pub rte_sdk: Option<PathBuf>,

    /// Output format for the report
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Skip the host summary header
    #[arg(long)]
    pub no_summary: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the host preflight checks (default)
    #[command(name = "check")]
    Check,

    /// Print linker flags for the installed DPDK shared libraries
    #[command(name = "libs")]
    Libs {
        /// Query `pkg-config --static --libs libdpdk` instead of listing the library directory
        #[arg(long)]
        pkg_config: bool,

        /// Library directory (default: $RTE_SDK/build/lib)
        #[arg(long, value_name = "PATH", conflicts_with = "pkg_config")]
        lib_dir: Option<PathBuf>,

        /// Emit cargo build-script directives instead of -l flags
        #[arg(long)]
        cargo: bool,
    },
}

/// Output format for reports
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Runtime configuration derived from CLI args
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreflightConfig {
    /// DPDK installation root
    pub rte_sdk: Option<PathBuf>,
    /// Minimum logical processor count
    pub min_cores: usize,
    /// Minimum free memory in decimal gigabytes
    pub min_free_memory_gb: f64,
    /// Command producing the parseable CPU listing
    pub topology_command: Vec<String>,
    /// Memory-info table location
    pub meminfo_path: PathBuf,
}

impl Default for PreflightConfig {
    fn default() -> Self {
        Self {
            rte_sdk: None,
            min_cores: MIN_CORES,
            min_free_memory_gb: MIN_FREE_MEMORY_GB,
            topology_command: vec!["lscpu".to_string(), "-p".to_string()],
            meminfo_path: PathBuf::from(DEFAULT_MEMINFO_PATH),
        }
    }
}

impl PreflightConfig {
    /// Create config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        let rte_sdk = args
            .rte_sdk
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
            .cloned();

        if let Some(root) = &rte_sdk {
            if root.is_file() {
                return Err(format!("RTE_SDK is a file, expected a directory: {}", root.display()));
            }
        }

        Ok(Self {
            rte_sdk,
            ..Self::default()
        })
    }

    /// DPDK shared library directory under the install root
    pub fn dpdk_lib_dir(&self) -> Option<PathBuf> {
        self.rte_sdk.as_ref().map(|root| root.join("build").join("lib"))
    }
}
