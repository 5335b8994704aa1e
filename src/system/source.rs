//! Host state sources
//!
//! Every preflight check reads host state through [`SystemSource`], so the
//! checks can run against fixtures as easily as against the live machine.

use crate::config::PreflightConfig;
use crate::error::{IoResultExt, PreflightError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use sysinfo::System;

/// Relative location of the device-binding status utility under `RTE_SDK`
pub const DEVBIND_SCRIPT: &str = "usertools/dpdk-devbind.py";

/// Read-only access to the host interfaces the preflight checks consume
pub trait SystemSource {
    /// Parseable CPU listing (`lscpu -p` format)
    fn cpu_topology(&self) -> Result<String>;

    /// Number of logical processors
    fn logical_cores(&self) -> usize;

    /// Memory-info table (`/proc/meminfo` format)
    fn meminfo(&self) -> Result<String>;

    /// Output of `dpdk-devbind.py --status`
    fn devbind_status(&self) -> Result<String>;
}

/// The live machine
#[derive(Debug, Clone)]
pub struct HostSystem {
    topology_command: Vec<String>,
    meminfo_path: PathBuf,
    rte_sdk: Option<PathBuf>,
}

impl HostSystem {
    /// Create a host source from runtime configuration
    pub fn new(config: &PreflightConfig) -> Self {
        Self {
            topology_command: config.topology_command.clone(),
            meminfo_path: config.meminfo_path.clone(),
            rte_sdk: config.rte_sdk.clone(),
        }
    }

    /// Full path to the device-binding utility
    pub fn devbind_path(&self) -> Result<PathBuf> {
        self.rte_sdk
            .as_ref()
            .map(|root| root.join(DEVBIND_SCRIPT))
            .ok_or(PreflightError::MissingEnv("RTE_SDK"))
    }
}

impl SystemSource for HostSystem {
    fn cpu_topology(&self) -> Result<String> {
        let (program, args) = self
            .topology_command
            .split_first()
            .ok_or_else(|| PreflightError::config("empty topology command"))?;
        run_command(Path::new(program), args)
    }

    fn logical_cores(&self) -> usize {
        // Every online CPU, including ones removed from our affinity mask
        // by `isolcpus=` or cgroup limits
        let mut sys = System::new();
        sys.refresh_cpu_all();
        match sys.cpus().len() {
            0 => num_cpus::get(),
            n => n,
        }
    }

    fn meminfo(&self) -> Result<String> {
        std::fs::read_to_string(&self.meminfo_path).with_path(&self.meminfo_path)
    }

    fn devbind_status(&self) -> Result<String> {
        let script = self.devbind_path()?;
        if !script.is_file() {
            return Err(PreflightError::NotFound(script));
        }
        run_command(&script, &["--status".to_string()])
    }
}

/// Run a command and capture its stdout as text
pub(crate) fn run_command(program: &Path, args: &[String]) -> Result<String> {
    let cmdline = std::iter::once(program.display().to_string())
        .chain(args.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ");

    tracing::debug!("Running {}", cmdline);

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| PreflightError::command(&cmdline, e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PreflightError::command(
            &cmdline,
            format!("{}: {}", output.status, stderr.trim()),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Canned host state, for tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    /// Topology listing, `None` simulates an unavailable `lscpu`
    pub topology: Option<String>,
    /// Logical core count
    pub cores: usize,
    /// Memory-info text, `None` simulates an unreadable file
    pub meminfo: Option<String>,
    /// Device status text, `None` simulates a missing `RTE_SDK`
    pub devbind: Option<String>,
}

impl StaticSource {
    /// Start from a healthy four-core host with no hyperthreading and 8 GB free
    pub fn healthy() -> Self {
        Self {
            topology: Some("0,0\n1,1\n2,2\n3,3\n".to_string()),
            cores: 4,
            meminfo: Some("MemTotal: 16000000 kB\nMemFree: 8000000 kB\n".to_string()),
            devbind: Some(
                "0000:01:00.0 'NIC' if=eno1 drv=ixgbe *Active*\n\
                 0000:01:00.1 'NIC' if=eno2 drv=ixgbe\n\
                 0000:02:00.0 'NIC' if=ens2f0 drv=i40e\n"
                    .to_string(),
            ),
        }
    }

    /// Replace the topology listing
    pub fn with_topology(mut self, listing: impl Into<String>) -> Self {
        self.topology = Some(listing.into());
        self
    }

    /// Replace the logical core count
    pub fn with_cores(mut self, cores: usize) -> Self {
        self.cores = cores;
        self
    }

    /// Replace the memory-info text
    pub fn with_meminfo(mut self, meminfo: impl Into<String>) -> Self {
        self.meminfo = Some(meminfo.into());
        self
    }

    /// Replace the device status text
    pub fn with_devbind(mut self, status: impl Into<String>) -> Self {
        self.devbind = Some(status.into());
        self
    }

    /// Simulate an unset `RTE_SDK`
    pub fn without_devbind(mut self) -> Self {
        self.devbind = None;
        self
    }
}

impl SystemSource for StaticSource {
    fn cpu_topology(&self) -> Result<String> {
        self.topology
            .clone()
            .ok_or_else(|| PreflightError::command("lscpu -p", "not available"))
    }

    fn logical_cores(&self) -> usize {
        self.cores
    }

    fn meminfo(&self) -> Result<String> {
        self.meminfo
            .clone()
            .ok_or_else(|| PreflightError::NotFound(PathBuf::from("/proc/meminfo")))
    }

    fn devbind_status(&self) -> Result<String> {
        self.devbind.clone().ok_or(PreflightError::MissingEnv("RTE_SDK"))
    }
}
