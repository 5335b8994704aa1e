//! Host identification
//!
//! A short summary of the machine printed ahead of the preflight checks so
//! that saved output can be traced back to the host it came from.

use serde::{Deserialize, Serialize};
use sysinfo::System;

/// Identifying facts about the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSummary {
    /// Hostname
    pub hostname: String,
    /// CPU model name
    pub cpu_model: String,
    /// CPU vendor
    pub cpu_vendor: String,
    /// Number of physical cores
    pub physical_cores: usize,
    /// Kernel version, if known
    pub kernel: Option<String>,
    /// CPU architecture
    pub arch: String,
}

impl HostSummary {
    /// Collect a summary of the running host
    pub fn collect() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_all();

        let cpus = sys.cpus();

        let cpu_model = cpus
            .first()
            .map(|c| c.brand().trim().to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let cpu_vendor = cpus
            .first()
            .map(|c| c.vendor_id().to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let hostname = hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "localhost".to_string());

        HostSummary {
            hostname,
            cpu_model,
            cpu_vendor,
            physical_cores: num_cpus::get_physical(),
            kernel: System::kernel_version(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }

    /// Print the summary to stdout
    pub fn print(&self) {
        println!("=== Host ===");
        println!("  Hostname: {}", self.hostname);
        println!("  CPU: {} ({})", self.cpu_model, self.cpu_vendor);
        println!("  Physical cores: {}", self.physical_cores);
        println!("  Architecture: {}", self.arch);
        if let Some(kernel) = &self.kernel {
            println!("  Kernel: {}", kernel);
        }
        println!();
    }
}
