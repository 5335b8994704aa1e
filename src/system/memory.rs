//! Free memory parsing from the kernel memory-info table

use crate::error::{PreflightError, Result};
use serde::{Deserialize, Serialize};

/// Free memory reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeMemory {
    /// Raw value in kilobytes
    pub kilobytes: u64,
}

impl FreeMemory {
    /// Parse the `MemFree` row: second line, second whitespace token.
    ///
    /// The row is located by position rather than by key, matching how the
    /// kernel lays out `/proc/meminfo` (`MemTotal` first, `MemFree` second).
    pub fn parse(meminfo: &str) -> Result<Self> {
        let line = meminfo
            .lines()
            .nth(1)
            .ok_or_else(|| PreflightError::malformed("meminfo", "missing second line"))?;

        let token = line.split_whitespace().nth(1).ok_or_else(|| {
            PreflightError::malformed("meminfo", format!("no value in {:?}", line))
        })?;

        let kilobytes = token.parse::<u64>().map_err(|_| {
            PreflightError::malformed("meminfo", format!("non-numeric value {:?}", token))
        })?;

        Ok(FreeMemory { kilobytes })
    }

    /// Decimal gigabytes (kB / 1000 / 1000)
    pub fn gigabytes(&self) -> f64 {
        self.kilobytes as f64 / 1000.0 / 1000.0
    }

    /// True when at least `min_gb` decimal gigabytes are free
    pub fn meets(&self, min_gb: f64) -> bool {
        self.gigabytes() >= min_gb
    }
}
