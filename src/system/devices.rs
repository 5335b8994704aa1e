//! NIC classification from the DPDK device-binding status report
//!
//! `dpdk-devbind.py --status` prints one line per device, e.g.
//!
//! ```text
//! 0000:01:00.0 'Ethernet 10G 2P X520' if=ens1f0 drv=ixgbe unused=igb_uio *Active*
//! 0000:01:00.1 'Ethernet 10G 2P X520' if=ens1f1 drv=ixgbe unused=igb_uio
//! 0000:02:00.0 'Ethernet Controller X710' if=ens2f0 drv=i40e unused=igb_uio
//! ```
//!
//! The `*Active*` line is the interface carrying the host's own traffic.
//! Ports sharing its index sit on the same card and are kept as backups;
//! every other interface-bearing port is a primary candidate.

use serde::{Deserialize, Serialize};

const ACTIVE_MARKER: &str = "*Active*";
const INTERFACE_MARKER: &str = "if=";

/// Devices usable by the dataplane, split by role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceReport {
    /// Devices on a different card than the active interface
    pub primary: Vec<String>,
    /// Devices sharing the active interface's card
    pub backup: Vec<String>,
}

/// One interface-bearing line of the status report
#[derive(Debug, Clone, PartialEq, Eq)]
struct DeviceLine<'a> {
    id: &'a str,
    index: &'a str,
    active: bool,
}

impl<'a> DeviceLine<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let id = line.split_whitespace().next()?;
        Some(DeviceLine {
            id,
            index: device_index(id),
            active: line.contains(ACTIVE_MARKER),
        })
    }
}

/// Index of a device identifier.
///
/// For PCI addresses this is the field after the domain (`0000:01:00.0` →
/// `01`). Identifiers without `:` fall back to their trailing digits
/// (`eth1` → `1`), or to the whole identifier when there are none.
pub fn device_index(id: &str) -> &str {
    if let Some(rest) = id.split_once(':').map(|(_, rest)| rest) {
        return rest.split(':').next().unwrap_or(rest);
    }

    let digits_start = id
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i);

    match digits_start {
        Some(i) => &id[i..],
        None => id,
    }
}

impl DeviceReport {
    /// Classify every interface-bearing line of the status report
    pub fn classify(status: &str) -> Self {
        let active_index = status
            .lines()
            .filter(|line| line.contains(ACTIVE_MARKER))
            .find_map(DeviceLine::parse)
            .map(|dev| dev.index);

        match active_index {
            Some(index) => tracing::debug!("Active device index: {}", index),
            None => tracing::debug!("No active device in status report"),
        }

        let mut report = DeviceReport::default();

        for line in status.lines().filter(|l| l.contains(INTERFACE_MARKER)) {
            let Some(dev) = DeviceLine::parse(line) else {
                tracing::debug!("Skipping device line: {:?}", line);
                continue;
            };

            match active_index {
                Some(index) if dev.index == index => {
                    if !dev.active {
                        report.backup.push(dev.id.to_string());
                    }
                }
                _ => report.primary.push(dev.id.to_string()),
            }
        }

        report
    }

    /// True when neither role has a device
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.backup.is_empty()
    }
}
