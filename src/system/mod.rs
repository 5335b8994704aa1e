//! Host state detection
//!
//! Sources for the host interfaces consulted before a DPDK launch, and the
//! tolerant parsers that turn their text into typed values.

mod resources;
pub mod devices;
pub mod memory;
pub mod source;
pub mod topology;

pub use devices::{device_index, DeviceReport};
pub use memory::FreeMemory;
pub use resources::HostSummary;
pub use source::{HostSystem, StaticSource, SystemSource, DEVBIND_SCRIPT};
pub use topology::{CorePair, CpuTopology};
