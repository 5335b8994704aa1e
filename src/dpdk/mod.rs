//! DPDK installation helpers

mod libs;

pub use libs::{LinkLibraries, PKG_CONFIG_ARGS};
