//! Linker names for the installed DPDK libraries
//!
//! Two ways to find them: scan the shared objects in the build's library
//! directory, or ask `pkg-config` for the static link line.

use crate::error::{IoResultExt, PreflightError, Result};
use crate::system::source::run_command;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// `pkg-config` invocation for the static DPDK link line
pub const PKG_CONFIG_ARGS: [&str; 3] = ["--static", "--libs", "libdpdk"];

/// Sorted, de-duplicated set of library link names (`rte_eal`, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkLibraries {
    names: BTreeSet<String>,
}

impl LinkLibraries {
    /// Collect link names from the shared objects in `dir`.
    ///
    /// Only unversioned `lib<name>.so` files count; `.so.23` symlinks and
    /// static archives are ignored.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(PreflightError::NotFound(dir.to_path_buf()));
        }

        let mut libs = Self::default();

        for entry in std::fs::read_dir(dir).with_path(dir)? {
            let entry = entry.with_path(dir)?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();

            match shared_object_name(&name) {
                Some(link_name) => {
                    libs.names.insert(link_name.to_string());
                }
                None => tracing::debug!("Ignoring {}", name),
            }
        }

        tracing::info!("Found {} DPDK libraries in {}", libs.len(), dir.display());
        Ok(libs)
    }

    /// Collect link names from `pkg-config --libs` output
    pub fn from_pkg_config_output(output: &str) -> Self {
        Self {
            names: output
                .split_whitespace()
                .filter_map(pkg_config_token)
                .map(str::to_string)
                .collect(),
        }
    }

    /// Run `pkg-config` and parse its output
    pub fn from_pkg_config() -> Result<Self> {
        let args: Vec<String> = PKG_CONFIG_ARGS.iter().map(|s| s.to_string()).collect();
        let output = run_command(Path::new("pkg-config"), &args)?;
        Ok(Self::from_pkg_config_output(&output))
    }

    /// Link names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of libraries
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if nothing was found
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// `-l<name>` flags on one line
    pub fn linker_flags(&self) -> String {
        self.names()
            .map(|n| format!("-l{}", n))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Cargo build-script directives, one per line
    pub fn cargo_directives(&self) -> String {
        self.names()
            .map(|n| format!("cargo:rustc-link-lib=dylib={}\n", n))
            .collect()
    }
}

impl fmt::Display for LinkLibraries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.linker_flags())
    }
}

/// `librte_eal.so` -> `rte_eal`
fn shared_object_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix("lib")?
        .strip_suffix(".so")
        .filter(|name| !name.is_empty())
}

/// `-l:librte_eal.a` -> `rte_eal`, `-lrte_eal` -> `rte_eal`
fn pkg_config_token(token: &str) -> Option<&str> {
    if let Some(rest) = token.strip_prefix("-l:lib") {
        let name = rest.rsplit_once('.').map_or(rest, |(stem, _)| stem);
        return (!name.is_empty()).then_some(name);
    }
    if token.starts_with("-lrte") {
        return Some(&token[2..]);
    }
    None
}
