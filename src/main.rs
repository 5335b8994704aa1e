//! dpdk-preflight CLI - Host checks before launching a DPDK application

use clap::Parser;
use dpdk_preflight::config::{CliArgs, Commands, OutputFormat, PreflightConfig};
use dpdk_preflight::dpdk::LinkLibraries;
use dpdk_preflight::error::{PreflightError, Result};
use dpdk_preflight::preflight::run_preflight;
use dpdk_preflight::system::{HostSummary, HostSystem};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Initialize logging; stdout is reserved for the report
    let default_level = match args.verbose {
        0 => "error",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: CliArgs) -> Result<i32> {
    let config = PreflightConfig::from_cli(&args).map_err(PreflightError::ConfigError)?;

    match &args.command {
        None | Some(Commands::Check) => cmd_check(&args, &config),
        Some(Commands::Libs {
            pkg_config,
            lib_dir,
            cargo,
        }) => cmd_libs(&config, *pkg_config, lib_dir.clone(), *cargo),
    }
}

fn cmd_check(args: &CliArgs, config: &PreflightConfig) -> Result<i32> {
    let host = HostSystem::new(config);

    match args.format {
        OutputFormat::Text => {
            if !args.no_summary {
                HostSummary::collect().print();
            }
            let report = run_preflight(&host, config);
            report.print();
            Ok(report.exit_code())
        }
        OutputFormat::Json => {
            let report = run_preflight(&host, config);
            println!("{}", report.to_json()?);
            Ok(report.exit_code())
        }
    }
}

fn cmd_libs(
    config: &PreflightConfig,
    pkg_config: bool,
    lib_dir: Option<PathBuf>,
    cargo: bool,
) -> Result<i32> {
    let libs = if pkg_config {
        LinkLibraries::from_pkg_config()?
    } else {
        let dir = lib_dir
            .or_else(|| config.dpdk_lib_dir())
            .ok_or(PreflightError::MissingEnv("RTE_SDK"))?;
        LinkLibraries::from_dir(&dir)?
    };

    if libs.is_empty() {
        eprintln!("No DPDK libraries found");
        return Ok(1);
    }

    if cargo {
        print!("{}", libs.cargo_directives());
    } else {
        println!("{}", libs.linker_flags());
    }

    Ok(0)
}
