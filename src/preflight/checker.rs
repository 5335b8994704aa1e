//! The preflight check sequence
//!
//! Checks run in a fixed order: hyperthreading, core count, free memory,
//! devices. A failed hard requirement stops the run; later checks are not
//! attempted.

use super::diagnostics::CheckKind;
use super::report::{PreflightReport, PreflightStatus};
use crate::config::PreflightConfig;
use crate::system::{CpuTopology, DeviceReport, FreeMemory, SystemSource};

/// Script shipped with the dataplane to turn sibling threads off
pub const NO_HYPERTHREAD_HINT: &str = "Run: `sudo ./no_hyperthread.sh`";

/// Runs the preflight checks against a system source
pub struct PreflightChecker<'a, S: SystemSource + ?Sized> {
    source: &'a S,
    config: &'a PreflightConfig,
}

/// Whether the run may continue after a check
enum Flow {
    Continue,
    Halt,
}

impl<'a, S: SystemSource + ?Sized> PreflightChecker<'a, S> {
    /// Create a checker
    pub fn new(source: &'a S, config: &'a PreflightConfig) -> Self {
        Self { source, config }
    }

    /// Run all checks and collect the report
    pub fn run(&self) -> PreflightReport {
        let mut report = PreflightReport::new();

        self.check_hyperthreading(&mut report);

        let hard_checks: [fn(&Self, &mut PreflightReport) -> Flow; 3] =
            [Self::check_cores, Self::check_memory, Self::check_devices];

        for check in hard_checks {
            if let Flow::Halt = check(self, &mut report) {
                report.status = PreflightStatus::Failed;
                break;
            }
        }

        tracing::info!(
            "Preflight finished: {:?} ({} findings)",
            report.status,
            report.diagnostics.len()
        );

        report
    }

    /// Advisory only
    fn check_hyperthreading(&self, report: &mut PreflightReport) {
        let listing = match self.source.cpu_topology() {
            Ok(listing) => listing,
            Err(e) => {
                report.diagnostics.warn(
                    CheckKind::Hyperthreading,
                    format!("could not read CPU topology: {}", e),
                );
                return;
            }
        };

        let enabled = CpuTopology::parse(&listing).hyperthreading_enabled();
        report.hyperthreading = Some(enabled);

        if enabled {
            report
                .diagnostics
                .warn(CheckKind::Hyperthreading, "disable hyperthreading");
            report
                .diagnostics
                .warn(CheckKind::Hyperthreading, NO_HYPERTHREAD_HINT);
        }
    }

    fn check_cores(&self, report: &mut PreflightReport) -> Flow {
        let cores = self.source.logical_cores();
        report.cores = Some(cores);

        if cores < self.config.min_cores {
            report.diagnostics.error(
                CheckKind::Cores,
                format!(
                    "Too few cores: found {}, need at least {}",
                    cores, self.config.min_cores
                ),
            );
            return Flow::Halt;
        }

        report
            .diagnostics
            .info(CheckKind::Cores, format!("sockets found: {}", cores));
        Flow::Continue
    }

    fn check_memory(&self, report: &mut PreflightReport) -> Flow {
        let min_gb = self.config.min_free_memory_gb;

        let free = match self.source.meminfo().and_then(|text| FreeMemory::parse(&text)) {
            Ok(free) => free,
            Err(e) => {
                report.diagnostics.error(
                    CheckKind::Memory,
                    format!("could not determine free memory: {}", e),
                );
                return Flow::Halt;
            }
        };

        let gb = free.gigabytes();
        report.free_memory_gb = Some(gb);
        report
            .diagnostics
            .info(CheckKind::Memory, format!("memory found: {} gb", gb));

        if !free.meets(min_gb) {
            report.diagnostics.error(
                CheckKind::Memory,
                format!(
                    "Should have at least {} gb of free memory (found {} gb)",
                    min_gb, gb
                ),
            );
            return Flow::Halt;
        }

        Flow::Continue
    }

    fn check_devices(&self, report: &mut PreflightReport) -> Flow {
        let devices = match self.source.devbind_status() {
            Ok(status) => DeviceReport::classify(&status),
            Err(e) => {
                report
                    .diagnostics
                    .error(CheckKind::Devices, format!("device status unavailable: {}", e));
                DeviceReport::default()
            }
        };

        let flow = match (devices.primary.is_empty(), devices.backup.is_empty()) {
            (false, false) => {
                report.diagnostics.info(
                    CheckKind::Devices,
                    format!("Primary cards: {}", card_list(&devices.primary)),
                );
                report.diagnostics.info(
                    CheckKind::Devices,
                    format!("Backup cards: {}", card_list(&devices.backup)),
                );
                Flow::Continue
            }
            (false, true) => {
                report.diagnostics.info(
                    CheckKind::Devices,
                    format!("Primary cards: {}", card_list(&devices.primary)),
                );
                report
                    .diagnostics
                    .warn(CheckKind::Devices, "no backup cards found");
                Flow::Continue
            }
            (true, false) => {
                report
                    .diagnostics
                    .error(CheckKind::Devices, "primary devs not found");
                report.diagnostics.info(
                    CheckKind::Devices,
                    format!("Backup cards: {}", card_list(&devices.backup)),
                );
                Flow::Continue
            }
            (true, true) => {
                report
                    .diagnostics
                    .error(CheckKind::Devices, "no suitable eth cards found");
                Flow::Halt
            }
        };

        report.devices = Some(devices);
        flow
    }
}

/// `['a', 'b']`, the list form operators already grep for
fn card_list(cards: &[String]) -> String {
    let quoted: Vec<String> = cards.iter().map(|c| format!("'{}'", c)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Run the full preflight sequence against `source`
pub fn run_preflight<S: SystemSource + ?Sized>(
    source: &S,
    config: &PreflightConfig,
) -> PreflightReport {
    PreflightChecker::new(source, config).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preflight::Severity;
    use crate::system::StaticSource;
    use proptest::prelude::*;

    fn run(source: &StaticSource) -> PreflightReport {
        run_preflight(source, &PreflightConfig::default())
    }

    fn messages(report: &PreflightReport, severity: Severity) -> Vec<String> {
        report
            .diagnostics
            .with_severity(severity)
            .map(|d| d.message.clone())
            .collect()
    }

    fn meminfo_kb(kb: u64) -> String {
        format!("MemTotal: 32000000 kB\nMemFree:        {} kB\n", kb)
    }

    #[test]
    fn test_healthy_host_passes() {
        let report = run(&StaticSource::healthy());
        assert_eq!(report.status, PreflightStatus::Passed);
        assert_eq!(report.hyperthreading, Some(false));
        assert_eq!(report.cores, Some(4));
        assert_eq!(report.free_memory_gb, Some(8.0));
        assert!(messages(&report, Severity::Error).is_empty());
        assert_eq!(
            messages(&report, Severity::Info),
            vec![
                "sockets found: 4",
                "memory found: 8 gb",
                "Primary cards: ['0000:02:00.0']",
                "Backup cards: ['0000:01:00.1']",
            ]
        );
    }

    #[test]
    fn test_hyperthreading_is_advisory() {
        let source = StaticSource::healthy().with_topology("0,0\n1,0\n2,1\n3,1\n");
        let report = run(&source);
        assert_eq!(report.hyperthreading, Some(true));
        assert_eq!(report.exit_code(), 0);
        assert_eq!(
            messages(&report, Severity::Warning),
            vec!["disable hyperthreading", NO_HYPERTHREAD_HINT]
        );
    }

    #[test]
    fn test_missing_topology_is_advisory() {
        let mut source = StaticSource::healthy();
        source.topology = None;
        let report = run(&source);
        assert_eq!(report.hyperthreading, None);
        assert!(report.is_success());
        assert_eq!(report.diagnostics.for_check(CheckKind::Hyperthreading).count(), 1);
    }

    #[test]
    fn test_too_few_cores_halts() {
        let report = run(&StaticSource::healthy().with_cores(2));
        assert_eq!(report.exit_code(), 1);
        assert_eq!(
            messages(&report, Severity::Error),
            vec!["Too few cores: found 2, need at least 4"]
        );
        // later checks never ran
        assert!(report.free_memory_gb.is_none());
        assert!(report.devices.is_none());
    }

    #[test]
    fn test_memory_examples() {
        let report = run(&StaticSource::healthy().with_meminfo(meminfo_kb(5_000_000)));
        assert_eq!(report.free_memory_gb, Some(5.0));
        assert!(report.is_success());

        let report = run(&StaticSource::healthy().with_meminfo(meminfo_kb(2_000_000)));
        assert_eq!(report.free_memory_gb, Some(2.0));
        assert_eq!(report.exit_code(), 1);
        assert!(report.devices.is_none());
        // value is reported before the threshold verdict
        let memory: Vec<_> = report
            .diagnostics
            .for_check(CheckKind::Memory)
            .map(|d| (d.severity, d.message.as_str()))
            .collect();
        assert_eq!(
            memory,
            vec![
                (Severity::Info, "memory found: 2 gb"),
                (
                    Severity::Error,
                    "Should have at least 4 gb of free memory (found 2 gb)"
                ),
            ]
        );
    }

    #[test]
    fn test_card_list_format() {
        assert_eq!(card_list(&[]), "[]");
        assert_eq!(
            card_list(&["eth1".to_string(), "0000:02:00.0".to_string()]),
            "['eth1', '0000:02:00.0']"
        );
    }

    #[test]
    fn test_isolated_cpus_count_toward_cores() {
        // count comes from the source, not from this process's affinity
        let source = StaticSource::healthy()
            .with_cores(8)
            .with_topology("0,0\n1,1\n2,2\n3,3\n4,4\n5,5\n6,6\n7,7\n");
        let report = run(&source);
        assert_eq!(report.cores, Some(8));
        assert!(report.is_success());
    }

    #[test]
    fn test_unreadable_meminfo_halts() {
        let report = run(&StaticSource::healthy().with_meminfo("MemTotal: 1 kB\n"));
        assert_eq!(report.exit_code(), 1);
        assert!(report.free_memory_gb.is_none());
    }

    #[test]
    fn test_primary_without_backup() {
        let source = StaticSource::healthy()
            .with_devbind("eth0 if=eth0 drv=x *Active*\neth1 if=eth1 drv=x\n");
        let report = run(&source);
        let devices = report.devices.as_ref().unwrap();
        assert_eq!(devices.primary, vec!["eth1"]);
        assert!(devices.backup.is_empty());
        assert_eq!(report.exit_code(), 0);
        assert_eq!(messages(&report, Severity::Warning), vec!["no backup cards found"]);
    }

    #[test]
    fn test_backup_only_reports_error_and_passes() {
        let source = StaticSource::healthy().with_devbind(
            "0000:01:00.0 'NIC' if=a drv=x *Active*\n0000:01:00.1 'NIC' if=b drv=x\n",
        );
        let report = run(&source);
        assert_eq!(report.exit_code(), 0);
        assert_eq!(messages(&report, Severity::Error), vec!["primary devs not found"]);
        assert!(messages(&report, Severity::Info).contains(&"Backup cards: ['0000:01:00.1']".to_string()));
    }

    #[test]
    fn test_no_devices_halts() {
        let source = StaticSource::healthy().with_devbind("eth0 if=eth0 drv=x *Active*\n");
        let report = run(&source);
        assert_eq!(report.exit_code(), 1);
        assert_eq!(
            messages(&report, Severity::Error),
            vec!["no suitable eth cards found"]
        );
    }

    #[test]
    fn test_missing_rte_sdk_reports_and_halts() {
        let report = run(&StaticSource::healthy().without_devbind());
        let errors = messages(&report, Severity::Error);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("RTE_SDK undefined"));
        assert_eq!(errors[1], "no suitable eth cards found");
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = PreflightConfig {
            min_cores: 2,
            min_free_memory_gb: 1.0,
            ..Default::default()
        };
        let source = StaticSource::healthy()
            .with_cores(2)
            .with_meminfo(meminfo_kb(1_500_000));
        assert!(run_preflight(&source, &config).is_success());
    }

    #[test]
    fn test_trait_object_source() {
        let source: Box<dyn SystemSource> = Box::new(StaticSource::healthy());
        let report = run_preflight(source.as_ref(), &PreflightConfig::default());
        assert!(report.is_success());
    }

    #[test]
    fn test_idempotent() {
        let source = StaticSource::healthy().with_topology("0,1\n");
        assert_eq!(run(&source), run(&source));
    }

    proptest! {
        #[test]
        fn prop_core_threshold(cores in 0usize..64) {
            let report = run(&StaticSource::healthy().with_cores(cores));
            let halted_on_cores = report.free_memory_gb.is_none();
            prop_assert_eq!(halted_on_cores, cores < 4);
            if cores < 4 {
                prop_assert_eq!(report.exit_code(), 1);
            }
        }

        #[test]
        fn prop_memory_threshold(kb in 0u64..16_000_000) {
            let report = run(&StaticSource::healthy().with_meminfo(meminfo_kb(kb)));
            let passes = kb as f64 / 1_000_000.0 >= 4.0;
            prop_assert_eq!(report.is_success(), passes);
        }
    }
}
