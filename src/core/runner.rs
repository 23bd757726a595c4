use crate::domain::model::{Operands, PeakMemory, Report, GREETING};
use crate::domain::ports::PeakMemoryProbe;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::io::Write;

pub struct DemoRunner<P: PeakMemoryProbe> {
    probe: P,
    operands: Operands,
    monitor: SystemMonitor,
}

impl<P: PeakMemoryProbe> DemoRunner<P> {
    pub fn new(probe: P) -> Self {
        Self::new_with_monitoring(probe, false)
    }

    pub fn new_with_monitoring(probe: P, monitor_enabled: bool) -> Self {
        Self {
            probe,
            operands: Operands::fixed(),
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Writes the greeting, sum and memory lines to `out`, in that order.
    ///
    /// A failed memory query is logged and reported as `0 KB`; only write
    /// errors are returned.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<Report> {
        tracing::debug!("Running with probe '{}'", self.probe.name());

        let sum = self.operands.sum();
        let mut report = Report {
            greeting: GREETING,
            sum,
            peak_memory: PeakMemory::ZERO,
        };

        writeln!(out, "{}", report.greeting_line())?;
        self.monitor.log_stats("Greeting");

        tracing::debug!("{} + {} = {}", self.operands.a, self.operands.b, sum);
        writeln!(out, "{}", report.sum_line())?;
        self.monitor.log_stats("Arithmetic");

        report.peak_memory = match self.probe.peak_memory() {
            Ok(peak) => peak,
            Err(e) => {
                tracing::warn!(
                    "Peak memory query via '{}' failed, reporting 0: {}",
                    self.probe.name(),
                    e
                );
                PeakMemory::ZERO
            }
        };
        writeln!(out, "{}", report.memory_line())?;
        out.flush()?;
        self.monitor.log_stats("Memory report");

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::probe::UnsupportedProbe;
    use crate::utils::error::ProbeError;
    use std::io;

    struct FixedProbe(u64);

    impl PeakMemoryProbe for FixedProbe {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn peak_memory(&self) -> Result<PeakMemory> {
            Ok(PeakMemory::from_kilobytes(self.0))
        }
    }

    struct FailingProbe;

    impl PeakMemoryProbe for FailingProbe {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn peak_memory(&self) -> Result<PeakMemory> {
            Err(ProbeError::Rusage(io::Error::from(io::ErrorKind::PermissionDenied)))
        }
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn run_to_string<P: PeakMemoryProbe>(runner: &DemoRunner<P>) -> (Report, String) {
        let mut out = Vec::new();
        let report = runner.run(&mut out).unwrap();
        (report, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_writes_three_lines_in_order() {
        let (report, output) = run_to_string(&DemoRunner::new(FixedProbe(2048)));

        assert_eq!(output, "Hello, World!\nSum: 15\nMemory usage: 2048 KB\n");
        assert_eq!(report.sum, 15);
        assert_eq!(report.peak_memory.kilobytes, 2048);
    }

    #[test]
    fn test_failed_probe_reports_zero() {
        let (report, output) = run_to_string(&DemoRunner::new(FailingProbe));

        assert_eq!(report.peak_memory, PeakMemory::ZERO);
        assert_eq!(output.lines().nth(2), Some("Memory usage: 0 KB"));
        assert_eq!(output.lines().count(), 3);
    }

    #[test]
    fn test_unsupported_probe_reports_zero() {
        let (_, output) = run_to_string(&DemoRunner::new(UnsupportedProbe));
        assert_eq!(output.lines().last(), Some("Memory usage: 0 KB"));
    }

    #[test]
    fn test_boxed_probe_runs() {
        let probe: Box<dyn PeakMemoryProbe> = Box::new(FixedProbe(7));
        let (_, output) = run_to_string(&DemoRunner::new(probe));
        assert!(output.ends_with("Memory usage: 7 KB\n"));
    }

    #[test]
    fn test_repeated_runs_are_stable() {
        let runner = DemoRunner::new(FixedProbe(100));
        let (_, first) = run_to_string(&runner);
        let (_, second) = run_to_string(&runner);
        assert_eq!(first, second);
    }

    #[test]
    fn test_write_failure_is_returned() {
        let runner = DemoRunner::new(FixedProbe(1));
        let err = runner.run(&mut ClosedPipe).unwrap_err();
        assert!(matches!(err, ProbeError::Output(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_monitoring_does_not_touch_output() {
        let (_, output) = run_to_string(&DemoRunner::new_with_monitoring(FixedProbe(3), true));
        assert_eq!(output, "Hello, World!\nSum: 15\nMemory usage: 3 KB\n");
    }
}
