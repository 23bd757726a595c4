use hello_probe::core::probe::{select_probe, ProbeKind, UnsupportedProbe};
use hello_probe::utils::{logger, validation::Validate};
use hello_probe::{CliConfig, DemoRunner, LogFormat, PeakMemoryProbe};

fn main() -> anyhow::Result<()> {
    let (config, parse_error) = CliConfig::parse_lenient(std::env::args_os());

    logger::init_cli_logger(config.verbose, config.log_format == LogFormat::Json);

    if let Some(e) = parse_error {
        tracing::debug!("Ignoring command-line arguments ({:?})", e.kind());
    }
    tracing::debug!("CLI config: {:?}", config);

    let probe_kind = match config.validate() {
        Ok(()) => config.probe,
        Err(e) => {
            tracing::warn!("{}; falling back to '{}'", e, ProbeKind::Auto);
            ProbeKind::Auto
        }
    };

    let probe: Box<dyn PeakMemoryProbe> = match select_probe(probe_kind) {
        Ok(probe) => probe,
        Err(e) => {
            tracing::warn!("No peak memory probe available: {}", e);
            Box::new(UnsupportedProbe)
        }
    };

    if config.monitor {
        tracing::info!("System monitoring enabled");
    }

    let runner = DemoRunner::new_with_monitoring(probe, config.monitor);
    let stdout = std::io::stdout();
    match runner.run(&mut stdout.lock()) {
        Ok(report) => {
            if let Ok(json) = serde_json::to_string(&report) {
                tracing::debug!("Report: {}", json);
            }
        }
        // Exit status stays 0 whatever happens to stdout.
        Err(e) if e.is_recoverable() => tracing::warn!("Report incomplete: {}", e),
        Err(e) => tracing::error!("Report not delivered: {}", e),
    }

    Ok(())
}
