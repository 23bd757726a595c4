use crate::core::probe::ProbeKind;
use crate::utils::validation::{validate_probe_available, Validate};
use crate::utils::error::Result;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Options here only shape diagnostics on stderr; stdout is fixed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "hello-probe")]
#[command(about = "Prints a greeting, a sum and the process's peak memory usage")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct CliConfig {
    #[arg(long, help = "Enable verbose diagnostics on stderr")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[arg(long, help = "Log process stats after each step")]
    pub monitor: bool,

    #[arg(long, value_enum, default_value_t = ProbeKind::Auto)]
    pub probe: ProbeKind,
}

impl CliConfig {
    /// Parses `args`, falling back to defaults on any error so stray
    /// arguments never change the program's output. The parse error, if any,
    /// is handed back for logging once the logger is up.
    pub fn parse_lenient<I, T>(args: I) -> (Self, Option<clap::Error>)
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        match Self::try_parse_from(args) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_probe_available("probe", self.probe)
    }
}
