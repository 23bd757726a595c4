#[cfg(feature = "cli")]
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, LogFormat};

pub use crate::core::{probe::ProbeKind, runner::DemoRunner};
pub use domain::model::{Operands, PeakMemory, Report};
pub use domain::ports::PeakMemoryProbe;
pub use utils::error::{ProbeError, Result};
