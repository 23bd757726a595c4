use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Resource usage query failed: {0}")]
    Rusage(#[source] std::io::Error),

    #[error("Current process (pid {pid}) not visible to the system monitor")]
    ProcessNotFound { pid: u32 },

    #[error("Peak memory query is not supported on {platform}")]
    Unsupported { platform: String },

    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),

    #[error("Invalid configuration value for '{field}': '{value}' - {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl ProbeError {
    pub fn unsupported() -> Self {
        ProbeError::Unsupported {
            platform: std::env::consts::OS.to_string(),
        }
    }

    /// Probe and configuration failures fall back to defaults; an output
    /// failure means the report cannot be delivered at all.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ProbeError::Output(_))
    }
}

pub type Result<T> = std::result::Result<T, ProbeError>;
