use crate::core::probe::ProbeKind;
use crate::utils::error::{ProbeError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_probe_available(field_name: &str, kind: ProbeKind) -> Result<()> {
    if kind.is_available() {
        return Ok(());
    }

    Err(ProbeError::InvalidConfigValue {
        field: field_name.to_string(),
        value: kind.to_string(),
        reason: format!("Probe not available on {}", std::env::consts::OS),
    })
}
