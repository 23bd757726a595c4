use crate::domain::model::PeakMemory;
use crate::domain::ports::PeakMemoryProbe;
use crate::utils::error::{ProbeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    /// getrusage on Unix, sysinfo elsewhere
    #[default]
    Auto,
    Rusage,
    Sysinfo,
}

impl ProbeKind {
    pub fn is_available(self) -> bool {
        match self {
            ProbeKind::Auto => true,
            ProbeKind::Rusage => cfg!(unix),
            ProbeKind::Sysinfo => cfg!(feature = "cli"),
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProbeKind::Auto => "auto",
            ProbeKind::Rusage => "rusage",
            ProbeKind::Sysinfo => "sysinfo",
        };
        f.write_str(name)
    }
}

pub fn select_probe(kind: ProbeKind) -> Result<Box<dyn PeakMemoryProbe>> {
    match kind {
        ProbeKind::Auto => {
            #[cfg(unix)]
            {
                Ok(Box::new(RusageProbe))
            }
            #[cfg(all(not(unix), feature = "cli"))]
            {
                Ok(Box::new(SysinfoProbe::new()?))
            }
            #[cfg(all(not(unix), not(feature = "cli")))]
            {
                Ok(Box::new(UnsupportedProbe))
            }
        }
        ProbeKind::Rusage => {
            #[cfg(unix)]
            {
                Ok(Box::new(RusageProbe))
            }
            #[cfg(not(unix))]
            {
                Err(ProbeError::unsupported())
            }
        }
        ProbeKind::Sysinfo => {
            #[cfg(feature = "cli")]
            {
                Ok(Box::new(SysinfoProbe::new()?))
            }
            #[cfg(not(feature = "cli"))]
            {
                Err(ProbeError::unsupported())
            }
        }
    }
}

/// `getrusage(RUSAGE_SELF)`; reads `ru_maxrss`.
#[cfg(unix)]
#[derive(Debug, Clone, Copy, Default)]
pub struct RusageProbe;

#[cfg(unix)]
impl PeakMemoryProbe for RusageProbe {
    fn name(&self) -> &'static str {
        "rusage"
    }

    fn peak_memory(&self) -> Result<PeakMemory> {
        use std::mem::MaybeUninit;

        let mut usage = MaybeUninit::<libc::rusage>::uninit();
        // SAFETY: `usage` is a valid, writable out-pointer for one `rusage`.
        let rc = unsafe { libc::getrusage(libc::RUSAGE_SELF, usage.as_mut_ptr()) };
        if rc != 0 {
            return Err(ProbeError::Rusage(std::io::Error::last_os_error()));
        }
        // SAFETY: getrusage returned 0, so it filled in `usage`.
        let usage = unsafe { usage.assume_init() };
        let raw = u64::try_from(usage.ru_maxrss).unwrap_or_default();

        tracing::debug!("getrusage ru_maxrss = {}", raw);
        Ok(maxrss_to_peak(raw))
    }
}

// Linux and the BSDs report KiB; Apple platforms report bytes.
#[cfg(unix)]
fn maxrss_to_peak(raw: u64) -> PeakMemory {
    if cfg!(any(target_os = "macos", target_os = "ios")) {
        PeakMemory::from_bytes(raw)
    } else {
        PeakMemory::from_kilobytes(raw)
    }
}

#[cfg(feature = "cli")]
pub use self::sampled::SysinfoProbe;

#[cfg(feature = "cli")]
mod sampled {
    use super::*;
    use std::sync::Mutex;
    use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

    /// Resident memory sampled through sysinfo. Keeps the highest value seen,
    /// so readings are a lower bound on the real peak.
    pub struct SysinfoProbe {
        pid: Pid,
        state: Mutex<SampleState>,
    }

    struct SampleState {
        system: System,
        observed_peak_bytes: u64,
    }

    impl SysinfoProbe {
        pub fn new() -> Result<Self> {
            let pid = sysinfo::get_current_pid().map_err(|_| ProbeError::ProcessNotFound {
                pid: std::process::id(),
            })?;

            Ok(Self {
                pid,
                state: Mutex::new(SampleState {
                    system: System::new(),
                    observed_peak_bytes: 0,
                }),
            })
        }
    }

    impl PeakMemoryProbe for SysinfoProbe {
        fn name(&self) -> &'static str {
            "sysinfo"
        }

        fn peak_memory(&self) -> Result<PeakMemory> {
            let mut state = self
                .state
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());

            state.system.refresh_processes_specifics(
                ProcessesToUpdate::Some(&[self.pid]),
                false,
                ProcessRefreshKind::nothing().with_memory(),
            );

            let current = state
                .system
                .process(self.pid)
                .map(|process| process.memory())
                .ok_or(ProbeError::ProcessNotFound {
                    pid: self.pid.as_u32(),
                })?;

            state.observed_peak_bytes = state.observed_peak_bytes.max(current);
            tracing::debug!(
                "sysinfo resident = {} bytes, observed peak = {} bytes",
                current,
                state.observed_peak_bytes
            );

            Ok(PeakMemory::from_bytes(state.observed_peak_bytes))
        }
    }
}

/// Stands in on targets with no way to read process memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedProbe;

impl PeakMemoryProbe for UnsupportedProbe {
    fn name(&self) -> &'static str {
        "unsupported"
    }

    fn peak_memory(&self) -> Result<PeakMemory> {
        Err(ProbeError::unsupported())
    }
}
