use crate::domain::model::PeakMemory;
use crate::utils::error::Result;

/// Query the peak resident memory of the current process.
pub trait PeakMemoryProbe: Send + Sync {
    fn name(&self) -> &'static str;
    fn peak_memory(&self) -> Result<PeakMemory>;
}

impl<P: PeakMemoryProbe + ?Sized> PeakMemoryProbe for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn peak_memory(&self) -> Result<PeakMemory> {
        (**self).peak_memory()
    }
}
