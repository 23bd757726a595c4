use serde::Serialize;
use std::fmt;

pub const GREETING: &str = "Hello, World!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Operands {
    pub a: i32,
    pub b: i32,
}

impl Operands {
    pub const fn fixed() -> Self {
        Self { a: 5, b: 10 }
    }

    pub fn sum(&self) -> i32 {
        self.a + self.b
    }
}

impl Default for Operands {
    fn default() -> Self {
        Self::fixed()
    }
}

/// Peak resident memory, in kilobytes (1 KB = 1024 bytes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct PeakMemory {
    pub kilobytes: u64,
}

impl PeakMemory {
    pub const ZERO: PeakMemory = PeakMemory { kilobytes: 0 };

    pub fn from_kilobytes(kilobytes: u64) -> Self {
        Self { kilobytes }
    }

    /// Rounds to the nearest kilobyte.
    pub fn from_bytes(bytes: u64) -> Self {
        Self {
            kilobytes: bytes / 1024 + u64::from(bytes % 1024 >= 512),
        }
    }
}

impl fmt::Display for PeakMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} KB", self.kilobytes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub greeting: &'static str,
    pub sum: i32,
    pub peak_memory: PeakMemory,
}

impl Report {
    pub fn greeting_line(&self) -> String {
        self.greeting.to_string()
    }

    pub fn sum_line(&self) -> String {
        format!("Sum: {}", self.sum)
    }

    pub fn memory_line(&self) -> String {
        format!("Memory usage: {}", self.peak_memory)
    }
}
