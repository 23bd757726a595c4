pub mod probe;
pub mod runner;
