pub mod cli;

pub use cli::{CliConfig, LogFormat};
