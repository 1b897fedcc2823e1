pub mod config;
pub mod error;
pub mod git;
pub mod grid;
pub mod host;
pub mod render;
pub mod runner;
pub mod session;
pub mod time;
pub mod width;

pub use config::StatuslineConfig;
pub use error::{Result, StatuslineError};
pub use render::{gather_snapshot, render_snapshot, render_statusline, Snapshot};
pub use runner::{CommandRunner, ProcessRunner};
