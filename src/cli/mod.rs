//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, signal handling,
//! the interactive recorder session and the offline commands.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod presenter;
pub mod signals;
pub mod trim_cmd;

// Re-export commonly used types
pub use app::{run_session, SessionCommand, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{init_logging, Cli, Commands, ConfigAction, SessionOptions};
pub use presenter::Presenter;
pub use trim_cmd::{run_trim, TrimCommandError, TrimOptions};
