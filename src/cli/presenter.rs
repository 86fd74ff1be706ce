//! CLI presenter for output formatting

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::presentation::View;

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
    is_spinner_active: Arc<AtomicBool>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self {
            spinner: None,
            is_spinner_active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
        self.is_spinner_active.store(true, Ordering::SeqCst);
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
        self.is_spinner_active.store(false, Ordering::SeqCst);
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
        self.is_spinner_active.store(false, Ordering::SeqCst);
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Output text to stdout without newline
    pub fn output_inline(&self, text: &str) {
        print!("{}", text);
        let _ = io::stdout().flush();
    }

    /// One status line for the recorder screen
    pub fn format_view(&self, view: &View) -> String {
        let mut parts = Vec::new();

        if let Some(remaining) = view.countdown {
            parts.push(format!("{} {}", "Starting in".yellow(), remaining.to_string().bold()));
        }
        if view.recording_banner {
            parts.push(format!("{} Recording in progress...", "●".red()));
        }
        if let Some(ref timer) = view.timer {
            parts.push(timer.clone());
        }
        if let Some(ref name) = view.download_name {
            parts.push(format!("{} {}", "▶".green(), name));
        }

        let controls = if view.recording_banner {
            format!("[s] {}", view.record_button)
        } else {
            format!("[c] {}  [r] {}", view.countdown_button, view.record_button)
        };
        parts.push(controls.dimmed().to_string());

        if view.download_name.is_some() {
            parts.push("[p] Play  [w] Download  [d] Delete".dimmed().to_string());
        }

        parts.join("  ")
    }

    /// Print the recorder screen
    pub fn render(&self, view: &View) {
        eprintln!("{}", self.format_view(view));
    }

    /// Print the interactive key help
    pub fn session_help(&self) {
        eprintln!("{}", "Commands:".bold());
        for (key, action) in [
            ("c", "Start recording with countdown"),
            ("r", "Start recording"),
            ("s", "Stop recording"),
            ("p", "Play recording"),
            ("w", "Download recording"),
            ("d", "Delete recording"),
            ("h", "Show this help"),
            ("q", "Quit"),
        ] {
            eprintln!("  {}  {}", key.cyan(), action);
        }
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}
