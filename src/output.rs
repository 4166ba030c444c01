// ABOUTME: User-facing output for the convoy CLI.
// ABOUTME: Normal, quiet (CI), and JSON-lines modes.

use serde_json::json;

/// How the CLI talks to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Progress lines plus the final result.
    Normal,
    /// Final result only.
    Quiet,
    /// One JSON object per line for scripting.
    Json,
}

/// Routes progress, warnings, and results to stdout/stderr per mode.
pub struct Output {
    mode: OutputMode,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    /// Intermediate progress. Suppressed outside normal mode.
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// A non-fatal warning. Always goes to stderr.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Json => eprintln!("{}", json!({ "event": "warning", "message": message })),
            _ => eprintln!("Warning: {message}"),
        }
    }

    /// The final result of a successful run.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Json => println!("{}", json!({ "event": "success", "message": message })),
            _ => println!("{message}"),
        }
    }

    /// A fatal error. The caller decides the exit code.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Json => eprintln!("{}", json!({ "event": "error", "message": message })),
            _ => eprintln!("Error: {message}"),
        }
    }
}
