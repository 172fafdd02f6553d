//! Styled console output mirrored to structured tracing events.
//!
//! The console surface (stdout, ANSI color, ✓/✗/→ indicators) is what the
//! user watches during a run; every message is also emitted as a `tracing`
//! event so `RUST_LOG` (or `--verbose`) exposes the same stream on stderr
//! with timestamps via [`tracing_subscriber`].

use std::sync::Mutex;

const HEADER: &str = "\x1b[95m";
const BLUE: &str = "\x1b[94m";
const GREEN: &str = "\x1b[92m";
const YELLOW: &str = "\x1b[93m";
const RED: &str = "\x1b[91m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

const CHECK: &str = "✓";
const CROSS: &str = "✗";
const ARROW: &str = "→";

/// Display surface used by the synchronizer and installer.
///
/// Implemented by [`Logger`] for real runs and by [`MemoryLog`] in tests so
/// core logic stays terminal-free.
pub trait Log: Send + Sync {
    /// Major section header.
    fn stage(&self, msg: &str);
    /// Neutral informational line.
    fn info(&self, msg: &str);
    /// Per-file progress line (`→`), emitted as work starts.
    fn step(&self, msg: &str);
    /// Success line (`✓`).
    fn success(&self, msg: &str);
    /// Failure line (`✗`).
    fn failure(&self, msg: &str);
    /// Warning line.
    fn warn(&self, msg: &str);
    /// Diagnostic line; console output only in verbose mode.
    fn debug(&self, msg: &str);
}

/// Install the global tracing subscriber.
///
/// Honors `RUST_LOG` when set; otherwise `--verbose` enables debug-level
/// events for this crate and the default is errors only. Events go to
/// stderr so they never interleave with the styled stdout surface.
pub fn init(verbose: bool) {
    let default = if verbose { "dotsync=debug" } else { "error" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Console logger for interactive runs.
#[derive(Debug)]
pub struct Logger {
    verbose: bool,
}

impl Logger {
    /// Create a logger; `verbose` also surfaces [`Log::debug`] lines on the
    /// console.
    #[must_use]
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Log for Logger {
    fn stage(&self, msg: &str) {
        println!("\n{HEADER}{BOLD}{}{RESET}", "=".repeat(50));
        println!("{HEADER}{BOLD}{msg}{RESET}");
        println!("{HEADER}{BOLD}{}{RESET}", "=".repeat(50));
        tracing::info!(target: "dotsync::stage", "{msg}");
    }

    fn info(&self, msg: &str) {
        println!("{msg}");
        tracing::info!("{msg}");
    }

    fn step(&self, msg: &str) {
        println!("{BLUE}{ARROW} {msg}{RESET}");
        tracing::info!("{msg}");
    }

    fn success(&self, msg: &str) {
        println!("  {GREEN}{CHECK} {msg}{RESET}");
        tracing::info!("ok: {msg}");
    }

    fn failure(&self, msg: &str) {
        println!("  {RED}{CROSS} {msg}{RESET}");
        tracing::error!("{msg}");
    }

    fn warn(&self, msg: &str) {
        println!("{YELLOW}{msg}{RESET}");
        tracing::warn!("{msg}");
    }

    fn debug(&self, msg: &str) {
        if self.verbose {
            println!("{BLUE}{msg}{RESET}");
        }
        tracing::debug!("{msg}");
    }
}

/// In-memory log that records every message with its kind.
///
/// Used by unit and integration tests to assert on streaming output without
/// capturing stdout.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<(&'static str, String)>>,
}

impl MemoryLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, kind: &'static str, msg: &str) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push((kind, msg.to_string()));
        }
    }

    /// All recorded `(kind, message)` pairs in emission order.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        self.entries.lock().map_or_else(|_| Vec::new(), |g| g.clone())
    }

    /// Messages of one kind (`"step"`, `"success"`, `"failure"`, …).
    #[must_use]
    pub fn messages_of(&self, kind: &str) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, m)| m)
            .collect()
    }
}

impl Log for MemoryLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }

    fn info(&self, msg: &str) {
        self.push("info", msg);
    }

    fn step(&self, msg: &str) {
        self.push("step", msg);
    }

    fn success(&self, msg: &str) {
        self.push("success", msg);
    }

    fn failure(&self, msg: &str) {
        self.push("failure", msg);
    }

    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }

    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
}
