//! Galleria Logging & Observability
//!
//! Structured logging to console and a rolling JSON file, plus a panic hook
//! that leaves a crash report behind.

mod logging;
mod panic_hook;

pub use logging::{cleanup_old_logs, cleanup_logs_in, init_logging, LogGuard};
pub use panic_hook::init_panic_hook;

use directories::ProjectDirs;
use std::path::PathBuf;

/// Get the application log directory
pub fn log_dir() -> PathBuf {
    ProjectDirs::from("com", "Galleria", "Galleria")
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Initialize logging and crash reporting.
///
/// The returned guard flushes the file writer when dropped, so keep it alive
/// until the event loop exits.
pub fn init() -> anyhow::Result<LogGuard> {
    let guard = init_logging()?;
    init_panic_hook();
    Ok(guard)
}
