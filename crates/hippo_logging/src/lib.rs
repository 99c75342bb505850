#![deny(missing_docs)]
//! Shared logging utilities for the scraper workspace.
//!
//! This crate provides the `hippo_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger.

use std::cell::Cell;

thread_local! {
    /// Thread-local storage for the id of the job being processed.
    static CURRENT_JOB: Cell<u64> = const { Cell::new(0) };
}

/// Sets the job id of the project page being processed on this thread.
/// The runner calls this before executing each effect.
pub fn set_current_job(job_id: u64) {
    CURRENT_JOB.with(|v| v.set(job_id));
}

/// Retrieves the job id of the project page being processed on this thread.
/// Returns 0 outside of a job.
pub fn current_job() -> u64 {
    CURRENT_JOB.with(|v| v.get())
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! hippo_trace {
    ($($arg:tt)*) => {{
        log::trace!("[job {}] {}", $crate::current_job(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! hippo_info {
    ($($arg:tt)*) => {{
        log::info!("[job {}] {}", $crate::current_job(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! hippo_debug {
    ($($arg:tt)*) => {{
        log::debug!("[job {}] {}", $crate::current_job(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! hippo_warn {
    ($($arg:tt)*) => {{
        log::warn!("[job {}] {}", $crate::current_job(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! hippo_error {
    ($($arg:tt)*) => {{
        log::error!("[job {}] {}", $crate::current_job(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::{current_job, set_current_job};

    #[test]
    fn job_id_is_thread_local() {
        set_current_job(42);
        assert_eq!(current_job(), 42);
        let other = std::thread::spawn(current_job).join().unwrap();
        assert_eq!(other, 0);
    }
}
