//! Thin wrappers around `tracing` macros so call sites read the same
//! whether or not a subscriber is installed (none of these crates install
//! one themselves — that's left to the binary, see `timeline-cli`).

#[macro_export]
macro_rules! tracing_debug {
    ($($tts:tt)*) => {
        tracing::debug!($($tts)*);
    }
}

#[macro_export]
macro_rules! tracing_warn {
    ($($tts:tt)*) => {
        tracing::warn!($($tts)*);
    }
}

#[macro_export]
macro_rules! tracing_error {
    ($($tts:tt)*) => {
        tracing::error!($($tts)*);
    }
}

/// Logs the error at `warn` level and discards it, for call sites that can
/// tolerate a best-effort operation failing silently.
pub fn ok_or_log_as_warn<T, E: std::fmt::Display>(result: Result<T, E>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!("{e}");
            None
        }
    }
}
