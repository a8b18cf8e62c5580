// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Structured logging for the contact service.
//!
//! Events go to stderr through `emit_term`. The level is chosen once at
//! startup:
//! - `CONTACT_LOG=off` - no logs
//! - `CONTACT_LOG=error|warn|info|debug` - events at or above that level
//!
//! The server binary passes `info` as its fallback; library tests that
//! never call [`init`] stay silent.

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

/// Environment variable consulted by [`init_from_env`].
pub const LOG_ENV: &str = "CONTACT_LOG";

static INIT: Once = Once::new();

/// Minimum level of events written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    /// Parse a level name. Returns `None` for anything unrecognized.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Some(LogLevel::Off),
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }

    fn as_emit(self) -> Option<emit::Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(emit::Level::Error),
            LogLevel::Warn => Some(emit::Level::Warn),
            LogLevel::Info => Some(emit::Level::Info),
            LogLevel::Debug => Some(emit::Level::Debug),
        }
    }
}

/// Initialize logging at `level`.
///
/// Only the first call in a process has any effect.
pub fn init(level: LogLevel) {
    INIT.call_once(|| {
        let Some(min) = level.as_emit() else {
            return;
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(min))
            .init();

        // The runtime must outlive every task that logs.
        std::mem::forget(rt);
    });
}

/// Initialize logging from [`LOG_ENV`], using `fallback` when it is unset.
pub fn init_from_env(fallback: LogLevel) {
    let level = match std::env::var(LOG_ENV) {
        Ok(value) => LogLevel::parse(&value).unwrap_or_else(|| {
            // Bootstrap warning, emitted before the logger exists
            eprintln!("Warning: Unknown {LOG_ENV} value '{value}', using 'info'");
            LogLevel::Info
        }),
        Err(_) => fallback,
    };
    init(level);
}

/// Leveled logging macros: `info!` for routine events, `debug!` for
/// step-by-step detail, `warn!` for rejected submissions and configuration
/// gaps, `error!` for provider failures and unexpected faults.
///
/// Re-exported directly (not wrapped in `macro_rules!`) so that emit's
/// inline `{name}` captures resolve against the caller's locals.
pub use emit::{debug, error, info, warn};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_levels() {
        assert_eq!(LogLevel::parse("off"), Some(LogLevel::Off));
        assert_eq!(LogLevel::parse(" Debug "), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("loud"), None);
    }

    #[test]
    fn init_is_safe_to_call_multiple_times() {
        init(LogLevel::Off);
        init(LogLevel::Debug);
        init_from_env(LogLevel::Off);
    }

    #[test]
    fn macros_compile() {
        let code = "missing_fields";
        info!("Submission accepted");
        debug!("Checked {count} fields", count: 3);
        warn!("Submission rejected: {code}");
        error!("Relay failed");
    }
}
