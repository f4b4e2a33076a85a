//! Output macros for user-facing [`Message`](super::Message)s.
//!
//! In normal mode messages are printed as plain lines (errors on stderr).
//! With `PLANTY_DEBUG` or `RUST_LOG` set they are routed through `tracing`
//! instead, so they interleave with request and cache events:
//!
//! ```text
//! msg_info!(msg) ──▶ debug mode? ──yes──▶ tracing::info!("ℹ️ {msg}")
//!                         └────no───▶ println!("ℹ️ {msg}")
//! ```
//!
//! ```rust,no_run
//! use planty::libs::messages::Message;
//! use planty::{msg_error, msg_success};
//!
//! msg_success!(Message::TaskCreated("Water the plants".to_string()));
//! msg_error!(Message::NotLoggedIn);
//! ```

use std::sync::OnceLock;

static DEBUG_MODE: OnceLock<bool> = OnceLock::new();

/// Whether `PLANTY_DEBUG` or `RUST_LOG` is set; read once per process.
#[doc(hidden)]
pub fn is_debug_mode() -> bool {
    *DEBUG_MODE.get_or_init(|| std::env::var(crate::libs::logging::DEBUG_ENV).is_ok() || std::env::var("RUST_LOG").is_ok())
}

#[macro_export]
macro_rules! msg_print {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("{}", $msg);
        } else {
            println!("{}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("\n{}\n", $msg);
        } else {
            println!("\n{}\n", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_success {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("✅ {}", $msg);
        } else {
            println!("✅ {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("\n✅ {}\n", $msg);
        } else {
            println!("\n✅ {}\n", $msg);
        }
    };
}

/// Errors go to stderr in normal mode.
#[macro_export]
macro_rules! msg_error {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::error!("❌ {}", $msg);
        } else {
            eprintln!("❌ {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::error!("\n❌ {}\n", $msg);
        } else {
            eprintln!("\n❌ {}\n", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_warning {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::warn!("⚠️ {}", $msg);
        } else {
            println!("⚠️ {}", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_info {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("ℹ️ {}", $msg);
        } else {
            println!("ℹ️ {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("\nℹ️ {}\n", $msg);
        } else {
            println!("\nℹ️ {}\n", $msg);
        }
    };
}

/// Silent unless debug mode is on.
#[macro_export]
macro_rules! msg_debug {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::debug!("🔍 {}", $msg);
        }
    };
}

/// Wraps a message in an `anyhow::Error`. The error carries the bare text;
/// the marker is added once, by whoever prints it with `msg_error!`.
#[macro_export]
macro_rules! msg_error_anyhow {
    ($msg:expr) => {
        anyhow::anyhow!("{}", $msg)
    };
}

#[macro_export]
macro_rules! msg_bail_anyhow {
    ($msg:expr) => {
        anyhow::bail!("{}", $msg)
    };
}

#[cfg(test)]
mod tests {
    use crate::libs::messages::Message;

    #[test]
    fn anyhow_errors_carry_the_bare_message() {
        let message = Message::TaskNotFound("Water the plants".to_string());
        let error = msg_error_anyhow!(message.clone());
        assert_eq!(error.to_string(), message.to_string());
        assert_eq!(format!("{:#}", error.context("while editing")), format!("while editing: {}", message));
    }

    #[test]
    fn bail_returns_the_bare_message() {
        fn fails() -> anyhow::Result<()> {
            msg_bail_anyhow!(Message::NotLoggedIn);
        }
        assert_eq!(fails().unwrap_err().to_string(), Message::NotLoggedIn.to_string());
    }
}
