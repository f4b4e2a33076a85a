//! # Planty
//!
//! Command-line client for the Planty to-do backend: nested sections,
//! drag-style task reordering, a weekly calendar of due tasks and
//! client-side encrypted attachments.
//!
//! ```rust,no_run
//! use planty::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod libs;
