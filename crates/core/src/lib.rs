//! `sqlrun-core` -- script splitting and sequential execution.
//!
//! Everything in this crate is driver-agnostic: the scanner is a pure
//! function over script text, and the executor talks to the database only
//! through the [`scripting::runner::StatementRunner`] trait. The MySQL
//! implementation lives in `sqlrun-db`.

pub mod config;
pub mod error;
pub mod scanner;
pub mod scripting;

/// Component name used as the prefix of every user-facing error message.
pub const COMPONENT_NAME: &str = "sqlrun";
