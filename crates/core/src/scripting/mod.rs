//! Script execution domain logic.
//!
//! Provides the driver contract ([`runner`]), the sequential statement loop
//! ([`executor`]) and the per-script pipeline that ties scanning, connection
//! lifecycle and execution together ([`processor`]). Nothing here knows
//! about a specific database; `sqlrun-db` supplies the MySQL driver.

pub mod executor;
pub mod processor;
pub mod runner;
