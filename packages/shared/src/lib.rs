//! Utilities shared by the Banter binaries: logging setup and time handling.

pub mod logger;
pub mod time;
