//! Output formatting for consensus runs

pub mod console;
pub mod formatter;
