//! Command-line host

pub mod commands;
pub mod terminal;
