//! CLI command handlers

pub mod commands;
pub mod samples;

pub use commands::{build_options, calendar, convert, fill, find, info, kitchen_sink, show};
