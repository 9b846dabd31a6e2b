//! Non-interactive subcommand implementations

pub mod doctor;
