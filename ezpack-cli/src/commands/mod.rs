//! Subcommand implementations

pub mod build;
pub mod pack;
pub mod parse;
pub mod receive;
pub mod scan;
