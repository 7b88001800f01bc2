//! CLI subcommand implementations for contract-guard

pub mod check;
pub mod demo;
