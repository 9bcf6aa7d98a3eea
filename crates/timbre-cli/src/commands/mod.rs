//! CLI commands.

pub mod config;
pub mod export;
pub mod reconcile;
pub mod show;
