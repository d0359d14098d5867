//! Core utilities for the h4a-sync CLI
//!
//! - `config`: runtime settings from environment variables and CLI flags

pub mod config;

pub use config::{default_db_path, Settings};
