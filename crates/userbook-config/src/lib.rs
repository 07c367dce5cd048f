//! # Userbook Config
//!
//! Configuration management for Userbook.
//! Settings are layered from TOML files, a `.env` file and
//! `USERBOOK_`-prefixed environment variables.

mod app_config;
mod loader;

pub use app_config::*;
pub use loader::*;
