//! # Userbook Server Library
//!
//! Wiring of the configuration, database pool, repository, service and
//! router into a running HTTP server, plus logging and shutdown helpers
//! shared by the binaries.

pub mod app;
pub mod startup;
