//! # Userbook Domain
//!
//! The user aggregate and the write models used to create and edit it.

pub mod user;

pub use user::*;
