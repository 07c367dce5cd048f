//! # Userbook Security
//!
//! One-way password hashing and random token generation used when
//! users are written to storage.

pub mod password;
pub mod token;

pub use password::*;
pub use token::*;
