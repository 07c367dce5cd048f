//! # Userbook Core
//!
//! Core types, traits, and error definitions for Userbook.
//! Every other crate in the workspace builds on the domain model,
//! pagination and search types defined here.

pub mod domain;
pub mod error;
pub mod id;
pub mod pagination;
pub mod result;
pub mod search;
pub mod traits;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use pagination::*;
pub use result::*;
pub use search::*;
pub use traits::*;
pub use validation::*;
