//! # Userbook Service
//!
//! Use cases for managing users and their addresses.
//! The service is stateless and reaches storage only through
//! [`userbook_repository::UserRepository`].

pub mod dto;
pub mod r#impl;
pub mod mappers;
pub mod user_service;

pub use dto::*;
pub use r#impl::UserServiceImpl;
pub use user_service::*;
