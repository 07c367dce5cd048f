//! # Userbook Repository
//!
//! Data access for users and their addresses.
//!
//! ```text
//! UserService
//!   ↓  Arc<dyn UserRepository>
//! MySqlUserRepository            (SQLx, one transaction per write)
//!   ↓
//! MySQL
//! ```
//!
//! [`InMemoryUserRepository`] implements the same contract without a
//! database and is available with the `in-memory` feature.

#[cfg(any(test, feature = "in-memory"))]
pub mod memory;
pub mod mysql;
pub mod pool;
pub mod seeder;
pub mod traits;

#[cfg(any(test, feature = "in-memory"))]
pub use memory::InMemoryUserRepository;
pub use mysql::*;
pub use pool::*;
pub use seeder::*;
pub use traits::*;
