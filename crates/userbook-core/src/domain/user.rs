//! User aggregate: the user row and its owned address.

use crate::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User entity, the aggregate root.
///
/// The password hash and remember token are persisted but never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    /// Surrogate identifier.
    pub id: UserId,

    /// First name.
    pub first_name: String,

    /// Last name.
    pub last_name: String,

    /// Email address, unique across all users.
    pub email: String,

    /// One-way password hash.
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Legacy "remember me" token.
    #[serde(skip_serializing, default)]
    pub remember_token: Option<String>,

    /// When the email address was verified.
    pub email_verified_at: Option<DateTime<Utc>>,

    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,

    /// The owned address. Only absent when stored data has drifted.
    pub address: Option<Address>,
}

impl User {
    /// Returns the user's full name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Address owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Address {
    pub id: i64,
    pub user_id: UserId,
    pub country: String,
    pub city: String,
    pub post_code: String,
    pub street: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Address attributes supplied on create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressFields {
    pub country: String,
    pub city: String,
    pub post_code: String,
    pub street: String,
}

/// Everything needed to register a user together with its address.
#[derive(Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Plaintext; hashed by the repository before storage.
    pub password: String,
    pub address: AddressFields,
}

/// Replacement values for an existing user and its address.
#[derive(Clone)]
pub struct UserChanges {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// `None` or empty keeps the stored hash.
    pub password: Option<String>,
    pub address: AddressFields,
}

impl UserChanges {
    /// Returns the new plaintext password, if one was actually supplied.
    #[must_use]
    pub fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .field("address", &self.address)
            .finish()
    }
}

impl fmt::Debug for UserChanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserChanges")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .field("address", &self.address)
            .finish()
    }
}
