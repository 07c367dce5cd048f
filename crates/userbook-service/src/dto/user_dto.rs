//! User-related DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use userbook_core::{rules, PageInfo, UserId};
use utoipa::ToSchema;
use validator::Validate;

/// Request to create a user with its address.
///
/// Missing fields deserialize as empty strings so they are reported as
/// validation errors instead of malformed JSON.
#[derive(Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct CreateUserRequest {
    #[validate(
        custom(function = "rules::not_blank"),
        length(max = 255, message = "The first name field must not be greater than 255 characters.")
    )]
    pub first_name: String,

    #[validate(
        custom(function = "rules::not_blank"),
        length(max = 255, message = "The last name field must not be greater than 255 characters.")
    )]
    pub last_name: String,

    #[validate(
        custom(function = "rules::required_email"),
        length(max = 255, message = "The email field must not be greater than 255 characters.")
    )]
    pub email: String,

    #[validate(custom(function = "rules::required_password"))]
    #[schema(min_length = 8, format = Password)]
    pub password: String,

    #[validate(
        custom(function = "rules::not_blank"),
        length(max = 255, message = "The country field must not be greater than 255 characters.")
    )]
    pub country: String,

    #[validate(
        custom(function = "rules::not_blank"),
        length(max = 255, message = "The city field must not be greater than 255 characters.")
    )]
    pub city: String,

    #[validate(
        custom(function = "rules::not_blank"),
        length(max = 20, message = "The post code field must not be greater than 20 characters.")
    )]
    pub post_code: String,

    #[validate(
        custom(function = "rules::not_blank"),
        length(max = 255, message = "The street field must not be greater than 255 characters.")
    )]
    pub street: String,
}

/// Request to update a user and its address.
///
/// Every field except `password` is required. An absent, null or empty
/// password leaves the stored one unchanged.
#[derive(Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct UpdateUserRequest {
    #[validate(
        custom(function = "rules::not_blank"),
        length(max = 255, message = "The first name field must not be greater than 255 characters.")
    )]
    pub first_name: String,

    #[validate(
        custom(function = "rules::not_blank"),
        length(max = 255, message = "The last name field must not be greater than 255 characters.")
    )]
    pub last_name: String,

    #[validate(
        custom(function = "rules::required_email"),
        length(max = 255, message = "The email field must not be greater than 255 characters.")
    )]
    pub email: String,

    #[serde(deserialize_with = "empty_as_none")]
    #[validate(custom(function = "rules::password_length"))]
    #[schema(min_length = 8, format = Password)]
    pub password: Option<String>,

    #[validate(
        custom(function = "rules::not_blank"),
        length(max = 255, message = "The country field must not be greater than 255 characters.")
    )]
    pub country: String,

    #[validate(
        custom(function = "rules::not_blank"),
        length(max = 255, message = "The city field must not be greater than 255 characters.")
    )]
    pub city: String,

    #[validate(
        custom(function = "rules::not_blank"),
        length(max = 20, message = "The post code field must not be greater than 20 characters.")
    )]
    pub post_code: String,

    #[validate(
        custom(function = "rules::not_blank"),
        length(max = 255, message = "The street field must not be greater than 255 characters.")
    )]
    pub street: String,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

macro_rules! redacted_debug {
    ($ty:ident) => {
        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($ty))
                    .field("first_name", &self.first_name)
                    .field("last_name", &self.last_name)
                    .field("email", &self.email)
                    .field("password", &"[redacted]")
                    .field("country", &self.country)
                    .field("city", &self.city)
                    .field("post_code", &self.post_code)
                    .field("street", &self.street)
                    .finish()
            }
        }
    };
}

redacted_debug!(CreateUserRequest);
redacted_debug!(UpdateUserRequest);

/// Address response DTO.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddressResponse {
    pub id: i64,
    pub user_id: UserId,
    pub country: String,
    pub city: String,
    pub post_code: String,
    pub street: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User response DTO, with the address nested.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub address: Option<AddressResponse>,
}

/// Paginated user list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub data: Vec<UserResponse>,
    #[serde(flatten)]
    pub info: PageInfo,
}
