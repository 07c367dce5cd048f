//! Entity-DTO mappers.

use crate::dto::{AddressResponse, CreateUserRequest, UpdateUserRequest, UserListResponse, UserResponse};
use userbook_core::{Address, AddressFields, NewUser, Page, User, UserChanges};

fn trimmed(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

impl From<CreateUserRequest> for NewUser {
    fn from(request: CreateUserRequest) -> Self {
        Self {
            first_name: trimmed(request.first_name),
            last_name: trimmed(request.last_name),
            email: trimmed(request.email),
            password: request.password,
            address: AddressFields {
                country: trimmed(request.country),
                city: trimmed(request.city),
                post_code: trimmed(request.post_code),
                street: trimmed(request.street),
            },
        }
    }
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            first_name: trimmed(request.first_name),
            last_name: trimmed(request.last_name),
            email: trimmed(request.email),
            password: request.password,
            address: AddressFields {
                country: trimmed(request.country),
                city: trimmed(request.city),
                post_code: trimmed(request.post_code),
                street: trimmed(request.street),
            },
        }
    }
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            id: address.id,
            user_id: address.user_id,
            country: address.country,
            city: address.city,
            post_code: address.post_code,
            street: address.street,
            created_at: address.created_at,
            updated_at: address.updated_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            email_verified_at: user.email_verified_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
            address: user.address.map(AddressResponse::from),
        }
    }
}

/// Converts a page of users to a user list response.
impl From<Page<User>> for UserListResponse {
    fn from(page: Page<User>) -> Self {
        let page = page.map(UserResponse::from);
        Self {
            data: page.data,
            info: page.info,
        }
    }
}
