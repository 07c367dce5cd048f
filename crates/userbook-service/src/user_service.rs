//! User service trait definition.

use crate::dto::{CreateUserRequest, UpdateUserRequest};
use async_trait::async_trait;
use userbook_core::{Page, PageRequest, User, UserId, UserSearch, UserbookResult};

/// User service trait.
///
/// Missing users are `None`/`false`; the HTTP layer decides what that means.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Lists users with their addresses, filtered, sorted and paginated.
    async fn get_users(&self, page: PageRequest, search: UserSearch) -> UserbookResult<Page<User>>;

    /// Gets a user with its address.
    async fn get_user(&self, id: UserId) -> UserbookResult<Option<User>>;

    /// Creates a user together with its address.
    async fn create_user(&self, request: CreateUserRequest) -> UserbookResult<User>;

    /// Updates a user and its address.
    async fn update_user(&self, id: UserId, request: UpdateUserRequest) -> UserbookResult<Option<User>>;

    /// Deletes a user and its address.
    async fn delete_user(&self, id: UserId) -> UserbookResult<bool>;

    /// Checks whether an email belongs to a user other than `except`.
    async fn email_taken(&self, email: &str, except: Option<UserId>) -> UserbookResult<bool>;
}
