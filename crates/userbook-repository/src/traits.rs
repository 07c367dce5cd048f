//! Repository trait definitions.

use async_trait::async_trait;
use userbook_core::{NewUser, Page, PageRequest, User, UserChanges, UserId, UserSearch, UserbookResult};

/// Repository for users and their owned addresses.
///
/// Every write touches both tables and is atomic: either the user row and
/// its address row both change, or neither does. A missing user is
/// reported as `None`/`false`, never as an error.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns one page of users with addresses, filtered and ordered by `search`.
    async fn paginate_with_address(
        &self,
        page: PageRequest,
        search: &UserSearch,
    ) -> UserbookResult<Page<User>>;

    /// Finds a user together with its address.
    async fn find_with_address_by_id(&self, id: UserId) -> UserbookResult<Option<User>>;

    /// Creates a user and its address in one transaction.
    ///
    /// The password is hashed and a remember token issued before storage.
    async fn create_with_address(&self, new_user: NewUser) -> UserbookResult<User>;

    /// Updates a user and upserts its address in one transaction.
    ///
    /// Returns `None` without writing anything when the user does not exist.
    async fn update_with_address(
        &self,
        id: UserId,
        changes: UserChanges,
    ) -> UserbookResult<Option<User>>;

    /// Deletes a user; the address goes with it.
    ///
    /// Returns `true` only if a row was removed.
    async fn delete_by_id(&self, id: UserId) -> UserbookResult<bool>;

    /// Checks whether an email is registered, ignoring case.
    ///
    /// `except` excludes one user, so a record keeping its own email is not
    /// counted as a duplicate.
    async fn email_exists(&self, email: &str, except: Option<UserId>) -> UserbookResult<bool>;
}
