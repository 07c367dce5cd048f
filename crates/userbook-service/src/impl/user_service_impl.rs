//! User service implementation.

use crate::dto::{CreateUserRequest, UpdateUserRequest};
use crate::user_service::UserService;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use userbook_core::{
    NewUser, Page, PageRequest, User, UserChanges, UserId, UserSearch, UserbookResult, ValidateExt,
};
use userbook_repository::UserRepository;

/// User service over any [`UserRepository`].
///
/// `R` may be unsized, so both `UserServiceImpl<MySqlUserRepository>` and
/// `UserServiceImpl<dyn UserRepository>` work.
pub struct UserServiceImpl<R: UserRepository + ?Sized> {
    user_repository: Arc<R>,
}

impl<R: UserRepository + ?Sized> UserServiceImpl<R> {
    /// Creates a new user service.
    pub fn new(user_repository: Arc<R>) -> Self {
        Self { user_repository }
    }
}

impl<R: UserRepository + ?Sized> Clone for UserServiceImpl<R> {
    fn clone(&self) -> Self {
        Self {
            user_repository: Arc::clone(&self.user_repository),
        }
    }
}

#[async_trait]
impl<R: UserRepository + ?Sized + 'static> UserService for UserServiceImpl<R> {
    async fn get_users(&self, page: PageRequest, search: UserSearch) -> UserbookResult<Page<User>> {
        debug!(
            "Listing users, page: {}, per_page: {}, search: {:?}",
            page.page,
            page.per_page,
            search.term()
        );
        self.user_repository.paginate_with_address(page, &search).await
    }

    async fn get_user(&self, id: UserId) -> UserbookResult<Option<User>> {
        debug!("Getting user: {}", id);
        self.user_repository.find_with_address_by_id(id).await
    }

    async fn create_user(&self, request: CreateUserRequest) -> UserbookResult<User> {
        debug!("Creating user: {}", request.email);

        request.validate_request()?;

        let user = self
            .user_repository
            .create_with_address(NewUser::from(request))
            .await?;

        info!("User created: {}", user.id);
        Ok(user)
    }

    async fn update_user(&self, id: UserId, request: UpdateUserRequest) -> UserbookResult<Option<User>> {
        debug!("Updating user: {}", id);

        request.validate_request()?;

        let updated = self
            .user_repository
            .update_with_address(id, UserChanges::from(request))
            .await?;

        match &updated {
            Some(_) => info!("User updated: {}", id),
            None => debug!("User not found for update: {}", id),
        }
        Ok(updated)
    }

    async fn delete_user(&self, id: UserId) -> UserbookResult<bool> {
        debug!("Deleting user: {}", id);

        let deleted = self.user_repository.delete_by_id(id).await?;
        if deleted {
            info!("User deleted: {}", id);
        }
        Ok(deleted)
    }

    async fn email_taken(&self, email: &str, except: Option<UserId>) -> UserbookResult<bool> {
        self.user_repository.email_exists(email.trim(), except).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mockall::{mock, predicate::eq};
    use userbook_core::{Address, SortDirection, SortField, UserbookError};
    use userbook_repository::InMemoryUserRepository;
    use userbook_security::PasswordHasher;

    mock! {
        pub Repo {}

        #[async_trait]
        impl UserRepository for Repo {
            async fn paginate_with_address(&self, page: PageRequest, search: &UserSearch) -> UserbookResult<Page<User>>;
            async fn find_with_address_by_id(&self, id: UserId) -> UserbookResult<Option<User>>;
            async fn create_with_address(&self, new_user: NewUser) -> UserbookResult<User>;
            async fn update_with_address(&self, id: UserId, changes: UserChanges) -> UserbookResult<Option<User>>;
            async fn delete_by_id(&self, id: UserId) -> UserbookResult<bool>;
            async fn email_exists(&self, email: &str, except: Option<UserId>) -> UserbookResult<bool>;
        }
    }

    fn stored_user(id: i64) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(id),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$stored".to_string(),
            remember_token: Some("abcdefghij".to_string()),
            email_verified_at: Some(now),
            created_at: now,
            updated_at: now,
            address: Some(Address {
                id,
                user_id: UserId::new(id),
                country: "UK".to_string(),
                city: "London".to_string(),
                post_code: "W1".to_string(),
                street: "1 Main Street".to_string(),
                created_at: now,
                updated_at: now,
            }),
        }
    }

    fn create_request(first: &str, email: &str, city: &str) -> CreateUserRequest {
        CreateUserRequest {
            first_name: first.to_string(),
            last_name: "Tester".to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
            country: "UK".to_string(),
            city: city.to_string(),
            post_code: "W1".to_string(),
            street: "1 Main Street".to_string(),
        }
    }

    fn update_request(password: Option<&str>) -> UpdateUserRequest {
        UpdateUserRequest {
            first_name: "Ada".to_string(),
            last_name: "Byron".to_string(),
            email: "ada@example.com".to_string(),
            password: password.map(str::to_string),
            country: "UK".to_string(),
            city: "Bath".to_string(),
            post_code: "BA1".to_string(),
            street: "2 Crescent".to_string(),
        }
    }

    fn in_memory_service() -> UserServiceImpl<InMemoryUserRepository> {
        let repo = InMemoryUserRepository::new(Arc::new(PasswordHasher::with_cost(1)));
        UserServiceImpl::new(Arc::new(repo))
    }

    // =========================================================================
    // Delegation (mock repository)
    // =========================================================================

    #[tokio::test]
    async fn test_get_users_passes_criteria_through() {
        let mut repo = MockRepo::new();
        repo.expect_paginate_with_address()
            .withf(|page, search| {
                page.page == 2
                    && page.per_page == 5
                    && search.term() == Some("ali")
                    && search.sort_by == SortField::Email
                    && search.sort_direction == SortDirection::Asc
            })
            .times(1)
            .returning(|page, _| Ok(Page::new(vec![stored_user(1)], page, 6)));

        let service = UserServiceImpl::new(Arc::new(repo));
        let search = UserSearch::new(Some("ali".to_string())).sorted(SortField::Email, SortDirection::Asc);
        let page = service.get_users(PageRequest::new(2, 5), search).await.unwrap();
        assert_eq!(page.total(), 6);
        assert_eq!(page.len(), 1);
    }

    #[tokio::test]
    async fn test_get_user_not_found_is_none() {
        let mut repo = MockRepo::new();
        repo.expect_find_with_address_by_id()
            .with(eq(UserId::new(9)))
            .times(1)
            .returning(|_| Ok(None));

        let service = UserServiceImpl::new(Arc::new(repo));
        assert!(service.get_user(UserId::new(9)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_request_without_touching_repository() {
        let mut repo = MockRepo::new();
        repo.expect_create_with_address().never();

        let service = UserServiceImpl::new(Arc::new(repo));
        let mut request = create_request("Ada", "ada@example.com", "London");
        request.password = "short".to_string();
        let err = service.create_user(request).await.unwrap_err();
        assert!(matches!(err, UserbookError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_maps_request_to_new_user() {
        let mut repo = MockRepo::new();
        repo.expect_create_with_address()
            .withf(|new_user| {
                new_user.email == "ada@example.com"
                    && new_user.password == "password123"
                    && new_user.address.city == "London"
            })
            .times(1)
            .returning(|_| Ok(stored_user(1)));

        let service = UserServiceImpl::new(Arc::new(repo));
        let user = service
            .create_user(create_request("Ada", "ada@example.com", "London"))
            .await
            .unwrap();
        assert_eq!(user.id, UserId::new(1));
    }

    #[tokio::test]
    async fn test_update_without_password_sends_none() {
        let mut repo = MockRepo::new();
        repo.expect_update_with_address()
            .withf(|id, changes| *id == UserId::new(1) && changes.new_password().is_none())
            .times(1)
            .returning(|_, _| Ok(Some(stored_user(1))));

        let service = UserServiceImpl::new(Arc::new(repo));
        let updated = service
            .update_user(UserId::new(1), update_request(None))
            .await
            .unwrap();
        assert!(updated.is_some());
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let mut repo = MockRepo::new();
        repo.expect_delete_by_id().times(1).returning(|_| Ok(false));

        let service = UserServiceImpl::new(Arc::new(repo));
        assert!(!service.delete_user(UserId::new(77)).await.unwrap());
    }

    #[tokio::test]
    async fn test_repository_errors_propagate() {
        let mut repo = MockRepo::new();
        repo.expect_delete_by_id()
            .returning(|_| Err(UserbookError::Database("connection reset".to_string())));

        let service = UserServiceImpl::new(Arc::new(repo));
        let err = service.delete_user(UserId::new(1)).await.unwrap_err();
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_works_with_trait_object_repository() {
        let mut repo = MockRepo::new();
        repo.expect_email_exists()
            .withf(|email, except| email == "ada@example.com" && except.is_none())
            .returning(|_, _| Ok(true));

        let repo: Arc<dyn UserRepository> = Arc::new(repo);
        let service: UserServiceImpl<dyn UserRepository> = UserServiceImpl::new(repo);
        assert!(service.email_taken(" ada@example.com ", None).await.unwrap());
    }

    // =========================================================================
    // Behaviour (in-memory repository)
    // =========================================================================

    #[tokio::test]
    async fn test_create_assigns_ids_and_hashes_password() {
        let service = in_memory_service();
        let a = service
            .create_user(create_request("Alice", "alice@example.com", "Paris"))
            .await
            .unwrap();
        let b = service
            .create_user(create_request("Bob", "bob@example.com", "Berlin"))
            .await
            .unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.address.as_ref().unwrap().user_id, a.id);
        assert_ne!(a.password_hash, "password123");
    }

    #[tokio::test]
    async fn test_update_password_only_when_supplied() {
        let service = in_memory_service();
        let created = service
            .create_user(create_request("Ada", "ada@example.com", "London"))
            .await
            .unwrap();

        let kept = service
            .update_user(created.id, update_request(None))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.password_hash, created.password_hash);
        assert_eq!(kept.last_name, "Byron");
        assert_eq!(kept.address.as_ref().unwrap().city, "Bath");

        let changed = service
            .update_user(created.id, update_request(Some("brand-new-password")))
            .await
            .unwrap()
            .unwrap();
        assert_ne!(changed.password_hash, created.password_hash);
    }

    #[tokio::test]
    async fn test_update_missing_user_is_none() {
        let service = in_memory_service();
        let result = service
            .update_user(UserId::new(404), update_request(None))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_search_returns_only_matching_user() {
        let service = in_memory_service();
        service
            .create_user(create_request("Alice", "alice@example.com", "Paris"))
            .await
            .unwrap();
        service
            .create_user(create_request("Bob", "bob@example.com", "Berlin"))
            .await
            .unwrap();

        let page = service
            .get_users(PageRequest::default(), UserSearch::new(Some("Alice".to_string())))
            .await
            .unwrap();
        assert_eq!(page.total(), 1);
        assert_eq!(page.data[0].first_name, "Alice");
    }

    #[tokio::test]
    async fn test_pagination_totals() {
        let service = in_memory_service();
        for i in 0..5 {
            service
                .create_user(create_request(
                    &format!("User{}", i),
                    &format!("user{}@example.com", i),
                    "Paris",
                ))
                .await
                .unwrap();
        }

        let first = service
            .get_users(PageRequest::new(1, 2), UserSearch::default())
            .await
            .unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first.total(), 5);

        let third = service
            .get_users(PageRequest::new(3, 2), UserSearch::default())
            .await
            .unwrap();
        assert_eq!(third.len(), 1);
    }

    #[tokio::test]
    async fn test_create_then_fetch_round_trip() {
        let service = in_memory_service();
        let created = service
            .create_user(create_request("Ada", "ada@example.com", "London"))
            .await
            .unwrap();
        let fetched = service.get_user(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_delete_then_fetch() {
        let service = in_memory_service();
        let created = service
            .create_user(create_request("Ada", "ada@example.com", "London"))
            .await
            .unwrap();
        assert!(service.delete_user(created.id).await.unwrap());
        assert!(service.get_user(created.id).await.unwrap().is_none());
        assert!(!service.delete_user(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_email_taken_excludes_own_record() {
        let service = in_memory_service();
        let created = service
            .create_user(create_request("Ada", "ada@example.com", "London"))
            .await
            .unwrap();
        assert!(service.email_taken("ADA@example.com", None).await.unwrap());
        assert!(!service.email_taken("ada@example.com", Some(created.id)).await.unwrap());
    }
}
