//! In-memory user repository.

use crate::traits::UserRepository;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use userbook_core::{
    Address, AddressFields, NewUser, Page, PageRequest, User, UserChanges, UserId, UserSearch,
    UserbookError, UserbookResult,
};
use userbook_security::{remember_token, PasswordHasherInterface};

#[derive(Default)]
struct Store {
    users: BTreeMap<UserId, User>,
    next_user_id: i64,
    next_address_id: i64,
}

impl Store {
    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        let email = email.to_lowercase();
        self.users
            .values()
            .any(|u| Some(u.id) != except && u.email.to_lowercase() == email)
    }
}

/// Repository keeping users in process memory.
///
/// Behaves like the MySQL repository: writes are all-or-nothing, emails
/// are unique ignoring case and ids are never reused.
pub struct InMemoryUserRepository {
    store: Mutex<Store>,
    hasher: Arc<dyn PasswordHasherInterface>,
}

impl InMemoryUserRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new(hasher: Arc<dyn PasswordHasherInterface>) -> Self {
        Self {
            store: Mutex::new(Store::default()),
            hasher,
        }
    }

    fn store(&self) -> UserbookResult<MutexGuard<'_, Store>> {
        self.store
            .lock()
            .map_err(|_| UserbookError::internal("In-memory store lock poisoned"))
    }

    fn new_address(store: &mut Store, user_id: UserId, fields: &AddressFields) -> Address {
        store.next_address_id += 1;
        let now = Utc::now();
        Address {
            id: store.next_address_id,
            user_id,
            country: fields.country.clone(),
            city: fields.city.clone(),
            post_code: fields.post_code.clone(),
            street: fields.street.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn paginate_with_address(
        &self,
        page: PageRequest,
        search: &UserSearch,
    ) -> UserbookResult<Page<User>> {
        let store = self.store()?;
        let mut matched: Vec<&User> = store.users.values().filter(|u| search.matches(u)).collect();
        matched.sort_by(|a, b| search.compare(a, b));

        let total = matched.len() as u64;
        let items = matched
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(Page::new(items, page, total))
    }

    async fn find_with_address_by_id(&self, id: UserId) -> UserbookResult<Option<User>> {
        Ok(self.store()?.users.get(&id).cloned())
    }

    async fn create_with_address(&self, new_user: NewUser) -> UserbookResult<User> {
        let password_hash = self.hasher.hash(&new_user.password)?;

        let mut store = self.store()?;
        if store.email_taken(&new_user.email, None) {
            return Err(UserbookError::email_taken());
        }

        store.next_user_id += 1;
        let id = UserId::new(store.next_user_id);
        let address = Self::new_address(&mut store, id, &new_user.address);
        let now = Utc::now();
        let user = User {
            id,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            password_hash,
            remember_token: Some(remember_token()),
            email_verified_at: Some(now),
            created_at: now,
            updated_at: now,
            address: Some(address),
        };
        store.users.insert(id, user.clone());

        debug!("User created in memory: {}", id);
        Ok(user)
    }

    async fn update_with_address(
        &self,
        id: UserId,
        changes: UserChanges,
    ) -> UserbookResult<Option<User>> {
        let password_hash = changes
            .new_password()
            .map(|password| self.hasher.hash(password))
            .transpose()?;

        let mut store = self.store()?;
        if !store.users.contains_key(&id) {
            return Ok(None);
        }
        if store.email_taken(&changes.email, Some(id)) {
            return Err(UserbookError::email_taken());
        }

        let existing_address = store.users.get(&id).and_then(|u| u.address.clone());
        let now = Utc::now();
        let address = match existing_address {
            Some(address) => Address {
                country: changes.address.country.clone(),
                city: changes.address.city.clone(),
                post_code: changes.address.post_code.clone(),
                street: changes.address.street.clone(),
                updated_at: now,
                ..address
            },
            None => Self::new_address(&mut store, id, &changes.address),
        };

        let Some(user) = store.users.get_mut(&id) else {
            return Ok(None);
        };
        user.first_name = changes.first_name;
        user.last_name = changes.last_name;
        user.email = changes.email;
        if let Some(hash) = password_hash {
            user.password_hash = hash;
        }
        user.updated_at = now;
        user.address = Some(address);

        Ok(Some(user.clone()))
    }

    async fn delete_by_id(&self, id: UserId) -> UserbookResult<bool> {
        Ok(self.store()?.users.remove(&id).is_some())
    }

    async fn email_exists(&self, email: &str, except: Option<UserId>) -> UserbookResult<bool> {
        Ok(self.store()?.email_taken(email, except))
    }
}

impl std::fmt::Debug for InMemoryUserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryUserRepository").finish_non_exhaustive()
    }
}
