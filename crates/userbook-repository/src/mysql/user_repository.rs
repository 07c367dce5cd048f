//! MySQL user repository implementation.

use crate::{traits::UserRepository, DatabasePool};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySql};
use std::sync::Arc;
use tracing::{debug, info, warn};
use userbook_core::{
    Address, AddressFields, NewUser, Page, PageRequest, User, UserChanges, UserId, UserSearch,
    UserbookError, UserbookResult,
};
use userbook_security::{remember_token, PasswordHasherInterface};

/// Columns selected for a user joined with its address.
const USER_WITH_ADDRESS_COLUMNS: &str = r#"
    u.id, u.first_name, u.last_name, u.email, u.password, u.remember_token,
    u.email_verified_at, u.created_at, u.updated_at,
    a.id AS address_id, a.country AS address_country, a.city AS address_city,
    a.post_code AS address_post_code, a.street AS address_street,
    a.created_at AS address_created_at, a.updated_at AS address_updated_at
"#;

/// The five search predicates, grouped so they form one disjunction.
const SEARCH_CONDITION: &str = r#"
    WHERE (
        LOWER(u.first_name) LIKE ?
        OR LOWER(u.last_name) LIKE ?
        OR LOWER(u.email) LIKE ?
        OR LOWER(a.city) LIKE ?
        OR LOWER(a.country) LIKE ?
    )
"#;

const SEARCH_PREDICATES: usize = 5;

/// MySQL user repository implementation.
#[derive(Clone)]
pub struct MySqlUserRepository {
    pool: Arc<DatabasePool>,
    hasher: Arc<dyn PasswordHasherInterface>,
}

impl MySqlUserRepository {
    /// Creates a new MySQL user repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>, hasher: Arc<dyn PasswordHasherInterface>) -> Self {
        Self { pool, hasher }
    }
}

/// Database row of a user left-joined with its address.
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    remember_token: Option<String>,
    email_verified_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    address_id: Option<i64>,
    address_country: Option<String>,
    address_city: Option<String>,
    address_post_code: Option<String>,
    address_street: Option<String>,
    address_created_at: Option<DateTime<Utc>>,
    address_updated_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let user_id = UserId::new(row.id);
        let address = match (
            row.address_id,
            row.address_country,
            row.address_city,
            row.address_post_code,
            row.address_street,
            row.address_created_at,
            row.address_updated_at,
        ) {
            (Some(id), Some(country), Some(city), Some(post_code), Some(street), Some(created_at), Some(updated_at)) => {
                Some(Address {
                    id,
                    user_id,
                    country,
                    city,
                    post_code,
                    street,
                    created_at,
                    updated_at,
                })
            }
            _ => None,
        };

        User {
            id: user_id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            password_hash: row.password,
            remember_token: row.remember_token,
            email_verified_at: row.email_verified_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            address,
        }
    }
}

/// Maps write failures, reporting a duplicate email as a field error.
fn map_write_error(err: sqlx::Error) -> UserbookError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            warn!("Unique constraint violated on write: {}", db_err.message());
            UserbookError::email_taken()
        }
        _ => err.into(),
    }
}

async fn fetch_user<'e, E>(executor: E, id: UserId) -> UserbookResult<Option<User>>
where
    E: sqlx::Executor<'e, Database = MySql>,
{
    let sql = format!(
        "SELECT {} FROM users u LEFT JOIN user_addresses a ON a.user_id = u.id WHERE u.id = ?",
        USER_WITH_ADDRESS_COLUMNS
    );
    let row = sqlx::query_as::<_, UserRow>(&sql)
        .bind(id.into_inner())
        .fetch_optional(executor)
        .await?;

    Ok(row.map(User::from))
}

async fn upsert_address<'e, E>(
    executor: E,
    user_id: UserId,
    address: &AddressFields,
    now: DateTime<Utc>,
) -> UserbookResult<()>
where
    E: sqlx::Executor<'e, Database = MySql>,
{
    sqlx::query(
        r#"
        INSERT INTO user_addresses (user_id, country, city, post_code, street, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            country = VALUES(country),
            city = VALUES(city),
            post_code = VALUES(post_code),
            street = VALUES(street),
            updated_at = VALUES(updated_at)
        "#,
    )
    .bind(user_id.into_inner())
    .bind(&address.country)
    .bind(&address.city)
    .bind(&address.post_code)
    .bind(&address.street)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(())
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn paginate_with_address(
        &self,
        page: PageRequest,
        search: &UserSearch,
    ) -> UserbookResult<Page<User>> {
        debug!(
            "Paginating users, page: {}, per_page: {}, search: {:?}, sort: {} {}",
            page.page,
            page.per_page,
            search.term(),
            search.sort_by,
            search.sort_direction
        );

        let pattern = search.like_pattern();
        let condition = if pattern.is_some() { SEARCH_CONDITION } else { "" };

        let count_sql = format!(
            "SELECT COUNT(*) FROM users u LEFT JOIN user_addresses a ON a.user_id = u.id {}",
            condition
        );
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(pattern) = pattern.as_deref() {
            for _ in 0..SEARCH_PREDICATES {
                count_query = count_query.bind(pattern);
            }
        }
        let total = count_query.fetch_one(self.pool.inner()).await?;

        // Sort column and direction come from closed enums, never from input text.
        let direction = search.sort_direction.sql();
        let select_sql = format!(
            "SELECT {} FROM users u LEFT JOIN user_addresses a ON a.user_id = u.id {} \
             ORDER BY u.{} {}, u.id {} LIMIT ? OFFSET ?",
            USER_WITH_ADDRESS_COLUMNS,
            condition,
            search.sort_by.column(),
            direction,
            direction
        );
        let mut select_query = sqlx::query_as::<_, UserRow>(&select_sql);
        if let Some(pattern) = pattern.as_deref() {
            for _ in 0..SEARCH_PREDICATES {
                select_query = select_query.bind(pattern);
            }
        }
        let rows = select_query
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(self.pool.inner())
            .await?;

        let users = rows.into_iter().map(User::from).collect();
        Ok(Page::new(users, page, u64::try_from(total).unwrap_or_default()))
    }

    async fn find_with_address_by_id(&self, id: UserId) -> UserbookResult<Option<User>> {
        debug!("Finding user with address by id: {}", id);
        fetch_user(self.pool.inner(), id).await
    }

    async fn create_with_address(&self, new_user: NewUser) -> UserbookResult<User> {
        debug!("Creating user with address: {:?}", new_user);

        let password_hash = self.hasher.hash(&new_user.password)?;
        let now = Utc::now();

        let mut tx = self.pool.inner().begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO users (first_name, last_name, email, password, remember_token,
                               email_verified_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.email)
        .bind(&password_hash)
        .bind(remember_token())
        .bind(now)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(map_write_error)?;

        let id = i64::try_from(result.last_insert_id())
            .map(UserId::new)
            .map_err(|_| UserbookError::internal("Inserted user id out of range"))?;

        upsert_address(&mut *tx, id, &new_user.address, now).await?;

        let user = fetch_user(&mut *tx, id)
            .await?
            .ok_or_else(|| UserbookError::internal(format!("User {} missing after insert", id)))?;

        tx.commit().await?;

        info!("User created: {}", id);
        Ok(user)
    }

    async fn update_with_address(
        &self,
        id: UserId,
        changes: UserChanges,
    ) -> UserbookResult<Option<User>> {
        debug!("Updating user {} with address: {:?}", id, changes);

        let password_hash = changes
            .new_password()
            .map(|password| self.hasher.hash(password))
            .transpose()?;
        let now = Utc::now();

        let mut tx = self.pool.inner().begin().await?;

        let locked: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = ? FOR UPDATE")
            .bind(id.into_inner())
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            debug!("User {} not found, nothing updated", id);
            return Ok(None);
        }

        sqlx::query(
            r#"
            UPDATE users
            SET first_name = ?, last_name = ?, email = ?,
                password = COALESCE(?, password), updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.email)
        .bind(password_hash)
        .bind(now)
        .bind(id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_write_error)?;

        upsert_address(&mut *tx, id, &changes.address, now).await?;

        let user = fetch_user(&mut *tx, id).await?;

        tx.commit().await?;

        info!("User updated: {}", id);
        Ok(user)
    }

    async fn delete_by_id(&self, id: UserId) -> UserbookResult<bool> {
        debug!("Deleting user: {}", id);

        let mut tx = self.pool.inner().begin().await?;

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("User deleted: {}", id);
        }
        Ok(deleted)
    }

    async fn email_exists(&self, email: &str, except: Option<UserId>) -> UserbookResult<bool> {
        let except = except.map(UserId::into_inner);
        let result: Option<i64> = sqlx::query_scalar(
            "SELECT 1 FROM users WHERE LOWER(email) = LOWER(?) AND (? IS NULL OR id <> ?) LIMIT 1",
        )
        .bind(email)
        .bind(except)
        .bind(except)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(result.is_some())
    }
}

impl std::fmt::Debug for MySqlUserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlUserRepository")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}
