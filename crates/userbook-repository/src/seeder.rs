//! Demo data seeding.

use crate::DatabasePool;
use chrono::Utc;
use rand::{seq::SliceRandom, Rng};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use userbook_core::{UserbookError, UserbookResult};
use userbook_security::{random_alphanumeric, remember_token, PasswordHasherInterface};

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bruno", "Chloe", "Daniel", "Elena", "Farid", "Grace", "Hugo", "Ingrid", "Jonas",
    "Keiko", "Liam", "Maya", "Nikolai", "Olivia", "Pedro", "Quinn", "Rosa", "Samir", "Tara",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Becker", "Costa", "Dubois", "Eriksen", "Fischer", "Garcia", "Hansen", "Ivanova",
    "Jensen", "Kowalski", "Larsen", "Moreau", "Nakamura", "Okafor", "Petrov", "Rossi", "Schmidt",
];

const PLACES: &[(&str, &str)] = &[
    ("Paris", "France"),
    ("Lyon", "France"),
    ("Berlin", "Germany"),
    ("Hamburg", "Germany"),
    ("Madrid", "Spain"),
    ("Lisbon", "Portugal"),
    ("Oslo", "Norway"),
    ("Warsaw", "Poland"),
    ("Osaka", "Japan"),
    ("Lagos", "Nigeria"),
    ("Toronto", "Canada"),
    ("Austin", "United States"),
];

const STREETS: &[&str] = &[
    "Main Street", "High Street", "Station Road", "Church Lane", "Park Avenue", "Mill Road",
];

/// Options for a seeding run.
#[derive(Debug, Clone)]
pub struct SeedOptions {
    /// Number of users to create.
    pub total: u64,
    /// Users inserted per transaction.
    pub batch_size: u64,
    /// Plaintext password shared by every seeded user.
    pub password: String,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            total: 10_000,
            batch_size: 1_000,
            password: "password".to_string(),
        }
    }
}

/// Outcome of a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: u64,
    pub batches: u64,
}

/// Inserts demo users with addresses in batched transactions.
///
/// Each batch commits as a unit; a failure leaves earlier batches in place
/// and nothing of the failed one.
pub struct Seeder {
    pool: Arc<DatabasePool>,
    hasher: Arc<dyn PasswordHasherInterface>,
}

struct DemoUser {
    first_name: &'static str,
    last_name: &'static str,
    city: &'static str,
    country: &'static str,
    post_code: String,
    street: String,
}

impl DemoUser {
    fn random<R: Rng>(rng: &mut R) -> Self {
        let (city, country) = PLACES.choose(rng).copied().unwrap_or(("Paris", "France"));
        Self {
            first_name: FIRST_NAMES.choose(rng).copied().unwrap_or("Alice"),
            last_name: LAST_NAMES.choose(rng).copied().unwrap_or("Anderson"),
            city,
            country,
            post_code: format!("{:05}", rng.gen_range(0..100_000)),
            street: format!(
                "{} {}",
                rng.gen_range(1..500),
                STREETS.choose(rng).copied().unwrap_or("Main Street")
            ),
        }
    }
}

impl Seeder {
    /// Creates a seeder.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>, hasher: Arc<dyn PasswordHasherInterface>) -> Self {
        Self { pool, hasher }
    }

    /// Runs the seeding.
    pub async fn run(&self, options: &SeedOptions) -> UserbookResult<SeedReport> {
        if options.batch_size == 0 {
            return Err(UserbookError::Configuration(
                "Seed batch size must be positive".to_string(),
            ));
        }

        let started = Instant::now();
        let password_hash = self.hasher.hash(&options.password)?;
        let batches = options.total.div_ceil(options.batch_size);
        let mut seeded = 0;

        info!(
            "Seeding {} users in {} batches of {}",
            options.total, batches, options.batch_size
        );

        for batch in 1..=batches {
            let size = options.batch_size.min(options.total - seeded);
            self.seed_batch(size, &password_hash).await?;
            seeded += size;
            info!("Seeded batch {}/{} ({}/{} users)", batch, batches, seeded, options.total);
        }

        info!("Seeding finished in {:?}", started.elapsed());
        Ok(SeedReport {
            users: seeded,
            batches,
        })
    }

    async fn seed_batch(&self, size: u64, password_hash: &str) -> UserbookResult<()> {
        let demo: Vec<DemoUser> = {
            let mut rng = rand::thread_rng();
            (0..size).map(|_| DemoUser::random(&mut rng)).collect()
        };

        let mut tx = self.pool.inner().begin().await?;
        let now = Utc::now();

        for user in &demo {
            // The final address embeds the id, which is only known after insert.
            let placeholder = format!("{}@seed.invalid", random_alphanumeric(32));
            let result = sqlx::query(
                r#"
                INSERT INTO users (first_name, last_name, email, password, remember_token,
                                   email_verified_at, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(user.first_name)
            .bind(user.last_name)
            .bind(&placeholder)
            .bind(password_hash)
            .bind(remember_token())
            .bind(now)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            let id = result.last_insert_id();
            sqlx::query("UPDATE users SET email = ? WHERE id = ?")
                .bind(demo_email(user.first_name, user.last_name, id))
                .bind(id)
                .execute(&mut *tx)
                .await?;

            sqlx::query(
                r#"
                INSERT INTO user_addresses (user_id, country, city, post_code, street, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(id)
            .bind(user.country)
            .bind(user.city)
            .bind(&user.post_code)
            .bind(&user.street)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!("Committed batch of {} users", size);
        Ok(())
    }
}

/// Builds `first.last<ID in base 36>@example.com`.
fn demo_email(first_name: &str, last_name: &str, id: u64) -> String {
    format!(
        "{}.{}{}@example.com",
        first_name.to_lowercase(),
        last_name.to_lowercase(),
        base36(id)
    )
}

fn base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
