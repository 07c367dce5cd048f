//! Inserts demo users with addresses.
//!
//! ```bash
//! userbook-seed --count 10000 --batch-size 1000
//! ```

use clap::Parser;
use tracing::{error, info};
use userbook_config::ConfigLoader;
use userbook_core::UserbookResult;
use userbook_repository::{create_pool, SeedOptions, Seeder};
use userbook_server::{app::password_hasher, startup::init_logging};

#[derive(Debug, Parser)]
#[command(name = "userbook-seed")]
#[command(author, version, about = "Seed the Userbook database with demo users")]
struct Cli {
    /// Number of users to create
    #[arg(short, long, default_value_t = 10_000)]
    count: u64,

    /// Users inserted per transaction
    #[arg(short, long, default_value_t = 1_000, value_parser = clap::value_parser!(u64).range(1..))]
    batch_size: u64,

    /// Plaintext password given to every seeded user
    #[arg(long, default_value = "password")]
    password: String,

    /// Apply pending migrations before seeding
    #[arg(long)]
    migrate: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("Seeding failed: {}", e);
        eprintln!("userbook-seed: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> UserbookResult<()> {
    let config = ConfigLoader::from_default_location().load()?;
    init_logging(&config.observability);

    let pool = create_pool(&config.database).await?;
    if cli.migrate {
        pool.run_migrations().await?;
    }

    let options = SeedOptions {
        total: cli.count,
        batch_size: cli.batch_size,
        password: cli.password,
    };
    let report = Seeder::new(pool.clone(), password_hasher(&config))
        .run(&options)
        .await;
    pool.close().await;

    let report = report?;
    info!("Seeded {} users in {} batches", report.users, report.batches);
    Ok(())
}
