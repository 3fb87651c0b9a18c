//! Seed binary - empties the database and inserts demo programs and exercises
//!
//! Usage:
//!   cargo run --bin seed
//!
//! Optional:
//! - DATABASE_URL (defaults to the local development database)

use anyhow::Result;
use fitness_tracker::config::Config;
use fitness_tracker::db::Database;
use fitness_tracker::logging;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let _log_guard = logging::init("fitness_tracker=info")?;

    let config = Config::from_env()?;
    let db = Database::connect(&config.database_url).await?;
    db.ensure_schema().await?;

    info!("Seeding database");
    db.reset_and_seed().await?;
    info!("Database seeded");
    Ok(())
}
