//! Seeds availability for one celebrity tier (S by default).
//!
//! Run with:
//! ```
//! DATABASE_URL=postgres://... cargo run -p availability-seed --bin seed-availability
//! ```
//!
//! `SEED_TIER`, `SEED_RNG_SEED` and `SEED_DRY_RUN` adjust the run.

use availability_seed::config::SeedConfig;
use availability_seed::db::{SeedError, Seeder};
use rand::SeedableRng;
use rand::rngs::StdRng;
use sqlx::postgres::PgPoolOptions;
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = SeedConfig::from_env()?;
    tracing::info!("Seed config: {}", serde_json::to_string(&config)?);

    // One connection for the whole run
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    let mut rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let seeder = Seeder::new(pool.clone(), config.tier.clone()).with_dry_run(config.dry_run);
    let today = OffsetDateTime::now_utc().date();

    let outcome = async {
        let summary = seeder.run(today, &mut rng).await?;

        tracing::info!("Seed completed!");
        tracing::info!("  Celebrities: {}", summary.celebrities_found);
        tracing::info!("  Skipped (no pricing): {}", summary.celebrities_skipped);
        tracing::info!("  Availability entries: {}", summary.slots_inserted);
        tracing::info!("  Duplicates dropped: {}", summary.duplicates_dropped);
        tracing::info!("  Total slots: {}", summary.total_capacity);

        if summary.committed {
            let stats = seeder.availability_stats().await?;
            tracing::info!("Current statistics:");
            tracing::info!("  Active slots: {}", stats.active);
            tracing::info!("  Booked slots: {}", stats.booked);
            tracing::info!("  Expired slots: {}", stats.expired);
            tracing::info!("  Cancelled slots: {}", stats.cancelled);
        }

        Ok::<_, SeedError>(())
    }
    .await;

    // Release the connection whether or not the run succeeded
    pool.close().await;

    outcome?;
    Ok(())
}
