//! Availability seeding for StarryMeet.
//!
//! Generates synthetic physical and virtual meeting slots for every active
//! celebrity of a tier and inserts them into the `availability` table, skipping
//! duplicate (celebrity, date, time, meeting type) keys within a run.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use availability_seed::prelude::*;
//!
//! let seeder = Seeder::new(pool, "S").with_dry_run(true);
//! let summary = seeder.run(OffsetDateTime::now_utc().date(), &mut rng).await?;
//! ```
//!
//! The generators are pure and take an injectable RNG, so a fixed seed
//! reproduces the same slots:
//!
//! ```rust,ignore
//! let mut rng = StdRng::seed_from_u64(12345);
//! let (physical, remote) =
//!     AvailabilityGenerator::new().generate_all(celebrity_id, &pricing, "S", today, &mut rng);
//! ```

pub mod config;
pub mod db;
pub mod generators;
pub mod models;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::{BUSINESS_HOURS, City, EXCLUSIVE_CITIES, SeedConfig, VIRTUAL_LOCATION};
    pub use crate::db::{AvailabilityStats, RunSummary, SeedError, Seeder, plan_celebrity};
    pub use crate::generators::{
        AvailabilityGenConfig, AvailabilityGenerator, DedupKey, GeneratedAvailability,
    };
    pub use crate::models::{AvailabilityStatus, MeetingType, PricingEntry, TierEntity};
}
