//! Database integration for availability seeding.
//!
//! The [`loader`] reads tier members and their pricing; the [`Seeder`] drives a
//! whole run inside one transaction and inserts the generated slots.

pub mod loader;
mod seeder;

pub use seeder::{
    AvailabilityStats, CelebrityPlan, RunSummary, SeedError, Seeder, plan_celebrity,
};
