//! Availability generators.
//!
//! - [`AvailabilityGenerator`]: physical and virtual slots from a celebrity's pricing
//! - [`schedule`]: date, time and expiry helpers shared by both meeting types

pub mod availability;
pub mod schedule;

pub use availability::{
    AvailabilityGenConfig, AvailabilityGenerator, DedupKey, GeneratedAvailability,
};
