//! Physical and virtual availability generation.

use std::ops::RangeInclusive;

use rand::Rng;
use rand::seq::SliceRandom;
use time::{Date, PrimitiveDateTime, Time};
use uuid::Uuid;

use super::schedule;
use crate::config::{BUSINESS_HOURS, City, EXCLUSIVE_CITIES, VIRTUAL_LOCATION};
use crate::models::{AvailabilityStatus, MeetingType, PricingEntry};

/// Generated availability slot ready for database insertion.
///
/// The rotation id is assigned by the seeder at insert time, so a fixed RNG seed
/// reproduces the same slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAvailability {
    pub celebrity_id: Uuid,
    pub meeting_type: MeetingType,
    pub duration: i32,
    pub location: City,
    pub date: Date,
    pub time: Time,
    pub slots_remaining: i32,
    pub price_cents: i32,
    pub tier: String,
    pub status: AvailabilityStatus,
}

impl GeneratedAvailability {
    /// When the slot stops being listed.
    pub fn expires_at(&self) -> PrimitiveDateTime {
        schedule::expires_at(self.date)
    }

    /// Key under which two slots count as duplicates within a run.
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            celebrity_id: self.celebrity_id,
            date: self.date,
            time: self.time,
            meeting_type: self.meeting_type,
        }
    }
}

/// (celebrity, date, time, meeting type)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub celebrity_id: Uuid,
    pub date: Date,
    pub time: Time,
    pub meeting_type: MeetingType,
}

/// Configuration for availability generation.
#[derive(Debug, Clone)]
pub struct AvailabilityGenConfig {
    /// Probability that a celebrity gets no physical slots at all.
    pub physical_skip_probability: f64,
    /// Probability that a celebrity gets no virtual slots at all.
    pub virtual_skip_probability: f64,
    /// Cities physical meetings are placed in.
    pub cities: Vec<City>,
    /// Number of distinct cities per celebrity.
    pub cities_per_celebrity: RangeInclusive<usize>,
    /// Number of distinct physical price points offered per city.
    pub physical_slots_per_city: RangeInclusive<usize>,
    /// Number of virtual slots per celebrity.
    pub virtual_slots: RangeInclusive<usize>,
    /// Remaining capacity of a physical slot.
    pub physical_capacity: RangeInclusive<i32>,
    /// Remaining capacity of a virtual slot.
    pub virtual_capacity: RangeInclusive<i32>,
    /// Meeting date offset from today, in days.
    pub date_offset_days: RangeInclusive<i64>,
    /// Allowed meeting start times.
    pub business_hours: Vec<Time>,
}

impl Default for AvailabilityGenConfig {
    fn default() -> Self {
        Self {
            physical_skip_probability: 0.3,
            virtual_skip_probability: 0.2,
            cities: EXCLUSIVE_CITIES.to_vec(),
            cities_per_celebrity: 1..=2,
            physical_slots_per_city: 1..=2,
            virtual_slots: 2..=4,
            // Some physical slots are listed already sold out
            physical_capacity: 0..=1,
            virtual_capacity: 1..=2,
            date_offset_days: 7..=90,
            business_hours: BUSINESS_HOURS.to_vec(),
        }
    }
}

/// Generates availability slots for a celebrity from their pricing.
pub struct AvailabilityGenerator {
    config: AvailabilityGenConfig,
}

impl AvailabilityGenerator {
    /// Creates a new availability generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: AvailabilityGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: AvailabilityGenConfig) -> Self {
        Self { config }
    }

    /// Generates in-person slots.
    ///
    /// Picks a few distinct cities, then for each city a few distinct physical price
    /// points (never the same one twice within a city), each with its own date and time.
    pub fn generate_physical(
        &self,
        celebrity_id: Uuid,
        pricing: &[PricingEntry],
        tier: &str,
        today: Date,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedAvailability> {
        let mut slots = Vec::new();

        if rng.r#gen::<f64>() < self.config.physical_skip_probability {
            return slots;
        }

        let num_cities = rng.gen_range(self.config.cities_per_celebrity.clone());
        let cities: Vec<City> = self
            .config
            .cities
            .choose_multiple(rng, num_cities)
            .copied()
            .collect();

        let physical: Vec<&PricingEntry> = pricing
            .iter()
            .filter(|p| p.meeting_type == MeetingType::Physical)
            .collect();

        for city in cities {
            if physical.is_empty() {
                continue;
            }

            let wanted = rng.gen_range(self.config.physical_slots_per_city.clone());
            let chosen: Vec<&PricingEntry> = physical
                .choose_multiple(rng, wanted.min(physical.len()))
                .copied()
                .collect();

            for entry in chosen {
                let capacity = &self.config.physical_capacity;
                if let Some(slot) =
                    self.build_slot(celebrity_id, entry, city, capacity, tier, today, rng)
                {
                    slots.push(slot);
                }
            }
        }

        slots
    }

    /// Generates online slots.
    ///
    /// Price points are drawn with replacement, so several slots may share a duration.
    pub fn generate_virtual(
        &self,
        celebrity_id: Uuid,
        pricing: &[PricingEntry],
        tier: &str,
        today: Date,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedAvailability> {
        let mut slots = Vec::new();

        if rng.r#gen::<f64>() < self.config.virtual_skip_probability {
            return slots;
        }

        let virtual_pricing: Vec<&PricingEntry> = pricing
            .iter()
            .filter(|p| p.meeting_type == MeetingType::Virtual)
            .collect();

        if virtual_pricing.is_empty() {
            return slots;
        }

        let num_slots = rng.gen_range(self.config.virtual_slots.clone());

        for _ in 0..num_slots {
            let Some(entry) = virtual_pricing.choose(rng).copied() else {
                break;
            };
            let capacity = &self.config.virtual_capacity;
            if let Some(slot) = self.build_slot(
                celebrity_id,
                entry,
                VIRTUAL_LOCATION,
                capacity,
                tier,
                today,
                rng,
            ) {
                slots.push(slot);
            }
        }

        slots
    }

    /// Generates physical then virtual slots for one celebrity.
    pub fn generate_all(
        &self,
        celebrity_id: Uuid,
        pricing: &[PricingEntry],
        tier: &str,
        today: Date,
        rng: &mut impl Rng,
    ) -> (Vec<GeneratedAvailability>, Vec<GeneratedAvailability>) {
        let physical = self.generate_physical(celebrity_id, pricing, tier, today, rng);
        let remote = self.generate_virtual(celebrity_id, pricing, tier, today, rng);
        (physical, remote)
    }

    /// Draws a date, a time and a capacity, then assembles the slot.
    #[allow(clippy::too_many_arguments)]
    fn build_slot(
        &self,
        celebrity_id: Uuid,
        entry: &PricingEntry,
        location: City,
        capacity: &RangeInclusive<i32>,
        tier: &str,
        today: Date,
        rng: &mut impl Rng,
    ) -> Option<GeneratedAvailability> {
        let date = schedule::random_date(today, &self.config.date_offset_days, rng);
        let time = schedule::random_time(&self.config.business_hours, rng)?;
        let slots_remaining = rng.gen_range(capacity.clone());

        Some(GeneratedAvailability {
            celebrity_id,
            meeting_type: entry.meeting_type,
            duration: entry.duration,
            location,
            date,
            time,
            slots_remaining,
            price_cents: entry.price_cents,
            tier: tier.to_string(),
            status: AvailabilityStatus::Active,
        })
    }
}

impl Default for AvailabilityGenerator {
    fn default() -> Self {
        Self::new()
    }
}
