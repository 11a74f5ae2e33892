//! Database seeding utilities.

use std::collections::HashSet;

use rand::Rng;
use sqlx::{FromRow, PgConnection, PgPool};
use thiserror::Error;
use time::Date;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::loader;
use crate::generators::{AvailabilityGenerator, DedupKey, GeneratedAvailability};
use crate::models::{AvailabilityStatus, PricingEntry, TierEntity};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Slots generated for one celebrity after duplicate suppression.
#[derive(Debug, Clone)]
pub struct CelebrityPlan {
    /// Physical slots generated before deduplication.
    pub physical_generated: usize,
    /// Virtual slots generated before deduplication.
    pub virtual_generated: usize,
    /// Slots dropped because their key was already used this run.
    pub duplicates: usize,
    /// Slots to insert, physical first.
    pub slots: Vec<GeneratedAvailability>,
}

impl CelebrityPlan {
    /// Sum of remaining capacity over the slots to insert.
    pub fn total_capacity(&self) -> i64 {
        self.slots.iter().map(|s| i64::from(s.slots_remaining)).sum()
    }
}

/// Generates a celebrity's slots and drops any whose key is already in `seen`.
///
/// Keys of kept slots are added to `seen`, so the set carries across celebrities
/// for the whole run.
pub fn plan_celebrity(
    generator: &AvailabilityGenerator,
    entity: &TierEntity,
    pricing: &[PricingEntry],
    seen: &mut HashSet<DedupKey>,
    today: Date,
    rng: &mut impl Rng,
) -> CelebrityPlan {
    let (physical, remote) = generator.generate_all(entity.id, pricing, &entity.tier, today, rng);
    let physical_generated = physical.len();
    let virtual_generated = remote.len();

    let mut slots: Vec<GeneratedAvailability> = physical.into_iter().chain(remote).collect();
    let before = slots.len();
    slots.retain(|slot| seen.insert(slot.dedup_key()));

    CelebrityPlan {
        physical_generated,
        virtual_generated,
        duplicates: before - slots.len(),
        slots,
    }
}

/// Totals for one seeding run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Active celebrities found in the tier.
    pub celebrities_found: usize,
    /// Celebrities skipped because they have no active pricing.
    pub celebrities_skipped: usize,
    /// Availability rows inserted.
    pub slots_inserted: usize,
    /// Generated slots dropped as duplicates.
    pub duplicates_dropped: usize,
    /// Sum of remaining capacity across inserted rows.
    pub total_capacity: i64,
    /// False for dry runs and failed runs.
    pub committed: bool,
}

/// Row counts of the availability table by status.
#[derive(Debug, Clone, Default, FromRow)]
pub struct AvailabilityStats {
    pub active: i64,
    pub booked: i64,
    pub expired: i64,
    pub cancelled: i64,
}

/// Database seeder for inserting generated availability.
pub struct Seeder {
    pool: PgPool,
    generator: AvailabilityGenerator,
    tier: String,
    dry_run: bool,
}

impl Seeder {
    /// Creates a new seeder for `tier` with the default generator.
    pub fn new(pool: PgPool, tier: impl Into<String>) -> Self {
        Self {
            pool,
            generator: AvailabilityGenerator::new(),
            tier: tier.into(),
            dry_run: false,
        }
    }

    /// Replaces the slot generator.
    pub fn with_generator(mut self, generator: AvailabilityGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Rolls the run back at the end instead of committing it.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Seeds availability for every active celebrity in the tier.
    ///
    /// Everything runs in a single transaction: any failure rolls back all rows
    /// inserted so far and the error is returned.
    pub async fn run(&self, today: Date, rng: &mut impl Rng) -> Result<RunSummary, SeedError> {
        let mut tx = self.pool.begin().await?;

        match self.seed_tier(&mut tx, today, rng).await {
            Ok(mut summary) => {
                if self.dry_run {
                    tx.rollback().await?;
                    info!(
                        "Dry run: rolled back {} availability entries",
                        summary.slots_inserted
                    );
                } else {
                    tx.commit().await?;
                    summary.committed = true;
                }
                Ok(summary)
            }
            Err(e) => {
                error!("Seeding failed, rolling back: {e}");
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Rollback failed: {rollback_err}");
                }
                Err(e)
            }
        }
    }

    /// Seeds the tier on an open connection without committing.
    ///
    /// Callers own the surrounding transaction.
    pub async fn seed_tier(
        &self,
        conn: &mut PgConnection,
        today: Date,
        rng: &mut impl Rng,
    ) -> Result<RunSummary, SeedError> {
        sqlx::query("SET search_path TO public")
            .execute(&mut *conn)
            .await?;

        let celebrities = loader::fetch_tier_entities(&mut *conn, &self.tier).await?;
        info!(
            "Found {} {}-tier celebrities",
            celebrities.len(),
            self.tier
        );

        let mut summary = RunSummary {
            celebrities_found: celebrities.len(),
            ..Default::default()
        };
        let mut seen = HashSet::new();

        for celebrity in &celebrities {
            match self
                .seed_celebrity(&mut *conn, celebrity, &mut seen, today, rng)
                .await?
            {
                Some(plan) => {
                    summary.slots_inserted += plan.slots.len();
                    summary.duplicates_dropped += plan.duplicates;
                    summary.total_capacity += plan.total_capacity();
                }
                None => summary.celebrities_skipped += 1,
            }
        }

        info!(
            "Created {} availability entries for {} {}-tier celebrities ({} skipped, {} duplicates dropped)",
            summary.slots_inserted,
            summary.celebrities_found,
            self.tier,
            summary.celebrities_skipped,
            summary.duplicates_dropped
        );

        Ok(summary)
    }

    /// Generates and inserts slots for one celebrity.
    ///
    /// Returns `None` when the celebrity has no active pricing and was skipped.
    pub async fn seed_celebrity(
        &self,
        conn: &mut PgConnection,
        celebrity: &TierEntity,
        seen: &mut HashSet<DedupKey>,
        today: Date,
        rng: &mut impl Rng,
    ) -> Result<Option<CelebrityPlan>, SeedError> {
        let pricing = loader::fetch_active_pricing(&mut *conn, celebrity.id).await?;

        if pricing.is_empty() {
            warn!("No pricing for {}, skipping", celebrity.name);
            return Ok(None);
        }

        let plan = plan_celebrity(&self.generator, celebrity, &pricing, seen, today, rng);

        if plan.duplicates > 0 {
            debug!(
                "Dropped {} duplicate slots for {}",
                plan.duplicates, celebrity.name
            );
        }

        for slot in &plan.slots {
            Self::insert_availability(&mut *conn, slot).await?;
        }

        info!(
            "{}: {} physical, {} virtual, {} inserted ({} total slots)",
            celebrity.name,
            plan.physical_generated,
            plan.virtual_generated,
            plan.slots.len(),
            plan.total_capacity()
        );

        Ok(Some(plan))
    }

    /// Inserts one slot with a fresh rotation id and returns that id.
    pub async fn insert_availability(
        conn: &mut PgConnection,
        slot: &GeneratedAvailability,
    ) -> Result<Uuid, SeedError> {
        let rotation_id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO availability (
                celebrity_id, meeting_type, duration, city, country,
                date, time, timezone, slots_remaining, price_cents,
                tier, status, rotation_id, expires_at,
                created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5,
                $6, $7, $8, $9, $10,
                $11, $12, $13, $14,
                NOW(), NOW()
            )
            "#,
        )
        .bind(slot.celebrity_id)
        .bind(slot.meeting_type.as_str())
        .bind(slot.duration)
        .bind(slot.location.name)
        .bind(slot.location.country)
        .bind(slot.date)
        .bind(slot.time)
        .bind(slot.location.timezone)
        .bind(slot.slots_remaining)
        .bind(slot.price_cents)
        .bind(&slot.tier)
        .bind(slot.status.as_str())
        .bind(rotation_id.to_string())
        .bind(slot.expires_at().assume_utc())
        .execute(&mut *conn)
        .await?;

        Ok(rotation_id)
    }

    /// Counts availability rows by status.
    pub async fn availability_stats(&self) -> Result<AvailabilityStats, SeedError> {
        let stats = sqlx::query_as::<_, AvailabilityStats>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = $1) AS active,
                COUNT(*) FILTER (WHERE status = $2) AS booked,
                COUNT(*) FILTER (WHERE status = $3) AS expired,
                COUNT(*) FILTER (WHERE status = $4) AS cancelled
            FROM availability
            "#,
        )
        .bind(AvailabilityStatus::Active.as_str())
        .bind(AvailabilityStatus::Booked.as_str())
        .bind(AvailabilityStatus::Expired.as_str())
        .bind(AvailabilityStatus::Cancelled.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use time::macros::{date, time};

    use super::*;
    use crate::generators::AvailabilityGenConfig;
    use crate::models::MeetingType;

    const TODAY: Date = date!(2026 - 03 - 01);

    fn celebrity(name: &str) -> TierEntity {
        TierEntity {
            id: Uuid::new_v4(),
            name: name.into(),
            tier: "S".into(),
        }
    }

    fn pricing() -> Vec<PricingEntry> {
        vec![
            PricingEntry::new(MeetingType::Physical, 60, 50_000),
            PricingEntry::new(MeetingType::Virtual, 15, 10_000),
            PricingEntry::new(MeetingType::Virtual, 30, 20_000),
        ]
    }

    /// Every slot lands on the same date and hour, so collisions are guaranteed.
    fn crowded_generator() -> AvailabilityGenerator {
        AvailabilityGenerator::with_config(AvailabilityGenConfig {
            physical_skip_probability: 0.0,
            virtual_skip_probability: 0.0,
            cities_per_celebrity: 2..=2,
            virtual_slots: 4..=4,
            date_offset_days: 10..=10,
            business_hours: vec![time!(15:00)],
            ..Default::default()
        })
    }

    #[test]
    fn test_plan_drops_colliding_slots() {
        let generator = crowded_generator();
        let mut rng = StdRng::seed_from_u64(12345);
        let mut seen = HashSet::new();
        let star = celebrity("Crowded Star");

        let plan = plan_celebrity(&generator, &star, &pricing(), &mut seen, TODAY, &mut rng);

        assert_eq!(plan.physical_generated, 2);
        assert_eq!(plan.virtual_generated, 4);
        // One physical and one virtual slot survive
        assert_eq!(plan.slots.len(), 2);
        assert_eq!(plan.duplicates, 4);
        assert_eq!(plan.slots[0].meeting_type, MeetingType::Physical);
        assert_eq!(plan.slots[1].meeting_type, MeetingType::Virtual);
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_seen_set_spans_the_whole_run() {
        let generator = crowded_generator();
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = HashSet::new();
        let star = celebrity("Repeat Star");

        let first = plan_celebrity(&generator, &star, &pricing(), &mut seen, TODAY, &mut rng);
        let second = plan_celebrity(&generator, &star, &pricing(), &mut seen, TODAY, &mut rng);

        assert_eq!(first.slots.len(), 2);
        assert!(second.slots.is_empty());
        assert_eq!(second.duplicates, 6);

        // Another celebrity never collides with the first one
        let other = plan_celebrity(
            &generator,
            &celebrity("Other Star"),
            &pricing(),
            &mut seen,
            TODAY,
            &mut rng,
        );
        assert_eq!(other.slots.len(), 2);
    }

    #[test]
    fn test_planned_keys_are_unique() {
        let generator = AvailabilityGenerator::new();
        let mut rng = StdRng::seed_from_u64(4242);
        let mut seen = HashSet::new();
        let mut keys = HashSet::new();

        for i in 0..300 {
            let star = celebrity(&format!("Star {i}"));
            let plan = plan_celebrity(&generator, &star, &pricing(), &mut seen, TODAY, &mut rng);
            for slot in &plan.slots {
                assert!(keys.insert(slot.dedup_key()), "duplicate key {slot:?}");
            }
        }
    }

    #[test]
    fn test_empty_pricing_plans_nothing() {
        let generator = AvailabilityGenerator::new();
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = HashSet::new();

        for _ in 0..50 {
            let plan = plan_celebrity(
                &generator,
                &celebrity("Unpriced"),
                &[],
                &mut seen,
                TODAY,
                &mut rng,
            );
            assert!(plan.slots.is_empty());
            assert_eq!(plan.total_capacity(), 0);
        }
        assert!(seen.is_empty());
    }

    #[test]
    fn test_total_capacity_sums_kept_slots() {
        let generator = AvailabilityGenerator::new();
        let mut rng = StdRng::seed_from_u64(77);
        let mut seen = HashSet::new();

        let plan = plan_celebrity(
            &generator,
            &celebrity("Counted"),
            &pricing(),
            &mut seen,
            TODAY,
            &mut rng,
        );
        let expected: i64 = plan
            .slots
            .iter()
            .map(|s| i64::from(s.slots_remaining))
            .sum();
        assert_eq!(plan.total_capacity(), expected);
    }

    #[test]
    fn test_error_messages() {
        let err = SeedError::Config("SEED_TIER must not be empty".into());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: SEED_TIER must not be empty"
        );

        let err = SeedError::from(sqlx::Error::RowNotFound);
        assert!(err.to_string().starts_with("Database error:"));
    }
}
