//! Read-side queries: tier members and their active pricing.

use sqlx::PgConnection;
use uuid::Uuid;

use super::SeedError;
use crate::models::{PricingEntry, TierEntity};

/// Fetches every active celebrity in `tier`.
///
/// Rows come back in a stable order so a seeded run visits celebrities, and
/// therefore consumes random numbers, the same way each time.
pub async fn fetch_tier_entities(
    conn: &mut PgConnection,
    tier: &str,
) -> Result<Vec<TierEntity>, SeedError> {
    let entities = sqlx::query_as::<_, TierEntity>(
        r#"
        SELECT c.id, c.name, cs.tier::text AS tier
        FROM celebrities_new c
        JOIN celebrity_settings cs ON c.id = cs.celebrity_id
        WHERE cs.tier::text = $1 AND c.status = 'active'
        ORDER BY c.name, c.id
        "#,
    )
    .bind(tier)
    .fetch_all(&mut *conn)
    .await?;

    Ok(entities)
}

/// Fetches the active pricing rows of one celebrity. Empty when none are active.
pub async fn fetch_active_pricing(
    conn: &mut PgConnection,
    celebrity_id: Uuid,
) -> Result<Vec<PricingEntry>, SeedError> {
    let pricing = sqlx::query_as::<_, PricingEntry>(
        r#"
        SELECT meeting_type::text AS meeting_type, duration, price_cents
        FROM celebrity_pricing
        WHERE celebrity_id = $1 AND is_active = true
        ORDER BY meeting_type, duration, price_cents
        "#,
    )
    .bind(celebrity_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(pricing)
}
