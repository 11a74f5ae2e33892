//! Row types shared by the loader, the generators and the seeder.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Kind of meeting a pricing row or availability slot is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingType {
    Physical,
    Virtual,
}

impl MeetingType {
    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingType::Physical => "physical",
            MeetingType::Virtual => "virtual",
        }
    }
}

impl fmt::Display for MeetingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Unknown meeting type: {0:?}")]
pub struct UnknownMeetingType(pub String);

impl FromStr for MeetingType {
    type Err = UnknownMeetingType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "physical" => Ok(MeetingType::Physical),
            "virtual" => Ok(MeetingType::Virtual),
            other => Err(UnknownMeetingType(other.to_string())),
        }
    }
}

impl TryFrom<String> for MeetingType {
    type Error = UnknownMeetingType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Lifecycle state of an availability slot.
///
/// The seeder only writes [`AvailabilityStatus::Active`]; the remaining states are
/// assigned by the booking and cleanup services and show up in table statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    Active,
    Booked,
    Expired,
    Cancelled,
}

impl AvailabilityStatus {
    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityStatus::Active => "active",
            AvailabilityStatus::Booked => "booked",
            AvailabilityStatus::Expired => "expired",
            AvailabilityStatus::Cancelled => "cancelled",
        }
    }
}

/// An active celebrity in the requested tier.
#[derive(Debug, Clone, FromRow)]
pub struct TierEntity {
    pub id: Uuid,
    pub name: String,
    pub tier: String,
}

/// One active pricing row for a celebrity.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PricingEntry {
    #[sqlx(try_from = "String")]
    pub meeting_type: MeetingType,
    /// Meeting length in minutes.
    pub duration: i32,
    pub price_cents: i32,
}

impl PricingEntry {
    pub fn new(meeting_type: MeetingType, duration: i32, price_cents: i32) -> Self {
        Self {
            meeting_type,
            duration,
            price_cents,
        }
    }
}
