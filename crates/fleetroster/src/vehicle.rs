//! Core vehicle types for fleetroster.
//!
//! This module defines the vehicle record as it is held in memory and as it
//! is persisted, together with the id generator used when vehicles are added.

use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Image used for vehicles that were stored without one.
pub const DEFAULT_IMAGE: &str = "https://via.placeholder.com/400x240?text=Vehicle";

/// Field name reported when the registration number is rejected.
pub const FIELD_REG_NO: &str = "regNo";

/// Field name reported when the category is rejected.
pub const FIELD_CATEGORY: &str = "category";

/// Field name reported when the driver name is rejected.
pub const FIELD_DRIVER_NAME: &str = "driverName";

/// Whether a vehicle can currently be dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Availability {
    /// Ready for use.
    #[default]
    Available,
    /// Out of service or already assigned.
    Unavailable,
}

impl Availability {
    /// The opposite availability.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Available => Self::Unavailable,
            Self::Unavailable => Self::Available,
        }
    }

    /// The stored string form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Unavailable => "Unavailable",
        }
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Availability {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "unavailable" => Ok(Self::Unavailable),
            other => Err(Error::validation(
                "availability",
                format!("expected Available or Unavailable, got '{other}'"),
            )),
        }
    }
}

/// A single fleet record.
///
/// Field names are serialized in camelCase so the stored JSON keeps the
/// `regNo` / `driverName` layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    /// Opaque, stable identifier assigned when the vehicle was added.
    pub id: String,

    /// Registration identifier. Not required to be unique.
    pub reg_no: String,

    /// Vehicle category, e.g. `SUV`.
    pub category: String,

    /// Name of the assigned driver.
    pub driver_name: String,

    /// Current availability.
    pub availability: Availability,

    /// Image URI shown alongside the vehicle.
    #[serde(default = "default_image")]
    pub image: String,
}

fn default_image() -> String {
    DEFAULT_IMAGE.to_string()
}

impl Vehicle {
    /// Check if the vehicle is currently available.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.availability == Availability::Available
    }
}

/// Trim `value` and reject it if nothing is left.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(field, format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Issues vehicle ids derived from the wall-clock millisecond timestamp.
///
/// Ids are strictly increasing within one generator and skip any value the
/// caller reports as taken, so two vehicles added in the same millisecond
/// still get distinct ids.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    /// Create a generator with no ids issued yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next id, skipping any for which `is_taken` returns true.
    pub fn next_id(&mut self, is_taken: impl Fn(&str) -> bool) -> String {
        let mut candidate = Utc::now().timestamp_millis().max(self.last + 1);
        while is_taken(&candidate.to_string()) {
            candidate += 1;
        }
        self.last = candidate;
        candidate.to_string()
    }
}
