//! Filters applied when listing the roster.

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::vehicle::{Availability, Vehicle};

/// The wildcard spelling accepted when parsing a filter.
pub const WILDCARD: &str = "All";

/// A per-field match predicate: either a wildcard or an exact value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter<T> {
    /// Matches every value.
    #[default]
    All,
    /// Matches only this value.
    Only(T),
}

impl<T: PartialEq> Filter<T> {
    /// Check whether `value` passes this filter.
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }

    /// Check if this filter is the wildcard.
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Filter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(WILDCARD),
            Self::Only(value) => write!(f, "{value}"),
        }
    }
}

fn is_wildcard(s: &str) -> bool {
    s.trim().eq_ignore_ascii_case(WILDCARD)
}

impl FromStr for Filter<String> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if is_wildcard(s) {
            Ok(Self::All)
        } else {
            Ok(Self::Only(s.to_string()))
        }
    }
}

impl FromStr for Filter<Availability> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if is_wildcard(s) {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// The two roster filters, combined with a logical AND.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VehicleFilter {
    /// Exact match on `category`.
    pub category: Filter<String>,
    /// Exact match on `availability`.
    pub availability: Filter<Availability>,
}

impl VehicleFilter {
    /// Build a filter from its two parts.
    #[must_use]
    pub fn new(category: Filter<String>, availability: Filter<Availability>) -> Self {
        Self {
            category,
            availability,
        }
    }

    /// Check whether a vehicle passes both filters.
    #[must_use]
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        self.category.matches(&vehicle.category) && self.availability.matches(&vehicle.availability)
    }

    /// Check if neither filter restricts anything.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.category.is_all() && self.availability.is_all()
    }

    /// Reset both filters to the wildcard.
    pub fn clear(&mut self) {
        self.category = Filter::All;
        self.availability = Filter::All;
    }
}
