//! Domain-specific newtypes for type safety.
//!
//! Durations arrive from the export as integer milliseconds and are
//! aggregated as fractional hours. Keeping the two in distinct types stops
//! the raw and derived values from being mixed up. Uses `derive_more` to
//! eliminate arithmetic boilerplate.

use std::fmt;
use std::iter::Sum;
use std::ops::AddAssign;

use derive_more::{Add as DeriveAdd, From, Into};
use serde::{Deserialize, Serialize};

/// Milliseconds in one hour.
pub const MS_PER_HOUR: f64 = 3_600_000.0;

// ============================================================================
// Milliseconds
// ============================================================================

/// A non-negative play duration in milliseconds.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    DeriveAdd,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Milliseconds(pub u64);

impl Milliseconds {
    /// Create a new instance.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the inner value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Convert to hours.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_hours(self) -> Hours {
        Hours(self.0 as f64 / MS_PER_HOUR)
    }
}

impl AddAssign for Milliseconds {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl fmt::Display for Milliseconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_seconds = self.0 / 1000;
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        match (hours, minutes) {
            (0, 0) => write!(f, "{seconds}s"),
            (0, _) => write!(f, "{minutes}m {seconds}s"),
            _ => write!(f, "{hours}h {minutes}m {seconds}s"),
        }
    }
}

// ============================================================================
// Hours
// ============================================================================

/// Listening time in fractional hours.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, DeriveAdd, From, Into)]
pub struct Hours(pub f64);

impl Hours {
    pub const ZERO: Self = Self(0.0);

    /// Get the inner value.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Convert back to whole milliseconds, rounding to the nearest one.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_millis(self) -> Milliseconds {
        Milliseconds((self.0 * MS_PER_HOUR).round().max(0.0) as u64)
    }
}

impl AddAssign for Hours {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Hours {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, h| acc + h)
    }
}

impl<'a> Sum<&'a Self> for Hours {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<Milliseconds> for Hours {
    fn from(value: Milliseconds) -> Self {
        value.to_hours()
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
