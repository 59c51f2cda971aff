//! Scheduling preferences: business hours, slot granularity and the preferred
//! minimum gap between appointments.
//!
//! Preferences are owned by the caller and passed into every call as an
//! immutable snapshot. They can be loaded from JSON. Business hours are
//! required; the gap and granularity fall back to the defaults below.
//!
//! ```json
//! { "business_start": "08:00", "business_end": "18:00", "minimum_gap_minutes": 15 }
//! ```

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulingError};

/// Slot spacing used by the day grid.
pub const DEFAULT_SLOT_GRANULARITY_MINUTES: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingPreferences {
    /// Opening time; the first grid slot starts exactly here.
    #[serde(with = "crate::timefmt")]
    pub business_start: NaiveTime,
    /// Closing time; no slot starts at or after it.
    #[serde(with = "crate::timefmt")]
    pub business_end: NaiveTime,
    /// Gaps strictly shorter than this produce an advisory warning.
    #[serde(default)]
    pub minimum_gap_minutes: u32,
    #[serde(default = "default_granularity")]
    pub slot_granularity_minutes: u32,
}

fn default_granularity() -> u32 {
    DEFAULT_SLOT_GRANULARITY_MINUTES
}

impl Default for SchedulingPreferences {
    fn default() -> Self {
        Self {
            business_start: NaiveTime::from_hms_opt(8, 0, 0).expect("08:00 is a valid time"),
            business_end: NaiveTime::from_hms_opt(18, 0, 0).expect("18:00 is a valid time"),
            minimum_gap_minutes: 0,
            slot_granularity_minutes: DEFAULT_SLOT_GRANULARITY_MINUTES,
        }
    }
}

impl SchedulingPreferences {
    /// Preferences with the given business hours and gap, default granularity.
    pub fn new(business_start: NaiveTime, business_end: NaiveTime, minimum_gap_minutes: u32) -> Self {
        Self {
            business_start,
            business_end,
            minimum_gap_minutes,
            slot_granularity_minutes: DEFAULT_SLOT_GRANULARITY_MINUTES,
        }
    }

    /// Parse and validate preferences from a JSON document.
    ///
    /// # Errors
    /// Returns `SchedulingError::InvalidPreferences` if the JSON is malformed,
    /// either business hour is missing, or the resulting preferences fail [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self> {
        let prefs: Self = serde_json::from_str(json)
            .map_err(|e| SchedulingError::InvalidPreferences(e.to_string()))?;
        prefs.validate()?;
        Ok(prefs)
    }

    /// Check the invariants the engine relies on.
    ///
    /// # Errors
    /// Returns `SchedulingError::InvalidPreferences` when business hours are empty
    /// or inverted, or the slot granularity is zero.
    pub fn validate(&self) -> Result<()> {
        if self.business_start >= self.business_end {
            return Err(SchedulingError::InvalidPreferences(format!(
                "business hours {}-{} are empty or inverted",
                self.business_start.format("%H:%M"),
                self.business_end.format("%H:%M")
            )));
        }
        if self.slot_granularity_minutes == 0 {
            return Err(SchedulingError::InvalidPreferences(
                "slot granularity must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Length of the business day in minutes.
    pub fn business_minutes(&self) -> i64 {
        (self.business_end - self.business_start).num_minutes()
    }
}
