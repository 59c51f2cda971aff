//! Half-open time intervals and the overlap/gap arithmetic built on them.
//!
//! Adjacent intervals (where one ends exactly when another starts) do NOT overlap;
//! the gap between them is zero minutes.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A `[start, end)` span of wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeInterval {
    pub fn new(start: NaiveDateTime, duration_minutes: u32) -> Self {
        Self {
            start,
            end: start + Duration::minutes(i64::from(duration_minutes)),
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Two intervals overlap iff `a.start < b.end && b.start < a.end`.
    ///
    /// Symmetric. A zero-width shared boundary is not an overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Minutes of shared time, or 0 when the intervals do not overlap.
    pub fn overlap_minutes(&self, other: &TimeInterval) -> i64 {
        if !self.overlaps(other) {
            return 0;
        }
        let overlap_start = self.start.max(other.start);
        let overlap_end = self.end.min(other.end);
        (overlap_end - overlap_start).num_minutes()
    }

    /// Minutes between the end of `other` and the start of `self`, when `other`
    /// finishes at or before `self` begins.
    pub fn gap_before(&self, other: &TimeInterval) -> Option<i64> {
        let gap = (self.start - other.end).num_minutes();
        (gap >= 0).then_some(gap)
    }

    /// Minutes between the end of `self` and the start of `other`, when `other`
    /// starts at or after `self` ends.
    pub fn gap_after(&self, other: &TimeInterval) -> Option<i64> {
        let gap = (other.start - self.end).num_minutes();
        (gap >= 0).then_some(gap)
    }

    /// Smallest non-negative gap to `other` on either side, if any.
    pub fn gap_to(&self, other: &TimeInterval) -> Option<i64> {
        match (self.gap_before(other), self.gap_after(other)) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}
