//! Shared record lifecycle fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// Lifecycle fields embedded by every record.
///
/// Replaces the base-class inheritance of the original data model with a
/// plain composable value; no polymorphic dispatch happens over these fields.
/// Timestamps are passed in explicitly (from a `Clock` at the boundary), so
/// the records themselves stay clock-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMeta {
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecordMeta {
    /// New active record stamped at `at`.
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            active: true,
            created_at: at,
            updated_at: at,
        }
    }

    /// Record a mutation at `at`.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    pub fn deactivate(&mut self, at: DateTime<Utc>) {
        self.active = false;
        self.updated_at = at;
    }

    pub fn reactivate(&mut self, at: DateTime<Utc>) {
        self.active = true;
        self.updated_at = at;
    }
}

impl ValueObject for RecordMeta {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stamp(day: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn new_records_are_active() {
        let meta = RecordMeta::new(stamp(1));
        assert!(meta.active);
        assert_eq!(meta.created_at, meta.updated_at);
    }

    #[test]
    fn touch_moves_only_updated_at() {
        let mut meta = RecordMeta::new(stamp(1));
        meta.touch(stamp(2));
        assert_eq!(meta.created_at, stamp(1));
        assert_eq!(meta.updated_at, stamp(2));
    }

    #[test]
    fn deactivate_clears_active_flag() {
        let mut meta = RecordMeta::new(stamp(1));
        meta.deactivate(stamp(3));
        assert!(!meta.active);
        assert_eq!(meta.updated_at, stamp(3));
    }
}
