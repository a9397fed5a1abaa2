use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::photo_types::PhotoRecord;

/// Dates that currently have a photo.
///
/// Built from whatever the store last returned and thrown away after the
/// request that built it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityIndex {
    dates: BTreeSet<NaiveDate>,
}

impl AvailabilityIndex {
    pub fn from_records(records: &[PhotoRecord]) -> Self {
        Self {
            dates: records.iter().map(|r| r.date).collect(),
        }
    }

    pub fn is_available(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn all_dates(&self) -> &BTreeSet<NaiveDate> {
        &self.dates
    }

    /// Closest available date strictly before `date`.
    pub fn before(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.dates.range(..date).next_back().copied()
    }

    /// Closest available date strictly after `date`.
    pub fn after(&self, date: NaiveDate) -> Option<NaiveDate> {
        use std::ops::Bound::{Excluded, Unbounded};
        self.dates.range((Excluded(date), Unbounded)).next().copied()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl FromIterator<NaiveDate> for AvailabilityIndex {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}
