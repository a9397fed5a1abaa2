use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::availability::AvailabilityIndex;
use crate::civil_clock::format_long_date;
use crate::photo_types::PhotoRecord;

pub const TODAY_PLACEHOLDER_CAPTION: &str = "No photo yet for today";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Prev,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderReason {
    /// Today has no photo yet; today stays selectable regardless.
    Today,
    /// A past date without a photo, only reachable by direct selection.
    Missing,
}

/// What the viewer shows for a selected date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DisplayState {
    Photo {
        photo: PhotoRecord,
    },
    Placeholder {
        date: NaiveDate,
        reason: PlaceholderReason,
    },
}

impl DisplayState {
    pub fn date(&self) -> NaiveDate {
        match self {
            DisplayState::Photo { photo } => photo.date,
            DisplayState::Placeholder { date, .. } => *date,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, DisplayState::Placeholder { .. })
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            DisplayState::Photo { photo } => Some(&photo.url),
            DisplayState::Placeholder { .. } => None,
        }
    }

    pub fn caption(&self) -> String {
        match self {
            DisplayState::Photo { photo } => photo.caption.clone(),
            DisplayState::Placeholder {
                reason: PlaceholderReason::Today,
                ..
            } => TODAY_PLACEHOLDER_CAPTION.to_string(),
            DisplayState::Placeholder {
                date,
                reason: PlaceholderReason::Missing,
            } => format!("No photo available for {}", format_long_date(*date)),
        }
    }
}

/// Closest available date strictly before or after `date`.
///
/// Never returns `date` itself and never a date without a photo.
pub fn nearest(
    index: &AvailabilityIndex,
    date: NaiveDate,
    direction: Direction,
) -> Option<NaiveDate> {
    match direction {
        Direction::Prev => index.before(date),
        Direction::Next => index.after(date),
    }
}

/// Resolves a selection (or no selection, meaning today) to a display state.
pub fn resolve(
    records: &[PhotoRecord],
    selected: Option<NaiveDate>,
    today: NaiveDate,
) -> DisplayState {
    let date = selected.unwrap_or(today);

    if let Some(photo) = records.iter().find(|r| r.date == date) {
        return DisplayState::Photo {
            photo: photo.clone(),
        };
    }

    let reason = if date == today {
        PlaceholderReason::Today
    } else {
        PlaceholderReason::Missing
    };
    DisplayState::Placeholder { date, reason }
}

/// A date can be picked directly when it is today, or a past date with a photo.
pub fn is_selectable(index: &AvailabilityIndex, date: NaiveDate, today: NaiveDate) -> bool {
    date == today || (date < today && index.is_available(date))
}

/// Viewer selection state with prev/next stepping.
///
/// Holds only the selected date; the index and today are passed in so the
/// caller always works against the latest store contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Navigator {
    selected: Option<NaiveDate>,
}

impl Navigator {
    pub fn new(selected: Option<NaiveDate>) -> Self {
        Self { selected }
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    pub fn effective_date(&self, today: NaiveDate) -> NaiveDate {
        self.selected.unwrap_or(today)
    }

    /// Applies the selection policy; returns whether the selection changed.
    pub fn select(&mut self, index: &AvailabilityIndex, date: NaiveDate, today: NaiveDate) -> bool {
        if !is_selectable(index, date, today) {
            return false;
        }
        self.selected = Some(date);
        true
    }

    pub fn can_step(&self, index: &AvailabilityIndex, direction: Direction, today: NaiveDate) -> bool {
        nearest(index, self.effective_date(today), direction).is_some()
    }

    /// Moves to the nearest available date; no-op when there is none.
    pub fn step(&mut self, index: &AvailabilityIndex, direction: Direction, today: NaiveDate) -> bool {
        match nearest(index, self.effective_date(today), direction) {
            Some(date) => {
                self.selected = Some(date);
                true
            }
            None => false,
        }
    }

    pub fn display(&self, records: &[PhotoRecord], today: NaiveDate) -> DisplayState {
        resolve(records, self.selected, today)
    }
}
