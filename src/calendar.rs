use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::availability::AvailabilityIndex;
use crate::navigation::is_selectable;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Future,
    Today,
    Available,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day: u32,
    pub status: DayStatus,
    pub selectable: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub name: &'static str,
    /// Empty cells before the 1st in a Sunday-first week grid.
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

pub fn day_status(date: NaiveDate, index: &AvailabilityIndex, today: NaiveDate) -> DayStatus {
    if date > today {
        DayStatus::Future
    } else if date == today {
        DayStatus::Today
    } else if index.is_available(date) {
        DayStatus::Available
    } else {
        DayStatus::Missing
    }
}

/// Month grid for `month` (1-12). Returns `None` for an invalid month.
pub fn month_view(
    year: i32,
    month: u32,
    index: &AvailabilityIndex,
    today: NaiveDate,
    selected: Option<NaiveDate>,
) -> Option<MonthView> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;

    let days = first
        .iter_days()
        .take_while(|d| d.month() == month)
        .map(|date| CalendarDay {
            date,
            day: date.day(),
            status: day_status(date, index, today),
            selectable: is_selectable(index, date, today),
            selected: selected == Some(date),
        })
        .collect();

    Some(MonthView {
        year,
        month,
        name: MONTH_NAMES[(month - 1) as usize],
        leading_blanks: first.weekday().num_days_from_sunday(),
        days,
    })
}

pub fn year_view(
    year: i32,
    index: &AvailabilityIndex,
    today: NaiveDate,
    selected: Option<NaiveDate>,
) -> Vec<MonthView> {
    (1..=12)
        .filter_map(|month| month_view(year, month, index, today, selected))
        .collect()
}
