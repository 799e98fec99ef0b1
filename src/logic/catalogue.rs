//! Tournament catalogue: upcoming and held tournaments relative to a given day.

use crate::models::Tournament;
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Cards shown in the "Upcoming" section.
pub const MAX_UPCOMING: usize = 6;
/// Cards shown in the "Held" section.
pub const MAX_HELD: usize = 12;

/// Missing dates sort after any real date.
fn cmp_none_last(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Still running or yet to start: start or end is today or later, or either date is unknown.
pub fn is_upcoming(t: &Tournament, today: NaiveDate) -> bool {
    let start_ok = t.start_date.map_or(true, |d| d >= today);
    let end_ok = t.end_date.map_or(true, |d| d >= today);
    start_ok || end_ok
}

/// Finished: ended before today, or (no end date) started before today.
pub fn is_held(t: &Tournament, today: NaiveDate) -> bool {
    match (t.start_date, t.end_date) {
        (_, Some(end)) => end < today,
        (Some(start), None) => start < today,
        (None, None) => false,
    }
}

/// Latest date first; missing dates still last.
fn cmp_desc_none_last(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        _ => cmp_none_last(a, b),
    }
}

/// Upcoming tournaments, soonest start first (unknown start last).
pub fn upcoming(tournaments: &[Tournament], today: NaiveDate) -> Vec<Tournament> {
    let mut list: Vec<Tournament> = tournaments
        .iter()
        .filter(|t| is_upcoming(t, today))
        .cloned()
        .collect();
    list.sort_by(|a, b| cmp_none_last(a.start_date, b.start_date));
    list.truncate(MAX_UPCOMING);
    list
}

/// Held tournaments, most recently finished first.
pub fn held(tournaments: &[Tournament], today: NaiveDate) -> Vec<Tournament> {
    let mut list: Vec<Tournament> = tournaments
        .iter()
        .filter(|t| is_held(t, today))
        .cloned()
        .collect();
    list.sort_by(|a, b| {
        cmp_desc_none_last(a.end_date, b.end_date)
            .then_with(|| cmp_desc_none_last(a.start_date, b.start_date))
    });
    list.truncate(MAX_HELD);
    list
}
