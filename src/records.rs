use crate::errors::ValidationError;
use crate::models::{DailyEntry, DailyRecordSet};
use crate::registry::{Aggregation, CategoryRegistry};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use tracing::debug;

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Calendar day of a stored date key. Any time-of-day part is dropped.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    let key = key.trim();
    if let Ok(date) = NaiveDate::parse_from_str(key, "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(key, format) {
            return Some(date_time.date());
        }
    }
    DateTime::parse_from_rfc3339(key)
        .ok()
        .map(|date_time| date_time.date_naive())
}

/// Strict parser for dates arriving from callers.
pub fn parse_request_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidDate {
            value: value.to_string(),
        }
    })
}

/// A validated set of figures for one (date, staff) pair.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SalesSubmission {
    values: BTreeMap<String, f64>,
}

impl SalesSubmission {
    pub fn validate(
        registry: &CategoryRegistry,
        values: BTreeMap<String, f64>,
    ) -> Result<Self, ValidationError> {
        for (key, value) in &values {
            let known = registry.performance_category(key).is_some()
                || registry.daily_category(key).is_some();
            if !known {
                return Err(ValidationError::UnknownCategory { key: key.clone() });
            }
            check_value(key, *value)?;
        }
        if values.is_empty() {
            return Err(ValidationError::EmptySubmission);
        }
        Ok(Self { values })
    }

    pub fn value(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }
}

pub(crate) fn check_value(key: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            key: key.to_string(),
        });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue {
            key: key.to_string(),
            value,
        });
    }
    Ok(())
}

/// Returns a new record set with the submission applied to `(date, staff_id)`.
///
/// Performance figures left out of the submission keep their stored value; a
/// fresh entry starts summed categories at 0 and leaves averaged ones
/// undefined so they stay out of the mean. Daily-tracking figures left out
/// are reset to 0.
pub fn record_sales(
    records: &DailyRecordSet,
    registry: &CategoryRegistry,
    staff_id: &str,
    date: NaiveDate,
    submission: &SalesSubmission,
) -> Result<DailyRecordSet, ValidationError> {
    if registry.staff_member(staff_id).is_none() {
        return Err(ValidationError::UnknownStaff {
            staff_id: staff_id.to_string(),
        });
    }

    let key = date_key(date);
    let mut updated = records.clone();
    let mut entry = take_day_entry(&mut updated, staff_id, date, &key);

    for category in &registry.performance {
        match submission.value(&category.key) {
            Some(value) => {
                entry.values.insert(category.key.clone(), value);
            }
            None if category.aggregation == Aggregation::Sum => {
                entry.values.entry(category.key.clone()).or_insert(0.0);
            }
            None => {}
        }
    }
    for category in &registry.daily {
        let value = submission.value(&category.key).unwrap_or(0.0);
        entry.values.insert(category.key.clone(), value);
    }

    updated
        .days
        .entry(key)
        .or_default()
        .insert(staff_id.to_string(), entry);
    Ok(updated)
}

/// Removes and merges every entry `staff_id` has on `date`, whatever key it
/// was stored under. The canonical key wins over timestamped ones.
fn take_day_entry(
    records: &mut DailyRecordSet,
    staff_id: &str,
    date: NaiveDate,
    canonical: &str,
) -> DailyEntry {
    let stale: Vec<String> = records
        .days
        .keys()
        .filter(|key| key.as_str() != canonical && parse_date_key(key) == Some(date))
        .cloned()
        .collect();

    let mut merged = DailyEntry::default();
    for key in stale {
        let Some(by_staff) = records.days.get_mut(&key) else {
            continue;
        };
        if let Some(previous) = by_staff.remove(staff_id) {
            merged.values.extend(previous.values);
        }
        if by_staff.is_empty() {
            records.days.remove(&key);
        }
    }
    if let Some(current) = records.entry(canonical, staff_id) {
        merged.values.extend(current.values.clone());
    }
    merged
}

/// Every stored day with its entries, skipping keys that are not dates.
pub(crate) fn dated_entries<'a>(
    records: &'a DailyRecordSet,
) -> impl Iterator<Item = (NaiveDate, &'a BTreeMap<String, DailyEntry>)> + 'a {
    records.days.iter().filter_map(|(key, by_staff)| match parse_date_key(key) {
        Some(date) => Some((date, by_staff)),
        None => {
            debug!("skipping record set key '{key}': not a calendar date");
            None
        }
    })
}

/// `(staff_id, entry)` pairs stored under any key that falls on `date`.
pub(crate) fn entries_on<'a>(
    records: &'a DailyRecordSet,
    date: NaiveDate,
) -> impl Iterator<Item = (&'a str, &'a DailyEntry)> + 'a {
    dated_entries(records)
        .filter(move |(day, _)| *day == date)
        .flat_map(|(_, by_staff)| {
            by_staff
                .iter()
                .map(|(staff_id, entry)| (staff_id.as_str(), entry))
        })
}

/// Stored keys that do not name a calendar day.
pub fn invalid_date_keys(records: &DailyRecordSet) -> Vec<&str> {
    records
        .days
        .keys()
        .filter(|key| parse_date_key(key).is_none())
        .map(String::as_str)
        .collect()
}
