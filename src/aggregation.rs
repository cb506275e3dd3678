use crate::models::{AccumulatedSnapshot, DailyRecordSet};
use crate::records::{dated_entries, entries_on};
use crate::registry::{Aggregation, CategoryRegistry};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Whose entries take part in an accumulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffFilter<'a> {
    One(&'a str),
    All,
}

impl StaffFilter<'_> {
    fn matches(&self, staff_id: &str) -> bool {
        match self {
            StaffFilter::One(id) => *id == staff_id,
            StaffFilter::All => true,
        }
    }
}

/// Inclusive calendar-day bounds. `None` leaves that side open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn up_to(cutoff: NaiveDate) -> Self {
        Self {
            start: None,
            end: Some(cutoff),
        }
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

/// Accumulated performance values for one staff member up to `cutoff`.
pub fn accumulate(
    records: &DailyRecordSet,
    registry: &CategoryRegistry,
    staff_id: &str,
    cutoff: NaiveDate,
) -> AccumulatedSnapshot {
    accumulate_window(
        records,
        registry,
        StaffFilter::One(staff_id),
        DateWindow::up_to(cutoff),
    )
}

/// Sums `Sum` categories and averages `Average` categories over the entries
/// selected by `staff` and `window`. Entries that never defined an averaged
/// category are left out of both numerator and denominator.
pub fn accumulate_window(
    records: &DailyRecordSet,
    registry: &CategoryRegistry,
    staff: StaffFilter<'_>,
    window: DateWindow,
) -> AccumulatedSnapshot {
    let mut totals: BTreeMap<&str, (f64, usize)> = registry
        .performance
        .iter()
        .map(|category| (category.key.as_str(), (0.0, 0)))
        .collect();

    for (date, by_staff) in dated_entries(records) {
        if !window.contains(date) {
            continue;
        }
        for (staff_id, entry) in by_staff {
            if !staff.matches(staff_id) {
                continue;
            }
            for category in &registry.performance {
                if let (Some(value), Some(total)) = (
                    entry.value(&category.key),
                    totals.get_mut(category.key.as_str()),
                ) {
                    total.0 += value;
                    total.1 += 1;
                }
            }
        }
    }

    let mut snapshot = AccumulatedSnapshot::default();
    for category in &registry.performance {
        let (sum, count) = totals
            .get(category.key.as_str())
            .copied()
            .unwrap_or((0.0, 0));
        let value = match category.aggregation {
            Aggregation::Sum => sum,
            Aggregation::Average if count > 0 => sum / count as f64,
            Aggregation::Average => 0.0,
        };
        snapshot.values.insert(category.key.clone(), value);
        snapshot.samples.insert(category.key.clone(), count);
    }
    snapshot
}

/// Daily-tracking figures for exactly `(staff_id, date)`; missing values read as 0.
pub fn daily_slice(
    records: &DailyRecordSet,
    registry: &CategoryRegistry,
    staff_id: &str,
    date: NaiveDate,
) -> BTreeMap<String, f64> {
    let mut slice: BTreeMap<String, f64> = registry
        .daily
        .iter()
        .map(|category| (category.key.clone(), 0.0))
        .collect();
    for (_, entry) in entries_on(records, date).filter(|(id, _)| *id == staff_id) {
        for (key, total) in slice.iter_mut() {
            *total += entry.value_or_zero(key);
        }
    }
    slice
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DailyEntry;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn put(records: &mut DailyRecordSet, date: &str, staff: &str, pairs: &[(&str, f64)]) {
        let entry = DailyEntry {
            values: pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        };
        records
            .days
            .entry(date.to_string())
            .or_default()
            .insert(staff.to_string(), entry);
    }

    #[test]
    fn sum_respects_inclusive_cutoff() {
        let registry = CategoryRegistry::standard();
        let mut records = DailyRecordSet::default();
        put(&mut records, "2024-01-01", "staff1", &[("postpaid", 10.0)]);
        put(&mut records, "2024-01-02", "staff1", &[("postpaid", 5.0)]);

        let at = |cutoff| accumulate(&records, &registry, "staff1", cutoff).value("postpaid");
        assert_eq!(at(day(2023, 12, 31)), 0.0);
        assert_eq!(at(day(2024, 1, 1)), 10.0);
        assert_eq!(at(day(2024, 1, 2)), 15.0);
    }

    #[test]
    fn average_skips_entries_without_a_value() {
        let registry = CategoryRegistry::standard();
        let mut records = DailyRecordSet::default();
        put(&mut records, "2024-01-01", "staff1", &[("csat", 80.0)]);
        put(&mut records, "2024-01-02", "staff1", &[("postpaid", 1.0)]);
        put(&mut records, "2024-01-03", "staff1", &[("csat", 90.0)]);

        let snapshot = accumulate(&records, &registry, "staff1", day(2024, 1, 3));
        assert_eq!(snapshot.value("csat"), 85.0);
        assert_eq!(snapshot.samples("csat"), 2);
    }

    #[test]
    fn average_without_samples_is_zero() {
        let registry = CategoryRegistry::standard();
        let mut records = DailyRecordSet::default();
        put(&mut records, "2024-01-01", "staff1", &[("hvc", 4.0)]);

        let snapshot = accumulate(&records, &registry, "staff1", day(2024, 1, 1));
        assert_eq!(snapshot.value("csat"), 0.0);
        assert_eq!(snapshot.samples("csat"), 0);
    }

    #[test]
    fn other_staff_and_timestamped_keys() {
        let registry = CategoryRegistry::standard();
        let mut records = DailyRecordSet::default();
        put(&mut records, "2024-01-01T18:30:00", "staff1", &[("fibre", 2.0)]);
        put(&mut records, "2024-01-01", "staff2", &[("fibre", 7.0)]);
        put(&mut records, "not-a-date", "staff1", &[("fibre", 100.0)]);

        let snapshot = accumulate(&records, &registry, "staff1", day(2024, 1, 1));
        assert_eq!(snapshot.value("fibre"), 2.0);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let registry = CategoryRegistry::standard();
        let mut records = DailyRecordSet::default();
        put(&mut records, "2024-01-31", "staff1", &[("fwa", 1.0)]);
        put(&mut records, "2024-02-01", "staff1", &[("fwa", 2.0)]);
        put(&mut records, "2024-02-29", "staff1", &[("fwa", 4.0)]);
        put(&mut records, "2024-03-01", "staff2", &[("fwa", 8.0)]);

        let window = DateWindow::between(day(2024, 2, 1), day(2024, 2, 29));
        let snapshot = accumulate_window(&records, &registry, StaffFilter::All, window);
        assert_eq!(snapshot.value("fwa"), 6.0);
        let everything =
            accumulate_window(&records, &registry, StaffFilter::All, DateWindow::all());
        assert_eq!(everything.value("fwa"), 15.0);
    }

    #[test]
    fn accumulate_is_repeatable() {
        let registry = CategoryRegistry::standard();
        let mut records = DailyRecordSet::default();
        put(&mut records, "2024-01-01", "staff1", &[("hvc", 3.0), ("csat", 70.0)]);
        let first = accumulate(&records, &registry, "staff1", day(2024, 1, 5));
        let second = accumulate(&records, &registry, "staff1", day(2024, 1, 5));
        assert_eq!(first, second);
    }

    #[test]
    fn daily_slice_reads_timestamped_keys() {
        let registry = CategoryRegistry::standard();
        let mut records = DailyRecordSet::default();
        put(
            &mut records,
            "2024-01-01T10:00:00",
            "staff1",
            &[("postpaid", 10.0), ("device", 3.0)],
        );
        put(&mut records, "2024-01-02T10:00:00", "staff1", &[("device", 9.0)]);

        let slice = daily_slice(&records, &registry, "staff1", day(2024, 1, 1));
        assert_eq!(slice["device"], 3.0);
        assert_eq!(
            accumulate(&records, &registry, "staff1", day(2024, 1, 1)).value("postpaid"),
            10.0
        );
    }

    #[test]
    fn daily_slice_reads_one_day_only() {
        let registry = CategoryRegistry::standard();
        let mut records = DailyRecordSet::default();
        put(&mut records, "2024-01-01", "staff1", &[("device", 3.0)]);
        put(&mut records, "2024-01-02", "staff1", &[("device", 1.0), ("suppline", 2.0)]);

        let slice = daily_slice(&records, &registry, "staff1", day(2024, 1, 2));
        assert_eq!(slice["device"], 1.0);
        assert_eq!(slice["suppline"], 2.0);
        assert_eq!(slice["celcomPostpaid"], 0.0);
        assert_eq!(slice.len(), registry.daily.len());

        let empty = daily_slice(&records, &registry, "staff3", day(2024, 1, 2));
        assert!(empty.values().all(|value| *value == 0.0));
    }
}
