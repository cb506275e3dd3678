use crate::aggregation::{DateWindow, StaffFilter, accumulate_window};
use crate::models::{DailyRecordSet, TargetSet, Targets, TeamDailyTotals, TeamSnapshot};
use crate::records::entries_on;
use crate::registry::{Aggregation, CategoryRegistry};
use crate::targets::get_targets;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

/// Roster-wide targets: summed for `Sum` categories, averaged for `Average` ones.
pub fn team_targets(target_set: &TargetSet, registry: &CategoryRegistry) -> Targets {
    let rows: Vec<Targets> = registry
        .staff
        .iter()
        .map(|member| get_targets(target_set, registry, &member.id))
        .collect();

    let mut team = Targets::default();
    for category in &registry.performance {
        let sum: f64 = rows.iter().map(|row| row.value(&category.key)).sum();
        let value = match category.aggregation {
            Aggregation::Sum => sum,
            Aggregation::Average if !rows.is_empty() => sum / rows.len() as f64,
            Aggregation::Average => 0.0,
        };
        team.values.insert(category.key.clone(), value);
    }
    team
}

/// Team totals across every staff member's entries up to `cutoff`.
pub fn team_accumulate(
    records: &DailyRecordSet,
    target_set: &TargetSet,
    registry: &CategoryRegistry,
    cutoff: NaiveDate,
) -> TeamSnapshot {
    team_accumulate_window(records, target_set, registry, DateWindow::up_to(cutoff))
}

pub fn team_accumulate_window(
    records: &DailyRecordSet,
    target_set: &TargetSet,
    registry: &CategoryRegistry,
    window: DateWindow,
) -> TeamSnapshot {
    TeamSnapshot {
        accumulated: accumulate_window(records, registry, StaffFilter::All, window),
        targets: team_targets(target_set, registry),
    }
}

/// Daily-tracking totals for exactly `date`, over the staff who have an entry that day.
pub fn team_daily_totals(
    records: &DailyRecordSet,
    registry: &CategoryRegistry,
    date: NaiveDate,
) -> TeamDailyTotals {
    let mut totals = TeamDailyTotals {
        totals: registry
            .daily
            .iter()
            .map(|category| (category.key.clone(), 0.0))
            .collect(),
        staff_count: 0,
    };

    let mut active = BTreeSet::new();
    for (staff_id, entry) in entries_on(records, date) {
        active.insert(staff_id);
        for (key, total) in totals.totals.iter_mut() {
            *total += entry.value_or_zero(key);
        }
    }
    totals.staff_count = active.len();
    totals
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

/// The current month, clipped so it never reaches past `today`.
pub fn month_window(today: NaiveDate) -> DateWindow {
    DateWindow::between(start_of_month(today), end_of_month(today).min(today))
}

pub fn team_monthly(
    records: &DailyRecordSet,
    target_set: &TargetSet,
    registry: &CategoryRegistry,
    today: NaiveDate,
) -> TeamSnapshot {
    team_accumulate_window(records, target_set, registry, month_window(today))
}
