use crate::aggregation::{DateWindow, StaffFilter, accumulate, accumulate_window, daily_slice};
use crate::errors::ValidationError;
use crate::models::{
    DailyRecordSet, MonthlyTeamView, StaffView, SummaryRow, SummaryView, TargetSet, TeamView,
};
use crate::records::date_key;
use crate::registry::CategoryRegistry;
use crate::scoring::score;
use crate::targets::get_targets;
use crate::team::{month_window, team_accumulate, team_daily_totals, team_monthly};
use chrono::NaiveDate;

pub fn staff_view(
    records: &DailyRecordSet,
    target_set: &TargetSet,
    registry: &CategoryRegistry,
    staff_id: &str,
    date: NaiveDate,
) -> Result<StaffView, ValidationError> {
    let staff = registry
        .staff_member(staff_id)
        .cloned()
        .ok_or_else(|| ValidationError::UnknownStaff {
            staff_id: staff_id.to_string(),
        })?;

    let accumulated = accumulate(records, registry, staff_id, date);
    let targets = get_targets(target_set, registry, staff_id);
    let score = score(&accumulated, &targets, registry);

    Ok(StaffView {
        staff,
        date: date_key(date),
        daily: daily_slice(records, registry, staff_id, date),
        accumulated,
        targets,
        score,
    })
}

pub fn team_view(
    records: &DailyRecordSet,
    target_set: &TargetSet,
    registry: &CategoryRegistry,
    date: NaiveDate,
) -> TeamView {
    let team = team_accumulate(records, target_set, registry, date);
    let score = score(&team.accumulated, &team.targets, registry);
    TeamView {
        date: date_key(date),
        daily: team_daily_totals(records, registry, date),
        accumulated: team.accumulated,
        targets: team.targets,
        score,
    }
}

pub fn team_monthly_view(
    records: &DailyRecordSet,
    target_set: &TargetSet,
    registry: &CategoryRegistry,
    today: NaiveDate,
) -> MonthlyTeamView {
    let window = month_window(today);
    let team = team_monthly(records, target_set, registry, today);
    let score = score(&team.accumulated, &team.targets, registry);
    MonthlyTeamView {
        month_start: window.start.map(date_key).unwrap_or_default(),
        through: window.end.map(date_key).unwrap_or_default(),
        accumulated: team.accumulated,
        targets: team.targets,
        score,
    }
}

/// One row per roster member over every recorded date.
pub fn summary_view(
    records: &DailyRecordSet,
    target_set: &TargetSet,
    registry: &CategoryRegistry,
) -> SummaryView {
    let rows = registry
        .staff
        .iter()
        .map(|member| {
            let accumulated = accumulate_window(
                records,
                registry,
                StaffFilter::One(&member.id),
                DateWindow::all(),
            );
            let targets = get_targets(target_set, registry, &member.id);
            let score = score(&accumulated, &targets, registry);
            SummaryRow {
                staff: member.clone(),
                accumulated,
                targets,
                total_score: score.total_score,
                overall_percent: score.overall_percent,
            }
        })
        .collect();
    SummaryView { rows }
}
