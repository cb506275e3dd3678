use crate::registry::StaffMember;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One staff member's figures for one calendar day, keyed by category key.
/// A performance key that is absent was never submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct DailyEntry {
    pub values: BTreeMap<String, f64>,
}

impl DailyEntry {
    pub fn value(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn value_or_zero(&self, key: &str) -> f64 {
        self.value(key).unwrap_or(0.0)
    }
}

/// `YYYY-MM-DD` -> staff id -> entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct DailyRecordSet {
    pub days: BTreeMap<String, BTreeMap<String, DailyEntry>>,
}

impl DailyRecordSet {
    pub fn entry(&self, date_key: &str, staff_id: &str) -> Option<&DailyEntry> {
        self.days.get(date_key)?.get(staff_id)
    }
}

/// Target per performance category key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Targets {
    pub values: BTreeMap<String, f64>,
}

impl Targets {
    pub fn value(&self, key: &str) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }
}

/// Staff id -> targets. Not date scoped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct TargetSet {
    pub staff: BTreeMap<String, Targets>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct AccumulatedSnapshot {
    pub values: BTreeMap<String, f64>,
    /// Number of entries that contributed to each category.
    pub samples: BTreeMap<String, usize>,
}

impl AccumulatedSnapshot {
    pub fn value(&self, key: &str) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }

    pub fn samples(&self, key: &str) -> usize {
        self.samples.get(key).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub key: String,
    pub current: f64,
    pub target: f64,
    /// `current - target`; negative while short of target.
    pub variance: f64,
    pub achievement_percent: f64,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ScoreSnapshot {
    pub categories: Vec<CategoryScore>,
    pub total_score: f64,
    pub overall_percent: f64,
}

impl ScoreSnapshot {
    pub fn category(&self, key: &str) -> Option<&CategoryScore> {
        self.categories.iter().find(|score| score.key == key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct TeamSnapshot {
    pub accumulated: AccumulatedSnapshot,
    pub targets: Targets,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct TeamDailyTotals {
    pub totals: BTreeMap<String, f64>,
    /// Staff with any entry on the day.
    pub staff_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StaffView {
    pub staff: StaffMember,
    pub date: String,
    pub accumulated: AccumulatedSnapshot,
    pub targets: Targets,
    pub score: ScoreSnapshot,
    pub daily: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamView {
    pub date: String,
    pub accumulated: AccumulatedSnapshot,
    pub targets: Targets,
    pub score: ScoreSnapshot,
    pub daily: TeamDailyTotals,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyTeamView {
    pub month_start: String,
    pub through: String,
    pub accumulated: AccumulatedSnapshot,
    pub targets: Targets,
    pub score: ScoreSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub staff: StaffMember,
    pub accumulated: AccumulatedSnapshot,
    pub targets: Targets,
    pub total_score: f64,
    pub overall_percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    pub rows: Vec<SummaryRow>,
}

#[derive(Debug, Deserialize)]
pub struct SalesRequest {
    pub staff_id: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub values: BTreeMap<String, f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SalesResponse {
    pub date: String,
    pub staff_id: String,
    pub entry: DailyEntry,
}

#[derive(Debug, Deserialize, Default)]
pub struct DateQuery {
    pub date: Option<String>,
}
