use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How a performance category combines multiple dated entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    #[default]
    Sum,
    /// Mean over the entries that actually defined a value. Also applied to
    /// team targets.
    Average,
}

/// A weighted, target-bearing sales metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceCategory {
    pub key: String,
    pub display_name: String,
    pub weight: f64,
    pub default_target: f64,
    /// Achievement is clamped to this percentage before it is turned into points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achievement_cap_percent: Option<f64>,
    #[serde(default)]
    pub aggregation: Aggregation,
}

impl PerformanceCategory {
    pub fn new(key: &str, display_name: &str, weight: f64, default_target: f64) -> Self {
        Self {
            key: key.to_string(),
            display_name: display_name.to_string(),
            weight,
            default_target,
            achievement_cap_percent: None,
            aggregation: Aggregation::Sum,
        }
    }

    pub fn capped_at(mut self, percent: f64) -> Self {
        self.achievement_cap_percent = Some(percent);
        self
    }

    pub fn averaged(mut self) -> Self {
        self.aggregation = Aggregation::Average;
        self
    }
}

/// Recorded per day, never accumulated or scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCategory {
    pub key: String,
    pub display_name: String,
    /// Performance category whose input this one is listed under in the sales form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follows: Option<String>,
}

impl DailyCategory {
    pub fn new(key: &str, display_name: &str, follows: Option<&str>) -> Self {
        Self {
            key: key.to_string(),
            display_name: display_name.to_string(),
            follows: follows.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: String,
    pub display_name: String,
}

impl StaffMember {
    pub fn new(id: &str, display_name: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
        }
    }
}

/// Categories and roster. List order is display order only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRegistry {
    pub performance: Vec<PerformanceCategory>,
    pub daily: Vec<DailyCategory>,
    pub staff: Vec<StaffMember>,
}

impl CategoryRegistry {
    pub fn standard() -> Self {
        Self {
            performance: vec![
                PerformanceCategory::new("postpaid", "Postpaid", 20.0, 100.0).capped_at(120.0),
                PerformanceCategory::new("hvc", "HVC", 20.0, 100.0),
                PerformanceCategory::new("fibre", "Fibre", 20.0, 50.0),
                PerformanceCategory::new("fwa", "FWA", 10.0, 50.0),
                PerformanceCategory::new("csat", "CSAT", 30.0, 90.0).averaged(),
            ],
            daily: vec![
                DailyCategory::new("celcomPostpaid", "Celcom Postpaid", Some("postpaid")),
                DailyCategory::new("digiPostpaid", "Digi Postpaid", Some("postpaid")),
                DailyCategory::new("suppline", "Suppline", Some("hvc")),
                DailyCategory::new("device", "Device", Some("hvc")),
            ],
            staff: vec![
                StaffMember::new("staff1", "Fadzil"),
                StaffMember::new("staff2", "Norisah"),
                StaffMember::new("staff3", "Shazlina"),
                StaffMember::new("staff4", "Alid"),
                StaffMember::new("staff5", "Vanezza"),
            ],
        }
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let registry: Self = serde_json::from_slice(bytes)
            .map_err(|err| ConfigError::Registry(err.to_string()))?;
        registry.validate()?;
        Ok(registry)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut keys = BTreeSet::new();
        for category in &self.performance {
            if !keys.insert(category.key.as_str()) {
                return Err(duplicate("category key", &category.key));
            }
            if !category.weight.is_finite() || category.weight <= 0.0 {
                return Err(ConfigError::Registry(format!(
                    "weight of '{}' must be positive",
                    category.key
                )));
            }
            if !category.default_target.is_finite() || category.default_target < 0.0 {
                return Err(ConfigError::Registry(format!(
                    "default target of '{}' must be non-negative",
                    category.key
                )));
            }
            if let Some(cap) = category.achievement_cap_percent {
                if !cap.is_finite() || cap <= 0.0 {
                    return Err(ConfigError::Registry(format!(
                        "achievement cap of '{}' must be positive",
                        category.key
                    )));
                }
            }
        }
        for category in &self.daily {
            if !keys.insert(category.key.as_str()) {
                return Err(duplicate("category key", &category.key));
            }
            if let Some(parent) = &category.follows {
                if self.performance_category(parent).is_none() {
                    return Err(ConfigError::Registry(format!(
                        "'{}' follows unknown performance category '{parent}'",
                        category.key
                    )));
                }
            }
        }

        let mut ids = BTreeSet::new();
        for member in &self.staff {
            if !ids.insert(member.id.as_str()) {
                return Err(duplicate("staff id", &member.id));
            }
        }
        Ok(())
    }

    pub fn total_weight(&self) -> f64 {
        self.performance.iter().map(|category| category.weight).sum()
    }

    pub fn performance_category(&self, key: &str) -> Option<&PerformanceCategory> {
        self.performance.iter().find(|category| category.key == key)
    }

    pub fn daily_category(&self, key: &str) -> Option<&DailyCategory> {
        self.daily.iter().find(|category| category.key == key)
    }

    pub fn staff_member(&self, id: &str) -> Option<&StaffMember> {
        self.staff.iter().find(|member| member.id == id)
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn duplicate(what: &str, value: &str) -> ConfigError {
    ConfigError::Registry(format!("duplicate {what} '{value}'"))
}
