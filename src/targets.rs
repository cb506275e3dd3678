use crate::errors::ValidationError;
use crate::models::{TargetSet, Targets};
use crate::records::check_value;
use crate::registry::CategoryRegistry;
use std::collections::BTreeMap;

pub fn default_targets(registry: &CategoryRegistry) -> Targets {
    Targets {
        values: registry
            .performance
            .iter()
            .map(|category| (category.key.clone(), category.default_target))
            .collect(),
    }
}

/// Stored targets for `staff_id`, with category defaults filling any gap.
pub fn get_targets(target_set: &TargetSet, registry: &CategoryRegistry, staff_id: &str) -> Targets {
    let stored = target_set.staff.get(staff_id);
    Targets {
        values: registry
            .performance
            .iter()
            .map(|category| {
                let value = stored
                    .and_then(|targets| targets.values.get(&category.key).copied())
                    .unwrap_or(category.default_target);
                (category.key.clone(), value)
            })
            .collect(),
    }
}

/// Replaces the whole target row for `staff_id`. Every performance category
/// must be present and non-negative.
pub fn set_targets(
    target_set: &TargetSet,
    registry: &CategoryRegistry,
    staff_id: &str,
    new_targets: &BTreeMap<String, f64>,
) -> Result<TargetSet, ValidationError> {
    if registry.staff_member(staff_id).is_none() {
        return Err(ValidationError::UnknownStaff {
            staff_id: staff_id.to_string(),
        });
    }
    for key in new_targets.keys() {
        if registry.performance_category(key).is_none() {
            return Err(ValidationError::UnknownCategory { key: key.clone() });
        }
    }

    let mut row = Targets::default();
    for category in &registry.performance {
        let value = new_targets.get(&category.key).copied().ok_or_else(|| {
            ValidationError::MissingCategory {
                key: category.key.clone(),
            }
        })?;
        check_value(&category.key, value)?;
        row.values.insert(category.key.clone(), value);
    }

    let mut updated = target_set.clone();
    updated.staff.insert(staff_id.to_string(), row);
    Ok(updated)
}

/// Adds a default row for each roster member that has none. Existing rows are kept.
pub fn seed_targets(target_set: &TargetSet, registry: &CategoryRegistry) -> TargetSet {
    let mut seeded = target_set.clone();
    for member in &registry.staff {
        seeded
            .staff
            .entry(member.id.clone())
            .or_insert_with(|| default_targets(registry));
    }
    seeded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_row(value: f64) -> BTreeMap<String, f64> {
        CategoryRegistry::standard()
            .performance
            .iter()
            .map(|c| (c.key.clone(), value))
            .collect()
    }

    #[test]
    fn missing_staff_falls_back_to_defaults() {
        let registry = CategoryRegistry::standard();
        let targets = get_targets(&TargetSet::default(), &registry, "staff4");
        assert_eq!(targets.value("postpaid"), 100.0);
        assert_eq!(targets.value("fibre"), 50.0);
        assert_eq!(targets.value("csat"), 90.0);
    }

    #[test]
    fn set_targets_replaces_the_row() {
        let registry = CategoryRegistry::standard();
        let original = TargetSet::default();
        let updated = set_targets(&original, &registry, "staff1", &full_row(7.0)).unwrap();
        assert!(original.staff.is_empty());
        let targets = get_targets(&updated, &registry, "staff1");
        assert!(targets.values.values().all(|value| *value == 7.0));
        assert_eq!(get_targets(&updated, &registry, "staff2").value("hvc"), 100.0);
    }

    #[test]
    fn zero_target_is_allowed() {
        let registry = CategoryRegistry::standard();
        let updated = set_targets(&TargetSet::default(), &registry, "staff1", &full_row(0.0));
        assert!(updated.is_ok());
    }

    #[test]
    fn set_targets_rejects_negative_missing_and_unknown() {
        let registry = CategoryRegistry::standard();
        let mut negative = full_row(10.0);
        negative.insert("fwa".to_string(), -1.0);
        assert!(matches!(
            set_targets(&TargetSet::default(), &registry, "staff1", &negative),
            Err(ValidationError::NegativeValue { .. })
        ));

        let mut missing = full_row(10.0);
        missing.remove("csat");
        assert!(matches!(
            set_targets(&TargetSet::default(), &registry, "staff1", &missing),
            Err(ValidationError::MissingCategory { .. })
        ));

        let mut unknown = full_row(10.0);
        unknown.insert("device".to_string(), 1.0);
        assert!(matches!(
            set_targets(&TargetSet::default(), &registry, "staff1", &unknown),
            Err(ValidationError::UnknownCategory { .. })
        ));

        assert!(matches!(
            set_targets(&TargetSet::default(), &registry, "nobody", &full_row(1.0)),
            Err(ValidationError::UnknownStaff { .. })
        ));
    }

    #[test]
    fn seeding_keeps_existing_rows() {
        let registry = CategoryRegistry::standard();
        let edited =
            set_targets(&TargetSet::default(), &registry, "staff3", &full_row(1.0)).unwrap();
        let seeded = seed_targets(&edited, &registry);
        assert_eq!(seeded.staff.len(), registry.staff.len());
        assert_eq!(seeded.staff["staff3"].value("hvc"), 1.0);
        assert_eq!(seeded.staff["staff1"].value("hvc"), 100.0);
    }
}
