use crate::models::{AccumulatedSnapshot, CategoryScore, ScoreSnapshot, Targets};
use crate::registry::{CategoryRegistry, PerformanceCategory};

/// `current / target * 100`, or 0 when the target is not positive. Not clamped.
pub fn achievement_percent(current: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    current / target * 100.0
}

/// Points earned by `category`. Capped categories clamp achievement to their
/// cap before conversion, so they top out at `weight * cap / 100`. Uncapped
/// categories grow linearly without bound and never drop below 0.
pub fn weighted_points(category: &PerformanceCategory, current: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    let achievement = achievement_percent(current, target);
    match category.achievement_cap_percent {
        Some(cap) => achievement.min(cap) / 100.0 * category.weight,
        None => (achievement / 100.0 * category.weight).max(0.0),
    }
}

/// `(total_score, overall_percent)` for an accumulated snapshot against targets.
pub fn total_score(
    snapshot: &AccumulatedSnapshot,
    targets: &Targets,
    registry: &CategoryRegistry,
) -> (f64, f64) {
    let score = score(snapshot, targets, registry);
    (score.total_score, score.overall_percent)
}

/// Full per-category breakdown. Team snapshots go through the same function.
pub fn score(
    snapshot: &AccumulatedSnapshot,
    targets: &Targets,
    registry: &CategoryRegistry,
) -> ScoreSnapshot {
    let categories: Vec<CategoryScore> = registry
        .performance
        .iter()
        .map(|category| {
            let current = snapshot.value(&category.key);
            let target = targets.value(&category.key);
            CategoryScore {
                key: category.key.clone(),
                current,
                target,
                variance: current - target,
                achievement_percent: achievement_percent(current, target),
                points: weighted_points(category, current, target),
            }
        })
        .collect();

    let total_score: f64 = categories.iter().map(|score| score.points).sum();
    let total_weight = registry.total_weight();
    let overall_percent = if total_weight > 0.0 {
        total_score / total_weight * 100.0
    } else {
        0.0
    };

    ScoreSnapshot {
        categories,
        total_score,
        overall_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn postpaid() -> PerformanceCategory {
        CategoryRegistry::standard().performance[0].clone()
    }

    fn fwa() -> PerformanceCategory {
        PerformanceCategory::new("fwa", "FWA", 30.0, 50.0)
    }

    #[test]
    fn achievement_is_unclamped() {
        assert_eq!(achievement_percent(50.0, 100.0), 50.0);
        assert_eq!(achievement_percent(300.0, 100.0), 300.0);
        assert_eq!(achievement_percent(0.0, 10.0), 0.0);
    }

    #[test]
    fn non_positive_target_scores_zero() {
        assert_eq!(achievement_percent(50.0, 0.0), 0.0);
        assert_eq!(achievement_percent(50.0, -5.0), 0.0);
        assert_eq!(weighted_points(&postpaid(), 50.0, 0.0), 0.0);
        assert_eq!(weighted_points(&fwa(), 50.0, -1.0), 0.0);
    }

    #[test]
    fn capped_category_stops_at_cap() {
        let category = postpaid();
        assert!(close(weighted_points(&category, 130.0, 100.0), 24.0));
        assert!(close(weighted_points(&category, 1000.0, 100.0), 24.0));
        assert!(close(weighted_points(&category, 120.0, 100.0), 24.0));
        assert!(close(weighted_points(&category, 50.0, 100.0), 10.0));
    }

    #[test]
    fn uncapped_category_scales_linearly() {
        let category = fwa();
        assert!(close(weighted_points(&category, 75.0, 50.0), 45.0));
        assert!(close(weighted_points(&category, 150.0, 50.0), 90.0));
    }

    #[test]
    fn empty_snapshot_scores_zero() {
        let registry = CategoryRegistry::standard();
        let targets = Targets {
            values: registry
                .performance
                .iter()
                .map(|c| (c.key.clone(), c.default_target))
                .collect(),
        };
        let result = score(&AccumulatedSnapshot::default(), &targets, &registry);
        assert_eq!(result.total_score, 0.0);
        assert_eq!(result.overall_percent, 0.0);
        assert!(result.categories.iter().all(|c| c.achievement_percent == 0.0));
        assert_eq!(result.categories.len(), registry.performance.len());
    }

    #[test]
    fn overall_percent_can_pass_100_through_the_cap() {
        let registry = CategoryRegistry::standard();
        let mut snapshot = AccumulatedSnapshot::default();
        let mut targets = Targets::default();
        for category in &registry.performance {
            snapshot
                .values
                .insert(category.key.clone(), category.default_target);
            targets
                .values
                .insert(category.key.clone(), category.default_target);
        }
        snapshot.values.insert("postpaid".to_string(), 200.0);

        let (total, overall) = total_score(&snapshot, &targets, &registry);
        // 24 from the capped postpaid plus 80 from everything else at 100%.
        assert!(close(total, 104.0));
        assert!(close(overall, 104.0));
        let postpaid = score(&snapshot, &targets, &registry);
        let postpaid = postpaid.category("postpaid").unwrap();
        assert!(close(postpaid.achievement_percent, 200.0));
        assert!(close(postpaid.points, 24.0));
    }

    #[test]
    fn variance_is_signed_gap_to_target() {
        let registry = CategoryRegistry::standard();
        let mut snapshot = AccumulatedSnapshot::default();
        snapshot.values.insert("postpaid".to_string(), 130.0);
        snapshot.values.insert("fibre".to_string(), 20.0);
        let targets = Targets {
            values: registry
                .performance
                .iter()
                .map(|c| (c.key.clone(), c.default_target))
                .collect(),
        };

        let result = score(&snapshot, &targets, &registry);
        assert!(close(result.category("postpaid").unwrap().variance, 30.0));
        assert!(close(result.category("fibre").unwrap().variance, -30.0));
        assert!(close(result.category("csat").unwrap().variance, -90.0));
    }
}
