mod config;
mod grade;

pub use config::EvaluationConfig;
pub use grade::Grade;

use serde::Serialize;

/// Stateless scorer that maps a period's points onto the configured targets.
#[derive(Debug, Clone)]
pub struct EvaluationEngine {
    config: EvaluationConfig,
}

impl Default for EvaluationEngine {
    fn default() -> Self {
        Self::new(EvaluationConfig::default())
    }
}

impl EvaluationEngine {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Scores a period total; an absent total counts as zero points.
    pub fn score(&self, total_points: Option<f64>) -> EvaluationScores {
        let points = total_points
            .filter(|points| points.is_finite() && *points > 0.0)
            .unwrap_or(0.0);

        let plan_achievement = achievement(points, self.config.plan_target);
        let international_achievement = achievement(points, self.config.international_target);
        let comprehensive_score = (f64::from(plan_achievement) * self.config.plan_weight
            + f64::from(international_achievement) * self.config.international_weight)
            .round() as u32;

        EvaluationScores {
            total_points: points,
            plan_achievement,
            plan_target: self.config.plan_target,
            plan_grade: Grade::from_percentage(plan_achievement),
            international_achievement,
            international_target: self.config.international_target,
            international_grade: Grade::from_percentage(international_achievement),
            comprehensive_score,
            comprehensive_grade: Grade::from_percentage(comprehensive_score),
        }
    }
}

/// Whole-number percentage of `target` reached, capped at 100.
pub fn achievement(points: f64, target: u32) -> u32 {
    if target == 0 {
        return 100;
    }
    ((points / f64::from(target)).min(1.0) * 100.0).round() as u32
}

/// Derived evaluation for one researcher and period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationScores {
    pub total_points: f64,
    pub plan_achievement: u32,
    pub plan_target: u32,
    pub plan_grade: Grade,
    pub international_achievement: u32,
    pub international_target: u32,
    pub international_grade: Grade,
    pub comprehensive_score: u32,
    pub comprehensive_grade: Grade,
}
