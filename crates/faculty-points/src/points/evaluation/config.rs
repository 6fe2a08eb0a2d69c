use serde::{Deserialize, Serialize};

/// Targets and blend weights behind the evaluation percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub plan_target: u32,
    pub international_target: u32,
    pub plan_weight: f64,
    pub international_weight: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            plan_target: 100,
            international_target: 150,
            plan_weight: 0.4,
            international_weight: 0.6,
        }
    }
}
