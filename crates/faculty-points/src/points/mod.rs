//! Scientific-points aggregation, period filtering, evaluation scoring, and ranking.

pub mod breakdown;
pub mod domain;
pub mod evaluation;
pub mod payload;
pub mod period;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use breakdown::{aggregate, AggregatedPoints, CategoryTotal, PointsBreakdown};
pub use domain::{
    month_from_name, ActivityCategory, ActivityRecord, ResearcherId, ResearcherProfile,
    TemporalAnchor,
};
pub use evaluation::{EvaluationConfig, EvaluationEngine, EvaluationScores, Grade};
pub use payload::{RawActivity, RawBreakdown};
pub use period::{AcademicYear, MonthSelector, PeriodError, PeriodFilter};
pub use ranking::{CohortRank, RankingEntry, Standing};
pub use repository::{ActivityRepository, RepositoryError};
pub use router::points_router;
pub use service::{EvaluationReport, LeaderboardEntry, PointsService, PointsServiceError};
