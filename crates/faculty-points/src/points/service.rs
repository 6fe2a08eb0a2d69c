use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use super::breakdown::{aggregate, AggregatedPoints};
use super::domain::{ResearcherId, ResearcherProfile};
use super::evaluation::{EvaluationConfig, EvaluationEngine, EvaluationScores};
use super::period::{PeriodError, PeriodFilter};
use super::ranking::{self, RankingEntry, Standing};
use super::repository::{ActivityRepository, RepositoryError};

/// Service composing the repository, aggregator, period filter, scorer, and ranking.
///
/// Repository failures never surface as errors: every read returns `Ok(None)` when the
/// data could not be fetched, leaving callers to render an unavailable state.
pub struct PointsService<R> {
    repository: Arc<R>,
    engine: EvaluationEngine,
}

/// Evaluation for one researcher and period, with the points it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub researcher_id: ResearcherId,
    pub period: PeriodFilter,
    pub points: AggregatedPoints,
    pub scores: EvaluationScores,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub researcher_id: ResearcherId,
    pub name: String,
    pub college: String,
    pub department: String,
    pub total_points: f64,
}

impl<R> PointsService<R>
where
    R: ActivityRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: EvaluationConfig) -> Self {
        Self {
            repository,
            engine: EvaluationEngine::new(config),
        }
    }

    pub fn engine(&self) -> &EvaluationEngine {
        &self.engine
    }

    /// All-time breakdown and total for one researcher.
    pub fn breakdown(
        &self,
        researcher_id: ResearcherId,
    ) -> Result<Option<AggregatedPoints>, PointsServiceError> {
        if self.profile(researcher_id)?.is_none() {
            return Ok(None);
        }
        Ok(self.fetch_points(researcher_id))
    }

    /// Breakdown restricted to an academic year and month, with its recomputed total.
    pub fn period_breakdown(
        &self,
        researcher_id: ResearcherId,
        filter: &PeriodFilter,
    ) -> Result<Option<AggregatedPoints>, PointsServiceError> {
        let points = self.breakdown(researcher_id)?;
        Ok(points.map(|points| filter.apply(&points.breakdown)))
    }

    pub fn evaluate(
        &self,
        researcher_id: ResearcherId,
        filter: &PeriodFilter,
    ) -> Result<Option<EvaluationReport>, PointsServiceError> {
        let Some(points) = self.period_breakdown(researcher_id, filter)? else {
            return Ok(None);
        };

        let scores = self.engine.score(Some(points.total));
        debug!(
            researcher = %researcher_id,
            period = %filter.academic_year,
            total = points.total,
            composite = scores.comprehensive_score,
            "evaluated researcher"
        );

        Ok(Some(EvaluationReport {
            researcher_id,
            period: *filter,
            points,
            scores,
        }))
    }

    /// College and department ranking by all-time points.
    pub fn ranking(
        &self,
        researcher_id: ResearcherId,
    ) -> Result<Option<RankingEntry>, PointsServiceError> {
        if self.profile(researcher_id)?.is_none() {
            return Ok(None);
        }

        let Some(standings) = self.standings() else {
            return Ok(None);
        };
        Ok(ranking::rank_researcher(&standings, researcher_id))
    }

    /// Highest totals across the institution, or within one college.
    pub fn leaderboard(
        &self,
        college: Option<&str>,
        limit: usize,
    ) -> Option<Vec<LeaderboardEntry>> {
        let standings = self.standings()?;
        let entries = ranking::leaderboard(&standings, college, limit)
            .into_iter()
            .enumerate()
            .map(|(index, standing)| LeaderboardEntry {
                rank: index + 1,
                researcher_id: standing.profile.id,
                name: standing.profile.name,
                college: standing.profile.college,
                department: standing.profile.department,
                total_points: standing.total_points,
            })
            .collect();
        Some(entries)
    }

    /// Distinguishes unknown researchers (an error) from an unreachable repository (`Ok(None)`).
    fn profile(
        &self,
        researcher_id: ResearcherId,
    ) -> Result<Option<ResearcherProfile>, PointsServiceError> {
        match self.repository.researcher(researcher_id) {
            Ok(Some(profile)) => Ok(Some(profile)),
            Ok(None) => Err(PointsServiceError::UnknownResearcher(researcher_id)),
            Err(err) => {
                log_unavailable("researcher profile", &err);
                Ok(None)
            }
        }
    }

    fn fetch_points(&self, researcher_id: ResearcherId) -> Option<AggregatedPoints> {
        match self.repository.activities(researcher_id) {
            Ok(raw) => Some(aggregate(raw)),
            Err(err) => {
                log_unavailable("activity records", &err);
                None
            }
        }
    }

    fn standings(&self) -> Option<Vec<Standing>> {
        let profiles = match self.repository.researchers() {
            Ok(profiles) => profiles,
            Err(err) => {
                log_unavailable("researcher directory", &err);
                return None;
            }
        };

        profiles
            .into_iter()
            .map(|profile| {
                let points = self.fetch_points(profile.id)?;
                Some(Standing {
                    profile,
                    total_points: points.total,
                })
            })
            .collect()
    }
}

fn log_unavailable(what: &str, err: &RepositoryError) {
    warn!(error = %err, "{what} unavailable; reporting no data");
}

/// Error raised by the points service.
#[derive(Debug, thiserror::Error)]
pub enum PointsServiceError {
    #[error("researcher {0} not found")]
    UnknownResearcher(ResearcherId),
    #[error(transparent)]
    InvalidPeriod(#[from] PeriodError),
}
