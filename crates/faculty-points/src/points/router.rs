use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::breakdown::{AggregatedPoints, PointsBreakdown};
use super::domain::ResearcherId;
use super::evaluation::EvaluationScores;
use super::period::{AcademicYear, MonthSelector, PeriodFilter};
use super::ranking::RankingEntry;
use super::repository::ActivityRepository;
use super::service::{LeaderboardEntry, PointsService, PointsServiceError};

const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

/// Router builder exposing the points, evaluation, and ranking endpoints.
pub fn points_router<R>(service: Arc<PointsService<R>>) -> Router
where
    R: ActivityRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/researchers/:researcher_id/points",
            get(breakdown_handler::<R>),
        )
        .route(
            "/api/v1/researchers/:researcher_id/points/period",
            get(period_handler::<R>),
        )
        .route(
            "/api/v1/researchers/:researcher_id/evaluation",
            get(evaluation_handler::<R>),
        )
        .route(
            "/api/v1/researchers/:researcher_id/ranking",
            get(ranking_handler::<R>),
        )
        .route("/api/v1/leaderboard", get(leaderboard_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub academic_year: Option<String>,
    pub month: Option<String>,
}

impl PeriodQuery {
    fn filter(&self) -> Result<PeriodFilter, PointsServiceError> {
        let today = Local::now().date_naive();
        let filter = PeriodFilter::from_query(
            self.academic_year.as_deref(),
            self.month.as_deref(),
            today,
        )?;
        Ok(filter)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub college: Option<String>,
    pub limit: Option<usize>,
}

/// `breakdown`/`total` are `null` when the data could not be fetched.
#[derive(Debug, Serialize)]
pub struct BreakdownResponse {
    pub researcher_id: ResearcherId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub academic_year: Option<AcademicYear>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<MonthSelector>,
    pub total: Option<f64>,
    pub breakdown: Option<PointsBreakdown>,
}

impl BreakdownResponse {
    fn new(
        researcher_id: ResearcherId,
        period: Option<&PeriodFilter>,
        points: Option<AggregatedPoints>,
    ) -> Self {
        let (total, breakdown) = match points {
            Some(points) => (Some(points.total), Some(points.breakdown)),
            None => (None, None),
        };
        Self {
            researcher_id,
            academic_year: period.map(|filter| filter.academic_year),
            month: period.map(|filter| filter.month),
            total,
            breakdown,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EvaluationResponse {
    pub researcher_id: ResearcherId,
    pub academic_year: AcademicYear,
    pub month: MonthSelector,
    pub total_points: Option<f64>,
    pub scores: Option<EvaluationScores>,
}

#[derive(Debug, Serialize)]
pub struct RankingResponse {
    pub researcher_id: ResearcherId,
    pub ranking: Option<RankingEntry>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub college: Option<String>,
    pub entries: Option<Vec<LeaderboardEntry>>,
}

pub(crate) async fn breakdown_handler<R>(
    State(service): State<Arc<PointsService<R>>>,
    Path(researcher_id): Path<i64>,
) -> Response
where
    R: ActivityRepository + 'static,
{
    let id = ResearcherId(researcher_id);
    match service.breakdown(id) {
        Ok(points) => {
            let body = BreakdownResponse::new(id, None, points);
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn period_handler<R>(
    State(service): State<Arc<PointsService<R>>>,
    Path(researcher_id): Path<i64>,
    Query(query): Query<PeriodQuery>,
) -> Response
where
    R: ActivityRepository + 'static,
{
    let id = ResearcherId(researcher_id);
    let result = query
        .filter()
        .and_then(|filter| Ok((service.period_breakdown(id, &filter)?, filter)));

    match result {
        Ok((points, filter)) => {
            let body = BreakdownResponse::new(id, Some(&filter), points);
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn evaluation_handler<R>(
    State(service): State<Arc<PointsService<R>>>,
    Path(researcher_id): Path<i64>,
    Query(query): Query<PeriodQuery>,
) -> Response
where
    R: ActivityRepository + 'static,
{
    let id = ResearcherId(researcher_id);
    let result = query
        .filter()
        .and_then(|filter| Ok((service.evaluate(id, &filter)?, filter)));

    match result {
        Ok((report, filter)) => {
            let body = EvaluationResponse {
                researcher_id: id,
                academic_year: filter.academic_year,
                month: filter.month,
                total_points: report.as_ref().map(|report| report.points.total),
                scores: report.map(|report| report.scores),
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn ranking_handler<R>(
    State(service): State<Arc<PointsService<R>>>,
    Path(researcher_id): Path<i64>,
) -> Response
where
    R: ActivityRepository + 'static,
{
    let id = ResearcherId(researcher_id);
    match service.ranking(id) {
        Ok(ranking) => {
            let body = RankingResponse {
                researcher_id: id,
                ranking,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn leaderboard_handler<R>(
    State(service): State<Arc<PointsService<R>>>,
    Query(query): Query<LeaderboardQuery>,
) -> Response
where
    R: ActivityRepository + 'static,
{
    let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT);
    let college = query.college.filter(|college| !college.trim().is_empty());
    let entries = service.leaderboard(college.as_deref(), limit);
    let body = LeaderboardResponse { college, entries };
    (StatusCode::OK, axum::Json(body)).into_response()
}

fn error_response(err: PointsServiceError) -> Response {
    let status = match err {
        PointsServiceError::UnknownResearcher(_) => StatusCode::NOT_FOUND,
        PointsServiceError::InvalidPeriod(_) => StatusCode::BAD_REQUEST,
    };
    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
