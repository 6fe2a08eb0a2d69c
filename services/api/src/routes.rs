use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::Local;
use faculty_points::error::AppError;
use faculty_points::import::ActivityCsvImporter;
use faculty_points::points::{
    aggregate, points_router, AcademicYear, ActivityRepository, EvaluationEngine,
    EvaluationScores, MonthSelector, PeriodFilter, PointsService, ResearcherId,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct PreviewRequest {
    pub(crate) activities_csv: String,
    #[serde(default)]
    pub(crate) academic_year: Option<String>,
    #[serde(default)]
    pub(crate) month: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PreviewResponse {
    pub(crate) academic_year: AcademicYear,
    pub(crate) month: MonthSelector,
    pub(crate) researchers: Vec<PreviewEntry>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PreviewEntry {
    pub(crate) researcher_id: ResearcherId,
    pub(crate) records: usize,
    pub(crate) total_points: f64,
    pub(crate) period_points: f64,
    pub(crate) scores: EvaluationScores,
}

pub(crate) fn with_points_routes<R>(service: Arc<PointsService<R>>) -> axum::Router
where
    R: ActivityRepository + 'static,
{
    let engine = Arc::new(service.engine().clone());
    points_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/activities/preview",
            axum::routing::post(preview_endpoint),
        )
        .layer(Extension(engine))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Scores an uploaded activity export without storing it.
pub(crate) async fn preview_endpoint(
    Extension(engine): Extension<Arc<EvaluationEngine>>,
    Json(payload): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    let PreviewRequest {
        activities_csv,
        academic_year,
        month,
    } = payload;

    let filter = PeriodFilter::from_query(
        academic_year.as_deref(),
        month.as_deref(),
        Local::now().date_naive(),
    )?;
    let index = ActivityCsvImporter::activities_from_reader(Cursor::new(activities_csv))?;

    let mut researchers: Vec<PreviewEntry> = index
        .into_iter()
        .map(|(researcher_id, raw)| {
            let all_time = aggregate(raw);
            let period = filter.apply(&all_time.breakdown);
            PreviewEntry {
                researcher_id,
                records: all_time.breakdown.record_count(),
                total_points: all_time.total,
                period_points: period.total,
                scores: engine.score(Some(period.total)),
            }
        })
        .collect();
    researchers.sort_by_key(|entry| entry.researcher_id);

    Ok(Json(PreviewResponse {
        academic_year: filter.academic_year,
        month: filter.month,
        researchers,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use faculty_points::points::EvaluationConfig;
    use tower::ServiceExt;

    fn engine() -> Extension<Arc<EvaluationEngine>> {
        Extension(Arc::new(EvaluationEngine::default()))
    }

    const ACTIVITIES: &str = "researcher_id,category,id,title,year,month,date,points
5,publications,1,Journal article,,,2024-10-01,90
5,research,2,Field study,2025,,,60
9,courses,3,Statistics course,,,2023-02-10,15
";

    #[tokio::test]
    async fn preview_endpoint_scores_each_researcher() {
        let request = PreviewRequest {
            activities_csv: ACTIVITIES.to_string(),
            academic_year: Some("2024-2025".to_string()),
            month: None,
        };

        let Json(body) = preview_endpoint(engine(), Json(request))
            .await
            .expect("preview builds");

        assert_eq!(body.academic_year, AcademicYear::new(2024));
        assert_eq!(body.researchers.len(), 2);
        let first = &body.researchers[0];
        assert_eq!(first.researcher_id, ResearcherId(5));
        assert_eq!(first.period_points, 150.0);
        assert_eq!(first.scores.comprehensive_score, 100);
        let second = &body.researchers[1];
        assert_eq!(second.total_points, 15.0);
        assert_eq!(second.period_points, 0.0);
    }

    #[tokio::test]
    async fn preview_endpoint_rejects_invalid_months() {
        let request = PreviewRequest {
            activities_csv: ACTIVITIES.to_string(),
            academic_year: Some("2024-2025".to_string()),
            month: Some("14".to_string()),
        };

        let response = preview_endpoint(engine(), Json(request))
            .await
            .expect_err("invalid month")
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_route_is_mounted_alongside_points_routes() {
        let repository = Arc::new(crate::infra::InMemoryActivityRepository::default());
        let service = Arc::new(PointsService::new(repository, EvaluationConfig::default()));
        let router = with_points_routes(service);

        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
    }
}
