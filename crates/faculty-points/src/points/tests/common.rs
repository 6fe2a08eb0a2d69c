use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::points::domain::{ActivityCategory, ResearcherId, ResearcherProfile};
use crate::points::payload::{RawActivity, RawBreakdown};
use crate::points::repository::{ActivityRepository, RepositoryError};
use crate::points::{points_router, EvaluationConfig, PointsService};

pub(super) fn profile(id: i64, college: &str, department: &str) -> ResearcherProfile {
    ResearcherProfile {
        id: ResearcherId(id),
        name: format!("Researcher {id}"),
        college: college.to_string(),
        department: department.to_string(),
    }
}

pub(super) fn year_activity(title: &str, year: i32, points: f64) -> RawActivity {
    RawActivity {
        title: Some(title.to_string()),
        year: Some(year),
        points,
        ..RawActivity::default()
    }
}

pub(super) fn dated_activity(title: &str, date: NaiveDate, points: f64) -> RawActivity {
    RawActivity {
        title: Some(title.to_string()),
        date: Some(date.format("%Y-%m-%d").to_string()),
        points,
        ..RawActivity::default()
    }
}

pub(super) fn thank_you_book(year: i32, month: &str, points: f64) -> RawActivity {
    RawActivity {
        title: Some("Letter of thanks".to_string()),
        year: Some(year),
        month: Some(month.to_string()),
        points,
        ..RawActivity::default()
    }
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Mixed-precision activity set spanning the 2024-2025 academic year and its neighbours.
pub(super) fn sample_activities() -> RawBreakdown {
    RawBreakdown::default()
        .with(
            ActivityCategory::Research,
            year_activity("Groundwater modelling", 2024, 20.0),
        )
        .with(
            ActivityCategory::Research,
            year_activity("Legacy dataset", 2022, 15.0),
        )
        .with(
            ActivityCategory::Publications,
            dated_activity("Journal article", date(2024, 9, 15), 30.0),
        )
        .with(
            ActivityCategory::Conferences,
            dated_activity("Regional conference", date(2025, 3, 2), 10.0),
        )
        .with(
            ActivityCategory::Seminars,
            dated_activity("Seminar outside window", date(2025, 9, 20), 5.0),
        )
        .with(ActivityCategory::ThankYouBooks, thank_you_book(2025, "يناير", 2.0))
        .with(ActivityCategory::ThankYouBooks, thank_you_book(2025, "سبتمبر", 3.0))
        .with(ActivityCategory::ThankYouBooks, thank_you_book(2024, "سبتمبر", 4.0))
}

pub(super) fn evaluation_config() -> EvaluationConfig {
    EvaluationConfig::default()
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) profiles: Arc<Mutex<Vec<ResearcherProfile>>>,
    pub(super) activities: Arc<Mutex<HashMap<ResearcherId, RawBreakdown>>>,
}

impl MemoryRepository {
    pub(super) fn insert(&self, profile: ResearcherProfile, activities: RawBreakdown) {
        self.activities
            .lock()
            .expect("repository mutex poisoned")
            .insert(profile.id, activities);
        self.profiles
            .lock()
            .expect("repository mutex poisoned")
            .push(profile);
    }
}

impl ActivityRepository for MemoryRepository {
    fn researcher(&self, id: ResearcherId) -> Result<Option<ResearcherProfile>, RepositoryError> {
        let guard = self.profiles.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|profile| profile.id == id).cloned())
    }

    fn researchers(&self) -> Result<Vec<ResearcherProfile>, RepositoryError> {
        Ok(self.profiles.lock().expect("repository mutex poisoned").clone())
    }

    fn activities(&self, id: ResearcherId) -> Result<RawBreakdown, RepositoryError> {
        let guard = self.activities.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned().unwrap_or_default())
    }
}

pub(super) struct UnavailableRepository;

impl ActivityRepository for UnavailableRepository {
    fn researcher(&self, _id: ResearcherId) -> Result<Option<ResearcherProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn researchers(&self) -> Result<Vec<ResearcherProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn activities(&self, _id: ResearcherId) -> Result<RawBreakdown, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Directory lookups succeed but activity fetches fail.
pub(super) struct FlakyActivitiesRepository {
    pub(super) inner: MemoryRepository,
}

impl ActivityRepository for FlakyActivitiesRepository {
    fn researcher(&self, id: ResearcherId) -> Result<Option<ResearcherProfile>, RepositoryError> {
        self.inner.researcher(id)
    }

    fn researchers(&self) -> Result<Vec<ResearcherProfile>, RepositoryError> {
        self.inner.researchers()
    }

    fn activities(&self, _id: ResearcherId) -> Result<RawBreakdown, RepositoryError> {
        Err(RepositoryError::Unavailable("activities table locked".to_string()))
    }
}

/// Three researchers in Science (two in Biology) and one in Engineering.
pub(super) fn build_service() -> (PointsService<MemoryRepository>, MemoryRepository) {
    let repository = MemoryRepository::default();
    repository.insert(profile(1, "Science", "Biology"), sample_activities());
    repository.insert(
        profile(2, "Science", "Biology"),
        RawBreakdown::default().with(
            ActivityCategory::Publications,
            year_activity("Review article", 2024, 120.0),
        ),
    );
    repository.insert(
        profile(3, "Science", "Chemistry"),
        RawBreakdown::default().with(
            ActivityCategory::Courses,
            year_activity("Lab safety course", 2024, 40.0),
        ),
    );
    repository.insert(
        profile(4, "Engineering", "Civil"),
        RawBreakdown::default().with(
            ActivityCategory::Supervision,
            year_activity("MSc supervision", 2024, 500.0),
        ),
    );

    let service = PointsService::new(Arc::new(repository.clone()), evaluation_config());
    (service, repository)
}

pub(super) fn router_with_service<R>(service: PointsService<R>) -> axum::Router
where
    R: ActivityRepository + 'static,
{
    points_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
