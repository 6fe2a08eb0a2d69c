use std::sync::Arc;

use super::common::*;
use crate::points::domain::{ActivityCategory, ResearcherId};
use crate::points::evaluation::Grade;
use crate::points::period::{MonthSelector, PeriodFilter};
use crate::points::ranking::CohortRank;
use crate::points::{PointsService, PointsServiceError};

fn academic_year_2024() -> PeriodFilter {
    PeriodFilter::new("2024-2025".parse().expect("valid"), MonthSelector::All)
}

#[test]
fn breakdown_totals_every_category() {
    let (service, _) = build_service();

    let points = service
        .breakdown(ResearcherId(1))
        .expect("known researcher")
        .expect("repository available");

    assert_eq!(points.total, 89.0);
    assert_eq!(points.total, points.breakdown.total());
    assert!(points
        .breakdown
        .records(ActivityCategory::JournalMemberships)
        .is_empty());
}

#[test]
fn researcher_without_records_has_zero_points() {
    let (service, repository) = build_service();
    repository.insert(profile(10, "Science", "Physics"), Default::default());

    let points = service
        .breakdown(ResearcherId(10))
        .expect("known researcher")
        .expect("repository available");

    assert_eq!(points.total, 0.0);
    assert_eq!(points.breakdown.record_count(), 0);
}

#[test]
fn unknown_researchers_are_errors() {
    let (service, _) = build_service();

    match service.breakdown(ResearcherId(404)) {
        Err(PointsServiceError::UnknownResearcher(id)) => assert_eq!(id, ResearcherId(404)),
        other => panic!("expected unknown researcher, got {other:?}"),
    }
}

#[test]
fn evaluation_uses_the_period_total() {
    let (service, _) = build_service();

    let report = service
        .evaluate(ResearcherId(1), &academic_year_2024())
        .expect("known researcher")
        .expect("repository available");

    assert_eq!(report.points.total, 66.0);
    assert_eq!(report.scores.plan_achievement, 66);
    assert_eq!(report.scores.international_achievement, 44);
    assert_eq!(report.scores.comprehensive_score, 53);
    assert_eq!(report.scores.comprehensive_grade, Grade::Acceptable);
}

#[test]
fn ranking_places_researchers_within_cohorts() {
    let (service, _) = build_service();

    let entry = service
        .ranking(ResearcherId(1))
        .expect("known researcher")
        .expect("ranking available");

    assert_eq!(entry.total_points, 89.0);
    assert_eq!(
        entry.college,
        CohortRank {
            rank: 2,
            cohort_size: 3
        }
    );
    assert_eq!(
        entry.department,
        CohortRank {
            rank: 2,
            cohort_size: 2
        }
    );
}

#[test]
fn leaderboard_can_be_scoped_to_a_college() {
    let (service, _) = build_service();

    let all = service.leaderboard(None, 10).expect("available");
    let science = service.leaderboard(Some("Science"), 2).expect("available");

    assert_eq!(all.len(), 4);
    assert_eq!(all[0].researcher_id, ResearcherId(4));
    assert_eq!(
        science
            .iter()
            .map(|entry| (entry.rank, entry.researcher_id.0))
            .collect::<Vec<_>>(),
        vec![(1, 2), (2, 1)]
    );
}

#[test]
fn unavailable_repository_yields_no_data() {
    let service = PointsService::new(Arc::new(UnavailableRepository), evaluation_config());

    assert!(service
        .breakdown(ResearcherId(1))
        .expect("absorbed")
        .is_none());
    assert!(service
        .evaluate(ResearcherId(1), &academic_year_2024())
        .expect("absorbed")
        .is_none());
    assert!(service.ranking(ResearcherId(1)).expect("absorbed").is_none());
    assert!(service.leaderboard(None, 5).is_none());
}

#[test]
fn failed_activity_fetch_makes_ranking_unavailable_not_zero() {
    let (_, repository) = build_service();
    let service = PointsService::new(
        Arc::new(FlakyActivitiesRepository { inner: repository }),
        evaluation_config(),
    );

    assert!(service.ranking(ResearcherId(1)).expect("absorbed").is_none());
    assert!(service
        .breakdown(ResearcherId(1))
        .expect("absorbed")
        .is_none());
}
