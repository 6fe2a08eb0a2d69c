use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

use faculty_points::import::{ActivityCsvImporter, ActivityIndex};
use faculty_points::points::{
    aggregate, AcademicYear, ActivityCategory, ActivityRepository, Grade, MonthSelector,
    PeriodFilter, PointsService, RawBreakdown, RepositoryError, ResearcherId, ResearcherProfile,
};

const ROSTER: &str = "researcher_id,name,college,department
11,Layla Hassan,Science,Biology
12,Omar Saleh,Science,Biology
13,Noor Aziz,Science,Physics
21,Sami Yousef,Engineering,Civil
";

const ACTIVITIES: &str = "researcher_id,category,id,title,year,month,date,points
11,research,1,Wetland survey,2024,,,25
11,publications,2,Journal article,,,2024-10-01,40
11,thank_you_books,3,Dean's letter,2025,يناير,,5
11,thank_you_books,4,Rector's letter,2025,سبتمبر,,5
11,thank_you_books,5,Department letter,2024,سبتمبر,,5
11,conferences,6,Summer school,,,2025-08-15,12
12,publications,7,Conference paper,,,2024-12-03,30
13,supervision,8,PhD supervision,2024,,,150
21,committees,9,Quality committee,2024,,,10
";

struct CsvRepository {
    roster: Vec<ResearcherProfile>,
    activities: ActivityIndex,
}

impl CsvRepository {
    fn load() -> Self {
        let roster =
            ActivityCsvImporter::roster_from_reader(Cursor::new(ROSTER)).expect("roster imports");
        let activities = ActivityCsvImporter::activities_from_reader(Cursor::new(ACTIVITIES))
            .expect("activities import");
        Self { roster, activities }
    }
}

impl ActivityRepository for CsvRepository {
    fn researcher(&self, id: ResearcherId) -> Result<Option<ResearcherProfile>, RepositoryError> {
        Ok(self.roster.iter().find(|profile| profile.id == id).cloned())
    }

    fn researchers(&self) -> Result<Vec<ResearcherProfile>, RepositoryError> {
        Ok(self.roster.clone())
    }

    fn activities(&self, id: ResearcherId) -> Result<RawBreakdown, RepositoryError> {
        Ok(self.activities.get(&id).cloned().unwrap_or_default())
    }
}

fn service() -> PointsService<CsvRepository> {
    PointsService::new(Arc::new(CsvRepository::load()), Default::default())
}

fn period(year: &str, month: &str) -> PeriodFilter {
    PeriodFilter::new(
        year.parse::<AcademicYear>().expect("valid year"),
        month.parse::<MonthSelector>().expect("valid month"),
    )
}

#[test]
fn csv_backed_service_scores_an_academic_year() {
    let service = service();

    let report = service
        .evaluate(ResearcherId(11), &period("2024-2025", "all"))
        .expect("known researcher")
        .expect("data available");

    // research 25 + publication 40 + January and September 2024 letters 5 + 5.
    assert_eq!(report.points.total, 75.0);
    assert_eq!(report.scores.plan_achievement, 75);
    assert_eq!(report.scores.international_achievement, 50);
    assert_eq!(report.scores.comprehensive_score, 60);
    assert_eq!(report.scores.plan_grade, Grade::VeryGood);
    assert_eq!(report.scores.international_grade, Grade::Acceptable);
    assert_eq!(report.scores.comprehensive_grade, Grade::Good);
}

#[test]
fn thank_you_book_window_follows_academic_months() {
    let service = service();

    let points = service
        .period_breakdown(ResearcherId(11), &period("2024-2025", "all"))
        .expect("known researcher")
        .expect("data available");

    let titles: Vec<&str> = points
        .breakdown
        .records(ActivityCategory::ThankYouBooks)
        .iter()
        .map(|record| record.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Dean's letter", "Department letter"]);
}

#[test]
fn all_time_total_equals_sum_of_categories() {
    let index = ActivityCsvImporter::activities_from_reader(Cursor::new(ACTIVITIES))
        .expect("activities import");

    let totals: HashMap<ResearcherId, f64> = index
        .into_iter()
        .map(|(id, raw)| (id, aggregate(raw).total))
        .collect();

    assert_eq!(totals[&ResearcherId(11)], 92.0);
    assert_eq!(totals[&ResearcherId(13)], 150.0);
}

#[test]
fn college_leader_ranks_first() {
    let service = service();

    let leader = service
        .ranking(ResearcherId(13))
        .expect("known researcher")
        .expect("ranking available");
    assert_eq!(leader.college.rank, 1);
    assert_eq!(leader.college.cohort_size, 3);
    assert_eq!(leader.department.cohort_size, 1);

    let engineering = service
        .ranking(ResearcherId(21))
        .expect("known researcher")
        .expect("ranking available");
    assert_eq!(engineering.college.rank, 1);
    assert_eq!(engineering.college.cohort_size, 1);
}
