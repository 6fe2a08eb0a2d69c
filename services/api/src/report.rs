use crate::infra::InMemoryActivityRepository;
use chrono::Local;
use clap::Args;
use faculty_points::config::{AppConfig, SeedConfig};
use faculty_points::error::AppError;
use faculty_points::points::{
    AcademicYear, AggregatedPoints, EvaluationReport, MonthSelector, PeriodFilter,
    PointsService, PointsServiceError, RankingEntry, ResearcherId,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Researcher roster CSV (researcher_id,name,college,department)
    #[arg(long)]
    pub(crate) roster: PathBuf,
    /// Activity export CSV (researcher_id,category,id,title,year,month,date,points)
    #[arg(long)]
    pub(crate) activities: PathBuf,
    /// Researcher to report on
    #[arg(long)]
    pub(crate) researcher: i64,
    /// Academic year such as 2024-2025 (defaults to the current one)
    #[arg(long)]
    pub(crate) academic_year: Option<AcademicYear>,
    /// Month number 1-12, or "all"
    #[arg(long, default_value = "all")]
    pub(crate) month: MonthSelector,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        roster,
        activities,
        researcher,
        academic_year,
        month,
    } = args;

    let config = AppConfig::load()?;
    let repository = InMemoryActivityRepository::from_seed(&SeedConfig {
        roster_csv: Some(roster),
        activities_csv: Some(activities),
    })?;
    let service = PointsService::new(
        Arc::new(repository),
        config.scoring.evaluation_config(),
    );

    let id = ResearcherId(researcher);
    let academic_year =
        academic_year.unwrap_or_else(|| AcademicYear::containing(Local::now().date_naive()));
    let filter = PeriodFilter::new(academic_year, month);

    let all_time = service.breakdown(id).map_err(service_error)?;
    let evaluation = service.evaluate(id, &filter).map_err(service_error)?;
    let ranking = service.ranking(id).map_err(service_error)?;

    render_report(id, &filter, all_time.as_ref(), evaluation.as_ref(), ranking.as_ref());
    Ok(())
}

fn service_error(err: PointsServiceError) -> AppError {
    match err {
        PointsServiceError::UnknownResearcher(id) => AppError::UnknownResearcher(id.0),
        PointsServiceError::InvalidPeriod(err) => AppError::Period(err),
    }
}

pub(crate) fn render_report(
    id: ResearcherId,
    filter: &PeriodFilter,
    all_time: Option<&AggregatedPoints>,
    evaluation: Option<&EvaluationReport>,
    ranking: Option<&RankingEntry>,
) {
    println!("Scientific points report for researcher {id}");
    println!(
        "Period: academic year {} (month: {})",
        filter.academic_year, filter.month
    );

    match all_time {
        Some(points) => {
            println!("\nAll-time points: {:.1}", points.total);
            for row in points.breakdown.category_totals() {
                if row.records > 0 {
                    println!(
                        "- {}: {} record(s), {:.1} points",
                        row.category_label, row.records, row.points
                    );
                }
            }
        }
        None => println!("\nAll-time points: unavailable"),
    }

    let Some(report) = evaluation else {
        println!("\nEvaluation: unavailable");
        return;
    };

    println!("\nPoints in period: {:.1}", report.points.total);
    for row in report.points.breakdown.category_totals() {
        if row.records > 0 {
            println!("- {}: {:.1}", row.category_label, row.points);
        }
    }

    let scores = &report.scores;
    println!("\nEvaluation");
    println!(
        "- Plan achievement: {}% of {} ({})",
        scores.plan_achievement,
        scores.plan_target,
        scores.plan_grade.label()
    );
    println!(
        "- International achievement: {}% of {} ({})",
        scores.international_achievement,
        scores.international_target,
        scores.international_grade.label()
    );
    println!(
        "- Composite score: {}% ({})",
        scores.comprehensive_score,
        scores.comprehensive_grade.label()
    );

    match ranking {
        Some(entry) => {
            println!("\nRanking");
            println!(
                "- College: {} of {} (top {}%)",
                entry.college.rank,
                entry.college.cohort_size,
                entry.college.top_percent()
            );
            println!(
                "- Department: {} of {} (top {}%)",
                entry.department.rank,
                entry.department.cohort_size,
                entry.department.top_percent()
            );
        }
        None => println!("\nRanking: unavailable"),
    }
}
