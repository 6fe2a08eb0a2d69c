use std::cmp::Ordering;

use serde::Serialize;

use super::domain::{ResearcherId, ResearcherProfile};

/// A researcher's all-time total, the input to every ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub profile: ResearcherProfile,
    pub total_points: f64,
}

/// Position within a cohort (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CohortRank {
    pub rank: usize,
    pub cohort_size: usize,
}

impl CohortRank {
    /// Share of the cohort ranked at or above this position, e.g. 10 for the top tenth.
    pub fn top_percent(self) -> u32 {
        if self.cohort_size == 0 {
            return 0;
        }
        ((self.rank as f64 / self.cohort_size as f64) * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub researcher_id: ResearcherId,
    pub total_points: f64,
    pub college: CohortRank,
    pub department: CohortRank,
}

/// Descending points; equal totals fall back to ascending researcher id.
pub fn standing_order(a: &Standing, b: &Standing) -> Ordering {
    b.total_points
        .partial_cmp(&a.total_points)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.profile.id.cmp(&b.profile.id))
}

fn cohort_rank<F>(standings: &[Standing], target: ResearcherId, in_cohort: F) -> Option<CohortRank>
where
    F: Fn(&Standing) -> bool,
{
    let mut cohort: Vec<&Standing> = standings
        .iter()
        .filter(|standing| in_cohort(standing))
        .collect();
    cohort.sort_by(|a, b| standing_order(a, b));

    let position = cohort
        .iter()
        .position(|standing| standing.profile.id == target)?;

    Some(CohortRank {
        rank: position + 1,
        cohort_size: cohort.len(),
    })
}

/// Ranks `target` against the researchers sharing its college and department.
///
/// Returns `None` when the target has no standing.
pub fn rank_researcher(standings: &[Standing], target: ResearcherId) -> Option<RankingEntry> {
    let subject = standings
        .iter()
        .find(|standing| standing.profile.id == target)?;

    let college = cohort_rank(standings, target, |standing| {
        standing.profile.college == subject.profile.college
    })?;
    let department = cohort_rank(standings, target, |standing| {
        standing.profile.college == subject.profile.college
            && standing.profile.department == subject.profile.department
    })?;

    Some(RankingEntry {
        researcher_id: target,
        total_points: subject.total_points,
        college,
        department,
    })
}

/// Top `limit` standings, optionally restricted to one college.
pub fn leaderboard(standings: &[Standing], college: Option<&str>, limit: usize) -> Vec<Standing> {
    let mut entries: Vec<Standing> = standings
        .iter()
        .filter(|standing| college.map_or(true, |c| standing.profile.college == c))
        .cloned()
        .collect();
    entries.sort_by(standing_order);
    entries.truncate(limit);
    entries
}
