use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use super::domain::{ActivityCategory, ActivityRecord};
use super::payload::RawBreakdown;

/// Per-category activity lists for one researcher. Every category is always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PointsBreakdown {
    categories: BTreeMap<ActivityCategory, Vec<ActivityRecord>>,
}

impl Default for PointsBreakdown {
    fn default() -> Self {
        Self::empty()
    }
}

impl PointsBreakdown {
    pub fn empty() -> Self {
        let categories = ActivityCategory::ALL
            .into_iter()
            .map(|category| (category, Vec::new()))
            .collect();
        Self { categories }
    }

    pub fn push(&mut self, category: ActivityCategory, record: ActivityRecord) {
        self.categories.entry(category).or_default().push(record);
    }

    pub fn records(&self, category: ActivityCategory) -> &[ActivityRecord] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActivityCategory, &[ActivityRecord])> {
        self.categories
            .iter()
            .map(|(category, records)| (*category, records.as_slice()))
    }

    pub fn category_total(&self, category: ActivityCategory) -> f64 {
        self.records(category)
            .iter()
            .map(|record| record.points)
            .sum()
    }

    pub fn total(&self) -> f64 {
        self.categories
            .values()
            .flatten()
            .map(|record| record.points)
            .sum()
    }

    pub fn record_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Copy of the breakdown keeping only records accepted by `keep`; categories stay present.
    pub fn retain<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(ActivityCategory, &ActivityRecord) -> bool,
    {
        let categories = self
            .categories
            .iter()
            .map(|(category, records)| {
                let kept = records
                    .iter()
                    .filter(|record| keep(*category, record))
                    .cloned()
                    .collect();
                (*category, kept)
            })
            .collect();
        Self { categories }
    }

    pub fn category_totals(&self) -> Vec<CategoryTotal> {
        self.iter()
            .map(|(category, records)| CategoryTotal {
                category,
                category_label: category.label(),
                records: records.len(),
                points: records.iter().map(|record| record.points).sum(),
            })
            .collect()
    }
}

/// Summary row used by reports and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: ActivityCategory,
    pub category_label: &'static str,
    pub records: usize,
    pub points: f64,
}

/// Breakdown paired with its total, the unit the aggregator and period filter hand around.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedPoints {
    pub breakdown: PointsBreakdown,
    pub total: f64,
}

impl From<PointsBreakdown> for AggregatedPoints {
    fn from(breakdown: PointsBreakdown) -> Self {
        let total = breakdown.total();
        Self { breakdown, total }
    }
}

/// Folds the collaborator payload into a typed breakdown. Never fails: missing lists
/// become empty categories and unknown category keys are skipped.
pub fn aggregate(raw: RawBreakdown) -> AggregatedPoints {
    let mut breakdown = PointsBreakdown::empty();

    for (key, activities) in raw.categories {
        let Some(category) = ActivityCategory::from_key(&key) else {
            warn!(category = %key, "skipping unknown activity category");
            continue;
        };

        for activity in activities.unwrap_or_default() {
            breakdown.push(category, activity.into_record(category));
        }
    }

    AggregatedPoints::from(breakdown)
}
