use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier wrapper for researchers (teaching staff).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResearcherId(pub i64);

impl fmt::Display for ResearcherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Directory entry used to build college and department cohorts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearcherProfile {
    pub id: ResearcherId,
    pub name: String,
    pub college: String,
    pub department: String,
}

/// Every scored activity kind a researcher can accumulate points for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityCategory {
    Research,
    Conferences,
    Positions,
    Publications,
    Courses,
    Seminars,
    Workshops,
    Assignments,
    VolunteerWork,
    Committees,
    ThankYouBooks,
    Supervision,
    ScientificEvaluations,
    JournalMemberships,
}

impl ActivityCategory {
    pub const ALL: [ActivityCategory; 14] = [
        Self::Research,
        Self::Conferences,
        Self::Positions,
        Self::Publications,
        Self::Courses,
        Self::Seminars,
        Self::Workshops,
        Self::Assignments,
        Self::VolunteerWork,
        Self::Committees,
        Self::ThankYouBooks,
        Self::Supervision,
        Self::ScientificEvaluations,
        Self::JournalMemberships,
    ];

    /// Wire key used by the persistence layer and the JSON API.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::Conferences => "conferences",
            Self::Positions => "positions",
            Self::Publications => "publications",
            Self::Courses => "courses",
            Self::Seminars => "seminars",
            Self::Workshops => "workshops",
            Self::Assignments => "assignments",
            Self::VolunteerWork => "volunteer_work",
            Self::Committees => "committees",
            Self::ThankYouBooks => "thank_you_books",
            Self::Supervision => "supervision",
            Self::ScientificEvaluations => "scientific_evaluations",
            Self::JournalMemberships => "journal_memberships",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Research => "Research",
            Self::Conferences => "Conferences",
            Self::Positions => "Positions",
            Self::Publications => "Publications",
            Self::Courses => "Courses",
            Self::Seminars => "Seminars",
            Self::Workshops => "Workshops",
            Self::Assignments => "Assignments",
            Self::VolunteerWork => "Volunteer Work",
            Self::Committees => "Committees",
            Self::ThankYouBooks => "Thank-You Books",
            Self::Supervision => "Supervision",
            Self::ScientificEvaluations => "Scientific Evaluations",
            Self::JournalMemberships => "Journal Memberships",
        }
    }

    /// Accepts the wire key as well as the camelCase spelling used by older exports.
    pub fn from_key(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|ch| *ch != '_' && *ch != '-' && !ch.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();

        Self::ALL
            .into_iter()
            .find(|category| category.key().replace('_', "") == normalized)
    }

    /// Research records only ever carry a bare year.
    pub const fn year_only(self) -> bool {
        matches!(self, Self::Research)
    }
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Point in time an activity is attributed to, at whatever precision the source recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TemporalAnchor {
    Year { year: i32 },
    YearMonth { year: i32, month: u32 },
    Date { date: NaiveDate },
    Unknown,
}

impl TemporalAnchor {
    pub fn year(&self) -> Option<i32> {
        match self {
            Self::Year { year } | Self::YearMonth { year, .. } => Some(*year),
            Self::Date { date } => Some(date.year()),
            Self::Unknown => None,
        }
    }

    pub fn month(&self) -> Option<u32> {
        match self {
            Self::YearMonth { month, .. } => Some(*month),
            Self::Date { date } => Some(date.month()),
            Self::Year { .. } | Self::Unknown => None,
        }
    }
}

/// A single scored activity owned by one researcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: Option<i64>,
    pub title: String,
    pub anchor: TemporalAnchor,
    pub points: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, Value>,
}

const ARABIC_MONTHS: [(&str, u32); 15] = [
    ("يناير", 1),
    ("فبراير", 2),
    ("مارس", 3),
    ("أبريل", 4),
    ("ابريل", 4),
    ("مايو", 5),
    ("يونيو", 6),
    ("يوليو", 7),
    ("أغسطس", 8),
    ("اغسطس", 8),
    ("سبتمبر", 9),
    ("أكتوبر", 10),
    ("اكتوبر", 10),
    ("نوفمبر", 11),
    ("ديسمبر", 12),
];

/// Resolves the month names used on thank-you book records; numeric strings are accepted too.
pub fn month_from_name(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if let Ok(number) = trimmed.parse::<u32>() {
        return (1..=12).contains(&number).then_some(number);
    }

    ARABIC_MONTHS
        .iter()
        .find(|(name, _)| *name == trimmed)
        .map(|(_, number)| *number)
}
