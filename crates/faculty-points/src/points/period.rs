use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

use super::breakdown::{AggregatedPoints, PointsBreakdown};
use super::domain::TemporalAnchor;

/// First month (August) of an academic year.
const ACADEMIC_START_MONTH: u32 = 8;

/// August 1 of `start` through July 31 of `start + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AcademicYear {
    start: i32,
}

impl AcademicYear {
    pub const fn new(start: i32) -> Self {
        Self { start }
    }

    pub const fn start_year(self) -> i32 {
        self.start
    }

    pub const fn end_year(self) -> i32 {
        self.start + 1
    }

    /// The academic year a calendar date falls in.
    pub fn containing(date: NaiveDate) -> Self {
        if date.month() >= ACADEMIC_START_MONTH {
            Self::new(date.year())
        } else {
            Self::new(date.year() - 1)
        }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.start, ACADEMIC_START_MONTH, 1)
    }

    pub fn last_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.end_year(), ACADEMIC_START_MONTH - 1, 31)
    }

    /// Whether an anchor falls inside this year (and month, when one is selected).
    ///
    /// Bare years carry no month, so they match either calendar year the academic year
    /// touches and ignore the month selector.
    pub fn matches(self, anchor: &TemporalAnchor, month: MonthSelector) -> bool {
        match *anchor {
            TemporalAnchor::Year { year } => year == self.start_year() || year == self.end_year(),
            TemporalAnchor::YearMonth { year, month: m } => self.month_matches(year, m, month),
            TemporalAnchor::Date { date } => self.month_matches(date.year(), date.month(), month),
            TemporalAnchor::Unknown => false,
        }
    }

    fn month_matches(self, year: i32, month: u32, selector: MonthSelector) -> bool {
        if !(1..=12).contains(&month) {
            return false;
        }

        let expected_year = if month >= ACADEMIC_START_MONTH {
            self.start_year()
        } else {
            self.end_year()
        };

        year == expected_year && selector.accepts(month)
    }
}

impl fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_year(), self.end_year())
    }
}

impl FromStr for AcademicYear {
    type Err = PeriodError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || PeriodError::InvalidAcademicYear(raw.to_string());
        let (start, end) = raw.trim().split_once('-').ok_or_else(invalid)?;

        let parse_year = |value: &str| {
            let value = value.trim();
            if value.len() == 4 && value.chars().all(|ch| ch.is_ascii_digit()) {
                value.parse::<i32>().ok()
            } else {
                None
            }
        };

        let start = parse_year(start).ok_or_else(invalid)?;
        let end = parse_year(end).ok_or_else(invalid)?;
        if end != start + 1 {
            return Err(invalid());
        }

        Ok(Self::new(start))
    }
}

impl Serialize for AcademicYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Either the whole academic year or a single calendar month within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MonthSelector {
    #[default]
    All,
    Month(u32),
}

impl MonthSelector {
    pub fn month(month: u32) -> Result<Self, PeriodError> {
        if (1..=12).contains(&month) {
            Ok(Self::Month(month))
        } else {
            Err(PeriodError::InvalidMonth(month.to_string()))
        }
    }

    pub fn accepts(self, month: u32) -> bool {
        match self {
            Self::All => true,
            Self::Month(selected) => selected == month,
        }
    }
}

impl fmt::Display for MonthSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Month(month) => write!(f, "{month}"),
        }
    }
}

impl FromStr for MonthSelector {
    type Err = PeriodError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        let month = trimmed
            .parse::<u32>()
            .map_err(|_| PeriodError::InvalidMonth(raw.to_string()))?;
        Self::month(month)
    }
}

impl Serialize for MonthSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
    #[error("academic year '{0}' must look like YYYY-YYYY with consecutive years")]
    InvalidAcademicYear(String),
    #[error("month '{0}' must be 'all' or a number between 1 and 12")]
    InvalidMonth(String),
}

/// Restricts a breakdown to one academic year and optional month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodFilter {
    pub academic_year: AcademicYear,
    pub month: MonthSelector,
}

impl PeriodFilter {
    pub fn new(academic_year: AcademicYear, month: MonthSelector) -> Self {
        Self {
            academic_year,
            month,
        }
    }

    /// Parses optional query values, defaulting to the academic year containing `today`.
    pub fn from_query(
        academic_year: Option<&str>,
        month: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, PeriodError> {
        let academic_year = match academic_year.map(str::trim).filter(|v| !v.is_empty()) {
            Some(raw) => raw.parse()?,
            None => AcademicYear::containing(today),
        };
        let month = match month {
            Some(raw) => raw.parse()?,
            None => MonthSelector::All,
        };
        Ok(Self::new(academic_year, month))
    }

    pub fn apply(&self, breakdown: &PointsBreakdown) -> AggregatedPoints {
        let filtered =
            breakdown.retain(|_, record| self.academic_year.matches(&record.anchor, self.month));
        AggregatedPoints::from(filtered)
    }
}
