//! Collaborator payload shape and the coercion rules that turn it into typed records.
//!
//! Upstream data is loosely typed: points and years arrive as numbers or strings, whole
//! category lists may be `null`, and dates come in several spellings. Nothing in here
//! rejects a record; unusable values collapse to zero or [`TemporalAnchor::Unknown`].

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::domain::{month_from_name, ActivityCategory, ActivityRecord, TemporalAnchor};

/// Category key to activity list, as returned by the persistence layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawBreakdown {
    pub categories: BTreeMap<String, Option<Vec<RawActivity>>>,
}

impl RawBreakdown {
    pub fn push(&mut self, category: ActivityCategory, activity: RawActivity) {
        self.categories
            .entry(category.key().to_string())
            .or_insert_with(|| Some(Vec::new()))
            .get_or_insert_with(Vec::new)
            .push(activity);
    }

    pub fn with(mut self, category: ActivityCategory, activity: RawActivity) -> Self {
        self.push(category, activity);
        self
    }
}

/// One untyped activity row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawActivity {
    #[serde(default, deserialize_with = "lenient_integer")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_year")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub month: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_points")]
    pub points: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub details: BTreeMap<String, Value>,
}

impl RawActivity {
    /// Builds the typed record, choosing the anchor precision the category supports.
    pub fn into_record(self, category: ActivityCategory) -> ActivityRecord {
        let anchor = self.anchor(category);
        let title = self
            .title
            .unwrap_or_else(|| format!("Untitled {}", category.label().to_lowercase()));

        ActivityRecord {
            id: self.id,
            title,
            anchor,
            points: sanitize_points(self.points),
            details: self.details,
        }
    }

    fn anchor(&self, category: ActivityCategory) -> TemporalAnchor {
        let date = self.date.as_deref().and_then(parse_date);
        let year = self.year.or_else(|| date.map(|d| d.year()));

        if category.year_only() {
            return match year {
                Some(year) => TemporalAnchor::Year { year },
                None => TemporalAnchor::Unknown,
            };
        }

        let month = self.month.as_deref().and_then(month_from_name);
        match (date, self.year, month) {
            (_, Some(year), Some(month)) => TemporalAnchor::YearMonth { year, month },
            (Some(date), _, _) => TemporalAnchor::Date { date },
            (None, Some(year), None) => TemporalAnchor::Year { year },
            (None, None, _) => TemporalAnchor::Unknown,
        }
    }
}

pub(crate) fn sanitize_points(points: f64) -> f64 {
    if points.is_finite() && points > 0.0 {
        points
    } else {
        0.0
    }
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    // Timestamps like "2024-10-05T00:00:00.000Z" fall through to the date prefix.
    let prefix = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn lenient_points<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_from_value)
        .map(sanitize_points)
        .unwrap_or(0.0))
}

fn lenient_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_from_value)
        .filter(|year| year.fract() == 0.0 && (1.0..=9999.0).contains(year))
        .map(|year| year as i32))
}

fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number.as_i64(),
        Some(Value::String(text)) => text.trim().parse::<i64>().ok(),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text).filter(|text| !text.trim().is_empty()),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
