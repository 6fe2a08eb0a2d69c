use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::points::{ActivityCategory, RawActivity, ResearcherId, ResearcherProfile};

use super::ActivityImportError;

#[derive(Debug, Deserialize)]
struct RosterRow {
    researcher_id: i64,
    name: String,
    college: String,
    department: String,
}

#[derive(Debug, Deserialize)]
struct ActivityRow {
    researcher_id: i64,
    category: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    title: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    year: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    month: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    points: Option<String>,
}

impl ActivityRow {
    fn into_activity(self) -> RawActivity {
        RawActivity {
            id: self.id.as_deref().and_then(|id| id.parse().ok()),
            title: self.title,
            year: self.year.as_deref().and_then(|year| year.parse().ok()),
            month: self.month,
            date: self.date,
            points: self
                .points
                .as_deref()
                .and_then(|points| points.parse().ok())
                .unwrap_or(0.0),
            details: Default::default(),
        }
    }
}

pub(crate) struct ParsedActivity {
    pub(crate) researcher_id: ResearcherId,
    pub(crate) category: ActivityCategory,
    pub(crate) activity: RawActivity,
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

pub(crate) fn parse_roster<R: Read>(
    reader: R,
) -> Result<Vec<ResearcherProfile>, ActivityImportError> {
    let mut profiles = Vec::new();
    for row in csv_reader(reader).deserialize::<RosterRow>() {
        let row = row?;
        profiles.push(ResearcherProfile {
            id: ResearcherId(row.researcher_id),
            name: row.name,
            college: row.college,
            department: row.department,
        });
    }
    Ok(profiles)
}

pub(crate) fn parse_activities<R: Read>(
    reader: R,
) -> Result<Vec<ParsedActivity>, ActivityImportError> {
    let mut parsed = Vec::new();
    // Line 1 is the header.
    for (index, row) in csv_reader(reader).deserialize::<ActivityRow>().enumerate() {
        let row = row?;
        let category = ActivityCategory::from_key(&row.category).ok_or_else(|| {
            ActivityImportError::UnknownCategory {
                line: index + 2,
                value: row.category.clone(),
            }
        })?;

        parsed.push(ParsedActivity {
            researcher_id: ResearcherId(row.researcher_id),
            category,
            activity: row.into_activity(),
        });
    }
    Ok(parsed)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
