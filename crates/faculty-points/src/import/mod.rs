//! CSV import of researcher rosters and activity exports.

mod parser;

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::points::{RawBreakdown, ResearcherId, ResearcherProfile};

#[derive(Debug)]
pub enum ActivityImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    UnknownCategory { line: usize, value: String },
}

impl std::fmt::Display for ActivityImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityImportError::Io(err) => write!(f, "failed to read activity export: {}", err),
            ActivityImportError::Csv(err) => write!(f, "invalid activity CSV data: {}", err),
            ActivityImportError::UnknownCategory { line, value } => {
                write!(f, "line {line}: unknown activity category '{value}'")
            }
        }
    }
}

impl std::error::Error for ActivityImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ActivityImportError::Io(err) => Some(err),
            ActivityImportError::Csv(err) => Some(err),
            ActivityImportError::UnknownCategory { .. } => None,
        }
    }
}

impl From<std::io::Error> for ActivityImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ActivityImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Activity payloads keyed by researcher, ready to back a repository.
pub type ActivityIndex = HashMap<ResearcherId, RawBreakdown>;

pub struct ActivityCsvImporter;

impl ActivityCsvImporter {
    /// Roster columns: `researcher_id,name,college,department`.
    pub fn roster_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<ResearcherProfile>, ActivityImportError> {
        let file = std::fs::File::open(path)?;
        Self::roster_from_reader(file)
    }

    pub fn roster_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<ResearcherProfile>, ActivityImportError> {
        parser::parse_roster(reader)
    }

    /// Activity columns: `researcher_id,category,id,title,year,month,date,points`.
    pub fn activities_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<ActivityIndex, ActivityImportError> {
        let file = std::fs::File::open(path)?;
        Self::activities_from_reader(file)
    }

    pub fn activities_from_reader<R: Read>(reader: R) -> Result<ActivityIndex, ActivityImportError> {
        let mut index = ActivityIndex::new();
        for parsed in parser::parse_activities(reader)? {
            index
                .entry(parsed.researcher_id)
                .or_default()
                .push(parsed.category, parsed.activity);
        }
        Ok(index)
    }
}
