use faculty_points::config::SeedConfig;
use faculty_points::import::{ActivityCsvImporter, ActivityImportError, ActivityIndex};
use faculty_points::points::{
    ActivityRepository, RawBreakdown, RepositoryError, ResearcherId, ResearcherProfile,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Repository backed by roster and activity CSV exports held in memory.
#[derive(Default, Clone)]
pub(crate) struct InMemoryActivityRepository {
    profiles: Arc<Mutex<Vec<ResearcherProfile>>>,
    activities: Arc<Mutex<ActivityIndex>>,
}

impl InMemoryActivityRepository {
    pub(crate) fn new(profiles: Vec<ResearcherProfile>, activities: ActivityIndex) -> Self {
        Self {
            profiles: Arc::new(Mutex::new(profiles)),
            activities: Arc::new(Mutex::new(activities)),
        }
    }

    /// Loads whichever seed files are configured; missing files leave the store empty.
    pub(crate) fn from_seed(seed: &SeedConfig) -> Result<Self, ActivityImportError> {
        let profiles = match &seed.roster_csv {
            Some(path) => ActivityCsvImporter::roster_from_path(path)?,
            None => Vec::new(),
        };
        let activities = match &seed.activities_csv {
            Some(path) => ActivityCsvImporter::activities_from_path(path)?,
            None => ActivityIndex::new(),
        };
        Ok(Self::new(profiles, activities))
    }

    pub(crate) fn researcher_count(&self) -> usize {
        self.profiles.lock().expect("repository mutex poisoned").len()
    }
}

impl ActivityRepository for InMemoryActivityRepository {
    fn researcher(&self, id: ResearcherId) -> Result<Option<ResearcherProfile>, RepositoryError> {
        let guard = self.profiles.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|profile| profile.id == id).cloned())
    }

    fn researchers(&self) -> Result<Vec<ResearcherProfile>, RepositoryError> {
        let guard = self.profiles.lock().expect("repository mutex poisoned");
        Ok(guard.clone())
    }

    fn activities(&self, id: ResearcherId) -> Result<RawBreakdown, RepositoryError> {
        let guard = self.activities.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned().unwrap_or_default())
    }
}
