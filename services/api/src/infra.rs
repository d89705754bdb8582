use chrono::NaiveDate;
use couplefit::config::DiningConfig;
use couplefit::workflows::challenge::{
    ChallengeId, ChallengeRecord, ChallengeRepository, ChallengeStatus, CompletionOracle,
    CompletionRequest, InputPolicy, OracleError, PromptedTransformationAnalyzer,
    RepositoryError,
};
use couplefit::workflows::dining::{CatalogueError, CatalogueSearch};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryChallengeRepository {
    records: Arc<Mutex<HashMap<ChallengeId, ChallengeRecord>>>,
}

impl ChallengeRepository for InMemoryChallengeRepository {
    fn insert(&self, record: ChallengeRecord) -> Result<ChallengeRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.challenge_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.challenge_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ChallengeRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.challenge_id) {
            guard.insert(record.challenge_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ChallengeId) -> Result<Option<ChallengeRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_active(&self, limit: usize) -> Result<Vec<ChallengeRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut active: Vec<ChallengeRecord> = guard
            .values()
            .filter(|record| record.status == ChallengeStatus::Active)
            .cloned()
            .collect();
        active.sort_by(|left, right| left.challenge_id.cmp(&right.challenge_id));
        active.truncate(limit);
        Ok(active)
    }
}

/// Completion backend used until a model provider is wired in. Every call
/// fails, so photo judging falls back to the neutral analysis.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct UnconfiguredCompletionOracle;

impl CompletionOracle for UnconfiguredCompletionOracle {
    fn complete(&self, _request: &CompletionRequest) -> Result<String, OracleError> {
        Err(OracleError::Unavailable(
            "no completion backend configured".to_string(),
        ))
    }
}

pub(crate) type ServerAnalyzer = PromptedTransformationAnalyzer<UnconfiguredCompletionOracle>;

pub(crate) fn default_analyzer() -> ServerAnalyzer {
    PromptedTransformationAnalyzer::new(UnconfiguredCompletionOracle)
}

/// Load the configured places catalogue, or an empty one when none is set.
pub(crate) fn load_catalogue(config: &DiningConfig) -> Result<CatalogueSearch, CatalogueError> {
    let Some(path) = config.places_csv.as_ref() else {
        warn!("COUPLEFIT_PLACES_CSV not set; dining search starts with an empty catalogue");
        return Ok(CatalogueSearch::default());
    };

    let catalogue = CatalogueSearch::from_path(path)?;
    info!(path = %path.display(), places = catalogue.len(), "places catalogue loaded");
    Ok(catalogue)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_policy(raw: &str) -> Result<InputPolicy, String> {
    InputPolicy::parse(raw).ok_or_else(|| format!("'{raw}' is not one of clamp, reject"))
}
