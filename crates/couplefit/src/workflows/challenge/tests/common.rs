use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::config::ChallengeConfig;
use crate::workflows::challenge::analysis::{
    AnalysisError, AnalysisReport, OracleError, PhotoPair, PhotoPayload, TransformationAnalyzer,
};
use crate::workflows::challenge::domain::{
    ChallengeId, ChallengeScoreInput, ChallengeStatus, NewChallenge, ScoreRequest,
    TransformationAnalysis,
};
use crate::workflows::challenge::repository::{
    ChallengeRecord, ChallengeRepository, RepositoryError,
};
use crate::workflows::challenge::scoring::InputPolicy;
use crate::workflows::challenge::{challenge_router, CoupleChallengeService};

pub(super) fn judged_at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 2, 18, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn analysis(score: f64, quality: f64) -> TransformationAnalysis {
    TransformationAnalysis {
        transformation_score: score,
        transformation_quality: quality,
    }
}

pub(super) fn input(points: u32, consistency_days: u32) -> ChallengeScoreInput {
    ChallengeScoreInput {
        points,
        consistency_days,
    }
}

pub(super) fn score_request(
    (analysis_a, input_a): (TransformationAnalysis, ChallengeScoreInput),
    (analysis_b, input_b): (TransformationAnalysis, ChallengeScoreInput),
    total_challenge_days: u32,
) -> ScoreRequest {
    ScoreRequest {
        analysis_a,
        analysis_b,
        input_a,
        input_b,
        total_challenge_days,
    }
}

pub(super) fn new_challenge() -> NewChallenge {
    NewChallenge {
        partner_a: "Maya".to_string(),
        partner_b: "Jordan".to_string(),
        total_days: 30,
        started_on: NaiveDate::from_ymd_opt(2025, 10, 1).expect("valid date"),
    }
}

pub(super) fn photos() -> PhotoPair {
    PhotoPair {
        before: PhotoPayload {
            media_type: "image/jpeg".to_string(),
            data: "YmVmb3Jl".to_string(),
        },
        after: PhotoPayload {
            media_type: "image/jpeg".to_string(),
            data: "YWZ0ZXI=".to_string(),
        },
    }
}

pub(super) fn build_service(
    analyzer: CannedAnalyzer,
    policy: InputPolicy,
) -> (
    CoupleChallengeService<MemoryRepository, CannedAnalyzer>,
    Arc<MemoryRepository>,
    Arc<CannedAnalyzer>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let analyzer = Arc::new(analyzer);
    let service = CoupleChallengeService::new(
        repository.clone(),
        analyzer.clone(),
        ChallengeConfig {
            input_policy: policy,
        },
    );
    (service, repository, analyzer)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ChallengeId, ChallengeRecord>>>,
}

impl ChallengeRepository for MemoryRepository {
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
        guard.insert(record.challenge_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &ChallengeId) -> Result<Option<ChallengeRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_active(&self, limit: usize) -> Result<Vec<ChallengeRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.status == ChallengeStatus::Active)
            .take(limit)
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableRepository;

impl ChallengeRepository for UnavailableRepository {
    fn insert(&self, _record: ChallengeRecord) -> Result<ChallengeRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: ChallengeRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ChallengeId) -> Result<Option<ChallengeRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_active(&self, _limit: usize) -> Result<Vec<ChallengeRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Analyzer double returning a fixed report (or failure) and counting calls.
pub(super) struct CannedAnalyzer {
    report: Option<AnalysisReport>,
    calls: Mutex<usize>,
}

impl CannedAnalyzer {
    pub(super) fn returning(score: f64, quality: f64) -> Self {
        Self {
            report: Some(AnalysisReport {
                transformation_score: score,
                transformation_quality: quality,
                ..AnalysisReport::neutral()
            }),
            calls: Mutex::new(0),
        }
    }

    pub(super) fn failing() -> Self {
        Self {
            report: None,
            calls: Mutex::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        *self.calls.lock().expect("analyzer mutex poisoned")
    }
}

impl TransformationAnalyzer for CannedAnalyzer {
    fn analyze(&self, _photos: &PhotoPair) -> Result<AnalysisReport, AnalysisError> {
        *self.calls.lock().expect("analyzer mutex poisoned") += 1;
        self.report.ok_or_else(|| {
            AnalysisError::Oracle(OracleError::Unavailable("model offline".to_string()))
        })
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn challenge_router_with_service(
    service: CoupleChallengeService<MemoryRepository, CannedAnalyzer>,
) -> axum::Router {
    challenge_router(Arc::new(service))
}
