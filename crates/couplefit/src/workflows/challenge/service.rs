use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::analysis::{AnalysisReport, PhotoPair, TransformationAnalyzer};
use super::domain::{
    AnalysisSource, ChallengeId, ChallengeScoreInput, ChallengeStatus, ChallengeWinner,
    NewChallenge, Participant, ParticipantSlot, ProgressUpdate, ScoreRequest,
    TransformationAnalysis,
};
use super::repository::{ChallengeRecord, ChallengeRepository, Judgement, RepositoryError};
use super::scoring::{InputPolicy, ScoreInputError, ScoringEngine};
use crate::config::ChallengeConfig;

/// What the caller knows about one participant at judging time.
///
/// A supplied analysis wins over photos; with neither, the neutral report is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticipantEvidence {
    #[serde(default)]
    pub analysis: Option<TransformationAnalysis>,
    #[serde(default)]
    pub photos: Option<PhotoPair>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JudgeRequest {
    #[serde(default)]
    pub participant_a: ParticipantEvidence,
    #[serde(default)]
    pub participant_b: ParticipantEvidence,
}

/// Service composing the repository, analysis oracle, and scoring engine.
pub struct CoupleChallengeService<R, A> {
    repository: Arc<R>,
    analyzer: Arc<A>,
    engine: Arc<ScoringEngine>,
    policy: InputPolicy,
}

static CHALLENGE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_challenge_id() -> ChallengeId {
    let id = CHALLENGE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ChallengeId(format!("chl-{id:06}"))
}

impl<R, A> CoupleChallengeService<R, A>
where
    R: ChallengeRepository + 'static,
    A: TransformationAnalyzer + 'static,
{
    pub fn new(repository: Arc<R>, analyzer: Arc<A>, config: ChallengeConfig) -> Self {
        Self::with_engine(repository, analyzer, ScoringEngine::default(), config)
    }

    pub fn with_engine(
        repository: Arc<R>,
        analyzer: Arc<A>,
        engine: ScoringEngine,
        config: ChallengeConfig,
    ) -> Self {
        Self {
            repository,
            analyzer,
            engine: Arc::new(engine),
            policy: config.input_policy,
        }
    }

    /// Open a new challenge for a couple.
    pub fn create(&self, request: NewChallenge) -> Result<ChallengeRecord, ChallengeServiceError> {
        let partner_a = request.partner_a.trim();
        let partner_b = request.partner_b.trim();
        if partner_a.is_empty() || partner_b.is_empty() {
            return Err(ChallengeServiceError::InvalidChallenge(
                "both partners need a name".to_string(),
            ));
        }
        if request.total_days == 0 {
            return Err(ChallengeServiceError::InvalidChallenge(
                "total_days must be at least 1".to_string(),
            ));
        }

        let record = ChallengeRecord {
            challenge_id: next_challenge_id(),
            participant_a: Participant {
                name: partner_a.to_string(),
                progress: Default::default(),
            },
            participant_b: Participant {
                name: partner_b.to_string(),
                progress: Default::default(),
            },
            total_days: request.total_days,
            started_on: request.started_on,
            status: ChallengeStatus::Active,
            judgement: None,
        };

        let stored = self.repository.insert(record)?;
        info!(
            challenge_id = %stored.challenge_id,
            total_days = stored.total_days,
            "challenge created"
        );
        Ok(stored)
    }

    /// Add points and consistency days to one participant of an active challenge.
    ///
    /// The running consistency total is held to the challenge window by the
    /// configured policy; a rejected update leaves the stored record untouched.
    pub fn record_progress(
        &self,
        challenge_id: &ChallengeId,
        update: ProgressUpdate,
    ) -> Result<ChallengeRecord, ChallengeServiceError> {
        let mut record = self.fetch_existing(challenge_id)?;
        if record.status == ChallengeStatus::Judged {
            return Err(ChallengeServiceError::AlreadyJudged(challenge_id.clone()));
        }

        let total_days = record.total_days;
        let participant = record.participant_mut(update.participant);
        let tally = ChallengeScoreInput {
            points: participant.progress.points.saturating_add(update.points),
            consistency_days: participant
                .progress
                .consistency_days
                .saturating_add(update.consistency_days),
        };
        participant.progress = self
            .policy
            .prepare_progress(update.participant, tally, total_days)?;

        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Resolve both analyses, score the couple, and persist the verdict.
    pub fn judge(
        &self,
        challenge_id: &ChallengeId,
        request: JudgeRequest,
    ) -> Result<ChallengeWinner, ChallengeServiceError> {
        let mut record = self.fetch_existing(challenge_id)?;
        if record.status == ChallengeStatus::Judged {
            return Err(ChallengeServiceError::AlreadyJudged(challenge_id.clone()));
        }

        let (analysis_a, source_a) =
            self.resolve_analysis(ParticipantSlot::A, request.participant_a);
        let (analysis_b, source_b) =
            self.resolve_analysis(ParticipantSlot::B, request.participant_b);

        let winner = self.score(ScoreRequest {
            analysis_a,
            analysis_b,
            input_a: record.participant_a.progress,
            input_b: record.participant_b.progress,
            total_challenge_days: record.total_days,
        })?;

        record.status = ChallengeStatus::Judged;
        record.judgement = Some(Judgement {
            winner: winner.clone(),
            analysis_source_a: source_a,
            analysis_source_b: source_b,
        });
        self.repository.update(record)?;

        info!(
            challenge_id = %challenge_id,
            winner = winner.winner_id.label(),
            score_a = winner.score_a,
            score_b = winner.score_b,
            "challenge judged"
        );
        Ok(winner)
    }

    /// Score a couple directly, applying the configured input policy first.
    pub fn score(&self, request: ScoreRequest) -> Result<ChallengeWinner, ScoreInputError> {
        let prepared = self.policy.prepare(request)?;
        Ok(self.engine.judge(&prepared))
    }

    /// Fetch a challenge for API responses.
    pub fn get(
        &self,
        challenge_id: &ChallengeId,
    ) -> Result<ChallengeRecord, ChallengeServiceError> {
        self.fetch_existing(challenge_id)
    }

    pub fn active(&self, limit: usize) -> Result<Vec<ChallengeRecord>, ChallengeServiceError> {
        Ok(self.repository.list_active(limit)?)
    }

    fn fetch_existing(
        &self,
        challenge_id: &ChallengeId,
    ) -> Result<ChallengeRecord, ChallengeServiceError> {
        let record = self
            .repository
            .fetch(challenge_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    fn resolve_analysis(
        &self,
        participant: ParticipantSlot,
        evidence: ParticipantEvidence,
    ) -> (TransformationAnalysis, AnalysisSource) {
        if let Some(analysis) = evidence.analysis {
            return (analysis, AnalysisSource::Supplied);
        }

        let Some(photos) = evidence.photos else {
            return (
                AnalysisReport::neutral().analysis(),
                AnalysisSource::NeutralDefault,
            );
        };

        match self
            .analyzer
            .analyze(&photos)
            .and_then(AnalysisReport::validated)
        {
            Ok(report) => (report.analysis(), AnalysisSource::Oracle),
            Err(err) => {
                warn!(
                    participant = participant.label(),
                    error = %err,
                    "transformation analysis failed, using neutral default"
                );
                (
                    AnalysisReport::neutral().analysis(),
                    AnalysisSource::NeutralDefault,
                )
            }
        }
    }
}

/// Error raised by the challenge service.
#[derive(Debug, thiserror::Error)]
pub enum ChallengeServiceError {
    #[error("invalid challenge: {0}")]
    InvalidChallenge(String),
    #[error("challenge {0} has already been judged")]
    AlreadyJudged(ChallengeId),
    #[error(transparent)]
    Input(#[from] ScoreInputError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
