use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    AnalysisSource, ChallengeId, ChallengeScoreInput, ChallengeStatus, ChallengeWinner,
    Participant, ParticipantSlot, WinnerId,
};

/// Repository record for a couple challenge and its judgement, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeRecord {
    pub challenge_id: ChallengeId,
    pub participant_a: Participant,
    pub participant_b: Participant,
    pub total_days: u32,
    pub started_on: NaiveDate,
    pub status: ChallengeStatus,
    pub judgement: Option<Judgement>,
}

/// Stored verdict together with where each participant's analysis came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judgement {
    pub winner: ChallengeWinner,
    pub analysis_source_a: AnalysisSource,
    pub analysis_source_b: AnalysisSource,
}

impl ChallengeRecord {
    pub fn participant_mut(&mut self, slot: ParticipantSlot) -> &mut Participant {
        match slot {
            ParticipantSlot::A => &mut self.participant_a,
            ParticipantSlot::B => &mut self.participant_b,
        }
    }

    pub fn winner_name(&self) -> Option<&str> {
        let judgement = self.judgement.as_ref()?;
        match judgement.winner.winner_id {
            WinnerId::A => Some(self.participant_a.name.as_str()),
            WinnerId::B => Some(self.participant_b.name.as_str()),
            WinnerId::Tie => None,
        }
    }

    pub fn status_view(&self) -> ChallengeStatusView {
        let judgement = self.judgement.as_ref();
        ChallengeStatusView {
            challenge_id: self.challenge_id.clone(),
            status: self.status.label(),
            partner_a: self.participant_a.name.clone(),
            partner_b: self.participant_b.name.clone(),
            total_days: self.total_days,
            progress_a: self.participant_a.progress,
            progress_b: self.participant_b.progress,
            winner_id: judgement.map(|j| j.winner.winner_id.label()),
            score_a: judgement.map(|j| j.winner.score_a),
            score_b: judgement.map(|j| j.winner.score_b),
            judged_at: judgement.map(|j| j.winner.judged_at),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ChallengeRepository: Send + Sync {
    fn insert(&self, record: ChallengeRecord) -> Result<ChallengeRecord, RepositoryError>;
    fn update(&self, record: ChallengeRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ChallengeId) -> Result<Option<ChallengeRecord>, RepositoryError>;
    fn list_active(&self, limit: usize) -> Result<Vec<ChallengeRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Public shape of a challenge returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct ChallengeStatusView {
    pub challenge_id: ChallengeId,
    pub status: &'static str,
    pub partner_a: String,
    pub partner_b: String,
    pub total_days: u32,
    pub progress_a: ChallengeScoreInput,
    pub progress_b: ChallengeScoreInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_a: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_b: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub judged_at: Option<DateTime<Utc>>,
}
