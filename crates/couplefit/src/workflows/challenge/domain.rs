use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for couple challenges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChallengeId(pub String);

impl fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which partner of the couple a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticipantSlot {
    A,
    B,
}

impl ParticipantSlot {
    pub fn label(&self) -> &'static str {
        match self {
            ParticipantSlot::A => "A",
            ParticipantSlot::B => "B",
        }
    }
}

/// Photo-derived body-composition assessment consumed by the scoring engine.
///
/// `transformation_score` is expected in `[0, 100]` and `transformation_quality`
/// in `[0, 10]`; the engine itself does not enforce either range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformationAnalysis {
    pub transformation_score: f64,
    pub transformation_quality: f64,
}

/// Accumulated challenge activity for one participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChallengeScoreInput {
    pub points: u32,
    pub consistency_days: u32,
}

/// Weighted components of a participant's total, rounded to cents for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub transformation_score: f64,
    pub points_score: f64,
    pub consistency_score: f64,
    pub goal_score: f64,
}

/// Outcome of a judged challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinnerId {
    A,
    B,
    #[serde(rename = "TIE")]
    Tie,
}

impl WinnerId {
    pub fn label(&self) -> &'static str {
        match self {
            WinnerId::A => "A",
            WinnerId::B => "B",
            WinnerId::Tie => "TIE",
        }
    }

    /// Mirror image of the verdict when the two participants trade places.
    pub fn swapped(&self) -> Self {
        match self {
            WinnerId::A => WinnerId::B,
            WinnerId::B => WinnerId::A,
            WinnerId::Tie => WinnerId::Tie,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeWinner {
    pub winner_id: WinnerId,
    pub score_a: f64,
    pub score_b: f64,
    pub breakdown_a: ScoreBreakdown,
    pub breakdown_b: ScoreBreakdown,
    pub judged_at: DateTime<Utc>,
}

/// Everything the engine needs to judge one couple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub analysis_a: TransformationAnalysis,
    pub analysis_b: TransformationAnalysis,
    pub input_a: ChallengeScoreInput,
    pub input_b: ChallengeScoreInput,
    pub total_challenge_days: u32,
}

/// Payload used to open a new couple challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewChallenge {
    pub partner_a: String,
    pub partner_b: String,
    pub total_days: u32,
    pub started_on: NaiveDate,
}

/// Activity increment logged against one participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub participant: ParticipantSlot,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub consistency_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub progress: ChallengeScoreInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeStatus {
    Active,
    Judged,
}

impl ChallengeStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ChallengeStatus::Active => "active",
            ChallengeStatus::Judged => "judged",
        }
    }
}

/// Where the analysis used for a participant's judgement came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    Supplied,
    Oracle,
    NeutralDefault,
}
