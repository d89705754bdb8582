use serde::{Deserialize, Serialize};

use super::super::domain::{
    ChallengeScoreInput, ParticipantSlot, ScoreRequest, TransformationAnalysis,
};

pub(crate) const SCORE_RANGE: (f64, f64) = (0.0, 100.0);
pub(crate) const QUALITY_RANGE: (f64, f64) = (0.0, 10.0);

/// How out-of-range scoring inputs are treated before they reach the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputPolicy {
    /// Pull scores back into their documented ranges and cap consistency days at
    /// the challenge length.
    #[default]
    Clamp,
    /// Refuse the request with a `ScoreInputError`.
    Reject,
}

impl InputPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "clamp" => Some(Self::Clamp),
            "reject" | "strict" => Some(Self::Reject),
            _ => None,
        }
    }

    /// Apply the policy to a request. Non-finite numbers are refused under
    /// either policy.
    pub fn prepare(&self, request: ScoreRequest) -> Result<ScoreRequest, ScoreInputError> {
        let total_days = request.total_challenge_days;
        Ok(ScoreRequest {
            analysis_a: self.prepare_analysis(ParticipantSlot::A, request.analysis_a)?,
            analysis_b: self.prepare_analysis(ParticipantSlot::B, request.analysis_b)?,
            input_a: self.prepare_progress(ParticipantSlot::A, request.input_a, total_days)?,
            input_b: self.prepare_progress(ParticipantSlot::B, request.input_b, total_days)?,
            total_challenge_days: total_days,
        })
    }

    fn prepare_analysis(
        &self,
        participant: ParticipantSlot,
        analysis: TransformationAnalysis,
    ) -> Result<TransformationAnalysis, ScoreInputError> {
        Ok(TransformationAnalysis {
            transformation_score: self.bounded(
                participant,
                "transformation_score",
                analysis.transformation_score,
                SCORE_RANGE,
            )?,
            transformation_quality: self.bounded(
                participant,
                "transformation_quality",
                analysis.transformation_quality,
                QUALITY_RANGE,
            )?,
        })
    }

    fn bounded(
        &self,
        participant: ParticipantSlot,
        field: &'static str,
        value: f64,
        (min, max): (f64, f64),
    ) -> Result<f64, ScoreInputError> {
        if !value.is_finite() {
            return Err(ScoreInputError::NonFinite { participant, field });
        }

        if (min..=max).contains(&value) {
            return Ok(value);
        }

        match self {
            InputPolicy::Clamp => Ok(value.clamp(min, max)),
            InputPolicy::Reject => Err(ScoreInputError::OutOfRange {
                participant,
                field,
                value,
                min,
                max,
            }),
        }
    }

    /// Apply the consistency window rule to one participant's running totals.
    pub fn prepare_progress(
        &self,
        participant: ParticipantSlot,
        input: ChallengeScoreInput,
        total_days: u32,
    ) -> Result<ChallengeScoreInput, ScoreInputError> {
        // A zero-length window has its own fallback in the engine.
        if total_days == 0 || input.consistency_days <= total_days {
            return Ok(input);
        }

        match self {
            InputPolicy::Clamp => Ok(ChallengeScoreInput {
                consistency_days: total_days,
                ..input
            }),
            InputPolicy::Reject => Err(ScoreInputError::ConsistencyExceedsWindow {
                participant,
                consistency_days: input.consistency_days,
                total_days,
            }),
        }
    }
}

/// Validation failures raised at the scoring boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreInputError {
    #[error("participant {participant:?}: {field} must be a finite number")]
    NonFinite {
        participant: ParticipantSlot,
        field: &'static str,
    },
    #[error("participant {participant:?}: {field} {value} outside [{min}, {max}]")]
    OutOfRange {
        participant: ParticipantSlot,
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error(
        "participant {participant:?}: {consistency_days} consistency days exceed the {total_days} day challenge"
    )]
    ConsistencyExceedsWindow {
        participant: ParticipantSlot,
        consistency_days: u32,
        total_days: u32,
    },
}
