mod validation;
mod weights;

pub use validation::{InputPolicy, ScoreInputError};
pub(crate) use validation::{QUALITY_RANGE, SCORE_RANGE};
pub use weights::{ScoringWeights, NEUTRAL_PERCENTAGE, QUALITY_SCALE};

use chrono::{DateTime, Utc};

use super::domain::{
    ChallengeScoreInput, ChallengeWinner, ScoreBreakdown, ScoreRequest, TransformationAnalysis,
    WinnerId,
};

/// Stateless judge that applies the weighted rubric to both participants.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    weights: ScoringWeights,
}

impl ScoringEngine {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn judge(&self, request: &ScoreRequest) -> ChallengeWinner {
        self.judge_at(request, Utc::now())
    }

    /// Winner is decided on unrounded totals; rounding only shapes the report.
    pub fn judge_at(&self, request: &ScoreRequest, judged_at: DateTime<Utc>) -> ChallengeWinner {
        let total_days = request.total_challenge_days;
        let a = self.participant_score(
            &request.analysis_a,
            request.input_a,
            request.input_b.points,
            total_days,
        );
        let b = self.participant_score(
            &request.analysis_b,
            request.input_b,
            request.input_a.points,
            total_days,
        );

        let (total_a, total_b) = (a.total(), b.total());
        let winner_id = if total_a > total_b {
            WinnerId::A
        } else if total_b > total_a {
            WinnerId::B
        } else {
            WinnerId::Tie
        };

        ChallengeWinner {
            winner_id,
            score_a: round_cents(total_a),
            score_b: round_cents(total_b),
            breakdown_a: a.rounded(),
            breakdown_b: b.rounded(),
            judged_at,
        }
    }

    pub(crate) fn participant_score(
        &self,
        analysis: &TransformationAnalysis,
        mine: ChallengeScoreInput,
        opponent_points: u32,
        total_days: u32,
    ) -> ComponentScores {
        ComponentScores {
            transformation: analysis.transformation_score * self.weights.transformation,
            points: points_share(mine.points, opponent_points) * self.weights.points,
            consistency: consistency_percentage(mine.consistency_days, total_days)
                * self.weights.consistency,
            goal: analysis.transformation_quality * QUALITY_SCALE * self.weights.goal,
        }
    }
}

/// Full-precision component values for a single participant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ComponentScores {
    pub(crate) transformation: f64,
    pub(crate) points: f64,
    pub(crate) consistency: f64,
    pub(crate) goal: f64,
}

impl ComponentScores {
    pub(crate) fn total(&self) -> f64 {
        self.transformation + self.points + self.consistency + self.goal
    }

    fn rounded(&self) -> ScoreBreakdown {
        ScoreBreakdown {
            transformation_score: round_cents(self.transformation),
            points_score: round_cents(self.points),
            consistency_score: round_cents(self.consistency),
            goal_score: round_cents(self.goal),
        }
    }
}

/// Percentage of the combined points held by `mine`; an even split when nobody
/// has scored yet.
pub fn points_share(mine: u32, opponent: u32) -> f64 {
    let combined = f64::from(mine) + f64::from(opponent);
    if combined == 0.0 {
        return NEUTRAL_PERCENTAGE;
    }
    100.0 * f64::from(mine) / combined
}

/// Share of the challenge window with logged activity, capped at 100.
pub fn consistency_percentage(consistency_days: u32, total_days: u32) -> f64 {
    if total_days == 0 {
        return NEUTRAL_PERCENTAGE;
    }
    (100.0 * f64::from(consistency_days) / f64::from(total_days)).min(100.0)
}

/// Round to two decimals, with halves going towards positive infinity.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// Judge a couple with the default weights.
pub fn determine_winner(
    analysis_a: TransformationAnalysis,
    analysis_b: TransformationAnalysis,
    points_a: u32,
    points_b: u32,
    consistency_days_a: u32,
    consistency_days_b: u32,
    total_challenge_days: u32,
) -> ChallengeWinner {
    ScoringEngine::default().judge(&ScoreRequest {
        analysis_a,
        analysis_b,
        input_a: ChallengeScoreInput {
            points: points_a,
            consistency_days: consistency_days_a,
        },
        input_b: ChallengeScoreInput {
            points: points_b,
            consistency_days: consistency_days_b,
        },
        total_challenge_days,
    })
}
