//! Couple transformation challenges: progress tracking, photo analysis, and
//! weighted winner determination.

pub mod analysis;
pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use analysis::{
    decode_analysis, decode_analysis_or_neutral, AnalysisError, AnalysisReport,
    CompletionOracle, CompletionRequest, OracleError, PhotoPair, PhotoPayload,
    PromptedTransformationAnalyzer, TransformationAnalyzer,
};
pub use domain::{
    AnalysisSource, ChallengeId, ChallengeScoreInput, ChallengeStatus, ChallengeWinner,
    NewChallenge, Participant, ParticipantSlot, ProgressUpdate, ScoreBreakdown, ScoreRequest,
    TransformationAnalysis, WinnerId,
};
pub use repository::{
    ChallengeRecord, ChallengeRepository, ChallengeStatusView, Judgement, RepositoryError,
};
pub use router::challenge_router;
pub use scoring::{
    determine_winner, points_share, InputPolicy, ScoreInputError, ScoringEngine, ScoringWeights,
};
pub use service::{
    ChallengeServiceError, CoupleChallengeService, JudgeRequest, ParticipantEvidence,
};
