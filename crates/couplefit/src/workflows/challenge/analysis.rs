//! Photo-based transformation analysis.
//!
//! The generative model is reached through [`CompletionOracle`]; the service only
//! depends on [`TransformationAnalyzer`], so tests can swap in canned reports.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::TransformationAnalysis;
use super::scoring::{QUALITY_RANGE, SCORE_RANGE};

/// Opaque photo payload as received from the client (base64 body plus media type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoPayload {
    pub media_type: String,
    pub data: String,
}

impl PhotoPayload {
    pub fn is_empty(&self) -> bool {
        self.data.trim().is_empty()
    }
}

/// Before/after photos for one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoPair {
    pub before: PhotoPayload,
    pub after: PhotoPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub images: Vec<PhotoPayload>,
    pub temperature: f32,
}

/// Text-completion backend. Implementations own transport and credentials.
pub trait CompletionOracle: Send + Sync {
    fn complete(&self, request: &CompletionRequest) -> Result<String, OracleError>;
}

#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("completion backend unavailable: {0}")]
    Unavailable(String),
    #[error("completion request rejected: {0}")]
    Rejected(String),
}

/// Single-method seam used by the challenge service.
pub trait TransformationAnalyzer: Send + Sync {
    fn analyze(&self, photos: &PhotoPair) -> Result<AnalysisReport, AnalysisError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Oracle(#[from] OracleError),
    #[error("photo '{0}' is empty")]
    EmptyPhoto(&'static str),
    #[error("analysis reply did not contain a JSON object")]
    MissingJson,
    #[error("analysis reply could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("analysis field {field} {value} outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

const NEUTRAL_SCORE: f64 = 50.0;
const NEUTRAL_MUSCLE_DEFINITION: f64 = 10.0;
const NEUTRAL_BODY_FAT: f64 = 10.0;
const NEUTRAL_POSTURE: f64 = 5.0;
const NEUTRAL_QUALITY: f64 = 5.0;

/// Structured reply from the analysis model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    #[serde(alias = "transformation_score")]
    pub transformation_score: f64,
    #[serde(alias = "muscle_definition_change", default = "neutral_muscle_definition")]
    pub muscle_definition_change: f64,
    #[serde(alias = "body_fat_change", default = "neutral_body_fat")]
    pub body_fat_change: f64,
    #[serde(alias = "posture_improvement", default = "neutral_posture")]
    pub posture_improvement: f64,
    #[serde(alias = "transformation_quality")]
    pub transformation_quality: f64,
}

fn neutral_muscle_definition() -> f64 {
    NEUTRAL_MUSCLE_DEFINITION
}

fn neutral_body_fat() -> f64 {
    NEUTRAL_BODY_FAT
}

fn neutral_posture() -> f64 {
    NEUTRAL_POSTURE
}

impl AnalysisReport {
    /// Stand-in used whenever the oracle cannot produce a usable report.
    pub fn neutral() -> Self {
        Self {
            transformation_score: NEUTRAL_SCORE,
            muscle_definition_change: NEUTRAL_MUSCLE_DEFINITION,
            body_fat_change: NEUTRAL_BODY_FAT,
            posture_improvement: NEUTRAL_POSTURE,
            transformation_quality: NEUTRAL_QUALITY,
        }
    }

    /// Accept the report only when the scored fields sit inside their ranges.
    pub fn validated(self) -> Result<Self, AnalysisError> {
        in_range("transformationScore", self.transformation_score, SCORE_RANGE)?;
        in_range("transformationQuality", self.transformation_quality, QUALITY_RANGE)?;
        Ok(self)
    }

    pub fn analysis(&self) -> TransformationAnalysis {
        TransformationAnalysis {
            transformation_score: self.transformation_score,
            transformation_quality: self.transformation_quality,
        }
    }
}

fn in_range(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<(), AnalysisError> {
    if (min..=max).contains(&value) {
        return Ok(());
    }
    Err(AnalysisError::OutOfRange {
        field,
        value,
        min,
        max,
    })
}

const SYSTEM_PROMPT: &str = "You are a fitness coach comparing before and after progress photos. \
Reply with a single JSON object and nothing else.";

const USER_PROMPT: &str = "Compare the first (before) and second (after) photo of the same person. \
Return JSON with numeric fields: transformationScore (0-100 overall visible change), \
muscleDefinitionChange (0-20), bodyFatChange (0-20), postureImprovement (0-10), \
transformationQuality (0-10 photo consistency and effort).";

/// Analyzer that prompts a completion oracle and decodes its reply.
pub struct PromptedTransformationAnalyzer<O> {
    oracle: O,
}

impl<O: CompletionOracle> PromptedTransformationAnalyzer<O> {
    pub fn new(oracle: O) -> Self {
        Self { oracle }
    }

    pub(crate) fn request_for(photos: &PhotoPair) -> CompletionRequest {
        CompletionRequest {
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt: USER_PROMPT.to_string(),
            images: vec![photos.before.clone(), photos.after.clone()],
            temperature: 0.2,
        }
    }
}

impl<O: CompletionOracle> TransformationAnalyzer for PromptedTransformationAnalyzer<O> {
    fn analyze(&self, photos: &PhotoPair) -> Result<AnalysisReport, AnalysisError> {
        if photos.before.is_empty() {
            return Err(AnalysisError::EmptyPhoto("before"));
        }
        if photos.after.is_empty() {
            return Err(AnalysisError::EmptyPhoto("after"));
        }

        let reply = self.oracle.complete(&Self::request_for(photos))?;
        decode_analysis(&reply)
    }
}

/// Decode a model reply into a typed report.
pub fn decode_analysis(reply: &str) -> Result<AnalysisReport, AnalysisError> {
    let json = extract_json(reply).ok_or(AnalysisError::MissingJson)?;
    let report: AnalysisReport = serde_json::from_str(json)?;
    report.validated()
}

/// Decode a model reply, failing closed to [`AnalysisReport::neutral`].
pub fn decode_analysis_or_neutral(reply: &str) -> AnalysisReport {
    decode_analysis(reply).unwrap_or_else(|err| {
        warn!(error = %err, "falling back to neutral transformation analysis");
        AnalysisReport::neutral()
    })
}

/// Locate the JSON object inside a reply that may carry prose or a fenced block.
fn extract_json(reply: &str) -> Option<&str> {
    let trimmed = reply.trim();
    if serde_json::from_str::<serde_json::Value>(trimmed).is_ok() {
        return Some(trimmed);
    }

    if let Some(start) = trimmed.find("```json") {
        let body = &trimmed[start + "```json".len()..];
        if let Some(end) = body.find("```") {
            let block = body[..end].trim();
            if serde_json::from_str::<serde_json::Value>(block).is_ok() {
                return Some(block);
            }
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    let candidate = &trimmed[start..=end];
    serde_json::from_str::<serde_json::Value>(candidate)
        .ok()
        .map(|_| candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct ScriptedOracle {
        reply: Result<String, String>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedOracle {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl CompletionOracle for ScriptedOracle {
        fn complete(&self, request: &CompletionRequest) -> Result<String, OracleError> {
            self.seen.lock().expect("oracle mutex").push(request.clone());
            self.reply.clone().map_err(OracleError::Unavailable)
        }
    }

    fn photos() -> PhotoPair {
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

    #[test]
    fn decodes_plain_json_reply() {
        let report = decode_analysis(
            r#"{"transformationScore": 72.5, "muscleDefinitionChange": 12, "bodyFatChange": 8, "postureImprovement": 4, "transformationQuality": 8}"#,
        )
        .expect("valid reply decodes");

        assert_eq!(report.transformation_score, 72.5);
        assert_eq!(report.body_fat_change, 8.0);
        assert_eq!(report.analysis().transformation_quality, 8.0);
    }

    #[test]
    fn decodes_json_wrapped_in_prose_and_fences() {
        let fenced = "Here you go:\n```json\n{\"transformationScore\": 64, \"transformationQuality\": 7}\n```\nGood luck!";
        let report = decode_analysis(fenced).expect("fenced reply decodes");
        assert_eq!(report.transformation_score, 64.0);
        assert_eq!(report.posture_improvement, 5.0);

        let prose = "Result {\"transformation_score\": 40, \"transformation_quality\": 3} end";
        let report = decode_analysis(prose).expect("snake case reply decodes");
        assert_eq!(report.transformation_score, 40.0);
    }

    #[test]
    fn missing_required_field_fails_decode() {
        let err = decode_analysis(r#"{"transformationScore": 64}"#).expect_err("quality missing");
        assert!(matches!(err, AnalysisError::Decode(_)));
    }

    #[test]
    fn scores_outside_their_range_are_refused() {
        let err = decode_analysis(r#"{"transformationScore": 140, "transformationQuality": 7}"#)
            .expect_err("score above 100");
        assert!(matches!(
            err,
            AnalysisError::OutOfRange {
                field: "transformationScore",
                ..
            }
        ));

        let report = decode_analysis_or_neutral(
            r#"{"transformationScore": 70, "transformationQuality": -1}"#,
        );
        assert_eq!(report, AnalysisReport::neutral());
    }

    #[test]
    fn unusable_reply_falls_back_to_neutral_report() {
        let report = decode_analysis_or_neutral("I cannot assess these photos.");
        assert_eq!(report, AnalysisReport::neutral());
        assert_eq!(
            (
                report.transformation_score,
                report.muscle_definition_change,
                report.body_fat_change,
                report.posture_improvement,
                report.transformation_quality
            ),
            (50.0, 10.0, 10.0, 5.0, 5.0)
        );
    }

    #[test]
    fn analyzer_sends_both_photos_to_oracle() {
        let oracle = ScriptedOracle::replying(
            r#"{"transformationScore": 81, "transformationQuality": 9}"#,
        );
        let analyzer = PromptedTransformationAnalyzer::new(oracle);

        let report = analyzer.analyze(&photos()).expect("analysis succeeds");

        assert_eq!(report.transformation_score, 81.0);
        let seen = analyzer.oracle.seen.lock().expect("oracle mutex");
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].images, vec![photos().before, photos().after]);
    }

    #[test]
    fn analyzer_surfaces_oracle_failure() {
        let analyzer = PromptedTransformationAnalyzer::new(ScriptedOracle::failing("quota"));
        let err = analyzer.analyze(&photos()).expect_err("oracle failure propagates");
        assert!(matches!(err, AnalysisError::Oracle(OracleError::Unavailable(_))));
    }

    #[test]
    fn analyzer_rejects_empty_photo_without_calling_oracle() {
        let analyzer = PromptedTransformationAnalyzer::new(ScriptedOracle::replying("{}"));
        let mut pair = photos();
        pair.after.data = "  ".to_string();

        let err = analyzer.analyze(&pair).expect_err("empty photo rejected");
        assert!(matches!(err, AnalysisError::EmptyPhoto("after")));
        assert!(analyzer.oracle.seen.lock().expect("oracle mutex").is_empty());
    }
}
