use serde::{Deserialize, Serialize};

/// Share awarded to each side when neither participant has earned points, and the
/// consistency percentage assumed for a zero-length challenge window.
pub const NEUTRAL_PERCENTAGE: f64 = 50.0;

/// Quality is reported on a ten point scale and lifted to a percentage.
pub const QUALITY_SCALE: f64 = 10.0;

/// Relative weights of the four score components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub transformation: f64,
    pub points: f64,
    pub consistency: f64,
    pub goal: f64,
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.transformation + self.points + self.consistency + self.goal
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            transformation: 0.60,
            points: 0.20,
            consistency: 0.15,
            goal: 0.05,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_cover_the_whole_score() {
        assert!((ScoringWeights::default().sum() - 1.0).abs() < 1e-12);
    }
}
