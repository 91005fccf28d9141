use serde::{Deserialize, Serialize};

/// Weights applied to each factor of the feasibility score.
///
/// No bounds are enforced and the weights need not sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub cost: f64,
    pub demand: f64,
    pub regulatory: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            cost: 0.3,
            demand: 0.4,
            regulatory: 0.3,
        }
    }
}

impl ScoringWeights {
    pub fn score(&self, input: &FeasibilityInput) -> f64 {
        input.cost * self.cost + input.demand * self.demand + input.regulatory * self.regulatory
    }
}

/// Investment factors for one candidate site. Absent factors count as 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityInput {
    #[serde(default = "neutral_factor")]
    pub cost: f64,
    #[serde(default = "neutral_factor")]
    pub demand: f64,
    #[serde(default = "neutral_factor")]
    pub regulatory: f64,
}

impl Default for FeasibilityInput {
    fn default() -> Self {
        Self {
            cost: neutral_factor(),
            demand: neutral_factor(),
            regulatory: neutral_factor(),
        }
    }
}

fn neutral_factor() -> f64 {
    1.0
}

/// Weighted feasibility score. NaN and negative inputs propagate unchanged.
pub fn feasibility_score(input: &FeasibilityInput, weights: &ScoringWeights) -> f64 {
    weights.score(input)
}
