use serde::{Deserialize, Serialize};

/// One entry of the recognition engine's result buffer. Only the best-ranked
/// alternative is carried.
#[derive(Debug, Clone)]
pub struct RecognitionResult {
    pub text: String,
    pub is_final: bool,
    pub buffer_index: usize,
}

impl RecognitionResult {
    pub fn final_text(text: impl Into<String>, buffer_index: usize) -> Self {
        Self {
            text: text.into(),
            is_final: true,
            buffer_index,
        }
    }

    pub fn interim_text(text: impl Into<String>, buffer_index: usize) -> Self {
        Self {
            text: text.into(),
            is_final: false,
            buffer_index,
        }
    }
}

/// One "result" event from the engine. May mix already-seen finals, new
/// finals, and the current interim guesses, in buffer order.
#[derive(Debug, Clone, Default)]
pub struct ResultBatch {
    pub results: Vec<RecognitionResult>,
}

impl ResultBatch {
    pub fn new(results: Vec<RecognitionResult>) -> Self {
        Self { results }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Good,
    Fair,
    Poor,
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rating::Good => write!(f, "good"),
            Rating::Fair => write!(f, "fair"),
            Rating::Poor => write!(f, "poor"),
        }
    }
}

/// Per-answer summary, matching the JSON shape the generation model is asked
/// to produce.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaSummary {
    pub summary: String,

    #[serde(default)]
    pub key_points: Vec<String>,

    pub clarity: Rating,
    pub completeness: Rating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Score {
    Excellent,
    Good,
    Fair,
    #[serde(rename = "needs improvement")]
    NeedsImprovement,
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Score::Excellent => write!(f, "excellent"),
            Score::Good => write!(f, "good"),
            Score::Fair => write!(f, "fair"),
            Score::NeedsImprovement => write!(f, "needs improvement"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementPlan {
    #[serde(default)]
    pub short_term: Vec<String>,

    #[serde(default)]
    pub long_term: Vec<String>,
}

/// Whole-interview summary, matching the JSON shape the generation model is
/// asked to produce.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalSummary {
    pub overall_summary: String,

    #[serde(default)]
    pub strengths: Vec<String>,

    #[serde(default)]
    pub areas_for_improvement: Vec<String>,

    #[serde(default)]
    pub improvement_plan: ImprovementPlan,

    pub overall_score: Score,
}
