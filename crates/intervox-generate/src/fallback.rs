//! Canned responses used when the generation API is unconfigured or fails.
//! The interview keeps moving either way.

use intervox_core::{FinalSummary, ImprovementPlan, QaSummary, Rating, Score};
use rand::seq::SliceRandom;

const GENERIC_FILLERS: &[&str] = &[
    "I see, go on...",
    "That's interesting, tell me more.",
    "Mm-hmm, I'm listening.",
    "Good point, please continue.",
    "Right, and then?",
];

/// Keyword-keyed acknowledgements so the fallback still sounds on-topic.
const CONTEXTUAL_FILLERS: &[(&str, &[&str])] = &[
    (
        "ai",
        &[
            "AI is a fascinating area, go on.",
            "Interesting take on artificial intelligence.",
        ],
    ),
    (
        "energy",
        &[
            "Energy is such an important topic, continue.",
            "Good thoughts on energy, tell me more.",
        ],
    ),
    (
        "internet",
        &[
            "The internet changed so much, go on.",
            "Interesting point about the internet.",
        ],
    ),
    (
        "climate",
        &[
            "Climate is a big one, please continue.",
            "That's a thoughtful angle on climate.",
        ],
    ),
    (
        "data",
        &[
            "Data really is everywhere, go on.",
            "Interesting perspective on data.",
        ],
    ),
];

/// Pick a filler acknowledgement, preferring one keyed to a topic word that
/// appears in what the candidate has said so far.
pub fn filler(partial_answer: &str) -> String {
    let lower = partial_answer.to_lowercase();
    let mut rng = rand::thread_rng();
    for (keyword, phrases) in CONTEXTUAL_FILLERS {
        if lower.contains(keyword) {
            if let Some(phrase) = phrases.choose(&mut rng) {
                return (*phrase).to_string();
            }
        }
    }
    GENERIC_FILLERS
        .choose(&mut rng)
        .copied()
        .unwrap_or(GENERIC_FILLERS[0])
        .to_string()
}

/// Summary built from the raw answer when no model assessment is available.
pub fn qa_summary(answer: &str) -> QaSummary {
    let mut summary: String = answer.chars().take(140).collect();
    if answer.chars().count() > 140 {
        summary.push_str("...");
    }
    QaSummary {
        summary,
        key_points: Vec::new(),
        clarity: Rating::Fair,
        completeness: Rating::Fair,
    }
}

pub fn final_summary(answered: usize, total: usize) -> FinalSummary {
    FinalSummary {
        overall_summary: format!(
            "You completed {answered} of {total} questions. A detailed \
             assessment was not available for this session."
        ),
        strengths: vec!["Completed the interview".to_string()],
        areas_for_improvement: vec![
            "Review your answers and identify where you could add detail".to_string(),
        ],
        improvement_plan: ImprovementPlan {
            short_term: vec!["Practice answering out loud with a timer".to_string()],
            long_term: vec!["Do regular mock interviews on varied topics".to_string()],
        },
        overall_score: Score::Good,
    }
}
