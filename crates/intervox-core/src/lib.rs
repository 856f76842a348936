pub mod config;
pub mod error;
pub mod types;

pub use config::{
    AppConfig, GeneralConfig, GenerationConfig, InterviewConfig, RecognitionConfig, ScriptedConfig,
};
pub use error::{ConfigError, GenerationError, RecognitionError, SynthesisError};
pub use types::{
    FinalSummary, ImprovementPlan, QaPair, QaSummary, Rating, RecognitionResult, ResultBatch, Score,
};
