use crate::error::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub recognition: RecognitionConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub interview: InterviewConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecognitionConfig {
    #[serde(default = "default_engine")]
    pub engine: String,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_quiet_window_ms")]
    pub quiet_window_ms: u64,

    #[serde(default = "default_restart_delay_ms")]
    pub restart_delay_ms: u64,

    #[serde(default = "default_max_restarts_per_window")]
    pub max_restarts_per_window: u32,

    #[serde(default = "default_restart_window_ms")]
    pub restart_window_ms: u64,

    #[serde(default)]
    pub scripted: Option<ScriptedConfig>,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            language: default_language(),
            quiet_window_ms: default_quiet_window_ms(),
            restart_delay_ms: default_restart_delay_ms(),
            max_restarts_per_window: default_max_restarts_per_window(),
            restart_window_ms: default_restart_window_ms(),
            scripted: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScriptedConfig {
    pub utterances: Vec<String>,

    #[serde(default = "default_utterance_gap_ms")]
    pub utterance_gap_ms: u64,

    #[serde(default = "default_true")]
    pub emit_interim: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,

    #[serde(default = "default_filler_cooldown_ms")]
    pub filler_cooldown_ms: u64,

    #[serde(default = "default_min_chunk_len")]
    pub min_chunk_len: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: String::new(),
            model: default_model(),
            min_request_interval_ms: default_min_request_interval_ms(),
            filler_cooldown_ms: default_filler_cooldown_ms(),
            min_chunk_len: default_min_chunk_len(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct InterviewConfig {
    #[serde(default)]
    pub questions: Vec<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_engine() -> String {
    "null".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_quiet_window_ms() -> u64 {
    1500
}

fn default_restart_delay_ms() -> u64 {
    100
}

fn default_max_restarts_per_window() -> u32 {
    5
}

fn default_restart_window_ms() -> u64 {
    10_000
}

fn default_utterance_gap_ms() -> u64 {
    400
}

fn default_true() -> bool {
    true
}

fn default_api_url() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "google/gemini-2.0-flash-exp:free".to_string()
}

fn default_min_request_interval_ms() -> u64 {
    2000
}

fn default_filler_cooldown_ms() -> u64 {
    5000
}

fn default_min_chunk_len() -> usize {
    10
}

/// Interpolate `${VAR}` patterns with environment variable values.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{([^}]+)\}").unwrap();
    let mut result = input.to_string();
    let mut errors = Vec::new();

    for cap in re.captures_iter(input) {
        let var_name = &cap[1];
        match std::env::var(var_name) {
            Ok(val) => {
                result = result.replace(&cap[0], &val);
            }
            Err(_) => {
                errors.push(var_name.to_string());
            }
        }
    }

    if let Some(first_missing) = errors.into_iter().next() {
        return Err(ConfigError::EnvVarNotFound(first_missing));
    }

    Ok(result)
}

impl AppConfig {
    /// Load configuration from a TOML file, with environment variable interpolation.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let interpolated = interpolate_env_vars(&content)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        Ok(config)
    }

    /// Parse configuration from a TOML string (for testing).
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let interpolated = interpolate_env_vars(s)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        Ok(config)
    }
}
