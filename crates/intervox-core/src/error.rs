use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("environment variable not found: {0}")]
    EnvVarNotFound(String),
}

#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("recognition engine not found: {0}")]
    EngineNotFound(String),

    #[error("recognition engine initialization failed: {0}")]
    InitializationFailed(String),

    #[error("speech recognition not supported: {0}")]
    Unsupported(String),

    #[error("failed to start recognition: {0}")]
    StartFailed(String),

    #[error("failed to stop recognition: {0}")]
    StopFailed(String),
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation API key not configured")]
    NotConfigured,

    #[error("generation request failed: {0}")]
    Http(String),

    #[error("generation API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed generation response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("speech synthesis unavailable: {0}")]
    Unavailable(String),

    #[error("speech playback failed: {0}")]
    PlaybackFailed(String),
}
