pub mod accumulator;
pub mod engine;
pub mod null_engine;
pub mod pause;
pub mod registry;
pub mod scripted_engine;
pub mod session;

pub use accumulator::{Accumulator, BatchOutcome};
pub use engine::{EngineErrorKind, EngineEvent, RecognitionEngine};
pub use null_engine::NullEngine;
pub use pause::PauseDetector;
pub use registry::EngineRegistry;
pub use scripted_engine::ScriptedEngine;
pub use session::{SessionCallbacks, SessionOptions, SpeechSession};
