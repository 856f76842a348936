pub mod console;
pub mod synthesizer;

pub use console::ConsoleSynthesizer;
pub use synthesizer::Synthesizer;
