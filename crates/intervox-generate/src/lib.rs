pub mod client;
pub mod fallback;
pub mod prompt;
pub mod rate;

pub use client::GenerationClient;
pub use rate::RateLimiter;
