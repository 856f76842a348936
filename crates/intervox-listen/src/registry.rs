use crate::engine::RecognitionEngine;
use intervox_core::RecognitionError;
use std::collections::HashMap;

/// Factory map for recognition engines. A failed lookup doubles as the
/// "host has no usable engine" capability signal: callers degrade to an
/// unsupported session instead of panicking.
pub struct EngineRegistry {
    factories: HashMap<String, fn() -> Box<dyn RecognitionEngine>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register("null", || Box::new(crate::null_engine::NullEngine::new()));
        registry.register("scripted", || {
            Box::new(crate::scripted_engine::ScriptedEngine::new())
        });
        registry
    }

    pub fn register(&mut self, name: &str, factory: fn() -> Box<dyn RecognitionEngine>) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn RecognitionEngine>, RecognitionError> {
        self.factories
            .get(name)
            .map(|f| f())
            .ok_or_else(|| RecognitionError::EngineNotFound(name.to_string()))
    }

    pub fn supports(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn list_engines(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::new()
    }
}
