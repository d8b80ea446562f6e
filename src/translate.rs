//! Translation lookup.
//!
//! Keys are the English strings themselves. A missing entry falls back to
//! the key.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct Translator {
    entries: HashMap<String, String>,
}

impl Translator {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Load a JSON object of `"key": "translation"` pairs.
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        let entries = serde_json::from_str(&contents)
            .map_err(|e| format!("invalid translations at {}: {e}", path.display()))?;
        Ok(Self::new(entries))
    }

    pub fn translate(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}
