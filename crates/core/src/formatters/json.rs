use serde::Serialize;

use crate::Result;
use crate::lookup::LookupResult;
use crate::suggest::WordSuggestion;

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Pretty print JSON output
    pub pretty: bool,
}

fn to_string<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    if pretty { Ok(serde_json::to_string_pretty(value)?) } else { Ok(serde_json::to_string(value)?) }
}

/// Convert a lookup result to a JSON object keyed by language label
pub fn convert_to_json(result: &LookupResult, config: &JsonConfig) -> Result<String> {
    to_string(result, config.pretty)
}

/// Convert word suggestions to a JSON array
pub fn suggestions_to_json(suggestions: &[WordSuggestion], config: &JsonConfig) -> Result<String> {
    to_string(suggestions, config.pretty)
}

/// JSON formatter with configurable options
pub struct JsonFormatter {
    config: JsonConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, result: &LookupResult) -> Result<String> {
        convert_to_json(result, &self.config)
    }

    pub fn suggestions(&self, suggestions: &[WordSuggestion]) -> Result<String> {
        suggestions_to_json(suggestions, &self.config)
    }
}
