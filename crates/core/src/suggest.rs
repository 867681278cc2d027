//! Word completion suggestions.

use serde::{Deserialize, Serialize};

use crate::Result;

/// A candidate word and the short code of the dictionary it comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSuggestion {
    pub word: String,
    #[serde(alias = "shortdict")]
    pub dictionary: String,
}

/// Decodes the suggestion endpoint's JSON array.
///
/// # Errors
///
/// Returns [`OrdbogError::JsonError`](crate::OrdbogError::JsonError) if the
/// body is not an array of objects with `word` and `shortdict` fields.
pub fn parse_suggestions(body: &str) -> Result<Vec<WordSuggestion>> {
    Ok(serde_json::from_str(body)?)
}
