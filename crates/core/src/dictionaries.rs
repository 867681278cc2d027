//! The service's dictionary codes and their display names.
//!
//! Codes are four characters. The `aNNN` codes are bilingual dictionaries,
//! the lettered ones are mostly monolingual Danish works.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::{OrdbogError, Result};

/// Every dictionary code the service accepts, sorted by code, with its display name.
pub static DICTIONARIES: [(&str, &str); 36] = [
    ("a000", "Engelsk / Dansk / Engelsk"),
    ("a001", "Tysk / Dansk / Tysk"),
    ("a002", "Fransk / Dansk / Fransk"),
    ("a004", "Svensk / Dansk / Svensk"),
    ("a005", "Spansk / Dansk / Spansk"),
    ("a006", "Portugisisk / Dansk / Portugisisk"),
    ("a008", "Italiensk / Dansk / Italiensk"),
    ("a016", "Arabisk / Dansk / Arabisk"),
    ("a017", "Norsk / Engelsk / Norsk"),
    ("a021", "Blinkenberg & Høybye Fransk / Dansk / Fransk"),
    ("a050", "Engelsk / Kinesisk / Engelsk"),
    ("a100", "Politikens Franskordbog"),
    ("a101", "Politikens Tyskordbog"),
    ("a102", "Politikens Engelskordbog"),
    ("a103", "Politikens Første Engelskordbog"),
    ("a104", "Politikens Store Engelskordbog"),
    ("auto", "Automatisk"),
    ("ddbo", "Den Danske Betydningsordbog"),
    ("ddbs", "Hvad er det nu, det hedder?"),
    ("ddgr", "Den Danske Grammatik- og Staveordbog"),
    ("ddno", "Den Danske Netordbog"),
    ("ddob", "DDO (Den Danske Ordbog)"),
    ("ddsv", "Den Danske Skriveordbog"),
    ("ddsy", "Den Danske Synonymordbog"),
    ("fred", "Ejendomsordbog Fransk-Dansk"),
    ("fvdd", "Ordbogen over faste vendinger"),
    ("musk", "Musikordbogen"),
    ("pfre", "Politikens Fremmedordbog"),
    ("plda", "Politikens Lille Danskordbog"),
    ("pndo", "Politikens Nudansk Ordbog"),
    ("prbo", "Politikens Retskrivnings- og Betydningsordbog"),
    ("pret", "Politikens Retskrivningsordbog"),
    ("prim", "Politikens Rimordbog"),
    ("psko", "Politikens Skoleordbog"),
    ("psyn", "Politikens Synonymordbog"),
    ("rtsk", "Retskrivningsordbogen"),
];

/// A dictionary code known to be in [`DICTIONARIES`].
///
/// The only way to obtain one is through [`FromStr`], [`DictionaryCode::auto`]
/// or [`DictionaryCode::all`], so holding a value proves the code is valid.
///
/// # Example
///
/// ```rust
/// use ordbog_core::DictionaryCode;
///
/// let code: DictionaryCode = "a000".parse().unwrap();
/// assert_eq!(code.name(), "Engelsk / Dansk / Engelsk");
/// assert!("xx".parse::<DictionaryCode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DictionaryCode(&'static str);

impl DictionaryCode {
    /// Lets the service pick the dictionary.
    pub fn auto() -> Self {
        Self("auto")
    }

    /// Looks a code up without producing an error.
    pub fn lookup(code: &str) -> Option<Self> {
        DICTIONARIES
            .binary_search_by(|(known, _)| known.cmp(&code))
            .ok()
            .map(|idx| Self(DICTIONARIES[idx].0))
    }

    /// All known codes in code order.
    pub fn all() -> impl Iterator<Item = DictionaryCode> {
        DICTIONARIES.iter().map(|(code, _)| Self(*code))
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Display name of the dictionary.
    pub fn name(&self) -> &'static str {
        DICTIONARIES
            .iter()
            .find(|(code, _)| *code == self.0)
            .map(|(_, name)| *name)
            .unwrap_or(self.0)
    }
}

impl Default for DictionaryCode {
    fn default() -> Self {
        Self::auto()
    }
}

impl FromStr for DictionaryCode {
    type Err = OrdbogError;

    fn from_str(s: &str) -> Result<Self> {
        Self::lookup(s.trim()).ok_or_else(|| OrdbogError::InvalidDictionary(s.to_string()))
    }
}

impl fmt::Display for DictionaryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
