pub mod client;
pub mod dictionaries;
pub mod error;
pub mod fetch;
pub mod formatters;
pub mod lookup;
pub mod parse;
pub mod session;
pub mod suggest;

pub use client::{Client, ClientConfig, ClientConfigBuilder, DEFAULT_BASE_URL, LoginOutcome};
pub use dictionaries::{DICTIONARIES, DictionaryCode};
pub use error::{OrdbogError, Result};
pub use fetch::{FetchConfig, HttpRequest, HttpResponse, HttpTransport, Method, Transport};
pub use formatters::{JsonConfig, JsonFormatter, TextConfig, TextFormatter};
pub use formatters::{convert_to_json, convert_to_text, suggestions_to_json};
pub use lookup::{
    LanguageGroup, LookupResult, ResultParser, ResultSelectors, TranslatedWord, UsageDetail, dictionaries_with_hits,
    parse_lookup,
};
pub use parse::{Document, Element};
pub use session::{CookieJar, CookieStore, SessionPhase, SessionState};
pub use suggest::{WordSuggestion, parse_suggestions};
