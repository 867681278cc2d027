//! The dictionary client: login, logout, lookups and suggestions.
//!
//! A [`Client`] owns its transport and its [`SessionState`], so independent
//! clients never share cookies. Every operation blocks until the service
//! answers.
//!
//! # Example
//!
//! ```rust,no_run
//! use ordbog_core::{Client, ClientConfig};
//!
//! let mut client = Client::new(ClientConfig::default())?;
//! let outcome = client.login("user", "secret")?;
//! if outcome.success {
//!     let result = client.lookup("kat", "auto")?;
//!     for word in result.words() {
//!         println!("{} ({})", word.word, word.language);
//!     }
//! }
//! # Ok::<(), ordbog_core::OrdbogError>(())
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};
use url::Url;

use crate::fetch::{FetchConfig, HttpRequest, HttpResponse, HttpTransport, Transport};
use crate::lookup::{LookupResult, ResultParser, ResultSelectors};
use crate::parse::Document;
use crate::session::{CookieStore, SessionPhase, SessionState};
use crate::suggest::{WordSuggestion, parse_suggestions};
use crate::{DictionaryCode, OrdbogError, Result};

/// Default service root.
pub const DEFAULT_BASE_URL: &str = "https://www.ordbogen.com/";

const LOGIN_PATH: &str = "ajax/login.json.php";
const LOGOUT_PATH: &str = "user/logout.php";
const LOOKUP_PATH: &str = "opslag.php";
const SUGGEST_PATH: &str = "wordcompletion/get_wordsuggestions.php";

/// Protocol version the login RPC expects.
const LOGIN_VERSION: u32 = 1;

/// Client configuration.
///
/// # Example
///
/// ```rust
/// use ordbog_core::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .timeout(10)
///     .cookie_path(None)
///     .build();
/// assert!(config.cookie_path.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service root; endpoint paths are resolved against it.
    pub base_url: Url,

    /// Persisted cookie store, `None` to keep cookies in memory only
    /// (default: `<data dir>/ordbog/cookies.json`).
    pub cookie_path: Option<PathBuf>,

    /// HTTP settings for the default transport.
    pub fetch: FetchConfig,

    /// Result page layout.
    pub selectors: ResultSelectors,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            cookie_path: CookieStore::default_path(),
            fetch: FetchConfig::default(),
            selectors: ResultSelectors::default(),
        }
    }
}

fn default_base_url() -> Url {
    match Url::parse(DEFAULT_BASE_URL) {
        Ok(url) => url,
        Err(e) => unreachable!("default base URL is valid: {}", e),
    }
}

impl ClientConfig {
    /// Creates a new builder for ClientConfig.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }
}

/// Builder for ClientConfig.
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: ClientConfig::default() }
    }

    /// Sets the service root. A missing trailing slash is added so endpoint
    /// paths resolve below it.
    pub fn base_url(mut self, mut url: Url) -> Self {
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        self.config.base_url = url;
        self
    }

    /// Sets or disables the persisted cookie store.
    pub fn cookie_path(mut self, path: Option<PathBuf>) -> Self {
        self.config.cookie_path = path;
        self
    }

    /// Sets the HTTP timeout in seconds.
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.config.fetch.timeout = seconds;
        self
    }

    /// Sets the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.fetch.user_agent = user_agent.into();
        self
    }

    /// Sets the result page selectors.
    pub fn selectors(mut self, selectors: ResultSelectors) -> Self {
        self.config.selectors = selectors;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Answer of a login attempt, passed through from the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub success: bool,
    /// The service's message, verbatim.
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    result: Option<LoginResult>,
}

#[derive(Debug, Deserialize)]
struct LoginResult {
    #[serde(default)]
    status: bool,
    message: Option<String>,
}

/// Dictionary service client.
pub struct Client<T: Transport = HttpTransport> {
    transport: T,
    base_url: Url,
    parser: ResultParser,
    session: SessionState,
}

impl Client<HttpTransport> {
    /// Creates a client using the blocking reqwest transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.fetch.clone())?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> Client<T> {
    /// Creates a client that sends requests through `transport`.
    ///
    /// # Errors
    ///
    /// Returns [`OrdbogError::HtmlParseError`] if the configured selectors are invalid.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        let parser = ResultParser::new(&config.selectors)?;
        let session = match config.cookie_path {
            Some(path) => SessionState::with_store(CookieStore::new(path)),
            None => SessionState::new(),
        };
        Ok(Self { transport, base_url: config.base_url, parser, session })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(|e| OrdbogError::InvalidUrl(e.to_string()))
    }

    /// Sends a request with the session's cookies and keeps the cookies it sets.
    fn send(&mut self, request: HttpRequest) -> Result<HttpResponse> {
        let request = request.with_cookies(self.session.cookie_header());
        let response = self.transport.send(&request)?;
        if !(200..300).contains(&response.status) {
            debug!(status = response.status, url = %request.url, "non-success status");
        }
        self.session.absorb(&response);
        Ok(response)
    }

    /// Checks whether the persisted or current cookies already belong to `username`.
    ///
    /// Merges the cookie store into the session, fetches the landing
    /// page and looks for the username in it. This is a text search: a page
    /// that mentions the name for another reason counts as logged in. On
    /// success the dictionaries offered on the page are recorded.
    pub fn is_authenticated(&mut self, username: &str) -> Result<bool> {
        if username.is_empty() {
            return Ok(false);
        }
        self.session.restore();

        let landing = self.send(HttpRequest::get(self.base_url.clone()))?;
        let authenticated = landing.body.contains(username);
        if authenticated {
            self.session.set_available(parse_available_dictionaries(&landing.body)?);
            self.session.set_phase(SessionPhase::Authenticated);
        } else if self.session.phase() == SessionPhase::Authenticated {
            info!("session expired");
            self.session.set_available(Vec::new());
            self.session.set_phase(SessionPhase::Unauthenticated);
        }

        debug!(authenticated, "session check");
        Ok(authenticated)
    }

    /// Logs in unless the session is already authenticated for `username`.
    ///
    /// A rejected login is not an error: the outcome carries `success:
    /// false` and the service's message. Cookies are persisted after every
    /// completed login exchange; a store that cannot be written is logged
    /// and does not change the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`OrdbogError::MalformedResponse`] if the answer has no
    /// `result` object, and transport errors as they occur.
    pub fn login(&mut self, username: &str, password: &str) -> Result<LoginOutcome> {
        if self.is_authenticated(username)? {
            return Ok(LoginOutcome { success: true, message: Some("OK".to_string()) });
        }

        let previous = self.session.phase();
        self.session.set_phase(SessionPhase::Authenticating);

        let payload = json!({
            "method": "login",
            "params": [username, password, true, LOGIN_VERSION],
            "id": "jsonrpc",
        });
        let url = self.endpoint(LOGIN_PATH)?;
        let response = match self.send(HttpRequest::post_json(url, payload.to_string())) {
            Ok(response) => response,
            Err(e) => {
                self.session.set_phase(previous);
                return Err(e);
            }
        };

        let outcome = match parse_login_response(&response.body) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.session.set_phase(previous);
                return Err(e);
            }
        };
        if outcome.success {
            info!("logged in");
            self.session.set_phase(SessionPhase::Authenticated);
            self.refresh_dictionaries();
        } else {
            info!(message = ?outcome.message, "login rejected");
            self.session.set_phase(previous);
        }
        if let Err(e) = self.session.persist() {
            warn!(error = %e, "could not persist cookies");
        }
        Ok(outcome)
    }

    /// Reads the dictionaries offered on the landing page after a fresh login.
    fn refresh_dictionaries(&mut self) {
        let landing = match self.send(HttpRequest::get(self.base_url.clone())) {
            Ok(landing) => landing,
            Err(e) => {
                warn!(error = %e, "could not load dictionary list");
                return;
            }
        };
        match parse_available_dictionaries(&landing.body) {
            Ok(codes) => self.session.set_available(codes),
            Err(e) => warn!(error = %e, "could not parse dictionary list"),
        }
    }

    /// Ends the session on the service and forgets the in-memory cookies.
    ///
    /// The persisted store is kept; its cookies are invalid server-side
    /// afterwards, so the next login check fails and logs in again.
    pub fn logout(&mut self) -> Result<()> {
        let url = self.endpoint(LOGOUT_PATH)?;
        self.send(HttpRequest::get(url))?;
        self.session.clear();
        self.session.set_phase(SessionPhase::LoggedOut);
        info!("logged out");
        Ok(())
    }

    /// Looks `word` up in the dictionary with code `dictionary`.
    ///
    /// # Errors
    ///
    /// Returns [`OrdbogError::InvalidDictionary`] without sending anything
    /// if the code is unknown, and [`OrdbogError::MalformedResponse`] if the
    /// page has word blocks before its first language heading.
    pub fn lookup(&mut self, word: &str, dictionary: &str) -> Result<LookupResult> {
        let code: DictionaryCode = dictionary.parse()?;
        let mut url = self.endpoint(LOOKUP_PATH)?;
        url.query_pairs_mut().append_pair("word", word).append_pair("dict", code.as_str());

        let response = self.send(HttpRequest::get(url))?;
        self.parser.parse(&response.body)
    }

    /// Completion suggestions for a partial `word`.
    ///
    /// # Errors
    ///
    /// Returns [`OrdbogError::InvalidDictionary`] without sending anything
    /// if the code is unknown, and [`OrdbogError::JsonError`] if the answer
    /// is not a suggestion list.
    pub fn word_suggestions(&mut self, word: &str, dictionary: &str) -> Result<Vec<WordSuggestion>> {
        let code: DictionaryCode = dictionary.parse()?;
        let mut url = self.endpoint(SUGGEST_PATH)?;
        url.query_pairs_mut().append_pair("string", word).append_pair("dict", code.as_str());

        let response = self.send(HttpRequest::get(url))?;
        parse_suggestions(&response.body)
    }

    /// Dictionaries the account can use, by code.
    ///
    /// Empty until a login or login check has succeeded.
    pub fn available_dictionaries(&self) -> BTreeMap<DictionaryCode, &'static str> {
        self.session
            .available()
            .iter()
            .map(|code| (*code, code.name()))
            .collect()
    }
}

fn parse_login_response(body: &str) -> Result<LoginOutcome> {
    let response: LoginResponse = serde_json::from_str(body)
        .map_err(|e| OrdbogError::MalformedResponse(format!("login response is not JSON: {}", e)))?;
    let result = response
        .result
        .ok_or_else(|| OrdbogError::MalformedResponse("login response has no result".to_string()))?;

    Ok(LoginOutcome { success: result.status, message: result.message })
}

/// Dictionary codes offered by the landing page's `#dict` selector.
fn parse_available_dictionaries(html: &str) -> Result<Vec<DictionaryCode>> {
    let doc = Document::parse(html);
    let options = doc.select("#dict option")?;

    Ok(options
        .iter()
        .filter_map(|option| option.attr("value"))
        .filter_map(DictionaryCode::lookup)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r#"{"result": {"status": true, "message": null}, "id": "jsonrpc"}"#, true, None)]
    #[case(r#"{"result": {"status": false, "message": "Forkert kodeord"}}"#, false, Some("Forkert kodeord"))]
    #[case(r#"{"result": {"message": "Bruger findes ikke"}}"#, false, Some("Bruger findes ikke"))]
    fn test_parse_login_response(#[case] body: &str, #[case] success: bool, #[case] message: Option<&str>) {
        let outcome = parse_login_response(body).unwrap();
        assert_eq!(outcome.success, success);
        assert_eq!(outcome.message.as_deref(), message);
    }

    #[rstest]
    #[case("<html>Fejl</html>")]
    #[case(r#"{"error": "denied"}"#)]
    fn test_malformed_login_response(#[case] body: &str) {
        assert!(matches!(parse_login_response(body), Err(OrdbogError::MalformedResponse(_))));
    }

    #[test]
    fn test_parse_available_dictionaries() {
        let html = r#"<select id="dict">
            <option value="auto">Automatisk</option>
            <option value="a000">Engelsk</option>
            <option value="nope">Ukendt</option>
            <option>Uden kode</option>
        </select>"#;
        let codes: Vec<_> = parse_available_dictionaries(html).unwrap().iter().map(|c| c.as_str()).collect();
        assert_eq!(codes, vec!["auto", "a000"]);
    }

    #[test]
    fn test_builder_adds_trailing_slash() {
        let config = ClientConfig::builder()
            .base_url(Url::parse("http://localhost:8080/ordbog").unwrap())
            .build();
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/ordbog/");
        assert_eq!(
            config.base_url.join(LOOKUP_PATH).unwrap().as_str(),
            "http://localhost:8080/ordbog/opslag.php"
        );
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.fetch.timeout, 30);
        assert_eq!(config.selectors.heading, "h5");
    }
}
