//! Session state: cookies, their persisted store, and the login phase.
//!
//! The client owns one [`SessionState`]. Cookies live in a [`CookieJar`]
//! that is filled from `Set-Cookie` headers and sent back as a single
//! `Cookie` header. A [`CookieStore`] keeps the jar on disk between runs as
//! a flat JSON object of cookie name to value, so a later process can reuse
//! an existing login.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use cookie::Cookie;
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

use crate::fetch::HttpResponse;
use crate::{DictionaryCode, OrdbogError, Result};

/// Where a client is in its login lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Unauthenticated,
    /// A login request is in flight.
    Authenticating,
    Authenticated,
    LoggedOut,
}

/// Cookie name to value mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    cookies: BTreeMap<String, String>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn clear(&mut self) {
        self.cookies.clear();
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.cookies
    }

    /// Value for a `Cookie` request header, `None` when the jar is empty.
    pub fn header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        let pairs: Vec<String> = self
            .cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        Some(pairs.join("; "))
    }

    /// Applies one `Set-Cookie` header value.
    ///
    /// Only the name and value are kept. A cookie that is already expired
    /// (`Max-Age` of zero or less, an `Expires` date in the past, or the
    /// value `deleted`) is removed from the jar.
    pub fn apply_set_cookie(&mut self, header: &str) {
        let cookie = match Cookie::parse(header) {
            Ok(cookie) => cookie,
            Err(e) => {
                warn!(error = %e, "ignoring malformed Set-Cookie header");
                return;
            }
        };
        let name = cookie.name();
        let value = cookie.value().trim_matches('"');

        if value == "deleted" || is_expired(&cookie) {
            self.cookies.remove(name);
        } else {
            self.cookies.insert(name.to_string(), value.to_string());
        }
    }
}

fn is_expired(cookie: &Cookie<'_>) -> bool {
    if let Some(max_age) = cookie.max_age() {
        return max_age <= Duration::ZERO;
    }
    cookie
        .expires_datetime()
        .is_some_and(|expires| expires <= OffsetDateTime::now_utc())
}

impl From<BTreeMap<String, String>> for CookieJar {
    fn from(cookies: BTreeMap<String, String>) -> Self {
        Self { cookies }
    }
}

/// JSON file holding a [`CookieJar`] between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieStore {
    path: PathBuf,
}

impl CookieStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/ordbog/cookies.json`, if the platform has a data directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("ordbog").join("cookies.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored jar. A missing file means no earlier session and yields `None`.
    ///
    /// # Errors
    ///
    /// Returns [`OrdbogError::CookieStoreError`] if the file cannot be read and
    /// [`OrdbogError::JsonError`] if it is not a JSON object of strings.
    pub fn load(&self) -> Result<Option<CookieJar>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(OrdbogError::CookieStoreError { path: self.path.clone(), source }),
        };
        let cookies: BTreeMap<String, String> = serde_json::from_str(&content)?;
        Ok(Some(CookieJar::from(cookies)))
    }

    /// Writes the jar, creating parent directories as needed.
    pub fn save(&self, jar: &CookieJar) -> Result<()> {
        let json = serde_json::to_string(jar.as_map())?;
        let io_err = |source| OrdbogError::CookieStoreError { path: self.path.clone(), source };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&self.path, json).map_err(io_err)
    }
}

/// Authentication context of one client.
///
/// Not synchronized: callers sharing a client across threads must wrap it
/// themselves.
#[derive(Debug, Default)]
pub struct SessionState {
    jar: CookieJar,
    phase: SessionPhase,
    store: Option<CookieStore>,
    available: Vec<DictionaryCode>,
}

impl SessionState {
    /// A session that never touches disk.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session persisted to `store`.
    pub fn with_store(store: CookieStore) -> Self {
        Self { store: Some(store), ..Default::default() }
    }

    pub fn jar(&self) -> &CookieJar {
        &self.jar
    }

    pub fn jar_mut(&mut self) -> &mut CookieJar {
        &mut self.jar
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: SessionPhase) {
        debug!(from = ?self.phase, to = ?phase, "session phase change");
        self.phase = phase;
    }

    pub fn store(&self) -> Option<&CookieStore> {
        self.store.as_ref()
    }

    /// Dictionaries the landing page offered at the last successful check.
    pub fn available(&self) -> &[DictionaryCode] {
        &self.available
    }

    pub fn set_available(&mut self, codes: Vec<DictionaryCode>) {
        self.available = codes;
    }

    pub fn cookie_header(&self) -> Option<String> {
        self.jar.header()
    }

    /// Records the cookies a response set.
    pub fn absorb(&mut self, response: &HttpResponse) {
        for header in &response.set_cookies {
            self.jar.apply_set_cookie(header);
        }
    }

    /// Merges the persisted store into the jar, stored values winning.
    ///
    /// Skipped once the session is authenticated, since the jar then holds
    /// the live session. Cookies only present in memory are kept. An
    /// unreadable store is logged and treated as no earlier session.
    pub fn restore(&mut self) {
        if self.phase == SessionPhase::Authenticated {
            return;
        }
        let Some(store) = &self.store else {
            return;
        };
        match store.load() {
            Ok(Some(stored)) => {
                debug!(cookies = stored.len(), path = %store.path().display(), "restored cookies");
                self.jar.cookies.extend(stored.cookies);
            }
            Ok(None) => debug!(path = %store.path().display(), "no persisted cookies"),
            Err(e) => warn!(error = %e, "ignoring unreadable cookie store"),
        }
    }

    /// Writes the current jar to the store, if one is configured.
    pub fn persist(&self) -> Result<()> {
        match &self.store {
            Some(store) => store.save(&self.jar),
            None => Ok(()),
        }
    }

    /// Forgets cookies and dictionaries held in memory. The store is left alone.
    pub fn clear(&mut self) {
        self.jar.clear();
        self.available.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn test_header_joins_cookies() {
        let mut jar = CookieJar::new();
        assert_eq!(jar.header(), None);

        jar.insert("PHPSESSID", "abc");
        jar.insert("remember", "1");
        assert_eq!(jar.header().as_deref(), Some("PHPSESSID=abc; remember=1"));
    }

    #[rstest]
    #[case("PHPSESSID=abc; path=/; HttpOnly", Some("abc"))]
    #[case("PHPSESSID=\"quoted\"", Some("quoted"))]
    #[case("PHPSESSID=deleted; expires=Thu, 01-Jan-1970 00:00:01 GMT", None)]
    #[case("PHPSESSID=abc; Max-Age=0", None)]
    #[case("PHPSESSID=x; expires=Thu, 01-Jan-1970 00:00:01 GMT; path=/", None)]
    #[case("PHPSESSID=x; Expires=Fri, 31 Dec 9999 23:59:59 GMT", Some("x"))]
    #[case("PHPSESSID=x; Max-Age=3600; Expires=Thu, 01-Jan-1970 00:00:01 GMT", Some("x"))]
    fn test_apply_set_cookie(#[case] header: &str, #[case] expected: Option<&str>) {
        let mut jar = CookieJar::new();
        jar.insert("PHPSESSID", "old");
        jar.apply_set_cookie(header);
        assert_eq!(jar.get("PHPSESSID"), expected);
    }

    #[test]
    fn test_malformed_set_cookie_is_ignored() {
        let mut jar = CookieJar::new();
        jar.apply_set_cookie("no-equals-sign");
        jar.apply_set_cookie("=value");
        assert!(jar.is_empty());
    }

    #[test]
    fn test_store_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let store = CookieStore::new(tmp.path().join("nested").join("cookies.json"));

        let mut jar = CookieJar::new();
        jar.insert("PHPSESSID", "abc");
        store.save(&jar).unwrap();

        assert_eq!(store.load().unwrap(), Some(jar));
        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, r#"{"PHPSESSID":"abc"}"#);
    }

    #[test]
    fn test_restore_merges_store_over_memory() {
        let tmp = TempDir::new().unwrap();
        let store = CookieStore::new(tmp.path().join("cookies.json"));
        let mut persisted = CookieJar::new();
        persisted.insert("PHPSESSID", "disk");
        store.save(&persisted).unwrap();

        let mut fresh = SessionState::with_store(store.clone());
        fresh.restore();
        assert_eq!(fresh.jar().get("PHPSESSID"), Some("disk"));

        let mut anonymous = SessionState::with_store(store);
        anonymous.jar_mut().insert("PHPSESSID", "anon1");
        anonymous.jar_mut().insert("lang", "da");
        anonymous.restore();
        assert_eq!(anonymous.jar().get("PHPSESSID"), Some("disk"));
        assert_eq!(anonymous.jar().get("lang"), Some("da"));
    }

    #[test]
    fn test_restore_leaves_authenticated_jar_alone() {
        let tmp = TempDir::new().unwrap();
        let store = CookieStore::new(tmp.path().join("cookies.json"));
        let mut persisted = CookieJar::new();
        persisted.insert("PHPSESSID", "stale");
        store.save(&persisted).unwrap();

        let mut session = SessionState::with_store(store);
        session.jar_mut().insert("PHPSESSID", "live");
        session.set_phase(SessionPhase::Authenticated);
        session.restore();
        assert_eq!(session.jar().get("PHPSESSID"), Some("live"));
    }

    #[test]
    fn test_missing_store_is_no_session() {
        let tmp = TempDir::new().unwrap();
        let store = CookieStore::new(tmp.path().join("cookies.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_corrupt_store_is_json_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cookies.json");
        fs::write(&path, "not json").unwrap();

        let store = CookieStore::new(&path);
        assert!(matches!(store.load(), Err(OrdbogError::JsonError(_))));

        let mut session = SessionState::with_store(store);
        session.restore();
        assert!(session.jar().is_empty());
    }

    #[test]
    fn test_session_absorb_and_clear() {
        let mut session = SessionState::new();
        let response = HttpResponse {
            set_cookies: vec!["a=1; path=/".to_string(), "b=2".to_string()],
            ..HttpResponse::ok("")
        };
        session.absorb(&response);
        session.set_available(vec![DictionaryCode::auto()]);
        assert_eq!(session.cookie_header().as_deref(), Some("a=1; b=2"));

        session.clear();
        assert!(session.jar().is_empty());
        assert!(session.available().is_empty());
        assert!(session.persist().is_ok());
    }
}
