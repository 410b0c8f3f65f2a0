//! Credential intake: cookie headers, the on-disk token cache, and resolution
//! of the credentials a client is built from.
//!
//! Credentials come from `NOTEBOOKLM_COOKIES` (plus optional
//! `NOTEBOOKLM_CSRF_TOKEN` / `NOTEBOOKLM_SESSION_ID`) or, failing that, from
//! `{data_path}/auth.json`. Only cookies are mandatory; the CSRF token and
//! session id are derived from the landing page when missing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::NblmError;

pub const AUTH_CACHE_FILE: &str = "auth.json";

pub const ENV_COOKIES: &str = "NOTEBOOKLM_COOKIES";
pub const ENV_CSRF_TOKEN: &str = "NOTEBOOKLM_CSRF_TOKEN";
pub const ENV_SESSION_ID: &str = "NOTEBOOKLM_SESSION_ID";

/// Cookies without which no request authenticates.
pub const REQUIRED_COOKIES: &[&str] = &["SID", "HSID", "SSID", "APISID", "SAPISID"];

/// Cookies kept when saving a pasted header; everything else is tracking noise.
pub const ESSENTIAL_COOKIES: &[&str] = &[
    "SID",
    "HSID",
    "SSID",
    "APISID",
    "SAPISID",
    "__Secure-1PSID",
    "__Secure-3PSID",
    "__Secure-1PAPISID",
    "__Secure-3PAPISID",
    "OSID",
    "__Secure-OSID",
    "__Secure-1PSIDTS",
    "__Secure-3PSIDTS",
    "SIDCC",
    "__Secure-1PSIDCC",
    "__Secure-3PSIDCC",
];

pub type CookieJar = BTreeMap<String, String>;

/// Parse a `name=value; name=value` header. Parts without `=` are ignored.
pub fn parse_cookie_header(header: &str) -> CookieJar {
    header
        .split(';')
        .filter_map(|part| {
            let (name, value) = part.trim().split_once('=')?;
            let name = name.trim();
            (!name.is_empty()).then(|| (name.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Required cookie names absent from `jar`, in canonical order.
pub fn missing_required(jar: &CookieJar) -> Vec<&'static str> {
    REQUIRED_COOKIES
        .iter()
        .copied()
        .filter(|name| !jar.contains_key(*name))
        .collect()
}

pub fn filter_essential(jar: &CookieJar) -> CookieJar {
    jar.iter()
        .filter(|(name, _)| ESSENTIAL_COOKIES.contains(&name.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Render a jar back into a `Cookie` header value.
pub fn cookie_header(jar: &CookieJar) -> String {
    jar.iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Cached credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub cookies: CookieJar,
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub session_id: String,
    pub extracted_at: DateTime<Utc>,
}

/// Outcome of importing a pasted cookie header.
#[derive(Debug, Clone)]
pub struct CookieImport {
    pub tokens: AuthTokens,
    /// Cookies found in the header before filtering.
    pub parsed_count: usize,
}

/// Validate and filter a pasted cookie header into cacheable tokens.
///
/// With `require_all` unset, missing required cookies are logged instead of rejected.
pub fn import_cookie_header(
    header: &str,
    csrf_token: &str,
    session_id: &str,
    require_all: bool,
) -> Result<CookieImport, NblmError> {
    let jar = parse_cookie_header(header);
    if jar.is_empty() {
        return Err(NblmError::Validation(
            "No cookies found. Expected format: SID=xxx; HSID=xxx; SSID=xxx; ...".into(),
        ));
    }

    let missing = missing_required(&jar);
    if !missing.is_empty() {
        if require_all {
            return Err(NblmError::Validation(format!(
                "Missing required cookies: {}",
                missing.join(", ")
            )));
        }
        tracing::warn!(missing = ?missing, "Saving cookies without every required cookie");
    }

    Ok(CookieImport {
        tokens: AuthTokens {
            cookies: filter_essential(&jar),
            csrf_token: csrf_token.to_string(),
            session_id: session_id.to_string(),
            extracted_at: Utc::now(),
        },
        parsed_count: jar.len(),
    })
}

pub fn cache_path(data_path: &Path) -> PathBuf {
    data_path.join(AUTH_CACHE_FILE)
}

/// Load cached tokens. A missing file is `Ok(None)`.
pub fn load_cached_tokens(path: &Path) -> Result<Option<AuthTokens>, NblmError> {
    if !path.exists() {
        return Ok(None);
    }
    let json = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&json)?))
}

pub fn save_tokens(path: &Path, tokens: &AuthTokens) -> Result<(), NblmError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(tokens)?)?;
    tracing::info!(cookies = tokens.cookies.len(), "Saved auth tokens to {}", path.display());
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    Environment,
    Cache,
}

/// Everything needed to build an authenticated client.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub cookies: CookieJar,
    pub csrf_token: String,
    pub session_id: String,
    pub source: CredentialSource,
}

/// Resolve credentials from the environment, falling back to the cache.
pub fn resolve_credentials(data_path: &Path) -> Result<Credentials, NblmError> {
    resolve_credentials_with(data_path, |key| std::env::var(key).ok())
}

pub(crate) fn resolve_credentials_with(
    data_path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Credentials, NblmError> {
    let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
    let csrf_token = non_empty(ENV_CSRF_TOKEN);
    let session_id = non_empty(ENV_SESSION_ID);

    if let Some(header) = non_empty(ENV_COOKIES) {
        return Ok(Credentials {
            cookies: parse_cookie_header(&header),
            csrf_token: csrf_token.unwrap_or_default(),
            session_id: session_id.unwrap_or_default(),
            source: CredentialSource::Environment,
        });
    }

    let path = cache_path(data_path);
    match load_cached_tokens(&path)? {
        Some(cached) => Ok(Credentials {
            cookies: cached.cookies,
            csrf_token: csrf_token.unwrap_or(cached.csrf_token),
            session_id: session_id.unwrap_or(cached.session_id),
            source: CredentialSource::Cache,
        }),
        None => Err(NblmError::MissingAuth(format!(
            "set {ENV_COOKIES} or save cookies with `nblm auth` / the save_auth_tokens tool (cache: {})",
            path.display()
        ))),
    }
}
