/*
 * Responsibility
 * - 環境変数や設定の読み込み (CONTEXT_PATH, service registry, cookie 設定など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Static settings of one cookie kind (session token / warning).
///
/// A blank `path` is kept as `None` and pinned lazily from the context path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSettings {
    pub name: String,
    pub path: Option<String>,
    pub domain: Option<String>,
}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub body_limit_bytes: usize,
    pub request_timeout_seconds: u64,

    // Mount point of the whole router, e.g. "/cas". Empty when mounted at root.
    pub context_path: String,

    pub service_registry_path: PathBuf,
    pub require_service: bool,

    pub tgc_cookie: CookieSettings,
    pub warn_cookie: CookieSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = parse_or("PORT", std::env::var("PORT").ok(), 3000)?;

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let body_limit_bytes: usize =
            parse_or("BODY_LIMIT_BYTES", std::env::var("BODY_LIMIT_BYTES").ok(), 1024 * 1024)?;

        let request_timeout_seconds: u64 = parse_or(
            "REQUEST_TIMEOUT_SECONDS",
            std::env::var("REQUEST_TIMEOUT_SECONDS").ok(),
            30,
        )?;

        let context_path = normalize_context_path(&std::env::var("CONTEXT_PATH").unwrap_or_default())
            .ok_or(ConfigError::Invalid("CONTEXT_PATH"))?;

        let service_registry_path = std::env::var("SERVICE_REGISTRY_PATH")
            .map(PathBuf::from)
            .map_err(|_| ConfigError::Missing("SERVICE_REGISTRY_PATH"))?;

        let require_service = match std::env::var("REQUIRE_SERVICE") {
            Ok(v) => parse_bool(&v).ok_or(ConfigError::Invalid("REQUIRE_SERVICE"))?,
            Err(_) => false,
        };

        let tgc_cookie = cookie_settings("TGC_COOKIE", "TGC");
        let warn_cookie = cookie_settings("WARN_COOKIE", "CASPRIVACY");

        Ok(Self {
            addr,
            app_env,
            body_limit_bytes,
            request_timeout_seconds,
            context_path,
            service_registry_path,
            require_service,
            tgc_cookie,
            warn_cookie,
        })
    }
}

fn cookie_settings(prefix: &str, default_name: &str) -> CookieSettings {
    let var = |suffix: &str| {
        std::env::var(format!("{prefix}_{suffix}"))
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    CookieSettings {
        name: var("NAME").unwrap_or_else(|| default_name.to_string()),
        path: var("PATH"),
        domain: var("DOMAIN"),
    }
}

/// "" and "/" both mean "mounted at root"; otherwise a leading slash is required
/// and trailing slashes are dropped ("/cas/" -> "/cas").
fn normalize_context_path(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Some(String::new());
    }
    if !trimmed.starts_with('/') {
        return None;
    }
    Some(trimmed.to_string())
}

/// Unset or blank -> `default`; set but unparsable -> `Invalid(key)`.
fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid(key)),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
