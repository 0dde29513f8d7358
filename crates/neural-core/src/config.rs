//! Gateway configuration.
//!
//! `GatewayConfig` is an immutable snapshot of environment-derived settings.
//! It is built once at startup and shared read-only by every handler.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::domain::CompletionDefaults;

/// Default HTTP listen port.
pub const DEFAULT_PORT: u16 = 3001;

/// Default downstream llama-server endpoint.
pub const DEFAULT_LLM_ENDPOINT: &str = "http://0.0.0.0:8080";

/// Default model name sent downstream.
pub const DEFAULT_MODEL_NAME: &str = "CodeLlama-7b-Instruct-hf.Q6_K.gguf";

/// Default completion token budget.
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default downstream request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default WebSocket origin allow-list.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Origin sentinel that admits every origin.
pub const ANY_ORIGIN: &str = "*";

/// Deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    /// Human-readable logs, permissive CORS.
    #[default]
    Development,
    /// JSON logs, CORS restricted to the configured origins.
    Production,
}

impl Environment {
    /// Name as written in `ENVIRONMENT`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = std::convert::Infallible;

    /// Anything other than `production` is development.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("production") {
            Ok(Self::Production)
        } else {
            Ok(Self::Development)
        }
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("LLM_ENDPOINT must be an http:// or https:// URL, got {0:?}")]
    InvalidEndpoint(String),

    #[error("REQUEST_TIMEOUT must be at least 1 second")]
    ZeroTimeout,

    #[error("ALLOWED_ORIGINS must list at least one origin")]
    NoAllowedOrigins,
}

/// An environment variable that was set but could not be parsed.
///
/// The default was used instead; the caller decides how to report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFallback {
    pub key: &'static str,
    pub value: String,
}

impl fmt::Display for EnvFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ignoring unparseable {}={:?}, using default", self.key, self.value)
    }
}

/// Immutable gateway configuration.
#[derive(Clone, PartialEq)]
pub struct GatewayConfig {
    // Server
    pub port: u16,
    pub environment: Environment,

    // Downstream LLM
    pub llm_endpoint: String,
    pub model_name: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub request_timeout_secs: u64,

    // Security
    pub api_key: Option<String>,
    pub require_auth: bool,
    pub allowed_origins: Vec<String>,

    // Logging
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            environment: Environment::Development,
            llm_endpoint: DEFAULT_LLM_ENDPOINT.to_string(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            api_key: None,
            require_auth: false,
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl GatewayConfig {
    /// Load from the process environment.
    pub fn from_env() -> (Self, Vec<EnvFallback>) {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> (Self, Vec<EnvFallback>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut env = EnvReader {
            lookup,
            fallbacks: Vec::new(),
        };
        let defaults = Self::default();

        let config = Self {
            port: env.parsed("PORT", defaults.port),
            environment: env.parsed("ENVIRONMENT", defaults.environment),
            llm_endpoint: env
                .string("LLM_ENDPOINT")
                .map_or(defaults.llm_endpoint, |url| {
                    url.trim().trim_end_matches('/').to_string()
                }),
            model_name: env.string("MODEL_NAME").unwrap_or(defaults.model_name),
            max_tokens: env.parsed("MAX_TOKENS", defaults.max_tokens),
            temperature: env.parsed("TEMPERATURE", defaults.temperature),
            request_timeout_secs: env.parsed("REQUEST_TIMEOUT", defaults.request_timeout_secs),
            api_key: env.string("API_KEY"),
            require_auth: env.boolean("REQUIRE_AUTH", defaults.require_auth),
            allowed_origins: env
                .string("ALLOWED_ORIGINS")
                .map_or(defaults.allowed_origins, |raw| split_origins(&raw)),
            log_level: env.string("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_file: env.string("LOG_FILE").map(PathBuf::from),
        };

        (config, env.fallbacks)
    }

    /// Check invariants that would make the gateway unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.llm_endpoint.as_str();
        let has_host = ["http://", "https://"]
            .iter()
            .any(|scheme| endpoint.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()));
        if !has_host {
            return Err(ConfigError::InvalidEndpoint(self.llm_endpoint.clone()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.allowed_origins.is_empty() {
            return Err(ConfigError::NoAllowedOrigins);
        }
        Ok(())
    }

    /// Defaults applied to every forwarded request.
    pub fn completion_defaults(&self) -> CompletionDefaults {
        CompletionDefaults {
            model: self.model_name.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Downstream request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Full URL of the downstream completion endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.llm_endpoint)
    }

    /// Whether the origin list contains the `*` sentinel.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == ANY_ORIGIN)
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("port", &self.port)
            .field("environment", &self.environment.as_str())
            .field("llm_endpoint", &self.llm_endpoint)
            .field("model_name", &self.model_name)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("require_auth", &self.require_auth)
            .field("allowed_origins", &self.allowed_origins)
            .field("log_level", &self.log_level)
            .field("log_file", &self.log_file)
            .finish()
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Accepts `1`, `t`, `true` and `0`, `f`, `false` in lower, upper and title case.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

struct EnvReader<F> {
    lookup: F,
    fallbacks: Vec<EnvFallback>,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|value| !value.is_empty())
    }

    fn parsed<T: FromStr>(&mut self, key: &'static str, default: T) -> T {
        let Some(raw) = self.string(key) else {
            return default;
        };
        match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                self.fallbacks.push(EnvFallback { key, value: raw });
                default
            }
        }
    }

    fn boolean(&mut self, key: &'static str, default: bool) -> bool {
        let Some(raw) = self.string(key) else {
            return default;
        };
        parse_bool(&raw).unwrap_or_else(|| {
            self.fallbacks.push(EnvFallback { key, value: raw });
            default
        })
    }
}
