use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Clone)]
pub struct MapsConfig {
    /// Geocoding is attempted only when a key is present.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl MapsConfig {
    pub fn disabled() -> Self {
        Self {
            api_key: None,
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    pub fn from_env() -> Self {
        Self {
            api_key: non_empty_env("GOOGLE_MAPS_API_KEY"),
            timeout: http_timeout_from_env(),
        }
    }
}

#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub fn from_env() -> Option<Self> {
        let api_key = non_empty_env("OPENAI_API_KEY")?;
        let model =
            non_empty_env("TRAVELBOT_OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());
        let base_url = non_empty_env("TRAVELBOT_OPENAI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());

        Some(Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(20).max(http_timeout_from_env()),
        })
    }
}

#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    pub maps: MapsConfig,
    pub openai: Option<OpenAiConfig>,
}

impl EnrichmentConfig {
    /// No network collaborators: plain map links and template narratives.
    pub fn offline() -> Self {
        Self {
            maps: MapsConfig::disabled(),
            openai: None,
        }
    }

    pub fn from_env() -> Self {
        Self {
            maps: MapsConfig::from_env(),
            openai: OpenAiConfig::from_env(),
        }
    }
}

impl fmt::Debug for MapsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapsConfig")
            .field("api_key", &redact(self.api_key.as_deref()))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &redact(Some(&self.api_key)))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Debug placeholder for a secret.
pub(crate) fn redact(secret: Option<&str>) -> &'static str {
    match secret {
        Some(_) => "<redacted>",
        None => "<unset>",
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn http_timeout_from_env() -> Duration {
    env::var("TRAVELBOT_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(|secs| Duration::from_secs(secs.clamp(1, 120)))
        .unwrap_or(DEFAULT_HTTP_TIMEOUT)
}
