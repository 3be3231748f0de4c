#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    sync::{Arc, Mutex, OnceLock},
    time::Duration,
};

use anyhow::Result;

/// Default number of concurrent oracle calls in flight.
const DEFAULT_ORACLE_CONCURRENCY: usize = 5;

/// Default timeout for a single oracle call, in seconds.
const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 45;

/// OpenAI credentials and optional tuning parameters sourced from the
/// environment.
pub struct OpenAiEnv {
    /// Base URL for the OpenAI-compatible API endpoint.
    api_base:    String,
    /// API key used to authenticate OpenAI requests.
    api_key:     String,
    /// Default model identifier for chat completions.
    model:       String,
    /// Optional temperature override, if provided.
    temperature: Option<f32>,
}

impl OpenAiEnv {
    /// Construct an `OpenAiEnv` from environment variables; returns `None` if
    /// no API key is set. Endpoint and model fall back to sensible defaults.
    fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").ok()?.trim().to_owned();
        if api_key.is_empty() {
            return None;
        }

        let api_base = std::env::var("OPENAI_ENDPOINT")
            .map(|s| s.trim().to_owned())
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let model = std::env::var("OPENAI_MODEL")
            .map(|s| s.trim().to_owned())
            .unwrap_or_else(|_| "gpt-4o".to_string());
        let temperature = std::env::var("OPENAI_TEMPERATURE")
            .ok()
            .and_then(|s| s.parse::<f32>().ok());

        Some(Self {
            api_base,
            api_key,
            model,
            temperature,
        })
    }

    /// Returns the API base URL used for OpenAI requests.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Returns the API key used for OpenAI requests.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the default model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the configured temperature, if any.
    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }
}

/// Runtime configuration shared across the crate.
pub struct ConfigState {
    /// Cached OpenAI configuration, if available.
    openai:             Option<OpenAiEnv>,
    /// Number of oracle calls allowed in flight at once.
    oracle_concurrency: usize,
    /// Timeout applied to each oracle call.
    oracle_timeout:     Duration,
}

impl ConfigState {
    /// Construct a new configuration instance by reading the environment.
    fn new() -> Result<Self> {
        let oracle_concurrency = std::env::var("ASSESSOR_ORACLE_CONCURRENCY")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_ORACLE_CONCURRENCY);

        Ok(Self {
            openai: OpenAiEnv::from_env(),
            oracle_concurrency,
            oracle_timeout: read_timeout_secs(
                "ASSESSOR_ORACLE_TIMEOUT_SECS",
                DEFAULT_ORACLE_TIMEOUT_SECS,
            ),
        })
    }

    /// Returns the OpenAI configuration, if the required environment variables
    /// are present.
    pub fn openai(&self) -> Option<&OpenAiEnv> {
        self.openai.as_ref()
    }

    /// Returns the configured oracle concurrency limit.
    pub fn oracle_concurrency(&self) -> usize {
        self.oracle_concurrency
    }

    /// Returns the configured per-call oracle timeout.
    pub fn oracle_timeout(&self) -> Duration {
        self.oracle_timeout
    }
}

/// Borrowed view of the OpenAI configuration tied to the global config.
pub struct OpenAiRef(ConfigHandle);

impl std::ops::Deref for OpenAiRef {
    type Target = OpenAiEnv;

    fn deref(&self) -> &Self::Target {
        self.0.openai.as_ref().expect("OpenAI config missing")
    }
}

/// Shared configuration handle used throughout the crate.
#[derive(Clone)]
pub struct ConfigHandle(Arc<ConfigState>);

impl std::ops::Deref for ConfigHandle {
    type Target = ConfigState;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Global storage for the lazily constructed configuration state.
static CONFIG_SLOT: OnceLock<Mutex<Option<Arc<ConfigState>>>> = OnceLock::new();

/// Returns the mutex guarding the global configuration slot.
fn slot() -> &'static Mutex<Option<Arc<ConfigState>>> {
    CONFIG_SLOT.get_or_init(|| Mutex::new(None))
}

/// Ensure the global configuration has been initialized and return a handle.
pub fn ensure_initialized() -> Result<ConfigHandle> {
    let slot = slot();
    let mut guard = slot.lock().expect("config slot poisoned");
    if let Some(cfg) = guard.as_ref() {
        return Ok(ConfigHandle(Arc::clone(cfg)));
    }

    let cfg = ConfigState::new().map(Arc::new)?;
    *guard = Some(Arc::clone(&cfg));
    Ok(ConfigHandle(cfg))
}

/// Returns the active configuration, initializing it on demand.
pub fn get() -> ConfigHandle {
    ensure_initialized().expect("configuration initialization failed")
}

/// Returns the configured OpenAI environment, if set.
pub fn openai_config() -> Option<OpenAiRef> {
    let handle = get();
    if handle.openai.is_some() {
        Some(OpenAiRef(handle))
    } else {
        None
    }
}

/// Returns the configured oracle concurrency limit.
pub fn oracle_concurrency() -> usize {
    get().oracle_concurrency()
}

/// Returns the configured per-call oracle timeout.
pub fn oracle_timeout() -> Duration {
    get().oracle_timeout()
}

/// Parses an environment variable into a `Duration`, falling back to
/// `default_secs` when parsing fails or the variable is missing.
fn read_timeout_secs(env: &str, default_secs: u64) -> Duration {
    std::env::var(env)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(default_secs))
}
