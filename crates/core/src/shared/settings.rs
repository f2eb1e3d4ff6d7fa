use std::path::PathBuf;
use std::sync::Arc;

use super::constants::OPENAI_BASE_URL;
use super::openai_client::OpenAiClient;
use super::rate_limiter::{RateLimiter, RateLimits};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseSettings {
    pub url: String,
    pub service_role_key: String,
    pub bucket: String,
}

/// Runtime configuration shared by both pipelines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub ai_enabled: bool,
    pub supabase: Option<SupabaseSettings>,
    pub storage_dir: Option<PathBuf>,
    pub rate_limits: RateLimits,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: OPENAI_BASE_URL.to_string(),
            ai_enabled: false,
            supabase: None,
            storage_dir: None,
            rate_limits: RateLimits::default(),
        }
    }
}

impl Settings {
    /// True when an API key that looks like a real secret key is configured.
    pub fn is_ai_ready(&self) -> bool {
        self.openai_api_key
            .as_deref()
            .map(|key| !key.is_empty() && key.contains("sk-"))
            .unwrap_or(false)
    }

    /// Real AI adapters are wired only when enabled and a key is present;
    /// otherwise the deterministic mocks stand in.
    pub fn use_real_ai(&self) -> bool {
        self.ai_enabled && self.is_ai_ready()
    }

    /// Names of unset keys, for a startup warning.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.openai_api_key.as_deref().map_or(true, str::is_empty) {
            missing.push("OPENAI_API_KEY");
        }
        if self.supabase.is_none() {
            missing.push("SUPABASE_URL");
        }
        missing
    }

    /// Build the shared OpenAI client, or `None` when real AI is not in use.
    pub fn openai_client(&self, limiter: Arc<RateLimiter>) -> Option<OpenAiClient> {
        if !self.use_real_ai() {
            return None;
        }
        let key = self.openai_api_key.as_deref()?;
        Some(OpenAiClient::new(key, &self.openai_base_url, limiter))
    }
}

/// Trim whitespace and one layer of surrounding double quotes, as found in
/// hand-edited environment files. Empty results become `None`.
pub fn clean_value(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed)
        .trim();
    if unquoted.is_empty() {
        None
    } else {
        Some(unquoted.to_string())
    }
}

/// Parse a boolean switch such as `AI_ENABLED`; only `true` (any case) enables it.
pub fn parse_switch(raw: &str) -> bool {
    clean_value(raw)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
