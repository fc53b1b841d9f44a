//! Service configuration read from `MINDFLOW_*` environment variables.

use std::sync::Arc;

use mindflow_core::env_config::{env_parse_with_default, env_string_with_default};
use mindflow_insights::{DEFAULT_VALIDITY_DAYS, PatternInsightEngine};
use mindflow_llm::{
    ChatBackend, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
    LlmClient,
};

use crate::error::ServiceError;

pub const DEFAULT_RESOURCE_COUNTRY: &str = "US";
pub const DEFAULT_RESOURCE_LANGUAGE: &str = "en";
pub const DEFAULT_INSIGHT_LOOKBACK_DAYS: i64 = 90;

const MAX_TEMPERATURE: f32 = 2.0;

#[derive(Clone)]
pub struct ServiceConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub resource_country: String,
    pub resource_language: String,
    pub insight_lookback_days: i64,
    pub insight_valid_days: i64,
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("resource_country", &self.resource_country)
            .field("resource_language", &self.resource_language)
            .field("insight_lookback_days", &self.insight_lookback_days)
            .field("insight_valid_days", &self.insight_valid_days)
            .finish()
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            resource_country: DEFAULT_RESOURCE_COUNTRY.to_owned(),
            resource_language: DEFAULT_RESOURCE_LANGUAGE.to_owned(),
            insight_lookback_days: DEFAULT_INSIGHT_LOOKBACK_DAYS,
            insight_valid_days: DEFAULT_VALIDITY_DAYS,
        }
    }
}

impl ServiceConfig {
    /// Read every setting from the environment. Bad values log a warning and
    /// fall back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        let api_key = std::env::var("MINDFLOW_API_KEY")
            .ok()
            .map(|k| k.trim().to_owned())
            .filter(|k| !k.is_empty());

        let raw_temperature = env_parse_with_default("MINDFLOW_TEMPERATURE", DEFAULT_TEMPERATURE);
        let temperature = raw_temperature.clamp(0.0, MAX_TEMPERATURE);
        if (temperature - raw_temperature).abs() > f32::EPSILON {
            tracing::warn!(
                original = raw_temperature,
                clamped = temperature,
                "MINDFLOW_TEMPERATURE clamped to [0.0, 2.0]"
            );
        }

        let lookback = env_parse_with_default(
            "MINDFLOW_INSIGHT_LOOKBACK_DAYS",
            DEFAULT_INSIGHT_LOOKBACK_DAYS,
        )
        .max(1);
        let valid_days =
            env_parse_with_default("MINDFLOW_INSIGHT_VALID_DAYS", DEFAULT_VALIDITY_DAYS).max(1);

        Self {
            api_key,
            api_url: env_string_with_default("MINDFLOW_API_URL", DEFAULT_BASE_URL),
            model: env_string_with_default("MINDFLOW_MODEL", DEFAULT_MODEL),
            temperature,
            max_tokens: env_parse_with_default("MINDFLOW_MAX_TOKENS", DEFAULT_MAX_TOKENS).max(1),
            resource_country: env_string_with_default(
                "MINDFLOW_RESOURCE_COUNTRY",
                DEFAULT_RESOURCE_COUNTRY,
            ),
            resource_language: env_string_with_default(
                "MINDFLOW_RESOURCE_LANGUAGE",
                DEFAULT_RESOURCE_LANGUAGE,
            ),
            insight_lookback_days: lookback,
            insight_valid_days: valid_days,
        }
    }

    /// HTTP chat backend, or `None` when no API key is configured.
    ///
    /// # Errors
    /// Returns `ServiceError::Llm` if the HTTP client cannot be built.
    pub fn chat_backend(&self) -> Result<Option<Arc<dyn ChatBackend>>, ServiceError> {
        let Some(key) = self.api_key.clone() else {
            tracing::info!("MINDFLOW_API_KEY not set, chat replies use the fallback text");
            return Ok(None);
        };
        let client = LlmClient::new(key, self.api_url.clone())?.with_model(self.model.clone());
        Ok(Some(Arc::new(client)))
    }

    #[must_use]
    pub fn insight_engine(&self) -> PatternInsightEngine {
        PatternInsightEngine::default().with_validity_days(self.insight_valid_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_backend() {
        let config = ServiceConfig::default();
        assert!(config.chat_backend().unwrap().is_none());
        assert_eq!(config.resource_country, "US");
        assert_eq!(config.insight_lookback_days, 90);
    }

    #[test]
    fn test_backend_built_with_key() {
        let config = ServiceConfig {
            api_key: Some("k".to_owned()),
            model: "custom-model".to_owned(),
            ..ServiceConfig::default()
        };
        let backend = config.chat_backend().unwrap().unwrap();
        assert_eq!(backend.model_id(), "custom-model");
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = ServiceConfig { api_key: Some("secret".to_owned()), ..ServiceConfig::default() };
        assert!(!format!("{config:?}").contains("secret"));
    }
}
