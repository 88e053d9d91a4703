use std::env;

use crate::api_connection::endpoints::{DEFAULT_API_BASE_URL, DEFAULT_MODEL};

pub const DEFAULT_API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";

/// Runtime settings for the planner, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Name of the variable holding the API key, not the key itself.
    pub api_key_env_var: String,
    pub model: String,
    pub api_base_url: String,
    pub only_providers: Vec<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub site_url: String,
    pub app_name: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            api_key_env_var: DEFAULT_API_KEY_ENV_VAR.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            only_providers: Vec::new(),
            temperature: None,
            max_tokens: None,
            site_url: "http://localhost:3000".to_string(),
            app_name: "KitchenPlanner".to_string(),
        }
    }
}

impl PlannerConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Unparseable numbers fall back to unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let temperature = non_empty("KITCHEN_PLANNER_TEMPERATURE").and_then(|raw| {
            raw.trim().parse::<f32>().ok().or_else(|| {
                tracing::warn!(value = %raw, "ignoring invalid KITCHEN_PLANNER_TEMPERATURE");
                None
            })
        });
        let max_tokens = non_empty("KITCHEN_PLANNER_MAX_TOKENS").and_then(|raw| {
            raw.trim().parse::<u32>().ok().or_else(|| {
                tracing::warn!(value = %raw, "ignoring invalid KITCHEN_PLANNER_MAX_TOKENS");
                None
            })
        });

        Self {
            api_key_env_var: non_empty("KITCHEN_PLANNER_API_KEY_VAR")
                .unwrap_or(defaults.api_key_env_var),
            model: non_empty("KITCHEN_PLANNER_MODEL").unwrap_or(defaults.model),
            api_base_url: non_empty("KITCHEN_PLANNER_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            only_providers: non_empty("KITCHEN_PLANNER_PROVIDERS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            temperature,
            max_tokens,
            site_url: non_empty("SITE_URL").unwrap_or(defaults.site_url),
            app_name: non_empty("APP_NAME").unwrap_or(defaults.app_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = PlannerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.api_key_env_var, "OPENROUTER_API_KEY");
    }

    #[test]
    fn overrides_are_applied_and_trimmed() {
        let config = PlannerConfig::from_lookup(lookup(&[
            ("KITCHEN_PLANNER_MODEL", "openai/gpt-4o-mini"),
            ("KITCHEN_PLANNER_API_URL", "http://127.0.0.1:9000/v1/"),
            ("KITCHEN_PLANNER_PROVIDERS", "Cerebras, , Groq"),
            ("KITCHEN_PLANNER_TEMPERATURE", "0.4"),
            ("KITCHEN_PLANNER_MAX_TOKENS", "4096"),
        ]));
        assert_eq!(config.model, "openai/gpt-4o-mini");
        assert_eq!(config.api_base_url, "http://127.0.0.1:9000/v1");
        assert_eq!(config.only_providers, vec!["Cerebras", "Groq"]);
        assert_eq!(config.temperature, Some(0.4));
        assert_eq!(config.max_tokens, Some(4096));
    }

    #[test]
    fn invalid_numbers_are_ignored() {
        let config = PlannerConfig::from_lookup(lookup(&[
            ("KITCHEN_PLANNER_TEMPERATURE", "warm"),
            ("KITCHEN_PLANNER_MAX_TOKENS", "-1"),
        ]));
        assert_eq!(config.temperature, None);
        assert_eq!(config.max_tokens, None);
    }
}
