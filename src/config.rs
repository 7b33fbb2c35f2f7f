use crate::scoring::ScoringFormula;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Presentation-only switches surfaced to the dashboard.
///
/// None of these change the scoring formulas or the fallback policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    pub enable_mock_data: bool,
    pub enable_analytics: bool,
    pub enable_ml_features: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_mock_data: true,
            enable_analytics: true,
            enable_ml_features: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub port: u16,
    pub features: FeatureFlags,
    pub scoring_formula: ScoringFormula,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            port: 3000,
            features: FeatureFlags::default(),
            scoring_formula: ScoringFormula::default(),
        }
    }
}

impl Config {
    /// Builds a config pointing at `api_base_url`, everything else defaulted.
    pub fn with_base_url(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: normalize_base_url(&api_base_url.into()),
            ..Self::default()
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api_base_url = match std::env::var("ETHICSUPPLY_API_URL")
            .or_else(|_| std::env::var("VITE_API_URL"))
            .ok()
            .filter(|s| !s.trim().is_empty())
        {
            Some(url) => validate_base_url(&url)?,
            None => DEFAULT_API_URL.to_string(),
        };

        let timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("REQUEST_TIMEOUT_SECS must be a whole number of seconds"))
            .and_then(|secs| {
                if !(1..=120).contains(&secs) {
                    anyhow::bail!("REQUEST_TIMEOUT_SECS must be between 1 and 120");
                }
                Ok(secs)
            })?;

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?;

        let scoring_formula = match std::env::var("SCORING_FORMULA") {
            Ok(value) => value
                .parse::<ScoringFormula>()
                .map_err(|e| anyhow::anyhow!("SCORING_FORMULA: {}", e))?,
            Err(_) => ScoringFormula::default(),
        };

        let features = FeatureFlags {
            enable_mock_data: env_flag("ENABLE_MOCK_DATA", true),
            enable_analytics: env_flag("ENABLE_ANALYTICS", true),
            enable_ml_features: env_flag("ENABLE_ML_FEATURES", true),
        };

        let config = Self {
            api_base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            port,
            features,
            scoring_formula,
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Backend API URL: {}", config.api_base_url);
        tracing::debug!("Request timeout: {:?}", config.request_timeout);
        tracing::debug!("Scoring formula: {:?}", config.scoring_formula);
        tracing::debug!("Feature flags: {:?}", config.features);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

fn validate_base_url(url: &str) -> anyhow::Result<String> {
    let url = url.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("ETHICSUPPLY_API_URL must start with http:// or https://");
    }
    url::Url::parse(url)
        .map_err(|e| anyhow::anyhow!("ETHICSUPPLY_API_URL is not a valid URL: {}", e))?;
    Ok(normalize_base_url(url))
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(value) => parse_flag(&value).unwrap_or(default),
        Err(_) => default,
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
