use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub record_api_base: String,
    pub record_timeout: Duration,
    pub estimator_url: String,
    pub estimator_api_key: Option<String>,
    pub estimator_model: Option<String>,
    pub estimator_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 8080,
            record_api_base: "http://localhost:8000".to_string(),
            record_timeout: Duration::from_secs(10),
            estimator_url: "https://api.openai.com/v1/chat/completions".to_string(),
            estimator_api_key: None,
            estimator_model: None,
            estimator_timeout: Duration::from_secs(10),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: parsed("PORT").unwrap_or(defaults.port),
            record_api_base: text("RECORD_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.record_api_base),
            record_timeout: parsed("RECORD_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.record_timeout),
            estimator_url: text("ESTIMATOR_URL").unwrap_or(defaults.estimator_url),
            estimator_api_key: text("ESTIMATOR_API_KEY"),
            estimator_model: text("ESTIMATOR_MODEL"),
            estimator_timeout: parsed("ESTIMATOR_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.estimator_timeout),
        }
    }
}

fn text(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    text(key).and_then(|value| value.parse::<T>().ok())
}
