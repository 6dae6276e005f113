use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://abdelrhman111-trip-priceprediction.hf.space";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base: String,
    pub predict_timeout_seconds: u64,
    pub health_timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            predict_timeout_seconds: 30,
            health_timeout_seconds: 10,
        }
    }
}

impl ClientConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            ..Self::default()
        }
    }

    /// 去掉結尾的斜線後組出完整路徑
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn predict_timeout(&self) -> Duration {
        Duration::from_secs(self.predict_timeout_seconds)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_seconds)
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_base", &self.api_base)?;
        validate_positive_number("timeout", self.predict_timeout_seconds, 1)?;
        validate_positive_number("health_timeout", self.health_timeout_seconds, 1)?;
        Ok(())
    }
}
