//! 运行配置 - 启动时构造一次，显式传给各阶段

use std::env;
use std::time::Duration;
use thiserror::Error;

pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const BASE_URL_VAR: &str = "JOURNEY_MODEL_BASE_URL";
pub const VISION_MODEL_VAR: &str = "JOURNEY_VISION_MODEL";
pub const TEXT_MODEL_VAR: &str = "JOURNEY_TEXT_MODEL";
pub const TIMEOUT_VAR: &str = "JOURNEY_REQUEST_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro-latest";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set (check your .env file)")]
    MissingApiKey(&'static str),
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Clone)]
pub struct ModelConfig {
    pub api_key: String,
    pub base_url: String,
    pub vision_model: String,
    pub text_model: String,
    /// None 表示不设超时
    pub request_timeout: Option<Duration>,
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("vision_model", &self.vision_model)
            .field("text_model", &self.text_model)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl ModelConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            vision_model: DEFAULT_MODEL.to_string(),
            text_model: DEFAULT_MODEL.to_string(),
            request_timeout: None,
        }
    }

    /// 从进程环境读取（.env 需由调用方先加载）
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let api_key = non_empty(API_KEY_VAR).ok_or(ConfigError::MissingApiKey(API_KEY_VAR))?;
        let mut config = Self::new(api_key);

        if let Some(url) = non_empty(BASE_URL_VAR) {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = non_empty(VISION_MODEL_VAR) {
            config.vision_model = model;
        }
        if let Some(model) = non_empty(TEXT_MODEL_VAR) {
            config.text_model = model;
        }
        if let Some(raw) = non_empty(TIMEOUT_VAR) {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: TIMEOUT_VAR,
                value: raw.clone(),
            })?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }
}
