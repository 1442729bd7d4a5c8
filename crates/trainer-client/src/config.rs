use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("TRAINER_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            timeout: Duration::from_secs(
                env::var("TRAINER_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}
