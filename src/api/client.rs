//! Raw HTTP access to the simulation host.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::error::ApiError;

/// Anything that can answer a GET for a path on the simulation host.
#[cfg_attr(test, mockall::automock)]
pub trait DataSource: Send + Sync {
    /// Fetch `path` (including any query string) and return the body text.
    fn get(&self, path: &str) -> Result<String, ApiError>;
}

impl<T: DataSource + ?Sized> DataSource for &T {
    fn get(&self, path: &str) -> Result<String, ApiError> {
        (**self).get(path)
    }
}

/// Blocking reqwest client bound to one host.
pub struct HttpSource {
    client: Client,
    host: String,
}

impl HttpSource {
    pub fn new(host: &str, user_agent: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(timeout)
            .build()
            .map_err(|source| ApiError::Transport {
                path: host.to_string(),
                source,
            })?;
        Ok(Self {
            client,
            host: host.trim_end_matches('/').to_string(),
        })
    }
}

impl DataSource for HttpSource {
    fn get(&self, path: &str) -> Result<String, ApiError> {
        let url = format!("{}{}", self.host, path);
        debug!(%url, "GET");
        let transport = |source: reqwest::Error| ApiError::Transport {
            path: path.to_string(),
            source,
        };
        self.client
            .get(&url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text())
            .map_err(transport)
    }
}
