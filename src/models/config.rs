//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Settings of the console server and its backend connection.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    /// Base URL of the REST backend, e.g. `http://localhost:8080/api`.
    pub backend_url: String,
    pub templates_dir: String,
    pub secret: String,
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_page_size() -> usize {
    crate::query::DEFAULT_PAGE_SIZE
}

fn default_request_timeout_secs() -> u64 {
    10
}
