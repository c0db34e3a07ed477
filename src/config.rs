// Client configuration: the base URL of the messaging service and the
// request timeout. Built once by the caller and handed to every client.

use std::time::Duration;

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

pub const LOGIN_ENDPOINT: &str = "/login";
pub const MESSAGE_ENDPOINT: &str = "/message";
pub const FILE_ENDPOINT: &str = "/file";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the service lives and how long a single request may take.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    /// `None` disables the timeout entirely.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_url: DEFAULT_API_URL.into(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        ClientConfig {
            api_url: api_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Join the base URL with an endpoint path such as [`LOGIN_ENDPOINT`].
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), path)
    }

    pub fn login_url(&self) -> String {
        self.endpoint(LOGIN_ENDPOINT)
    }

    pub fn message_url(&self) -> String {
        self.endpoint(MESSAGE_ENDPOINT)
    }

    pub fn file_url(&self) -> String {
        self.endpoint(FILE_ENDPOINT)
    }
}
