// Login: trades a username/password pair for a `Session`.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::session::Session;
use crate::transport::{Body, Request, Transport};

/// Login request payload.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub struct AuthClient<T> {
    config: ClientConfig,
    transport: T,
}

impl<T: Transport> AuthClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        AuthClient { config, transport }
    }

    /// POST the credentials to `/login` and decode the returned token.
    pub fn login(&self, credentials: &Credentials) -> Result<Session> {
        let payload = serde_json::to_vec(credentials).map_err(ClientError::Encode)?;
        let request = Request::post(self.config.login_url())
            .header("Content-Type", "application/json")
            .body(Body::from_bytes(payload));

        debug!(username = %credentials.username, "logging in");
        let res = self.transport.send(request)?;
        if !res.is_ok() {
            warn!(status = res.status, "login rejected");
            return Err(ClientError::Authentication { status: res.status });
        }

        let session: Session = serde_json::from_slice(&res.body).map_err(ClientError::Decode)?;
        info!(username = %credentials.username, "logged in");
        Ok(session)
    }
}
