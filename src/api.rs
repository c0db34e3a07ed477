// API facade: owns the configuration and a single transport shared by the
// login, message and file clients. This is the surface the shell talks to.

use std::path::Path;
use std::sync::Arc;

use crate::auth::{AuthClient, Credentials};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::file::FileClient;
use crate::message::MessageClient;
use crate::session::{AuthProvider, Session};
use crate::transport::{HttpTransport, Transport};

/// The three operations of the messaging service behind one value.
pub struct ApiClient<T = HttpTransport> {
    auth: AuthClient<Arc<T>>,
    messages: MessageClient<Arc<T>>,
    files: FileClient<Arc<T>>,
}

impl ApiClient<HttpTransport> {
    /// Client talking HTTP to `config.api_url`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let transport = Arc::new(transport);
        ApiClient {
            auth: AuthClient::new(config.clone(), Arc::clone(&transport)),
            messages: MessageClient::new(config.clone(), Arc::clone(&transport)),
            files: FileClient::new(config, transport),
        }
    }

    pub fn login(&self, credentials: &Credentials) -> Result<Session> {
        self.auth.login(credentials)
    }

    pub fn send_message<A>(&self, auth: &A, recipient: &str, message: &str) -> Result<()>
    where
        A: AuthProvider + ?Sized,
    {
        self.messages.send_message(auth, recipient, message)
    }

    pub fn send_file<A>(&self, auth: &A, recipient: &str, path: impl AsRef<Path>) -> Result<()>
    where
        A: AuthProvider + ?Sized,
    {
        self.files.send_file(auth, recipient, path)
    }
}
