use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::session::AuthProvider;
use crate::transport::{Body, Request, Transport};

/// JSON body of a `/message` call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub recipient: String,
    pub message: String,
}

pub struct MessageClient<T> {
    config: ClientConfig,
    transport: T,
}

impl<T: Transport> MessageClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        MessageClient { config, transport }
    }

    /// Send a text message. Re-sending creates a second message server side.
    pub fn send_message<A>(&self, auth: &A, recipient: &str, message: &str) -> Result<()>
    where
        A: AuthProvider + ?Sized,
    {
        let payload = MessagePayload {
            recipient: recipient.into(),
            message: message.into(),
        };
        let body = serde_json::to_vec(&payload).map_err(ClientError::Encode)?;
        let request = Request::post(self.config.message_url())
            .header("Authorization", auth.authorization())
            .header("Content-Type", "application/json")
            .body(Body::from_bytes(body));

        debug!(recipient, "sending message");
        let res = self.transport.send(request)?;
        if !res.is_ok() {
            warn!(status = res.status, recipient, "message rejected");
            return Err(ClientError::Send { status: res.status });
        }
        info!(recipient, "message sent");
        Ok(())
    }
}
