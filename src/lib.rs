// Library root
// -----------
// This crate exposes the protocol layer of the courier client. The binary
// (`main.rs`) wires it to an interactive prompt.
//
// Module responsibilities:
// - `transport`: the `Transport` trait and its reqwest-backed implementation.
// - `session`: the bearer token returned by login.
// - `auth`, `message`, `file`: the three service operations.
// - `multipart`: streaming multipart/form-data encoder used for uploads.
// - `api`: facade bundling the three operations over one transport.
// - `ui`: the terminal flow that calls into `api`.
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod file;
pub mod message;
pub mod multipart;
pub mod session;
pub mod transport;
pub mod ui;

pub use api::ApiClient;
pub use auth::Credentials;
pub use config::ClientConfig;
pub use error::{ClientError, Result, TransportError};
pub use session::{AuthProvider, Session};
