// File upload: streams a local file to `/file` as multipart/form-data with
// a `file` part followed by a `recipient` part.

use std::fs::File;
use std::io;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::multipart::{MultipartEncoder, Part};
use crate::session::AuthProvider;
use crate::transport::{Request, Transport};

pub struct FileClient<T> {
    config: ClientConfig,
    transport: T,
}

impl<T: Transport> FileClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        FileClient { config, transport }
    }

    /// Upload the file at `path` to `recipient`. Nothing is sent if the file
    /// cannot be opened. The handle lives inside the request body and is
    /// closed when the body is dropped, whatever the outcome.
    ///
    /// For regular files the content length is taken from the metadata at
    /// open time; a file that changes size mid-upload fails the request.
    /// Other files (devices, pipes) are sent chunked.
    pub fn send_file<A>(&self, auth: &A, recipient: &str, path: impl AsRef<Path>) -> Result<()>
    where
        A: AuthProvider + ?Sized,
    {
        let path = path.as_ref();
        let open_err = |source: io::Error| ClientError::FileOpen {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(open_err)?;
        let metadata = file.metadata().map_err(open_err)?;
        if metadata.is_dir() {
            return Err(open_err(io::Error::other("is a directory")));
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        let len = metadata.is_file().then(|| metadata.len());
        let encoder = MultipartEncoder::new()
            .part(Part::stream("file", file_name.as_str(), file, len))
            .part(Part::text("recipient", recipient));
        let content_type = encoder.content_type();
        let request = Request::post(self.config.file_url())
            .header("Authorization", auth.authorization())
            .header("Content-Type", content_type)
            .body(encoder.finish());

        debug!(recipient, file = %file_name, bytes = ?len, "uploading file");
        let res = self.transport.send(request)?;
        if !res.is_ok() {
            warn!(status = res.status, recipient, "file upload rejected");
            return Err(ClientError::Send { status: res.status });
        }
        info!(recipient, file = %file_name, "file sent");
        Ok(())
    }
}
