// Transport module: the only place that touches the network. Clients build
// a `Request`, hand it to a `Transport`, and get back the status code and
// the body bytes. Keeping this behind a trait lets tests swap in a recorder.

use std::io::{Cursor, Read};
use std::sync::Arc;

use reqwest::blocking::Client;
pub use reqwest::Method;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Result, TransportError};

/// A request body: any reader plus its length when known up front.
pub struct Body {
    reader: Box<dyn Read + Send>,
    len: Option<u64>,
}

impl Body {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let len = bytes.len() as u64;
        Body {
            reader: Box::new(Cursor::new(bytes)),
            len: Some(len),
        }
    }

    pub fn from_reader(reader: impl Read + Send + 'static, len: Option<u64>) -> Self {
        Body {
            reader: Box::new(reader),
            len,
        }
    }

    pub fn len(&self) -> Option<u64> {
        self.len
    }

    pub fn into_reader(self) -> Box<dyn Read + Send> {
        self.reader
    }

    /// Drain the whole body into memory.
    pub fn into_bytes(self) -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.len.unwrap_or(0) as usize);
        self.into_reader().read_to_end(&mut buf)?;
        Ok(buf)
    }

    fn into_blocking(self) -> reqwest::blocking::Body {
        match self.len {
            Some(len) => reqwest::blocking::Body::sized(self.reader, len),
            None => reqwest::blocking::Body::new(self.reader),
        }
    }
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Body").field("len", &self.len).finish_non_exhaustive()
    }
}

/// Everything needed to issue one HTTP call.
#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Body>,
}

impl Request {
    pub fn post(url: impl Into<String>) -> Self {
        Request {
            method: Method::POST,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status code and body of a completed call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Response {
            status,
            body: body.into(),
        }
    }

    /// 200 is the only status treated as success.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Anything able to carry a `Request` to the server.
pub trait Transport {
    fn send(&self, request: Request) -> std::result::Result<Response, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: Request) -> std::result::Result<Response, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: Request) -> std::result::Result<Response, TransportError> {
        (**self).send(request)
    }
}

/// Production transport backed by a reqwest blocking client.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(TransportError::from)?;
        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: Request) -> std::result::Result<Response, TransportError> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let mut req = self.client.request(request.method, &request.url);
        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            req = req.body(body.into_blocking());
        }

        let res = req.send()?;
        let status = res.status().as_u16();
        let body = res.bytes()?.to_vec();
        debug!(status, bytes = body.len(), "response received");
        Ok(Response { status, body })
    }
}
