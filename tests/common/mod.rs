#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};

use courier_cli::transport::{Request, Response, Transport};
use courier_cli::TransportError;

/// A request as seen by a test double, with the body fully read.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Body length announced by the client, if any.
    pub declared_len: Option<u64>,
}

impl Captured {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn boundary(&self) -> String {
        let content_type = self.header("content-type").expect("content-type header");
        content_type
            .split("boundary=")
            .nth(1)
            .expect("boundary parameter")
            .trim()
            .to_string()
    }
}

/// Records every request and answers with scripted responses (200 with an
/// empty body once the script runs out).
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<Captured>>,
    responses: Mutex<VecDeque<Response>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Response::new(status, body.as_bytes().to_vec()));
        self
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    fn send(&self, request: Request) -> Result<Response, TransportError> {
        let declared_len = request.body.as_ref().and_then(|b| b.len());
        let body = match request.body {
            Some(body) => {
                let expected = body.len();
                let bytes = body
                    .into_bytes()
                    .map_err(|e| TransportError::Request(e.to_string()))?;
                if let Some(len) = expected {
                    assert_eq!(len, bytes.len() as u64, "declared body length is wrong");
                }
                bytes
            }
            None => Vec::new(),
        };
        self.requests.lock().unwrap().push(Captured {
            method: request.method.to_string(),
            url: request.url,
            headers: request.headers,
            body,
            declared_len,
        });
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Response::new(200, Vec::new())))
    }
}

/// Always fails, as if the server were unreachable.
pub struct FailingTransport;

impl Transport for FailingTransport {
    fn send(&self, _request: Request) -> Result<Response, TransportError> {
        Err(TransportError::Connect("connection refused".into()))
    }
}

/// One field of a parsed multipart body.
#[derive(Debug)]
pub struct FormPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content: Vec<u8>,
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn quoted_param(headers: &str, key: &str) -> Option<String> {
    let marker = format!("{key}=\"");
    let start = headers.find(&marker)? + marker.len();
    let end = headers[start..].find('"')? + start;
    Some(headers[start..end].to_string())
}

/// Minimal multipart/form-data parser for checking what the client sent.
pub fn parse_multipart(body: &[u8], boundary: &str) -> Vec<FormPart> {
    let opening = format!("--{boundary}\r\n");
    let delimiter = format!("\r\n--{boundary}");
    assert!(body.starts_with(opening.as_bytes()), "body must open with the boundary");
    assert!(
        body.ends_with(format!("\r\n--{boundary}--\r\n").as_bytes()),
        "body must end with the closing boundary"
    );

    let mut parts = Vec::new();
    let mut rest = &body[opening.len()..];
    loop {
        let header_end = find(rest, b"\r\n\r\n").expect("part headers");
        let headers = String::from_utf8_lossy(&rest[..header_end]).into_owned();
        let content_start = header_end + 4;
        let content_len = find(&rest[content_start..], delimiter.as_bytes()).expect("delimiter");
        parts.push(FormPart {
            name: quoted_param(&headers, "name").expect("part name"),
            file_name: quoted_param(&headers, "filename"),
            content: rest[content_start..content_start + content_len].to_vec(),
        });
        rest = &rest[content_start + content_len + delimiter.len()..];
        if rest.starts_with(b"--") {
            break;
        }
        rest = &rest[2..];
    }
    parts
}

/// A one-shot HTTP/1.1 server on an ephemeral port. Accepts `count`
/// connections, answers each with the next scripted response, and returns
/// the captured requests when joined.
pub struct StubServer {
    pub addr: SocketAddr,
    handle: JoinHandle<Vec<Captured>>,
}

impl StubServer {
    pub fn start(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let mut captured = Vec::new();
            for (status, body) in responses {
                let (stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                captured.push(read_request(&mut reader));
                let mut stream = stream;
                write!(
                    stream,
                    "HTTP/1.1 {status} Stub\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                )
                .unwrap();
                stream.flush().unwrap();
            }
            captured
        });
        StubServer { addr, handle }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn join(self) -> Vec<Captured> {
        self.handle.join().unwrap()
    }
}

fn read_request(reader: &mut impl BufRead) -> Captured {
    let mut line = String::new();
    reader.read_line(&mut line).unwrap();
    let mut words = line.split_whitespace();
    let method = words.next().unwrap().to_string();
    let url = words.next().unwrap().to_string();

    let mut headers = Vec::new();
    loop {
        line.clear();
        reader.read_line(&mut line).unwrap();
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            break;
        }
        let (name, value) = trimmed.split_once(':').unwrap();
        headers.push((name.trim().to_string(), value.trim().to_string()));
    }

    let lookup = |name: &str| {
        headers
            .iter()
            .find(|(n, _): &&(String, String)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    };
    let mut body = Vec::new();
    if let Some(len) = lookup("content-length") {
        body.resize(len.parse().unwrap(), 0);
        reader.read_exact(&mut body).unwrap();
    } else if lookup("transfer-encoding").is_some_and(|v| v.eq_ignore_ascii_case("chunked")) {
        loop {
            line.clear();
            reader.read_line(&mut line).unwrap();
            let size = usize::from_str_radix(line.trim(), 16).unwrap();
            let mut chunk = vec![0; size + 2];
            reader.read_exact(&mut chunk).unwrap();
            if size == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..size]);
        }
    }

    let declared_len = lookup("content-length").and_then(|v| v.parse().ok());
    Captured {
        method,
        url,
        headers,
        body,
        declared_len,
    }
}
