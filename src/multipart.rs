//! `multipart/form-data` encoding.
//!
//! Parts are written in the order they were added. File content is never
//! buffered: the encoder produces a reader that walks the boundary lines and
//! headers it generated, pulling each part's bytes straight from its source.
//!
//! Layout of the produced body, with `B` the boundary:
//!
//! ```text
//! --B\r\n
//! Content-Disposition: form-data; name="file"; filename="a.txt"\r\n
//! Content-Type: application/octet-stream\r\n
//! \r\n
//! <bytes>\r\n
//! --B\r\n
//! Content-Disposition: form-data; name="recipient"\r\n
//! \r\n
//! bob\r\n
//! --B--\r\n
//! ```

use std::collections::VecDeque;
use std::io::{Cursor, Read};

use uuid::Uuid;

use crate::transport::Body;

const OCTET_STREAM: &str = "application/octet-stream";

/// One named field of the form.
pub struct Part {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    content: Body,
}

impl Part {
    /// Plain text field.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Part {
            name: name.into(),
            file_name: None,
            content_type: None,
            content: Body::from_bytes(value.into().into_bytes()),
        }
    }

    /// File field whose bytes come from `reader`. `len` should be given when
    /// known so the whole body gets a content length.
    pub fn stream(
        name: impl Into<String>,
        file_name: impl Into<String>,
        reader: impl Read + Send + 'static,
        len: Option<u64>,
    ) -> Self {
        Part {
            name: name.into(),
            file_name: Some(file_name.into()),
            content_type: Some(OCTET_STREAM.into()),
            content: Body::from_reader(reader, len),
        }
    }

    fn headers(&self) -> String {
        let mut disposition = format!("form-data; name=\"{}\"", escape_quotes(&self.name));
        if let Some(file_name) = &self.file_name {
            disposition.push_str(&format!("; filename=\"{}\"", escape_quotes(file_name)));
        }
        let mut out = format!("Content-Disposition: {disposition}\r\n");
        if let Some(content_type) = &self.content_type {
            out.push_str(&format!("Content-Type: {content_type}\r\n"));
        }
        out.push_str("\r\n");
        out
    }
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Builds a boundary-delimited body from an ordered list of parts.
pub struct MultipartEncoder {
    boundary: String,
    parts: Vec<Part>,
}

impl Default for MultipartEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartEncoder {
    /// Encoder with a fresh random boundary.
    pub fn new() -> Self {
        Self::with_boundary(Uuid::new_v4().simple().to_string())
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        MultipartEncoder {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Assemble the body. Its length is known only if every part's is.
    pub fn finish(self) -> Body {
        let mut segments = Segments::default();
        let mut total = Some(0u64);

        for (i, part) in self.parts.into_iter().enumerate() {
            let delimiter = if i == 0 {
                format!("--{}\r\n", self.boundary)
            } else {
                format!("\r\n--{}\r\n", self.boundary)
            };
            let head = delimiter + &part.headers();
            total = match (total, part.content.len()) {
                (Some(t), Some(len)) => Some(t + head.len() as u64 + len),
                _ => None,
            };
            segments.push_text(head);
            segments.push(part.content.into_reader());
        }
        let closing = format!("\r\n--{}--\r\n", self.boundary);
        total = total.map(|t| t + closing.len() as u64);
        segments.push_text(closing);

        Body::from_reader(segments, total)
    }
}

/// Reads each queued reader to exhaustion, one after another.
#[derive(Default)]
struct Segments {
    queue: VecDeque<Box<dyn Read + Send>>,
}

impl Segments {
    fn push(&mut self, reader: Box<dyn Read + Send>) {
        self.queue.push_back(reader);
    }

    fn push_text(&mut self, text: String) {
        self.push(Box::new(Cursor::new(text.into_bytes())));
    }
}

impl Read for Segments {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        while let Some(front) = self.queue.front_mut() {
            let n = front.read(buf)?;
            if n > 0 {
                return Ok(n);
            }
            self.queue.pop_front();
        }
        Ok(0)
    }
}
