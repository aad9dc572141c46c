use std::fmt;

use http::header::HOST;
use thiserror::Error;

const MAX_HEADERS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Request,
    Response,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Request => "request",
            MessageKind::Response => "response",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum WireError {
    #[error("malformed {kind}: {source}")]
    Malformed {
        kind: MessageKind,
        #[source]
        source: httparse::Error,
    },

    #[error("incomplete {0} head")]
    Incomplete(MessageKind),

    #[error("{kind} is missing its {field}")]
    Missing {
        kind: MessageKind,
        field: &'static str,
    },

    #[error("invalid Content-Length: {0:?}")]
    InvalidContentLength(String),

    #[error("unexpected EOF: body is {actual} bytes, Content-Length declares {declared}")]
    ShortBody { declared: usize, actual: usize },
}

/// An HTTP/1.x message reduced to the parts that get rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpMessage {
    kind: MessageKind,
    start_line: String,
    headers: Vec<(String, Vec<u8>)>,
    body: Vec<u8>,
}

impl HttpMessage {
    pub fn from_request<B: AsRef<[u8]>>(req: &http::Request<B>) -> Self {
        let target = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .filter(|pq| !pq.is_empty())
            .unwrap_or("/");
        let start_line = format!("{} {} {:?}", req.method(), target, req.version());

        let mut headers = Vec::with_capacity(req.headers().len() + 1);
        if !req.headers().contains_key(HOST) {
            if let Some(authority) = req.uri().authority() {
                headers.push(("Host".to_string(), authority.as_str().as_bytes().to_vec()));
            }
        }
        headers.extend(collect_header_map(req.headers()));

        Self {
            kind: MessageKind::Request,
            start_line,
            headers: host_first(headers),
            body: req.body().as_ref().to_vec(),
        }
    }

    pub fn from_response<B: AsRef<[u8]>>(res: &http::Response<B>) -> Self {
        let status = res.status();
        let start_line = status_line(
            &format!("{:?}", res.version()),
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
        );

        Self {
            kind: MessageKind::Response,
            start_line,
            headers: collect_header_map(res.headers()),
            body: res.body().as_ref().to_vec(),
        }
    }

    /// Parse a raw request; bare `\n` line endings are accepted
    pub fn parse_request(raw: &[u8]) -> Result<Self, WireError> {
        let kind = MessageKind::Request;
        let mut storage = [httparse::EMPTY_HEADER; MAX_HEADERS];
        let mut req = httparse::Request::new(&mut storage);

        let head_len = match req.parse(raw) {
            Ok(httparse::Status::Complete(len)) => len,
            Ok(httparse::Status::Partial) => return Err(WireError::Incomplete(kind)),
            Err(source) => return Err(WireError::Malformed { kind, source }),
        };

        let method = req.method.ok_or(WireError::Missing { kind, field: "method" })?;
        let path = req.path.ok_or(WireError::Missing { kind, field: "target" })?;
        let version = req.version.ok_or(WireError::Missing { kind, field: "version" })?;
        let start_line = format!("{} {} HTTP/1.{}", method, path, version);
        let headers = host_first(collect_parsed(req.headers));
        let body = bounded_body(&headers, &raw[head_len..])?;

        Ok(Self {
            kind,
            start_line,
            headers,
            body,
        })
    }

    /// Parse a raw response; bare `\n` line endings are accepted
    pub fn parse_response(raw: &[u8]) -> Result<Self, WireError> {
        let kind = MessageKind::Response;
        let mut storage = [httparse::EMPTY_HEADER; MAX_HEADERS];
        let mut res = httparse::Response::new(&mut storage);

        let head_len = match res.parse(raw) {
            Ok(httparse::Status::Complete(len)) => len,
            Ok(httparse::Status::Partial) => return Err(WireError::Incomplete(kind)),
            Err(source) => return Err(WireError::Malformed { kind, source }),
        };

        let version = res.version.ok_or(WireError::Missing { kind, field: "version" })?;
        let code = res.code.ok_or(WireError::Missing { kind, field: "status code" })?;
        let reason = match res.reason.map(str::trim).filter(|r| !r.is_empty()) {
            Some(reason) => reason.to_string(),
            None => http::StatusCode::from_u16(code)
                .ok()
                .and_then(|status| status.canonical_reason())
                .unwrap_or("")
                .to_string(),
        };
        let start_line = status_line(&format!("HTTP/1.{}", version), code, &reason);
        let headers = collect_parsed(res.headers);
        let body = bounded_body(&headers, &raw[head_len..])?;

        Ok(Self {
            kind,
            start_line,
            headers,
            body,
        })
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn start_line(&self) -> &str {
        &self.start_line
    }

    pub fn headers(&self) -> &[(String, Vec<u8>)] {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Render start line, headers and blank line with CRLF endings, then the body
    pub fn dump(&self, include_body: bool) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.start_line.len() + self.body.len() + 64);
        out.extend_from_slice(self.start_line.as_bytes());
        out.extend_from_slice(b"\r\n");
        for (name, value) in &self.headers {
            out.extend_from_slice(name.as_bytes());
            out.extend_from_slice(b": ");
            out.extend_from_slice(value);
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(b"\r\n");
        if include_body {
            out.extend_from_slice(&self.body);
        }
        out
    }
}

impl<B: AsRef<[u8]>> From<&http::Request<B>> for HttpMessage {
    fn from(req: &http::Request<B>) -> Self {
        Self::from_request(req)
    }
}

impl<B: AsRef<[u8]>> From<&http::Response<B>> for HttpMessage {
    fn from(res: &http::Response<B>) -> Self {
        Self::from_response(res)
    }
}

fn status_line(version: &str, code: u16, reason: &str) -> String {
    if reason.is_empty() {
        format!("{} {:03}", version, code)
    } else {
        format!("{} {:03} {}", version, code, reason)
    }
}

/// `content-type` -> `Content-Type`
fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

fn collect_header_map(map: &http::HeaderMap) -> Vec<(String, Vec<u8>)> {
    map.iter()
        .map(|(name, value)| (canonical_header_name(name.as_str()), value.as_bytes().to_vec()))
        .collect()
}

fn collect_parsed(headers: &[httparse::Header<'_>]) -> Vec<(String, Vec<u8>)> {
    headers
        .iter()
        .map(|header| (canonical_header_name(header.name), trim_whitespace(header.value).to_vec()))
        .collect()
}

fn trim_whitespace(value: &[u8]) -> &[u8] {
    let start = value.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(value.len());
    let end = value.iter().rposition(|b| !b.is_ascii_whitespace()).map_or(start, |i| i + 1);
    &value[start..end]
}

fn host_first(mut headers: Vec<(String, Vec<u8>)>) -> Vec<(String, Vec<u8>)> {
    if let Some(pos) = headers.iter().position(|(name, _)| name == "Host") {
        let host = headers.remove(pos);
        headers.insert(0, host);
    }
    headers
}

fn bounded_body(headers: &[(String, Vec<u8>)], rest: &[u8]) -> Result<Vec<u8>, WireError> {
    let declared = headers
        .iter()
        .find(|(name, _)| name == "Content-Length")
        .map(|(_, value)| {
            std::str::from_utf8(value)
                .ok()
                .and_then(|value| value.parse::<usize>().ok())
                .ok_or_else(|| WireError::InvalidContentLength(String::from_utf8_lossy(value).into_owned()))
        })
        .transpose()?;

    match declared {
        Some(declared) if rest.len() < declared => Err(WireError::ShortBody {
            declared,
            actual: rest.len(),
        }),
        Some(declared) => Ok(rest[..declared].to_vec()),
        None => Ok(rest.to_vec()),
    }
}
