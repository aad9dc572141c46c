use std::fmt;
use std::io::Read;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{DiffError, Result, Side};
use super::dump::{PrettyDebug, StructuralDump};
use super::file::FileRef;
use super::hasher::DirectoryHasher;
use super::wire::{HttpMessage, MessageKind};

/// Lines that each end in exactly one `\n`.
///
/// Lines are raw bytes; content is never decoded before comparison.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanonicalText {
    lines: Vec<Vec<u8>>,
}

impl CanonicalText {
    /// Normalize each element to end in exactly one newline
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        Self {
            lines: lines
                .iter()
                .map(|line| terminated(line.as_ref().trim_end_matches('\n').as_bytes()))
                .collect(),
        }
    }

    /// Split after every newline; a single trailing newline is insignificant
    pub fn from_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// Same rule as [`CanonicalText::from_text`], byte for byte
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
        Self {
            lines: bytes.split(|b| *b == b'\n').map(terminated).collect(),
        }
    }

    pub fn lines(&self) -> &[Vec<u8>] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.lines.concat()
    }

    /// Lossy rendering for display
    pub fn to_text(&self) -> String {
        String::from_utf8_lossy(&self.to_bytes()).into_owned()
    }
}

fn terminated(line: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(line.len() + 1);
    out.extend_from_slice(line);
    out.push(b'\n');
    out
}

/// One side of a comparison
pub enum Input {
    Text(String),
    Lines(Vec<String>),
    /// Raw bytes; JSON or wire-format depending on the comparison
    Bytes(Vec<u8>),
    /// Consumed at most once
    Reader(Box<dyn Read>),
    Json(Value),
    /// `None` renders as empty text
    Http(Option<HttpMessage>),
    File(FileRef),
    Dir(PathBuf),
}

impl Input {
    pub fn reader<R: Read + 'static>(reader: R) -> Self {
        Input::Reader(Box::new(reader))
    }

    pub fn file<P: Into<PathBuf>>(path: P) -> Self {
        Input::File(FileRef::new(path))
    }

    pub fn dir<P: Into<PathBuf>>(path: P) -> Self {
        Input::Dir(path.into())
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Input::Text(_) => "text",
            Input::Lines(_) => "lines",
            Input::Bytes(_) => "bytes",
            Input::Reader(_) => "reader",
            Input::Json(_) => "json value",
            Input::Http(_) => "http message",
            Input::File(_) => "file",
            Input::Dir(_) => "directory",
        }
    }
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Input::Lines(lines) => f.debug_tuple("Lines").field(lines).finish(),
            Input::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Input::Reader(_) => f.write_str("Reader(..)"),
            Input::Json(value) => f.debug_tuple("Json").field(value).finish(),
            Input::Http(message) => f.debug_tuple("Http").field(message).finish(),
            Input::File(file) => f.debug_tuple("File").field(&file.path()).finish(),
            Input::Dir(path) => f.debug_tuple("Dir").field(path).finish(),
        }
    }
}

impl From<&str> for Input {
    fn from(text: &str) -> Self {
        Input::Text(text.to_string())
    }
}

impl From<String> for Input {
    fn from(text: String) -> Self {
        Input::Text(text)
    }
}

impl From<Vec<String>> for Input {
    fn from(lines: Vec<String>) -> Self {
        Input::Lines(lines)
    }
}

impl From<&[u8]> for Input {
    fn from(bytes: &[u8]) -> Self {
        Input::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Input {
    fn from(bytes: Vec<u8>) -> Self {
        Input::Bytes(bytes)
    }
}

impl From<Value> for Input {
    fn from(value: Value) -> Self {
        Input::Json(value)
    }
}

impl From<FileRef> for Input {
    fn from(file: FileRef) -> Self {
        Input::File(file)
    }
}

impl From<HttpMessage> for Input {
    fn from(message: HttpMessage) -> Self {
        Input::Http(Some(message))
    }
}

impl From<Option<HttpMessage>> for Input {
    fn from(message: Option<HttpMessage>) -> Self {
        Input::Http(message)
    }
}

impl<B: AsRef<[u8]>> From<http::Request<B>> for Input {
    fn from(req: http::Request<B>) -> Self {
        Input::Http(Some(HttpMessage::from_request(&req)))
    }
}

impl<B: AsRef<[u8]>> From<http::Response<B>> for Input {
    fn from(res: http::Response<B>) -> Self {
        Input::Http(Some(HttpMessage::from_response(&res)))
    }
}

/// A structured side: its canonical encoding and, when it parsed, its value
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredText {
    pub encoded: Vec<u8>,
    pub value: Option<Value>,
}

impl StructuredText {
    pub fn canonical(&self) -> CanonicalText {
        CanonicalText::from_bytes(&self.encoded)
    }
}

/// Turns comparison inputs into canonical text
#[derive(Debug, Clone)]
pub struct Canonicalizer<D = PrettyDebug> {
    json_indent: usize,
    hasher: DirectoryHasher,
    dumper: D,
}

impl Canonicalizer<PrettyDebug> {
    pub fn new(json_indent: usize, hasher: DirectoryHasher) -> Self {
        Self::with_dumper(json_indent, hasher, PrettyDebug)
    }
}

impl Default for Canonicalizer<PrettyDebug> {
    fn default() -> Self {
        Self::new(4, DirectoryHasher::default())
    }
}

impl<D: StructuralDump> Canonicalizer<D> {
    pub fn with_dumper(json_indent: usize, hasher: DirectoryHasher, dumper: D) -> Self {
        Self {
            json_indent,
            hasher,
            dumper,
        }
    }

    pub fn hasher(&self) -> &DirectoryHasher {
        &self.hasher
    }

    /// Canonicalize a text-like input
    pub fn text(&self, input: Input, side: Side) -> Result<CanonicalText> {
        match input {
            Input::Text(text) => Ok(CanonicalText::from_text(&text)),
            Input::Lines(lines) => Ok(CanonicalText::from_lines(&lines)),
            Input::Bytes(bytes) => Ok(CanonicalText::from_bytes(&bytes)),
            Input::Reader(reader) => Ok(CanonicalText::from_bytes(&read_stream(reader, side)?)),
            Input::File(file) => Ok(CanonicalText::from_bytes(&read_file(&file, side)?)),
            Input::Json(value) => Ok(self.structured(&value).canonical()),
            Input::Http(message) => {
                let dump = message.map(|m| m.dump(true)).unwrap_or_default();
                Ok(CanonicalText::from_bytes(&dump))
            }
            other => Err(unsupported(side, "text", &other)),
        }
    }

    /// Canonicalize a JSON-like input, keeping the parsed value for deep equality
    pub fn json(&self, input: Input, side: Side) -> Result<StructuredText> {
        match input {
            Input::Text(text) => Ok(self.structured_bytes(text.as_bytes())),
            Input::Bytes(bytes) => Ok(self.structured_bytes(&bytes)),
            Input::Reader(reader) => Ok(self.structured_bytes(&read_stream(reader, side)?)),
            Input::File(file) => Ok(self.structured_bytes(&read_file(&file, side)?)),
            Input::Json(value) => Ok(self.structured(&value)),
            Input::Dir(path) => {
                let fingerprints = self.hasher.hash_dir(&path)?;
                Ok(self.structured(&fingerprints))
            }
            other => Err(unsupported(side, "json", &other)),
        }
    }

    /// Canonicalize an HTTP message, parsing raw inputs first
    pub fn http(&self, input: Input, side: Side, kind: MessageKind) -> Result<CanonicalText> {
        let message = match input {
            Input::Http(None) => return Ok(CanonicalText::from_text("")),
            Input::Http(Some(message)) if message.kind() == kind => message,
            Input::Http(Some(message)) => {
                return Err(DiffError::Unsupported {
                    side,
                    mode: kind.as_str(),
                    variant: message.kind().as_str(),
                })
            }
            Input::Text(text) => parse_message(text.as_bytes(), side, kind)?,
            Input::Bytes(bytes) => parse_message(&bytes, side, kind)?,
            Input::Reader(reader) => parse_message(&read_stream(reader, side)?, side, kind)?,
            Input::File(file) => parse_message(&read_file(&file, side)?, side, kind)?,
            other => return Err(unsupported(side, kind.as_str(), &other)),
        };

        Ok(CanonicalText::from_bytes(&message.dump(true)))
    }

    /// Encode a serializable value with sorted keys and fixed indentation.
    ///
    /// Encode failures leave the side empty so a diff can still be shown.
    pub fn structured<T: Serialize + ?Sized>(&self, value: &T) -> StructuredText {
        match self.encode(value) {
            Ok(encoded) => {
                let value = serde_json::from_slice(&encoded).ok();
                StructuredText { encoded, value }
            }
            Err(e) => {
                warn!("Failed to encode value as JSON, comparing as empty: {}", e);
                StructuredText {
                    encoded: Vec::new(),
                    value: None,
                }
            }
        }
    }

    /// Parse raw JSON and re-encode it; unparseable input stays opaque text
    pub fn structured_bytes(&self, raw: &[u8]) -> StructuredText {
        match serde_json::from_slice::<Value>(raw) {
            Ok(value) => self.structured(&value),
            Err(e) => {
                debug!("Input is not JSON, comparing raw text: {}", e);
                StructuredText {
                    encoded: raw.to_vec(),
                    value: None,
                }
            }
        }
    }

    /// Render a value through the structural dump collaborator
    pub fn dump<T: fmt::Debug + ?Sized>(&self, value: &T) -> CanonicalText {
        CanonicalText::from_text(&self.dumper.dump(value))
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        let value = serde_json::to_value(value)?;
        let indent = " ".repeat(self.json_indent);
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
        value.serialize(&mut serializer)?;
        Ok(buf)
    }
}

fn unsupported(side: Side, mode: &'static str, input: &Input) -> DiffError {
    DiffError::Unsupported {
        side,
        mode,
        variant: input.variant_name(),
    }
}

fn read_stream(mut reader: Box<dyn Read>, side: Side) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|source| DiffError::Stream { side, source })?;
    Ok(bytes)
}

fn read_file(file: &FileRef, side: Side) -> Result<Vec<u8>> {
    file.read().map_err(|source| DiffError::Read {
        side,
        path: file.path().to_path_buf(),
        source,
    })
}

fn parse_message(raw: &[u8], side: Side, kind: MessageKind) -> Result<HttpMessage> {
    let parsed = match kind {
        MessageKind::Request => HttpMessage::parse_request(raw),
        MessageKind::Response => HttpMessage::parse_response(raw),
    };
    parsed.map_err(|e| DiffError::Wire {
        side,
        kind: kind.as_str(),
        message: e.to_string(),
    })
}
