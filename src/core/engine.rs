// src/core/engine.rs
use std::fmt::Debug;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{Result, Side};
use super::{
    CanonicalText, Canonicalizer, DiffEngine, DiffResult, DirectoryHasher, FileRef,
    FingerprintMap, GoldenFileUpdater, Input, MessageKind, PrettyDebug, StructuralDump,
    StructuredText, UpdateStatus,
};

/// Compares inputs of any supported shape and maintains golden files
///
/// Every collaborator is owned by the comparator, so tests can swap the
/// structural dump renderer or the digest without any global state.
#[derive(Debug, Clone)]
pub struct Comparator<D = PrettyDebug> {
    canonicalizer: Canonicalizer<D>,
    engine: DiffEngine,
    updater: GoldenFileUpdater,
}

impl Comparator<PrettyDebug> {
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_dumper(config, PrettyDebug)
    }

    /// Build a comparator from a config file, or the default locations
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load_or_default(config_path)?;
        debug!("Loaded configuration: {:?}", config);
        Ok(Self::from_config(&config))
    }
}

impl Default for Comparator<PrettyDebug> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: StructuralDump> Comparator<D> {
    pub fn with_dumper(config: &Config, dumper: D) -> Self {
        let hasher = DirectoryHasher::new(config.hashing.algorithm);
        Self {
            canonicalizer: Canonicalizer::with_dumper(config.json.indent, hasher, dumper),
            engine: DiffEngine::new(config.diff.context_lines),
            updater: GoldenFileUpdater::new(config.update_enabled()),
        }
    }

    /// Override update mode
    pub fn with_update(mut self, enabled: bool) -> Self {
        self.updater = GoldenFileUpdater::new(enabled);
        self
    }

    pub fn update_enabled(&self) -> bool {
        self.updater.enabled()
    }

    /// Compare two texts line by line; trailing newlines are insignificant
    pub fn text(&self, expected: impl Into<Input>, actual: impl Into<Input>) -> DiffResult {
        self.run(|| {
            let expected = self.canonicalizer.text(expected.into(), Side::Expected)?;
            let actual = self.canonicalizer.text(actual.into(), Side::Actual)?;
            Ok(self.engine.diff(&expected, &actual))
        })
    }

    /// Compare two line sequences; each element is one line
    pub fn text_lines<S: AsRef<str>>(&self, expected: &[S], actual: &[S]) -> DiffResult {
        self.engine
            .diff(&CanonicalText::from_lines(expected), &CanonicalText::from_lines(actual))
    }

    /// Compare two raw JSON documents
    pub fn json(&self, expected: &[u8], actual: &[u8]) -> DiffResult {
        self.json_input(Input::from(expected), Input::from(actual))
    }

    /// Compare JSON-like inputs: raw bytes, readers, files, values or directories
    pub fn json_input(&self, expected: impl Into<Input>, actual: impl Into<Input>) -> DiffResult {
        self.run(|| {
            let expected = self.canonicalizer.json(expected.into(), Side::Expected)?;
            let actual = self.canonicalizer.json(actual.into(), Side::Actual)?;
            Ok(self.compare_structured(expected, actual))
        })
    }

    /// Compare two serializable values by their JSON encodings
    pub fn as_json<E, A>(&self, expected: &E, actual: &A) -> DiffResult
    where
        E: Serialize + ?Sized,
        A: Serialize + ?Sized,
    {
        let expected = self.canonicalizer.structured(expected);
        let actual = self.canonicalizer.structured(actual);
        self.compare_structured(expected, actual)
    }

    /// Compare with `PartialEq`, diffing structural dumps when unequal
    pub fn interface<T: PartialEq + Debug + ?Sized>(&self, expected: &T, actual: &T) -> DiffResult {
        if expected == actual {
            return DiffResult::Equal;
        }
        self.engine
            .diff(&self.canonicalizer.dump(expected), &self.canonicalizer.dump(actual))
    }

    /// Compare two HTTP requests, typed or raw
    pub fn http_request(&self, expected: impl Into<Input>, actual: impl Into<Input>) -> DiffResult {
        self.compare_http(expected.into(), actual.into(), MessageKind::Request)
    }

    /// Compare two HTTP responses, typed or raw
    pub fn http_response(&self, expected: impl Into<Input>, actual: impl Into<Input>) -> DiffResult {
        self.compare_http(expected.into(), actual.into(), MessageKind::Response)
    }

    /// Fingerprint every entry beneath `dir`
    pub fn hash_dir<P: AsRef<Path>>(&self, dir: P) -> Result<FingerprintMap> {
        self.canonicalizer.hasher().hash_dir(dir)
    }

    /// Compare the fingerprints of everything beneath `dir` against `expected`
    pub fn dir_checksum<P: AsRef<Path>>(&self, expected: &FingerprintMap, dir: P) -> DiffResult {
        match self.hash_dir(dir) {
            Ok(actual) => self.interface(expected, &actual),
            Err(e) => e.into(),
        }
    }

    /// Rewrite `fixture` from `actual` when update mode is on and `last` differed
    pub fn update(&self, fixture: &FileRef, actual: &str, last: &DiffResult) -> Result<UpdateStatus> {
        self.updater.update(fixture, actual, last)
    }

    /// Compare a fixture file against actual text and regenerate it if allowed.
    ///
    /// A missing fixture counts as a difference in update mode. The returned
    /// result describes the comparison made before any rewrite; `Err` is only
    /// returned when the rewrite itself fails.
    pub fn golden(&self, fixture: &FileRef, actual: &str) -> Result<DiffResult> {
        self.golden_with(fixture, actual, |cmp, expected, actual| cmp.text(expected, actual))
    }

    /// Like [`Comparator::golden`], with the comparison mode supplied by the caller
    pub fn golden_with<F>(&self, fixture: &FileRef, actual: &str, compare: F) -> Result<DiffResult>
    where
        F: FnOnce(&Self, Input, Input) -> DiffResult,
    {
        let result = if self.updater.enabled() && !fixture.exists() {
            debug!(path = %fixture.path().display(), "Fixture missing, treating as empty");
            self.engine
                .diff(&CanonicalText::default(), &CanonicalText::from_text(actual))
        } else {
            compare(self, Input::File(fixture.clone()), Input::from(actual))
        };

        self.updater.update(fixture, actual, &result)?;
        Ok(result)
    }

    fn compare_http(&self, expected: Input, actual: Input, kind: MessageKind) -> DiffResult {
        self.run(|| {
            let expected = self.canonicalizer.http(expected, Side::Expected, kind)?;
            let actual = self.canonicalizer.http(actual, Side::Actual, kind)?;
            Ok(self.engine.diff(&expected, &actual))
        })
    }

    fn compare_structured(&self, expected: StructuredText, actual: StructuredText) -> DiffResult {
        if let (Some(e), Some(a)) = (&expected.value, &actual.value) {
            if json_equal(e, a) {
                return DiffResult::Equal;
            }
        }
        self.engine.diff(&expected.canonical(), &actual.canonical())
    }

    fn run<F: FnOnce() -> Result<DiffResult>>(&self, compare: F) -> DiffResult {
        compare().unwrap_or_else(DiffResult::from)
    }
}

/// Deep equality where numbers compare by value, so `1` and `1.0` match
fn json_equal(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Number(e), Value::Number(a)) => match (e.as_i64(), a.as_i64()) {
            (Some(e), Some(a)) => e == a,
            _ => match (e.as_u64(), a.as_u64()) {
                (Some(e), Some(a)) => e == a,
                _ => e.as_f64() == a.as_f64(),
            },
        },
        (Value::Array(e), Value::Array(a)) => {
            e.len() == a.len() && e.iter().zip(a).all(|(e, a)| json_equal(e, a))
        }
        (Value::Object(e), Value::Object(a)) => {
            e.len() == a.len()
                && e.iter()
                    .all(|(key, e)| a.get(key).map_or(false, |a| json_equal(e, a)))
        }
        (e, a) => e == a,
    }
}
