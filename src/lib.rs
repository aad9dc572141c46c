//! Normalize heterogeneous test inputs into canonical text, diff them, and
//! regenerate golden fixture files from actual output.
//!
//! ```no_run
//! use golden_diff::{Comparator, FileRef};
//!
//! let cmp = Comparator::new();
//! cmp.text("foo\nbar", "foo\nbar\n").assert_equal();
//!
//! let fixture = FileRef::new("tests/fixtures/report.golden");
//! let result = cmp.golden(&fixture, "rendered report\n").unwrap();
//! result.assert_equal();
//! ```

pub mod config;
pub mod core;
pub mod error;

pub use crate::config::{Config, HashAlgorithm};
pub use crate::core::{
    CanonicalText, Canonicalizer, Comparator, DiffEngine, DiffResult, DirectoryHasher, FileRef,
    FingerprintMap, GoldenFileUpdater, HttpMessage, Input, MessageKind, PrettyDebug,
    StructuralDump, UpdateStatus, DIR_SENTINEL,
};
pub use crate::error::{DiffError, Result, Side};
