mod canonical;
mod differ;
mod dump;
mod engine;
mod file;
mod golden;
mod hasher;
mod outcome;
mod wire;

pub use canonical::{CanonicalText, Canonicalizer, Input, StructuredText};
pub use differ::{DiffEngine, ACTUAL_LABEL, EXPECTED_LABEL};
pub use dump::{PrettyDebug, StructuralDump};
pub use file::FileRef;
pub use golden::{GoldenFileUpdater, UpdateStatus};
pub use hasher::{DirectoryHasher, FingerprintMap, DIR_SENTINEL};
pub use outcome::DiffResult;
pub use wire::{HttpMessage, MessageKind, WireError};

// Export the main comparator
pub use engine::Comparator;
