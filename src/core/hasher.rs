use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use md5::Md5;
use sha2::{Digest, Sha256};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::HashAlgorithm;
use crate::error::{DiffError, Result};

/// Fingerprint recorded for every directory entry; never a valid hex digest
pub const DIR_SENTINEL: &str = "<dir>";

/// Root-relative, `/`-joined path -> content fingerprint
pub type FingerprintMap = BTreeMap<String, String>;

/// Fingerprints every entry beneath a directory
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryHasher {
    algorithm: HashAlgorithm,
}

impl DirectoryHasher {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Walk `root` and fingerprint everything below it.
    ///
    /// The first I/O error aborts the walk; no partial map is ever returned.
    pub fn hash_dir<P: AsRef<Path>>(&self, root: P) -> Result<FingerprintMap> {
        let root = root.as_ref();
        let metadata = std::fs::metadata(root).map_err(|source| walk_error(root, source))?;
        if !metadata.is_dir() {
            return Err(walk_error(
                root,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
            ));
        }

        self.walk(root, "")
    }

    /// Fingerprint a single reader with the configured digest
    pub fn hash_reader<R: Read>(&self, reader: &mut R) -> std::io::Result<String> {
        match self.algorithm {
            HashAlgorithm::Md5 => {
                let mut hasher = Md5::new();
                std::io::copy(reader, &mut hasher)?;
                Ok(format!("{:x}", hasher.finalize()))
            }
            HashAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                std::io::copy(reader, &mut hasher)?;
                Ok(format!("{:x}", hasher.finalize()))
            }
        }
    }

    fn walk(&self, dir: &Path, prefix: &str) -> Result<FingerprintMap> {
        let mut fingerprints = FingerprintMap::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(dir).to_path_buf();
                DiffError::Walk {
                    path,
                    source: err.into(),
                }
            })?;
            let key = format!("{}{}", prefix, entry.file_name().to_string_lossy());

            if entry.file_type().is_dir() {
                let dir_key = format!("{}/", key);
                debug!(path = %dir_key, "Descending into directory");
                let children = self.walk(entry.path(), &dir_key)?;
                fingerprints.insert(dir_key, DIR_SENTINEL.to_string());
                fingerprints.extend(children);
            } else {
                let mut file = File::open(entry.path()).map_err(|source| walk_error(entry.path(), source))?;
                let digest = self
                    .hash_reader(&mut file)
                    .map_err(|source| walk_error(entry.path(), source))?;
                debug!(path = %key, digest = %digest, "Fingerprinted file");
                fingerprints.insert(key, digest);
            }
        }

        Ok(fingerprints)
    }
}

fn walk_error(path: &Path, source: std::io::Error) -> DiffError {
    DiffError::Walk {
        path: path.to_path_buf(),
        source,
    }
}
