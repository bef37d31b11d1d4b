//! Content fingerprints with Blake3

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Bytes of the file head that enter the hash
pub const HASH_HEAD_BYTES: u64 = 64 * 1024;

/// Hex characters kept from the digest
const HASH_HEX_LEN: usize = 16;

/// Short content hash of a netlist file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(String);

impl ContentHash {
    /// blake3 over the first 64 KiB plus the decimal file length.
    ///
    /// Unreadable files hash their file name instead.
    pub fn of_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::hash_head(path) {
            Ok(hash) => hash,
            Err(_) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Self::of_bytes(name.as_bytes())
            }
        }
    }

    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self::truncate(blake3::hash(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn hash_head(path: &Path) -> std::io::Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();

        let mut head = Vec::with_capacity(HASH_HEAD_BYTES.min(len) as usize);
        file.take(HASH_HEAD_BYTES).read_to_end(&mut head)?;

        let mut hasher = blake3::Hasher::new();
        hasher.update(&head);
        hasher.update(len.to_string().as_bytes());
        Ok(Self::truncate(hasher.finalize()))
    }

    fn truncate(hash: blake3::Hash) -> Self {
        let hex = hash.to_hex();
        Self(hex.as_str()[..HASH_HEX_LEN].to_string())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
