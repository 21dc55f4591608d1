//! Session snapshot for deterministic comparisons

use serde::{Deserialize, Serialize};

/// Complete session state, detached from the live session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub path: Option<String>,
    pub lines: Vec<String>,
    pub dirty: bool,
}

impl SessionSnapshot {
    /// Compute a deterministic hash of the snapshot state
    #[cfg(test)]
    pub fn hash(&self) -> u64 {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();

        if let Some(path) = &self.path {
            hasher.update(path.as_bytes());
        }
        hasher.update(b"\0");

        for line in &self.lines {
            hasher.update(line.as_bytes());
            hasher.update(b"\n");
        }

        hasher.update([self.dirty as u8]);

        let result = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&result[..8]);
        u64::from_le_bytes(bytes)
    }
}
