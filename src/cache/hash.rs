use sha2::{Digest, Sha256};

/// Cache key for a visual prompt: SHA-256 hex of the trimmed, lower-cased text.
pub fn prompt_hash(prompt: &str) -> String {
    let normalized = prompt.trim().to_lowercase();
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
