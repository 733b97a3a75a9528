//! Mapping between guard names and lock file paths.
//!
//! Names are opaque. Every byte outside `[A-Za-z0-9_-]` is percent-encoded so
//! the mapping is injective and the result is a valid file name on every
//! platform (no separators, no leading dots, no reserved characters).

use crate::error::{GuardError, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Extension of named-guard lock files.
pub const LOCK_EXTENSION: &str = "lock";

/// Longest encoded name accepted, leaving room for the extension within
/// common 255-byte file name limits.
pub const MAX_ENCODED_LEN: usize = 200;

/// Encode a guard name into a file stem.
pub fn encode_name(name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(GuardError::InvalidName(
            "guard name must not be empty".to_string(),
        ));
    }

    let mut encoded = String::with_capacity(name.len());
    for byte in name.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            encoded.push(byte as char);
        } else {
            let _ = write!(encoded, "%{:02X}", byte);
        }
    }

    if encoded.len() > MAX_ENCODED_LEN {
        return Err(GuardError::InvalidName(format!(
            "guard name is too long ({} bytes encoded, max {})",
            encoded.len(),
            MAX_ENCODED_LEN
        )));
    }

    Ok(encoded)
}

/// Decode a file stem produced by [`encode_name`].
///
/// Returns `None` for stems that [`encode_name`] could not have produced.
pub fn decode_name(stem: &str) -> Option<String> {
    let bytes = stem.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = stem.get(i + 1..i + 3)?;
                decoded.push(u8::from_str_radix(hex, 16).ok()?);
                i += 3;
            }
            b if b.is_ascii_alphanumeric() || b == b'_' || b == b'-' => {
                decoded.push(b);
                i += 1;
            }
            _ => return None,
        }
    }

    String::from_utf8(decoded).ok()
}

/// Path of the lock file backing the guard `name` inside `lock_dir`.
pub fn lock_path(lock_dir: &Path, name: &str) -> Result<PathBuf> {
    let stem = encode_name(name)?;
    Ok(lock_dir.join(format!("{}.{}", stem, LOCK_EXTENSION)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_are_kept() {
        assert_eq!(encode_name("orders-db_1").unwrap(), "orders-db_1");
    }

    #[test]
    fn separators_and_dots_are_encoded() {
        assert_eq!(encode_name("Global\\app").unwrap(), "Global%5Capp");
        assert_eq!(encode_name("../etc").unwrap(), "%2E%2E%2Fetc");
        assert_eq!(encode_name("a b").unwrap(), "a%20b");
    }

    #[test]
    fn encoding_is_injective_for_lookalikes() {
        let a = encode_name("a%20b").unwrap();
        let b = encode_name("a b").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn decode_reverses_encode() {
        for name in ["simple", "Global\\MyApp", "ünïcödé name", "50%", "x.y.z"] {
            let encoded = encode_name(name).unwrap();
            assert_eq!(decode_name(&encoded).as_deref(), Some(name));
        }
    }

    #[test]
    fn decode_rejects_foreign_stems() {
        assert_eq!(decode_name("has space"), None);
        assert_eq!(decode_name("bad%G1"), None);
        assert_eq!(decode_name("trunc%4"), None);
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = encode_name("").unwrap_err();
        assert!(matches!(err, GuardError::InvalidName(_)));
    }

    #[test]
    fn overlong_name_is_rejected() {
        let name = "x".repeat(MAX_ENCODED_LEN + 1);
        assert!(matches!(
            encode_name(&name),
            Err(GuardError::InvalidName(_))
        ));

        // Encoding expands each byte to three characters.
        let name = "/".repeat(MAX_ENCODED_LEN / 3 + 1);
        assert!(encode_name(&name).is_err());
    }

    #[test]
    fn lock_path_lives_in_lock_dir() {
        let path = lock_path(Path::new("/tmp/locks"), "jobs/nightly").unwrap();
        assert_eq!(path, Path::new("/tmp/locks/jobs%2Fnightly.lock"));
    }
}
