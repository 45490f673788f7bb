//! Hashed n-tuple storage layout
//!
//! Objects are directoried under hashed prefixes of their id so no single
//! directory grows unbounded: the id is SHA-256 hashed and the object root
//! sits at `{t1}/{t2}/{t3}/{full-digest}` with three 3-character tuples.

use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// Storage root conformance declaration filename
pub const REPOSITORY_NAMASTE: &str = "0=ocfl_1.1";

/// Storage root conformance declaration content
pub const REPOSITORY_NAMASTE_CONTENT: &str = "ocfl_1.1\n";

/// Object root conformance declaration filename
pub const OBJECT_NAMASTE: &str = "0=ocfl_object_1.1";

/// Object root conformance declaration content
pub const OBJECT_NAMASTE_CONTENT: &str = "ocfl_object_1.1\n";

/// Storage root layout descriptor, written once at bootstrap
pub const LAYOUT_DESCRIPTOR: &str = r#"{
  "extension": "0004-hashed-n-tuple-storage-layout",
  "description": "Hashed n-tuple storage layout, sha256, tuple size 3, 3 tuples"
}
"#;

/// Hashed n-tuple layout with the standard parameters
#[derive(Debug, Clone, Copy)]
pub struct HashedNTupleLayout {
    tuple_size: usize,
    tuple_count: usize,
}

impl Default for HashedNTupleLayout {
    fn default() -> Self {
        Self {
            tuple_size: 3,
            tuple_count: 3,
        }
    }
}

impl HashedNTupleLayout {
    /// Relative path of an object root under the storage root
    pub fn object_root(&self, object_id: &str) -> PathBuf {
        let digest = hex::encode(Sha256::digest(object_id.as_bytes()));

        let mut path = PathBuf::new();
        for i in 0..self.tuple_count {
            let start = i * self.tuple_size;
            path.push(&digest[start..start + self.tuple_size]);
        }
        path.push(&digest);
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_root_shape() {
        let layout = HashedNTupleLayout::default();
        let path = layout.object_root("7d44b88c-4199-4bad-97dc-d78268e01398");
        let segments: Vec<_> = path.iter().map(|s| s.to_string_lossy()).collect();

        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0].len(), 3);
        assert_eq!(segments[1].len(), 3);
        assert_eq!(segments[2].len(), 3);
        assert_eq!(segments[3].len(), 64);
        assert!(segments[3].starts_with(&*segments[0]));
        assert!(segments[3][3..].starts_with(&*segments[1]));
    }

    #[test]
    fn test_object_root_deterministic() {
        let layout = HashedNTupleLayout::default();
        let a = layout.object_root("some-object");
        let b = layout.object_root("some-object");
        assert_eq!(a, b);

        let c = layout.object_root("another-object");
        assert_ne!(a, c);
    }
}
