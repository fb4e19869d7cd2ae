//! Cache Value Module
//!
//! Defines the immutable byte value stored by the eviction stores.

use std::sync::Arc;

// == Cache Value ==
/// An immutable, cheaply clonable byte value.
///
/// Construction from a borrowed slice copies the bytes, so mutating the
/// caller's original buffer afterwards never changes what the cache holds.
/// The byte length drives capacity accounting in the stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheValue {
    bytes: Arc<[u8]>,
}

impl CacheValue {
    // == Constructor ==
    /// Creates a value by copying the given bytes.
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            bytes: Arc::from(bytes),
        }
    }

    // == Length ==
    /// Returns the byte length of the value.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the value holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    // == Accessors ==
    /// Borrows the underlying bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Copies the bytes out into a fresh buffer.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }
}

impl From<Vec<u8>> for CacheValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::from(bytes),
        }
    }
}

impl From<&str> for CacheValue {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_roundtrip() {
        let value = CacheValue::new(b"630");
        assert_eq!(value.as_bytes(), b"630");
        assert_eq!(value.to_vec(), b"630".to_vec());
        assert_eq!(value.len(), 3);
    }

    #[test]
    fn test_value_defensive_copy() {
        let mut buf = vec![1u8, 2, 3];
        let value = CacheValue::new(&buf);

        // Mutating the source buffer must not change the stored value
        buf[0] = 99;
        assert_eq!(value.as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_value_clone_shares_bytes() {
        let value = CacheValue::new(b"shared");
        let copy = value.clone();
        assert_eq!(value, copy);
        assert_eq!(copy.len(), 6);
    }

    #[test]
    fn test_value_empty() {
        let value = CacheValue::new(b"");
        assert!(value.is_empty());
        assert_eq!(value.len(), 0);
    }
}
