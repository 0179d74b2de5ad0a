//! Error types for scan initialization.

use thiserror::Error;

/// Failures when configuring a bit scan.
///
/// Scan steps themselves never fail; they report exhaustion with `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScanError {
    /// A sparse bitset with no block records cannot seed a scan cursor.
    /// Callers may treat this as end-of-iteration.
    #[error("cannot scan an empty sparse bitset")]
    EmptyScan,

    /// Destructive scans do not support a starting bit; the cleared prefix
    /// would be lost.
    #[error("destructive scans cannot start from a given bit")]
    DestructiveStart,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            ScanError::EmptyScan.to_string(),
            "cannot scan an empty sparse bitset"
        );
        assert_eq!(
            ScanError::DestructiveStart.to_string(),
            "destructive scans cannot start from a given bit"
        );
    }
}
