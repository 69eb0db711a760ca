//! Invariant checking for graphs, classifiers, and triangulation runs.
//!
//! Every structure that keeps redundant bookkeeping (edge counters, tier
//! membership, clique sequences) implements [`DebugInvariants`]. The checks
//! are cheap enough for tests but are skipped in release builds unless the
//! `strict-invariants` or `check-invariants` feature is enabled.

use crate::error::TriangulationError;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Panic on the first broken invariant when checking is enabled.
    fn debug_assert_invariants(&self);

    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), TriangulationError>;

    /// Convenience wrapper around [`validate_invariants`](Self::validate_invariants).
    fn is_consistent(&self) -> bool {
        self.validate_invariants().is_ok()
    }
}

/// Run a fallible check and panic naming the broken structure when
/// invariant checking is enabled; expands to nothing otherwise.
///
/// The one-argument form names the check by its source text.
#[macro_export]
macro_rules! debug_invariants {
    ($check:expr) => {
        $crate::debug_invariants!($check, stringify!($check))
    };
    ($check:expr, $what:expr) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(err) = $check {
            panic!("[invariants] {} broken: {}", $what, err);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        declared: usize,
        items: Vec<u8>,
    }

    impl DebugInvariants for Counter {
        fn debug_assert_invariants(&self) {
            crate::debug_invariants!(self.validate_invariants(), "Counter");
        }

        fn validate_invariants(&self) -> Result<(), TriangulationError> {
            if self.declared == self.items.len() {
                Ok(())
            } else {
                Err(TriangulationError::InvariantViolation(format!(
                    "declared {} items, holds {}",
                    self.declared,
                    self.items.len()
                )))
            }
        }
    }

    #[test]
    fn consistent_structures_pass() {
        let c = Counter { declared: 2, items: vec![1, 2] };
        assert!(c.is_consistent());
        c.debug_assert_invariants();
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "Counter broken")]
    fn broken_structures_panic_in_debug() {
        let c = Counter { declared: 3, items: vec![] };
        assert!(!c.is_consistent());
        c.debug_assert_invariants();
    }
}
