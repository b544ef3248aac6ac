//! Pluggable identifier generation.

/// Supplier of entity identifiers.
///
/// Contract: each call returns a value strictly greater than the last.
/// Gaps are allowed. One independent supplier exists per entity kind, so
/// graph, vertex and edge id spaces never interact. Single-writer use
/// only; the loader owns its suppliers exclusively.
pub trait IdSupplier {
    fn next_id(&mut self) -> u64;
}

/// Closures work as suppliers, e.g. for deterministic tests.
impl<F: FnMut() -> u64> IdSupplier for F {
    fn next_id(&mut self) -> u64 {
        self()
    }
}

/// Default supplier: 0, 1, 2, ...
#[derive(Debug, Clone, Default)]
pub struct ContinuousId {
    next: u64,
}

impl ContinuousId {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }
}

impl IdSupplier for ContinuousId {
    fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continuous_from_zero() {
        let mut ids = ContinuousId::new();
        assert_eq!(ids.next_id(), 0);
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
    }

    #[test]
    fn test_starting_at() {
        let mut ids = ContinuousId::starting_at(100);
        assert_eq!(ids.next_id(), 100);
        assert_eq!(ids.next_id(), 101);
    }

    #[test]
    fn test_closure_supplier() {
        let mut n = 0u64;
        let mut supplier = move || {
            n += 10;
            n
        };
        assert_eq!(supplier.next_id(), 10);
        assert_eq!(supplier.next_id(), 20);
    }
}
