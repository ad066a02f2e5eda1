//! Identifier generation for events and child entities.
//!
//! In production, identifiers come from random v4 UUIDs. In tests, a
//! scripted implementation is injected so that comment and event IDs are
//! known up front.

use uuid::Uuid;

/// Source of fresh identifiers.
pub trait IdGenerator: Send + Sync {
    /// Returns a new, previously unused identifier.
    fn next_id(&self) -> Uuid;
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_ids_are_distinct_v4() {
        let ids = RandomIds;
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert_eq!(a.get_version_num(), 4);
    }
}
