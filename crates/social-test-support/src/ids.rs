//! Test identifiers — scripted `IdGenerator` implementation for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use social_core::id::IdGenerator;
use uuid::Uuid;

/// An ID generator that hands out a predetermined sequence of IDs, then falls
/// back to random v4 IDs once the sequence is exhausted. Used in tests that
/// need to know comment or event IDs before the command runs.
#[derive(Debug)]
pub struct SequenceIds {
    values: Mutex<VecDeque<Uuid>>,
}

impl SequenceIds {
    /// Create a new `SequenceIds` with the given values.
    #[must_use]
    pub fn new(values: Vec<Uuid>) -> Self {
        Self {
            values: Mutex::new(values.into()),
        }
    }

    /// Number of scripted IDs not yet handed out.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn remaining(&self) -> usize {
        self.values.lock().unwrap().len()
    }
}

impl IdGenerator for SequenceIds {
    fn next_id(&self) -> Uuid {
        self.values
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(Uuid::new_v4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_ids_hand_out_values_in_order_then_random() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let ids = SequenceIds::new(vec![a, b]);

        assert_eq!(ids.next_id(), a);
        assert_eq!(ids.next_id(), b);
        assert_eq!(ids.remaining(), 0);
        let fallback = ids.next_id();
        assert_ne!(fallback, a);
        assert_ne!(fallback, b);
    }
}
