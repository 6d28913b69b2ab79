/*!
 * String Registry
 * String-to-id interning with a synchronous assignment callback
 *
 * One registry per writer; created with the writer and dropped with it,
 * never shared across writers or held as process-global state.
 */

use crate::core::errors::WriterError;
use crate::core::types::StringId;
use ahash::RandomState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU32, Ordering};

/// Collaborator notified when a string receives its id.
///
/// The notification runs inside the assigning call, before the id is
/// returned, so the implementer can place the definition on the wire ahead
/// of any use of the id. The stream writer's registry channel is the
/// intended implementer; callers hold the writer's critical section so that
/// "assign id, emit entry, encode reference" is observed as one step.
pub trait RegistryListener {
    /// Called exactly once per distinct value.
    ///
    /// An error here propagates out of [`StringRegistry::get_or_assign`];
    /// the assignment itself cannot fail.
    fn on_assigned(&mut self, value: &str, id: StringId) -> Result<(), WriterError>;
}

/// Map from string value to a dense, monotonically assigned id.
///
/// Ids start at zero and are never reused or removed. Lookups and inserts
/// are safe under concurrent callers; the listener's effect is not
/// self-synchronizing and relies on the caller's critical section.
pub struct StringRegistry {
    ids: DashMap<String, StringId, RandomState>,
    next_id: AtomicU32,
}

impl StringRegistry {
    pub fn new() -> Self {
        Self {
            ids: DashMap::with_hasher(RandomState::new()),
            next_id: AtomicU32::new(0),
        }
    }

    /// Resolve `value` to its id, assigning the next sequential id on first
    /// sight. A prior assignment is returned with no side effect; a fresh
    /// one invokes `listener` before returning.
    pub fn get_or_assign(
        &self,
        value: &str,
        listener: &mut dyn RegistryListener,
    ) -> Result<StringId, WriterError> {
        // Fast path: the value is already interned.
        if let Some(id) = self.ids.get(value) {
            return Ok(*id);
        }
        match self.ids.entry(value.to_owned()) {
            Entry::Occupied(occupied) => Ok(*occupied.get()),
            Entry::Vacant(vacant) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                vacant.insert(id);
                listener.on_assigned(value, id)?;
                Ok(id)
            }
        }
    }

    /// Number of interned strings.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Default for StringRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every notification for assertions.
    struct Recorder {
        seen: Vec<(String, StringId)>,
    }

    impl Recorder {
        fn new() -> Self {
            Self { seen: Vec::new() }
        }
    }

    impl RegistryListener for Recorder {
        fn on_assigned(&mut self, value: &str, id: StringId) -> Result<(), WriterError> {
            self.seen.push((value.to_owned(), id));
            Ok(())
        }
    }

    #[test]
    fn test_dense_ids_in_assignment_order() {
        let registry = StringRegistry::new();
        let mut recorder = Recorder::new();

        assert_eq!(registry.get_or_assign("alpha", &mut recorder).unwrap(), 0);
        assert_eq!(registry.get_or_assign("beta", &mut recorder).unwrap(), 1);
        assert_eq!(registry.get_or_assign("gamma", &mut recorder).unwrap(), 2);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_repeated_value_has_no_side_effect() {
        let registry = StringRegistry::new();
        let mut recorder = Recorder::new();

        let first = registry.get_or_assign("alpha", &mut recorder).unwrap();
        let second = registry.get_or_assign("alpha", &mut recorder).unwrap();

        assert_eq!(first, second);
        assert_eq!(recorder.seen.len(), 1);
        assert_eq!(recorder.seen[0], ("alpha".to_owned(), 0));
    }

    #[test]
    fn test_listener_runs_before_return() {
        struct AssertsPending<'a> {
            registry: &'a StringRegistry,
        }

        impl RegistryListener for AssertsPending<'_> {
            fn on_assigned(&mut self, value: &str, id: StringId) -> Result<(), WriterError> {
                // The mapping is already stored when the listener runs, so a
                // re-entrant lookup from the same critical section sees it.
                let mut probe = NoopListener;
                assert_eq!(self.registry.get_or_assign(value, &mut probe).unwrap(), id);
                Ok(())
            }
        }

        struct NoopListener;
        impl RegistryListener for NoopListener {
            fn on_assigned(&mut self, _: &str, _: StringId) -> Result<(), WriterError> {
                panic!("value should already be interned");
            }
        }

        let registry = StringRegistry::new();
        let mut listener = AssertsPending { registry: &registry };
        registry.get_or_assign("alpha", &mut listener).unwrap();
    }
}
