use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::foundation::error::{BridgeError, BridgeResult};
use crate::registry::handle::{Handle, Resource, ResourceKind};

type Erased = Arc<dyn Any + Send + Sync>;

struct Entry {
    kind: ResourceKind,
    object: Erased,
}

struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

#[derive(Default)]
struct Slots {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

/// Counters reported by [`Registry::stats`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    /// Entries currently owned.
    pub live: usize,
    /// Slots ever allocated (live + free).
    pub slots: usize,
}

/// Generation-checked arena of type-erased native objects.
///
/// Each entry is stored behind its own `Arc<Mutex<T>>`: resolving clones the `Arc`, so the
/// table lock is held only for the lookup, and a release that races an in-flight call
/// defers destruction until that call drops its [`Shared`].
pub struct Registry {
    max_handles: usize,
    inner: Mutex<Slots>,
}

impl Registry {
    /// Create an empty registry holding at most `max_handles` live entries.
    pub fn new(max_handles: usize) -> Self {
        Self {
            max_handles,
            inner: Mutex::new(Slots::default()),
        }
    }

    fn slots(&self) -> MutexGuard<'_, Slots> {
        // Table updates are single assignments; a poisoned lock still holds a consistent table.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take ownership of `value` and issue a handle for it.
    pub fn register<T: Resource>(&self, value: T) -> BridgeResult<Handle> {
        let object: Erased = Arc::new(Mutex::new(value));
        let mut s = self.slots();
        if s.live >= self.max_handles {
            return Err(BridgeError::allocation(format!(
                "handle limit reached ({} live)",
                s.live
            )));
        }

        let index = match s.free.pop() {
            Some(i) => i,
            None => {
                let i = u32::try_from(s.slots.len())
                    .map_err(|_| BridgeError::allocation("handle index space exhausted"))?;
                s.slots
                    .try_reserve(1)
                    .map_err(|e| BridgeError::allocation(format!("registry slot: {e}")))?;
                s.slots.push(Slot {
                    generation: 0,
                    entry: None,
                });
                i
            }
        };

        let slot = &mut s.slots[index as usize];
        slot.entry = Some(Entry {
            kind: T::KIND,
            object,
        });
        let handle = Handle {
            index,
            generation: slot.generation,
            kind: T::KIND,
        };
        s.live += 1;
        tracing::debug!(%handle, live = s.live, "registered");
        Ok(handle)
    }

    /// Resolve `handle` to a shared, lockable reference to its object.
    ///
    /// Fails with `InvalidHandle` for released or forged tokens and with `TypeMismatch`
    /// when the entry holds a different resource kind than `T`.
    pub fn resolve<T: Resource>(&self, handle: &Handle) -> BridgeResult<Shared<T>> {
        let object = {
            let s = self.slots();
            let entry = s
                .slots
                .get(handle.index as usize)
                .filter(|slot| slot.generation == handle.generation)
                .and_then(|slot| slot.entry.as_ref())
                .filter(|entry| entry.kind == handle.kind)
                .ok_or_else(|| BridgeError::invalid_handle(format!("{handle} is not live")))?;
            if entry.kind != T::KIND {
                return Err(BridgeError::TypeMismatch {
                    expected: T::KIND,
                    found: entry.kind,
                });
            }
            Arc::clone(&entry.object)
        };

        let inner = object.downcast::<Mutex<T>>().map_err(|_| BridgeError::TypeMismatch {
            expected: T::KIND,
            found: handle.kind,
        })?;
        Ok(Shared {
            handle: *handle,
            inner,
        })
    }

    /// Drop the registry's ownership of `handle`.
    ///
    /// Returns `false` (and does nothing) when the handle was already released.
    pub fn release(&self, handle: &Handle) -> bool {
        let mut s = self.slots();
        let Some(slot) = s
            .slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation && slot.entry.is_some())
        else {
            return false;
        };
        // The object itself is dropped here unless a call still holds a `Shared` to it.
        slot.entry = None;
        slot.generation = slot.generation.wrapping_add(1);
        s.free.push(handle.index);
        s.live -= 1;
        tracing::debug!(%handle, live = s.live, "released");
        true
    }

    /// Return `true` while `handle` resolves to a live entry.
    pub fn contains(&self, handle: &Handle) -> bool {
        let s = self.slots();
        s.slots
            .get(handle.index as usize)
            .is_some_and(|slot| slot.generation == handle.generation && slot.entry.is_some())
    }

    /// Snapshot of table occupancy.
    pub fn stats(&self) -> RegistryStats {
        let s = self.slots();
        RegistryStats {
            live: s.live,
            slots: s.slots.len(),
        }
    }
}

/// A resolved registry entry.
///
/// Holding it keeps the object alive; [`Shared::lock`] gives exclusive access for the
/// duration of one operation.
pub struct Shared<T> {
    handle: Handle,
    inner: Arc<Mutex<T>>,
}

impl<T> Shared<T> {
    /// Handle this entry was resolved from.
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Lock the object for exclusive use.
    pub fn lock(&self) -> BridgeResult<MutexGuard<'_, T>> {
        self.inner.lock().map_err(|_| {
            BridgeError::library(format!(
                "{} was poisoned by a panicking operation",
                self.handle
            ))
        })
    }

    /// Return `true` when `self` and `other` refer to the same object.
    pub fn same_object(&self, other: &Shared<T>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/registry/table.rs"]
mod tests;
