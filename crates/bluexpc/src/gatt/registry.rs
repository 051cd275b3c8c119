//! Multi-key storage for discovered peripherals and their GATT hierarchy
//!
//! Every discovered object is stored once behind a shared pointer and indexed
//! under several keys (its UUID and one or more handles). A later insert under
//! a key only replaces that key's entry; other keys of the earlier object keep
//! pointing at it.

use super::types::Peripheral;
use crate::uuid::Uuid;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A registry object shared between all of its keys
pub type Shared<T> = Arc<RwLock<T>>;

/// Read-locks a shared object, ignoring poisoning.
pub fn read<T>(shared: &Shared<T>) -> RwLockReadGuard<'_, T> {
    shared.read().unwrap_or_else(PoisonError::into_inner)
}

/// Write-locks a shared object, ignoring poisoning.
pub fn write<T>(shared: &Shared<T>) -> RwLockWriteGuard<'_, T> {
    shared.write().unwrap_or_else(PoisonError::into_inner)
}

/// Objects reachable by UUID and by handle
#[derive(Debug)]
pub struct HandleMap<T> {
    by_uuid: HashMap<String, Shared<T>>,
    by_handle: HashMap<u16, Shared<T>>,
    /// Distinct objects in insertion order
    entries: Vec<Shared<T>>,
}

impl<T> Default for HandleMap<T> {
    fn default() -> Self {
        Self {
            by_uuid: HashMap::new(),
            by_handle: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<T> HandleMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `item` under its UUID and every given handle.
    pub fn insert(&mut self, item: T, uuid: &str, handles: &[u16]) -> Shared<T> {
        let shared = Arc::new(RwLock::new(item));
        self.put(shared.clone(), uuid, handles);
        shared
    }

    /// Stores an already shared object under its UUID and every given handle.
    pub fn put(&mut self, item: Shared<T>, uuid: &str, handles: &[u16]) {
        self.by_uuid.insert(uuid.to_string(), item.clone());
        for &handle in handles {
            self.by_handle.insert(handle, item.clone());
        }
        if !self.entries.iter().any(|e| Arc::ptr_eq(e, &item)) {
            self.entries.push(item);
        }
        let (by_uuid, by_handle) = (&self.by_uuid, &self.by_handle);
        self.entries.retain(|e| {
            by_uuid.values().any(|v| Arc::ptr_eq(v, e))
                || by_handle.values().any(|v| Arc::ptr_eq(v, e))
        });
    }

    pub fn by_uuid(&self, uuid: &str) -> Option<Shared<T>> {
        self.by_uuid.get(uuid).cloned()
    }

    pub fn by_handle(&self, handle: u16) -> Option<Shared<T>> {
        self.by_handle.get(&handle).cloned()
    }

    pub fn contains_handle(&self, handle: u16) -> bool {
        self.by_handle.contains_key(&handle)
    }

    /// Distinct objects reachable under at least one key, in the order they
    /// were first inserted.
    pub fn values(&self) -> impl Iterator<Item = &Shared<T>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Deep copy: each distinct object is copied once and the copy is reachable
/// under exactly the keys the original was.
impl<T: Clone> Clone for HandleMap<T> {
    fn clone(&self) -> Self {
        let mut copies: HashMap<*const RwLock<T>, Shared<T>> = HashMap::new();
        let mut copy_of = |item: &Shared<T>| -> Shared<T> {
            copies
                .entry(Arc::as_ptr(item))
                .or_insert_with(|| Arc::new(RwLock::new(read(item).clone())))
                .clone()
        };

        let entries = self.values().map(&mut copy_of).collect();
        let by_uuid = self
            .by_uuid
            .iter()
            .map(|(k, v)| (k.clone(), copy_of(v)))
            .collect();
        let by_handle = self
            .by_handle
            .iter()
            .map(|(k, v)| (*k, copy_of(v)))
            .collect();

        Self {
            by_uuid,
            by_handle,
            entries,
        }
    }
}

/// Known peripherals, by identifier. Peripherals are never expired.
#[derive(Debug, Default)]
pub struct Registry {
    peripherals: HashMap<Uuid, Peripheral>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the peripheral for `uuid`, creating it if needed. The flag is
    /// `true` when the peripheral already existed.
    pub fn upsert(&mut self, uuid: Uuid) -> (&mut Peripheral, bool) {
        let existed = self.peripherals.contains_key(&uuid);
        let peripheral = self
            .peripherals
            .entry(uuid)
            .or_insert_with(|| Peripheral::new(uuid));
        (peripheral, existed)
    }

    pub fn find(&self, uuid: &Uuid) -> Option<&Peripheral> {
        self.peripherals.get(uuid)
    }

    pub fn find_mut(&mut self, uuid: &Uuid) -> Option<&mut Peripheral> {
        self.peripherals.get_mut(uuid)
    }

    pub fn len(&self) -> usize {
        self.peripherals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peripherals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Peripheral> {
        self.peripherals.values()
    }
}
