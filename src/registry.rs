use alloc::vec::Vec;

use crate::{
    any::{self, TypeInfo},
    utils::thread_safety::{RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety},
};

/// Context-scoped mapping from a component type to its singleton instance.
///
/// The registry is a plain value with registration and lookup as its only
/// operations; ownership, locking and liveness belong to the
/// [`crate::ComponentHost`] that carries it.
#[derive(Default, Clone)]
pub struct ComponentRegistry {
    map: any::Map,
}

impl ComponentRegistry {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { map: any::Map::new() }
    }

    /// Associates an instance with its type, returning the instance
    /// registered before it, if any (last-write-wins).
    #[inline]
    pub fn insert<T: SendSafety + SyncSafety + 'static>(&mut self, value: T) -> Option<RcThreadSafety<T>> {
        self.insert_rc(RcThreadSafety::new(value))
    }

    #[inline]
    pub fn insert_rc<T: SendSafety + SyncSafety + 'static>(&mut self, value: RcThreadSafety<T>) -> Option<RcThreadSafety<T>> {
        self.map.insert(TypeInfo::of::<T>(), value).and_then(|boxed| boxed.downcast().ok())
    }

    /// Returns the exact instance registered for `T`, if any.
    #[must_use]
    pub fn get<T: SendSafety + SyncSafety + 'static>(&self) -> Option<RcThreadSafety<T>> {
        self.map
            .get(&TypeInfo::of::<T>())
            .and_then(|boxed| boxed.clone().downcast().ok())
    }

    /// Removes the binding for `T`, returning the evicted instance.
    pub fn remove<T: SendSafety + SyncSafety + 'static>(&mut self) -> Option<RcThreadSafety<T>> {
        self.map.remove(&TypeInfo::of::<T>()).and_then(|boxed| boxed.downcast().ok())
    }

    #[inline]
    pub fn clear(&mut self) {
        self.map.clear();
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Fully-qualified names of all registered component types, for
    /// diagnostics.
    #[must_use]
    pub fn component_names(&self) -> Vec<&'static str> {
        self.map.keys().map(|type_info| type_info.name).collect()
    }
}

impl ComponentRegistry {
    #[inline]
    pub(crate) fn insert_erased(&mut self, type_info: TypeInfo, value: RcAnyThreadSafety) -> Option<RcAnyThreadSafety> {
        self.map.insert(type_info, value)
    }
}
