//! Process-wide object store.
//!
//! Written during setup and read (or written) concurrently by any number of
//! dispatch tasks. Values are stored type-erased; typed accessors check the
//! type at the call site.

use super::ObjectError;
use super::dashmap_ext::DashMapExt;
use dashmap::DashMap;
use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

type Object = Arc<dyn Any + Send + Sync>;

/// Concurrency-safe string-keyed store of arbitrary values.
#[derive(Default)]
pub struct ObjectStore {
    objects: DashMap<String, Object>,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set<T>(&self, key: impl Into<String>, value: T)
    where
        T: Any + Send + Sync,
    {
        self.objects.insert(key.into(), Arc::new(value));
    }

    /// Store an already shared value under `key`.
    pub fn set_arc<T>(&self, key: impl Into<String>, value: Arc<T>)
    where
        T: Any + Send + Sync,
    {
        self.objects.insert(key.into(), value);
    }

    /// Typed lookup.
    ///
    /// Fails with [`ObjectError::Missing`] for unknown keys and
    /// [`ObjectError::TypeMismatch`] when the stored value is not a `T`.
    pub fn get<T>(&self, key: &str) -> Result<Arc<T>, ObjectError>
    where
        T: Any + Send + Sync,
    {
        let object = self
            .objects
            .get_cloned(key)
            .ok_or_else(|| ObjectError::Missing {
                key: key.to_string(),
            })?;
        object
            .downcast::<T>()
            .map_err(|_| ObjectError::TypeMismatch {
                key: key.to_string(),
                expected: type_name::<T>(),
            })
    }

    /// Typed lookup that treats both failure modes as absence.
    pub fn try_get<T>(&self, key: &str) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.get(key).ok()
    }

    /// Untyped lookup.
    pub fn get_raw(&self, key: &str) -> Option<Object> {
        self.objects.get_cloned(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }

    /// Remove `key`, returning whether it was present.
    pub fn remove(&self, key: &str) -> bool {
        self.objects.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Snapshot of the stored keys.
    pub fn keys(&self) -> Vec<String> {
        self.objects.keys_cloned()
    }
}

impl fmt::Debug for ObjectStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStore")
            .field("keys", &self.keys())
            .finish()
    }
}
