//! Per-dispatch extension map.

use super::ObjectError;
use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;

/// String-keyed values private to one dispatch.
///
/// Middleware use it to hand data to later middleware and to the command.
/// Never shared between dispatches, so it needs no synchronization.
#[derive(Default)]
pub struct Extensions {
    values: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set<T>(&mut self, key: impl Into<String>, value: T)
    where
        T: Any + Send + Sync,
    {
        self.values.insert(key.into(), Box::new(value));
    }

    /// Typed lookup.
    pub fn get<T>(&self, key: &str) -> Result<&T, ObjectError>
    where
        T: Any + Send + Sync,
    {
        let value = self.values.get(key).ok_or_else(|| ObjectError::Missing {
            key: key.to_string(),
        })?;
        (**value)
            .downcast_ref::<T>()
            .ok_or_else(|| ObjectError::TypeMismatch {
                key: key.to_string(),
                expected: type_name::<T>(),
            })
    }

    /// Typed mutable lookup.
    pub fn get_mut<T>(&mut self, key: &str) -> Result<&mut T, ObjectError>
    where
        T: Any + Send + Sync,
    {
        let value = self
            .values
            .get_mut(key)
            .ok_or_else(|| ObjectError::Missing {
                key: key.to_string(),
            })?;
        (**value)
            .downcast_mut::<T>()
            .ok_or_else(|| ObjectError::TypeMismatch {
                key: key.to_string(),
                expected: type_name::<T>(),
            })
    }

    /// Typed lookup that treats both failure modes as absence.
    pub fn try_get<T>(&self, key: &str) -> Option<&T>
    where
        T: Any + Send + Sync,
    {
        self.get(key).ok()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Remove `key`, returning whether it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get() {
        let mut ext = Extensions::new();
        ext.set("user.level", 3u8);
        assert_eq!(*ext.get::<u8>("user.level").unwrap(), 3);
        assert!(ext.contains("user.level"));
    }

    #[test]
    fn test_get_mut() {
        let mut ext = Extensions::new();
        ext.set("hits", 0u32);
        *ext.get_mut::<u32>("hits").unwrap() += 2;
        assert_eq!(ext.try_get::<u32>("hits"), Some(&2));
    }

    #[test]
    fn test_mismatch_names_expected_type() {
        let mut ext = Extensions::new();
        ext.set("x", 1i64);
        let err = ext.get::<String>("x").unwrap_err();
        assert!(err.to_string().contains("String"));
        assert!(matches!(
            ext.get::<i64>("y"),
            Err(ObjectError::Missing { .. })
        ));
    }

    #[test]
    fn test_remove() {
        let mut ext = Extensions::new();
        ext.set("k", ());
        assert!(ext.remove("k"));
        assert!(ext.is_empty());
    }
}
