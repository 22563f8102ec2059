//! Read-only typed resources shared with widgets.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
};

/// A typed map of values supplied when the `Core` is built, and exposed
/// read-only to widgets through their contexts. Widgets look up shared
/// values such as palettes here rather than through globals.
#[derive(Default)]
pub struct Resources {
    /// Values by type.
    values: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl fmt::Debug for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resources")
            .field("len", &self.values.len())
            .finish()
    }
}

impl Resources {
    /// An empty resource map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value of the same type.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) -> &mut Self {
        self.values.insert(TypeId::of::<T>(), Box::new(value));
        self
    }

    /// Builder form of [`Self::insert`].
    pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.insert(value);
        self
    }

    /// Look up a value by type.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
    }

    /// Is a value of this type present?
    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Scale(u32);

    #[test]
    fn typed() {
        let r = Resources::new().with(Scale(2)).with("label");
        assert_eq!(r.get::<Scale>(), Some(&Scale(2)));
        assert_eq!(r.get::<&str>(), Some(&"label"));
        assert!(!r.contains::<u8>());

        let mut r = r;
        r.insert(Scale(3));
        assert_eq!(r.get::<Scale>(), Some(&Scale(3)));
    }
}
