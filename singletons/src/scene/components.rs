//! Type-erased component storage for a single object.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
};

use crate::component::Component;

/// The components attached to one object, keyed by type. Each component type can be attached
/// at most once.
#[derive(Default)]
pub struct Components {
    data: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Components {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a component, returning it back if one of the same type is already attached.
    pub fn insert<C: Component>(&mut self, value: C) -> Result<(), C> {
        if self.contains::<C>() {
            return Err(value);
        }
        self.data.insert(TypeId::of::<C>(), Box::new(value));
        Ok(())
    }

    #[inline]
    pub fn get<C: Component>(&self) -> Option<&C> {
        self.data
            .get(&TypeId::of::<C>())
            .and_then(|stored| stored.downcast_ref::<C>())
    }

    #[inline]
    pub fn get_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.data
            .get_mut(&TypeId::of::<C>())
            .and_then(|stored| stored.downcast_mut::<C>())
    }

    #[inline]
    pub fn remove<C: Component>(&mut self) -> Option<C> {
        self.data
            .remove(&TypeId::of::<C>())
            .and_then(|stored| (stored as Box<dyn Any>).downcast::<C>().ok())
            .map(|boxed| *boxed)
    }

    #[inline]
    pub fn contains<C: Component>(&self) -> bool {
        self.data.contains_key(&TypeId::of::<C>())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
