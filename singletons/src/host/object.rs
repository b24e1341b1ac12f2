//! Object identifiers and allocation.
//!
//! Objects are identified by an [`ObjectId`], combining a slot [`Id`] with a [`Generation`]. The
//! generation is bumped every time a slot is freed, so an identifier kept around after its object
//! was destroyed never aliases a newer object created in the same slot:
//!
//! ```rust,ignore
//! let object = allocator.alloc(); // ObjectId { id: 0, generation: 0 }
//! allocator.free(object);
//! let reused = allocator.alloc(); // ObjectId { id: 0, generation: 1 }
//! assert_ne!(object, reused);
//! ```
//!
//! Instance slots store these identifiers, which is what lets the registry detect that the
//! authoritative object has been destroyed underneath it.

use std::{fmt, hash::Hash, marker::PhantomData};

/// The generation of an object slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u32);

impl Generation {
    /// The generation of a slot that has never been freed.
    pub const FIRST: Self = Self(0);

    /// Get the next generation from the current.
    #[inline]
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

/// An object slot identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl From<u32> for Id {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// A host object identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId {
    id: Id,
    generation: Generation,
}

impl ObjectId {
    /// Construct an object id from a slot id and generation.
    #[inline]
    pub const fn new(id: Id, generation: Generation) -> Self {
        Self { id, generation }
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Get the index of this object if it were to live in indexable storage (e.g. Vec)
    #[inline]
    pub fn index(&self) -> usize {
        self.id.0 as usize
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.id.0, self.generation.0)
    }
}

/// An object known to carry a component of type `T`.
///
/// Handles are plain identifiers. They do not keep the object alive, and resolving one through
/// [`Host::get`](super::Host::get) fails once the object is destroyed.
pub struct Handle<T> {
    object: ObjectId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    #[inline]
    pub const fn new(object: ObjectId) -> Self {
        Self {
            object,
            _marker: PhantomData,
        }
    }

    /// The object carrying the component.
    #[inline]
    pub const fn object(&self) -> ObjectId {
        self.object
    }
}

// Manual impls so handles are usable regardless of what `T` derives.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.object == other.object
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.object.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle")
            .field(&std::any::type_name::<T>())
            .field(&self.object)
            .finish()
    }
}

/// An allocator for object identifiers.
///
/// Freed slots are recycled with a bumped generation, most recently freed first. Slots are handed
/// out in order when the dead pool is empty. The allocator is owned by its host and only used
/// through `&mut self`, so the dead pool is a plain stack.
#[derive(Default, Debug)]
pub struct Allocator {
    /// Current generation for each slot, indexed by id.
    generations: Vec<Generation>,

    /// Slots available for reuse.
    dead_pool: Vec<Id>,
}

impl Allocator {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an object id, reusing a freed slot when one is available.
    pub fn alloc(&mut self) -> ObjectId {
        if let Some(id) = self.dead_pool.pop() {
            return ObjectId::new(id, self.generations[id.0 as usize]);
        }

        let id = Id(self.generations.len() as u32);
        self.generations.push(Generation::FIRST);
        ObjectId::new(id, Generation::FIRST)
    }

    /// Free an object id, invalidating it for good.
    ///
    /// Freeing an id that is not current is ignored, so double frees cannot hand the same slot
    /// out twice.
    pub fn free(&mut self, object: ObjectId) -> bool {
        if !self.is_current(object) {
            return false;
        }
        let index = object.index();
        self.generations[index] = self.generations[index].next();
        self.dead_pool.push(object.id());
        true
    }

    /// Whether the id refers to the current generation of its slot.
    #[inline]
    pub fn is_current(&self, object: ObjectId) -> bool {
        self.generations
            .get(object.index())
            .is_some_and(|generation| *generation == object.generation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_uniqueness() {
        // Given
        let mut allocator = Allocator::default();

        // When
        let mut objects = Vec::new();
        for _ in 0..200 {
            objects.push(allocator.alloc());
        }

        // Then - No dupes generated
        let pre_len = objects.len();
        objects.sort();
        objects.dedup();
        assert_eq!(pre_len, objects.len());
    }

    #[test]
    fn allocator_reuse_bumps_generation() {
        // Given
        let mut allocator = Allocator::default();
        let first = allocator.alloc();

        // When
        assert!(allocator.free(first));
        let reused = allocator.alloc();

        // Then
        assert_eq!(reused.id(), first.id());
        assert_eq!(reused.generation(), Generation::FIRST.next());
        assert!(!allocator.is_current(first));
        assert!(allocator.is_current(reused));
    }

    #[test]
    fn allocator_ignores_double_free() {
        // Given
        let mut allocator = Allocator::default();
        let object = allocator.alloc();
        allocator.free(object);

        // When
        let freed_again = allocator.free(object);

        // Then - only one slot available for reuse
        assert!(!freed_again);
        let a = allocator.alloc();
        let b = allocator.alloc();
        assert_eq!(a.id(), object.id());
        assert_eq!(b.id(), Id::from(1));
    }

    #[test]
    fn handle_equality_ignores_component_bounds() {
        struct NotComparable;

        let object = ObjectId::new(Id::from(7), Generation::FIRST);
        let a = Handle::<NotComparable>::new(object);
        let b = a;

        assert_eq!(a, b);
        assert_eq!(a.object(), object);
    }
}
