//! The host runtime contract.
//!
//! Singletons never own objects themselves. Object creation, parenting, scene survival, and
//! destruction all belong to the surrounding scene-graph runtime, referred to here as the *host*.
//! This module describes exactly what the singleton registry needs from that runtime through the
//! [`Host`] trait.
//!
//! # Lifecycle dispatch
//!
//! The registry assumes the host delivers lifecycle events the way a game loop does:
//!
//! - one initialization (`awake`) event per object and component type,
//! - delivered sequentially on a single thread,
//! - never reentrant (an `awake` never runs while another `awake` is in progress).
//!
//! Violating any of these makes the choice of authoritative instance unspecified, but never
//! unsafe.
//!
//! An in-memory implementation lives in [`crate::scene`].

mod object;
mod state;
mod time;

use std::{fmt, time::Duration};

use crate::component::Component;

pub use object::{Allocator, Generation, Handle, Id, ObjectId};
pub use state::State;
pub use time::Time;

/// The operations a scene-graph runtime exposes to the singleton registry.
///
/// Every method is a request to the host. The registry never inspects how the host stores
/// objects; it only relies on the observable effects documented per method.
pub trait Host {
    /// Whether the host is in genuine runtime execution, as opposed to an authoring or editing
    /// context. Initialization hooks are skipped while this is `false`.
    fn is_running(&self) -> bool;

    /// A monotonic clock reading. Only used to order objects by creation, never as wall time.
    fn now(&self) -> Duration;

    /// Create a new, empty root object with the given display name.
    fn create_object(&mut self, name: &str) -> ObjectId;

    /// Create a new root object with the given display name and a single component attached.
    fn create_with<T: Component>(&mut self, name: &str, value: T) -> Handle<T>;

    /// Attach a component to an existing object.
    ///
    /// Fails if the object is not alive or already carries a component of type `T`.
    fn attach<T: Component>(&mut self, object: ObjectId, value: T) -> Result<Handle<T>, HostError>;

    /// Get the component behind a handle, if the object is alive and carries it.
    fn get<T: Component>(&self, handle: Handle<T>) -> Option<&T>;

    /// Get the component behind a handle mutably, if the object is alive and carries it.
    fn get_mut<T: Component>(&mut self, handle: Handle<T>) -> Option<&mut T>;

    /// Find any live object carrying a component of type `T`.
    fn find_any<T: Component>(&self) -> Option<Handle<T>>;

    /// Find every live object carrying a component of type `T`. Order is unspecified.
    fn find_all<T: Component>(&self) -> Vec<Handle<T>>;

    /// Detach an object from its parent, making it a root. No-op for roots.
    fn detach_from_parent(&mut self, object: ObjectId);

    /// Exempt an object from destruction when its owning scene unloads.
    fn survive_transitions(&mut self, object: ObjectId);

    /// Exclude an object from authoring-time scene serialization.
    fn dont_save(&mut self, object: ObjectId);

    /// Request destruction of an object and everything parented under it.
    fn destroy(&mut self, object: ObjectId);

    /// Whether the object is still alive in the host.
    fn is_alive(&self, object: ObjectId) -> bool;
}

/// An error reported by a host operation that genuinely cannot proceed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The object was destroyed or never existed.
    ObjectNotFound(ObjectId),
    /// The object already carries a component of the given type.
    ComponentExists {
        object: ObjectId,
        component: &'static str,
    },
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::ObjectNotFound(object) => write!(f, "object not found: {object}"),
            HostError::ComponentExists { object, component } => {
                write!(f, "object {object} already has a {component} component")
            }
        }
    }
}

impl std::error::Error for HostError {}
