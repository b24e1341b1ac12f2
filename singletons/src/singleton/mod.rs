//! Singleton components.
//!
//! A singleton is a component type with at most one authoritative instance, reachable through an
//! instance slot in a [`Registry`]. The slot is filled in one of three ways:
//!
//! - an explicit [`Registry::instance`] call finds an existing object carrying the component,
//! - an explicit [`Registry::instance`] call creates a new object when none exists,
//! - an object's own initialization hook ([`Registry::awake`]) runs first.
//!
//! How objects compete for the slot, and what happens to the losers, is decided by the type's
//! [`Policy`].
//!
//! # Example
//!
//! ```rust,ignore
//! use rusty_singletons::{Component, Singleton};
//!
//! // Scoped to the current scene
//! #[derive(Component, Singleton, Default)]
//! struct Hud;
//!
//! // Survives scene loads, first instance wins
//! #[derive(Component, Singleton, Default)]
//! #[singleton(persistent)]
//! struct AudioManager;
//!
//! // Survives scene loads, newest instance evicts older ones
//! #[derive(Component, Singleton, Default)]
//! #[singleton(regulator)]
//! struct MatchDirector;
//! ```

mod policy;
mod registry;

use crate::component::Component;

pub use policy::{Claim, Duplicates, Policy};
pub use registry::Registry;

/// A component type with a single authoritative instance.
///
/// Use `#[derive(Singleton)]` to implement this trait. The `#[singleton(...)]` attribute selects
/// the policy:
///
/// - no attribute: [`Policy::SINGLETON`]
/// - `#[singleton(persistent)]`: [`Policy::PERSISTENT`]
/// - `#[singleton(persistent, destroy_duplicates)]`: persistent, destroying late duplicates
/// - `#[singleton(persistent, keep_parent)]`: persistent, never detaching from the parent
/// - `#[singleton(regulator)]`: [`Policy::REGULATOR`]
pub trait Singleton: Component {
    /// The lifecycle policy for this type.
    const POLICY: Policy;

    /// Whether this object detaches from its parent when it claims the slot. Only consulted when
    /// the policy has `detach_on_claim` set.
    ///
    /// A child object that stays parented only survives scene loads if its root does.
    fn auto_unparent_on_awake(&self) -> bool {
        true
    }
}
