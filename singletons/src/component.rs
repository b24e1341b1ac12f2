//! Components attached to host objects.
//!
//! ```ignore
//! use rusty_singletons::Component;
//!
//! #[derive(Component)]
//! struct Health(u32);
//! ```

/// A trait representing a component attached to a host object.
///
/// At present this only sets the required trait bounds for a type to be stored by a host.
/// Singleton behavior is layered on top through [`Singleton`](crate::Singleton).
pub trait Component: 'static + Sized + Send + Sync {}

/// The display name of a component type: the type path without its module prefix or generic
/// arguments, e.g. `AudioManager` for `game::audio::AudioManager<Mixer>`.
pub(crate) fn short_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
