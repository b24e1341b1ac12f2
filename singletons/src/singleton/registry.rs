//! The instance slot registry.
//!
//! [`Registry`] maps each singleton type to its instance slot. It replaces per-type static state:
//! the application root owns one registry, tests create a fresh one per case, and nothing about a
//! singleton outlives the registry that tracks it.
//!
//! # Slot validity
//!
//! Slots hold plain [`ObjectId`]s. The host may destroy the object behind a slot at any time (a
//! scene load, an explicit destroy, an eviction), so every read checks the object is still alive
//! and still carries the component. A stale slot reads as empty and is cleared on the spot.
//!
//! # Lifecycle dispatch
//!
//! [`Registry::awake`] must be called once per object and singleton type, when the host
//! initializes the object, and never reentrantly. See [`crate::host`].

use std::{any::TypeId, collections::HashMap, time::Duration};

use dashmap::DashMap;
use log::{debug, trace};

use crate::{
    component::short_name,
    host::{Handle, Host, ObjectId},
    singleton::{Claim, Duplicates, Singleton},
};

/// Per-type singleton state.
#[derive(Debug, Default)]
struct Slot {
    /// The authoritative object, if any.
    current: Option<ObjectId>,

    /// Creation time of every awakened object, for policies that evict older peers.
    born: HashMap<ObjectId, Duration>,
}

/// A registry of singleton instance slots, one per singleton type.
///
/// All operations take `&self`; the registry can be shared freely within the host's thread.
#[derive(Debug, Default)]
pub struct Registry {
    slots: DashMap<TypeId, Slot>,
}

impl Registry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the authoritative instance of `T`, creating one if needed.
    ///
    /// 1. If the slot holds a live instance, return it.
    /// 2. Otherwise, if any object in the host carries `T`, store and return it.
    /// 3. Otherwise, create a new object named `Auto-Generated Singleton: <T>` with
    ///    `T::default()` attached, run its initialization hook, store and return it.
    ///
    /// Repeated calls return the same handle until the object is destroyed.
    pub fn instance<T: Singleton + Default, H: Host>(&self, host: &mut H) -> Handle<T> {
        if let Some(handle) = self.try_instance::<T, H>(host) {
            return handle;
        }

        if let Some(found) = host.find_any::<T>() {
            debug!(
                "{} resolved to existing object {}",
                short_name::<T>(),
                found.object()
            );
            self.store::<T>(found.object());
            return found;
        }

        let name = format!("Auto-Generated Singleton: {}", short_name::<T>());
        let handle = host.create_with(&name, T::default());
        if T::POLICY.hide_auto_created {
            host.dont_save(handle.object());
        }
        debug!("created {name} ({})", handle.object());

        self.awake::<T, H>(host, handle.object());
        self.store::<T>(handle.object());
        handle
    }

    /// Get the authoritative instance of `T` without creating one.
    pub fn try_instance<T: Singleton, H: Host>(&self, host: &H) -> Option<Handle<T>> {
        let key = TypeId::of::<T>();
        let current = self.slots.get(&key)?.current?;
        let handle = Handle::new(current);
        if host.get::<T>(handle).is_some() {
            return Some(handle);
        }

        trace!(
            "{} slot held destroyed object {current}, clearing",
            short_name::<T>()
        );
        if let Some(mut slot) = self.slots.get_mut(&key)
            && slot.current == Some(current)
        {
            slot.current = None;
        }
        None
    }

    /// Whether `T` currently has a live authoritative instance. Never creates one.
    #[inline]
    pub fn has_instance<T: Singleton, H: Host>(&self, host: &H) -> bool {
        self.try_instance::<T, H>(host).is_some()
    }

    /// The initialization hook for an object carrying `T`.
    ///
    /// Does nothing unless the host is running and the object carries `T`. Otherwise runs the
    /// steps enabled by `T::POLICY`, in order:
    ///
    /// 1. first-wins claim: if another live object holds the slot, handle this object as a
    ///    duplicate and stop,
    /// 2. detach from the parent, if the component asks for it,
    /// 3. mark the object to survive scene transitions,
    /// 4. record the creation time and destroy every strictly older peer,
    /// 5. claim the slot (always for overwrite, only when vacant otherwise).
    pub fn awake<T: Singleton, H: Host>(&self, host: &mut H, object: ObjectId) {
        let name = short_name::<T>();
        if !host.is_running() {
            trace!("skipping {name} awake for {object}: host not running");
            return;
        }

        let handle = Handle::<T>::new(object);
        let Some(component) = host.get(handle) else {
            debug!("skipping {name} awake: {object} does not carry it");
            return;
        };
        let unparent = component.auto_unparent_on_awake();
        let policy = T::POLICY;

        if policy.claim == Claim::FirstWins
            && let Some(current) = self.try_instance::<T, H>(host)
            && current != handle
        {
            match policy.duplicates {
                Duplicates::Ignore => {
                    let holder = current.object();
                    debug!("{name} duplicate {object} ignored, {holder} keeps the slot");
                }
                Duplicates::Destroy => {
                    let holder = current.object();
                    debug!("{name} duplicate {object} destroyed, {holder} keeps the slot");
                    host.destroy(object);
                }
            }
            return;
        }

        if policy.detach_on_claim && unparent {
            host.detach_from_parent(object);
        }
        if policy.survive_transitions {
            host.survive_transitions(object);
        }
        if policy.evict_older {
            self.evict_older::<T, H>(host, object);
        }

        let claim = match policy.claim {
            Claim::Overwrite => true,
            Claim::FirstWins | Claim::IfVacant => self.try_instance::<T, H>(host).is_none(),
        };
        if claim {
            debug!("{name} slot claimed by {object}");
            self.store::<T>(object);
        }
    }

    /// Keep only the newest object carrying `T` and make it the authoritative instance.
    ///
    /// Unlike the per-object eviction in [`awake`](Self::awake), this is a single global pass: it
    /// does not rely on every peer having been initialized. Objects that never ran their hook
    /// count as the oldest. Ties prefer the current slot holder.
    pub fn regulate<T: Singleton, H: Host>(&self, host: &mut H) -> Option<Handle<T>> {
        let peers = host.find_all::<T>();
        if peers.is_empty() {
            self.forget::<T>();
            return None;
        }

        let survivor = {
            let slot = self.slots.entry(TypeId::of::<T>()).or_default();
            peers.iter().copied().max_by_key(|peer| {
                (
                    slot.born.get(&peer.object()).copied(),
                    slot.current == Some(peer.object()),
                )
            })?
        };

        for peer in peers.into_iter().filter(|peer| *peer != survivor) {
            debug!(
                "{} regulated: destroying {}",
                short_name::<T>(),
                peer.object()
            );
            host.destroy(peer.object());
        }

        let mut slot = self.slots.entry(TypeId::of::<T>()).or_default();
        slot.born.retain(|tracked, _| host.is_alive(*tracked));
        slot.current = Some(survivor.object());
        Some(survivor)
    }

    /// The recorded creation time of an object, for policies that evict older peers.
    pub fn creation_time<T: Singleton>(&self, object: ObjectId) -> Option<Duration> {
        self.slots
            .get(&TypeId::of::<T>())?
            .born
            .get(&object)
            .copied()
    }

    /// Drop everything tracked for `T`, returning the object that held the slot.
    pub fn forget<T: Singleton>(&self) -> Option<ObjectId> {
        self.slots
            .remove(&TypeId::of::<T>())
            .and_then(|(_, slot)| slot.current)
    }

    /// Drop everything tracked for every type.
    pub fn reset(&self) {
        self.slots.clear();
    }

    /// Number of claimed slots. Slots are not validated against a host here.
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.current.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn store<T: Singleton>(&self, object: ObjectId) {
        self.slots.entry(TypeId::of::<T>()).or_default().current = Some(object);
    }

    /// Record `object`'s creation time and destroy every peer created strictly earlier. Peers
    /// without a recorded time never ran their hook and count as older.
    fn evict_older<T: Singleton, H: Host>(&self, host: &mut H, object: ObjectId) {
        let born = host.now();
        let peers = host.find_all::<T>();

        let doomed: Vec<ObjectId> = {
            let mut slot = self.slots.entry(TypeId::of::<T>()).or_default();
            slot.born.retain(|tracked, _| host.is_alive(*tracked));
            slot.born.insert(object, born);
            peers
                .iter()
                .map(Handle::object)
                .filter(|peer| *peer != object)
                .filter(|peer| slot.born.get(peer).is_none_or(|theirs| *theirs < born))
                .collect()
        };

        for peer in doomed {
            debug!("{} evicting older object {peer}", short_name::<T>());
            host.destroy(peer);
        }

        if let Some(mut slot) = self.slots.get_mut(&TypeId::of::<T>()) {
            slot.born.retain(|tracked, _| host.is_alive(*tracked));
        }
    }
}
