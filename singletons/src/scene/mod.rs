//! An in-memory scene graph implementing the [`Host`] contract.
//!
//! `Scene` is the reference host for the singleton registry. It keeps objects in a flat arena
//! with parent/child links, attaches components by type, and models scene transitions the way a
//! game runtime does: loading a new scene destroys every root object that was not marked to
//! survive transitions, together with everything parented under it.
//!
//! # Example
//!
//! ```ignore
//! use rusty_singletons::{Host, Scene, State};
//!
//! let mut scene = Scene::new("Menu").with_state(State::Running);
//! let hud = scene.create_object("Hud");
//! let music = scene.create_object("Music");
//! scene.survive_transitions(music);
//!
//! scene.load("Level 1");
//! assert!(!scene.is_alive(hud));
//! assert!(scene.is_alive(music));
//! ```

mod components;

use std::time::Duration;

use fixedbitset::FixedBitSet;
use log::{debug, info, trace, warn};

use crate::{
    component::{Component, short_name},
    host::{Allocator, Handle, Host, HostError, ObjectId, State, Time},
};

pub use components::Components;

/// A single object in the scene graph.
struct Node {
    object: ObjectId,
    name: String,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
    components: Components,
}

impl Node {
    fn new(object: ObjectId, name: &str) -> Self {
        Self {
            object,
            name: name.to_owned(),
            parent: None,
            children: Vec::new(),
            components: Components::new(),
        }
    }
}

/// An in-memory scene graph.
pub struct Scene {
    /// Name of the currently loaded scene.
    name: String,

    /// Host lifecycle state. Singletons only initialize while running.
    state: State,

    /// Monotonic host clock.
    time: Time,

    /// Object id allocation and recycling.
    allocator: Allocator,

    /// Objects indexed by slot. `None` for free slots.
    nodes: Vec<Option<Node>>,

    /// Objects exempt from destruction on scene load.
    survivors: FixedBitSet,

    /// Objects excluded from scene saving.
    unsaved: FixedBitSet,
}

impl Scene {
    /// Create an empty scene. The host starts out [`State::Dead`], i.e. not running.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: State::default(),
            time: Time::new(),
            allocator: Allocator::new(),
            nodes: Vec::new(),
            survivors: FixedBitSet::new(),
            unsaved: FixedBitSet::new(),
        }
    }

    /// Set the initial host state.
    pub fn with_state(mut self, state: State) -> Self {
        self.state = state;
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    #[inline]
    pub fn set_state(&mut self, state: State) {
        debug!("scene {} state {:?} -> {:?}", self.name, self.state, state);
        self.state = state;
    }

    #[inline]
    pub fn time(&self) -> &Time {
        &self.time
    }

    #[inline]
    pub fn time_mut(&mut self) -> &mut Time {
        &mut self.time
    }

    /// Advance the host clock from the wall clock, once per frame. Returns the frame delta.
    pub fn tick(&mut self) -> Duration {
        self.time.tick()
    }

    /// Create a new object parented under `parent`.
    pub fn create_child(&mut self, parent: ObjectId, name: &str) -> Result<ObjectId, HostError> {
        if !self.is_alive(parent) {
            return Err(HostError::ObjectNotFound(parent));
        }
        let child = self.create_object(name);
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        Ok(child)
    }

    /// The parent of an object, if it is alive and not a root.
    pub fn parent(&self, object: ObjectId) -> Option<ObjectId> {
        self.node(object).and_then(|node| node.parent)
    }

    /// The direct children of an object. Empty for dead objects.
    pub fn children(&self, object: ObjectId) -> &[ObjectId] {
        self.node(object)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    /// The display name of an object.
    pub fn name_of(&self, object: ObjectId) -> Option<&str> {
        self.node(object).map(|node| node.name.as_str())
    }

    /// Whether the object is flagged to survive scene transitions.
    pub fn survives_transitions(&self, object: ObjectId) -> bool {
        self.is_alive(object) && self.survivors.contains(object.index())
    }

    /// Whether the object is included when the scene is saved.
    pub fn is_saved(&self, object: ObjectId) -> bool {
        self.is_alive(object) && !self.unsaved.contains(object.index())
    }

    /// All live objects, in slot order.
    pub fn objects(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.nodes.iter().flatten().map(|node| node.object)
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Transition to another scene.
    ///
    /// Every root object not flagged to survive transitions is destroyed along with its
    /// children. Surviving roots keep their whole subtree.
    pub fn load(&mut self, name: impl Into<String>) {
        let doomed: Vec<ObjectId> = self
            .nodes
            .iter()
            .flatten()
            .filter(|node| node.parent.is_none() && !self.survivors.contains(node.object.index()))
            .map(|node| node.object)
            .collect();

        let before = self.len();
        for object in doomed {
            self.destroy(object);
        }

        let previous = std::mem::replace(&mut self.name, name.into());
        info!(
            "loaded scene {} (from {}), unloaded {} objects",
            self.name,
            previous,
            before - self.len()
        );
    }

    fn node(&self, object: ObjectId) -> Option<&Node> {
        self.nodes
            .get(object.index())?
            .as_ref()
            .filter(|node| node.object == object)
    }

    fn node_mut(&mut self, object: ObjectId) -> Option<&mut Node> {
        self.nodes
            .get_mut(object.index())?
            .as_mut()
            .filter(|node| node.object == object)
    }

    /// Remove the object from its parent's children, making it a root.
    fn unlink(&mut self, object: ObjectId) {
        let Some(parent) = self.node_mut(object).and_then(|node| node.parent.take()) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|child| *child != object);
        }
    }
}

fn set_flag(bits: &mut FixedBitSet, index: usize, enabled: bool) {
    if enabled {
        bits.grow(index + 1);
        bits.insert(index);
    } else if index < bits.len() {
        bits.set(index, false);
    }
}

impl Host for Scene {
    fn is_running(&self) -> bool {
        self.state.is_running()
    }

    fn now(&self) -> Duration {
        self.time.time
    }

    fn create_object(&mut self, name: &str) -> ObjectId {
        let object = self.allocator.alloc();
        let index = object.index();
        if self.nodes.len() <= index {
            self.nodes.resize_with(index + 1, || None);
        }
        self.nodes[index] = Some(Node::new(object, name));
        trace!("created object {name} ({object})");
        object
    }

    fn create_with<T: Component>(&mut self, name: &str, value: T) -> Handle<T> {
        let object = self.create_object(name);
        if let Some(node) = self.node_mut(object) {
            // A fresh node has no components, so this cannot be rejected.
            let _ = node.components.insert(value);
        }
        Handle::new(object)
    }

    fn attach<T: Component>(&mut self, object: ObjectId, value: T) -> Result<Handle<T>, HostError> {
        let node = self
            .node_mut(object)
            .ok_or(HostError::ObjectNotFound(object))?;
        node.components
            .insert(value)
            .map_err(|_| HostError::ComponentExists {
                object,
                component: short_name::<T>(),
            })?;
        Ok(Handle::new(object))
    }

    fn get<T: Component>(&self, handle: Handle<T>) -> Option<&T> {
        self.node(handle.object())?.components.get::<T>()
    }

    fn get_mut<T: Component>(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.node_mut(handle.object())?.components.get_mut::<T>()
    }

    fn find_any<T: Component>(&self) -> Option<Handle<T>> {
        self.nodes
            .iter()
            .flatten()
            .find(|node| node.components.contains::<T>())
            .map(|node| Handle::new(node.object))
    }

    fn find_all<T: Component>(&self) -> Vec<Handle<T>> {
        self.nodes
            .iter()
            .flatten()
            .filter(|node| node.components.contains::<T>())
            .map(|node| Handle::new(node.object))
            .collect()
    }

    fn detach_from_parent(&mut self, object: ObjectId) {
        self.unlink(object);
    }

    fn survive_transitions(&mut self, object: ObjectId) {
        let Some(node) = self.node(object) else {
            debug!("ignoring survive_transitions for dead object {object}");
            return;
        };
        if node.parent.is_some() {
            warn!(
                "{} ({object}) is not a root object; it only survives scene loads once detached",
                node.name
            );
        }
        set_flag(&mut self.survivors, object.index(), true);
    }

    fn dont_save(&mut self, object: ObjectId) {
        if self.is_alive(object) {
            set_flag(&mut self.unsaved, object.index(), true);
        }
    }

    fn destroy(&mut self, object: ObjectId) {
        if !self.is_alive(object) {
            debug!("ignoring destroy of dead object {object}");
            return;
        }
        self.unlink(object);

        let mut pending = vec![object];
        while let Some(next) = pending.pop() {
            let Some(node) = self.nodes.get_mut(next.index()).and_then(Option::take) else {
                continue;
            };
            pending.extend(node.children);
            set_flag(&mut self.survivors, next.index(), false);
            set_flag(&mut self.unsaved, next.index(), false);
            self.allocator.free(next);
            trace!("destroyed object {} ({next})", node.name);
        }
    }

    fn is_alive(&self, object: ObjectId) -> bool {
        self.node(object).is_some()
    }
}

#[cfg(test)]
mod tests {
    use rusty_singletons_macros::Component;

    use super::*;

    #[derive(Component, Debug, PartialEq)]
    struct Volume(u32);

    #[derive(Component, Debug, PartialEq)]
    struct Listener;

    fn running() -> Scene {
        Scene::new("Main").with_state(State::Running)
    }

    #[test]
    fn new_scene_is_empty_and_not_running() {
        let scene = Scene::new("Main");

        assert!(scene.is_empty());
        assert!(!scene.is_running());
        assert_eq!(scene.name(), "Main");
    }

    #[test]
    fn attach_and_find() {
        // Given
        let mut scene = running();
        let a = scene.create_object("A");
        let b = scene.create_with("B", Volume(3));

        // When
        let attached = scene.attach(a, Volume(1)).unwrap();

        // Then
        assert_eq!(scene.get(attached), Some(&Volume(1)));
        assert_eq!(scene.find_all::<Volume>(), vec![attached, b]);
        assert_eq!(scene.find_any::<Volume>(), Some(attached));
        assert!(scene.find_any::<Listener>().is_none());
    }

    #[test]
    fn attach_rejects_dead_objects_and_duplicates() {
        // Given
        let mut scene = running();
        let object = scene.create_with("A", Volume(1)).object();
        let dead = scene.create_object("B");
        scene.destroy(dead);

        // Then
        assert_eq!(
            scene.attach(object, Volume(2)),
            Err(HostError::ComponentExists {
                object,
                component: "Volume"
            })
        );
        assert_eq!(
            scene.attach(dead, Volume(2)),
            Err(HostError::ObjectNotFound(dead))
        );
    }

    #[test]
    fn get_mut_updates_component() {
        let mut scene = running();
        let handle = scene.create_with("A", Volume(1));

        scene.get_mut(handle).unwrap().0 = 9;

        assert_eq!(scene.get(handle), Some(&Volume(9)));
    }

    #[test]
    fn destroy_removes_subtree() {
        // Given
        let mut scene = running();
        let root = scene.create_object("Root");
        let child = scene.create_child(root, "Child").unwrap();
        let grandchild = scene.create_child(child, "Grandchild").unwrap();
        let other = scene.create_object("Other");

        // When
        scene.destroy(root);

        // Then
        assert!(!scene.is_alive(root));
        assert!(!scene.is_alive(child));
        assert!(!scene.is_alive(grandchild));
        assert!(scene.is_alive(other));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn destroy_child_unlinks_from_parent() {
        let mut scene = running();
        let root = scene.create_object("Root");
        let child = scene.create_child(root, "Child").unwrap();

        scene.destroy(child);

        assert!(scene.children(root).is_empty());
        assert!(scene.is_alive(root));
    }

    #[test]
    fn destroyed_ids_stay_dead_after_slot_reuse() {
        // Given
        let mut scene = running();
        let first = scene.create_with("First", Volume(1));
        scene.destroy(first.object());

        // When
        let second = scene.create_with("Second", Volume(2));

        // Then
        assert_eq!(first.object().id(), second.object().id());
        assert!(!scene.is_alive(first.object()));
        assert!(scene.get(first).is_none());
        assert_eq!(scene.get(second), Some(&Volume(2)));
    }

    #[test]
    fn detach_makes_root() {
        let mut scene = running();
        let root = scene.create_object("Root");
        let child = scene.create_child(root, "Child").unwrap();

        scene.detach_from_parent(child);

        assert_eq!(scene.parent(child), None);
        assert!(scene.children(root).is_empty());
    }

    #[test]
    fn load_destroys_non_surviving_roots() {
        // Given
        let mut scene = running();
        let hud = scene.create_object("Hud");
        let music = scene.create_object("Music");
        let track = scene.create_child(music, "Track").unwrap();
        scene.survive_transitions(music);

        // When
        scene.load("Level 1");

        // Then
        assert_eq!(scene.name(), "Level 1");
        assert!(!scene.is_alive(hud));
        assert!(scene.is_alive(music));
        assert!(scene.is_alive(track));
        assert!(scene.survives_transitions(music));
    }

    #[test]
    fn surviving_child_of_doomed_root_is_destroyed() {
        // Given
        let mut scene = running();
        let root = scene.create_object("Root");
        let child = scene.create_child(root, "Child").unwrap();
        scene.survive_transitions(child);

        // When
        scene.load("Next");

        // Then
        assert!(!scene.is_alive(child));
    }

    #[test]
    fn survival_flag_does_not_leak_into_reused_slot() {
        let mut scene = running();
        let first = scene.create_object("First");
        scene.survive_transitions(first);
        scene.dont_save(first);
        scene.destroy(first);

        let second = scene.create_object("Second");

        assert!(!scene.survives_transitions(second));
        assert!(scene.is_saved(second));
    }

    #[test]
    fn dont_save_flag() {
        let mut scene = running();
        let object = scene.create_object("Object");
        assert!(scene.is_saved(object));

        scene.dont_save(object);

        assert!(!scene.is_saved(object));
    }

    #[test]
    fn clock_reads_scene_time() {
        let mut scene = running();
        assert_eq!(scene.now(), Duration::ZERO);

        scene.time_mut().advance(Duration::from_secs(2));

        assert_eq!(scene.now(), Duration::from_secs(2));
    }

    #[test]
    fn tick_moves_scene_clock_forward() {
        let mut scene = running();
        scene.time_mut().advance(Duration::from_secs(1));

        let delta = scene.tick();

        assert_eq!(scene.now(), Duration::from_secs(1) + delta);
        assert_eq!(scene.time().delta, delta);
    }
}
