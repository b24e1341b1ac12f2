//! The application root.
//!
//! [`App`] owns the host and the singleton [`Registry`] side by side, and is the one place where
//! objects get their initialization hook delivered. Spawning through the app guarantees the
//! dispatch contract the registry relies on: one `awake` per object, in spawn order, never
//! reentrant.
//!
//! # Example
//!
//! ```ignore
//! use rusty_singletons::{App, Component, Scene, Singleton, State};
//!
//! #[derive(Component, Singleton, Default)]
//! #[singleton(persistent)]
//! struct AudioManager {
//!     volume: f32,
//! }
//!
//! let mut app = App::new(Scene::new("Menu").with_state(State::Running));
//! let audio = app.instance::<AudioManager>();
//! app.load_scene("Level 1");
//! assert_eq!(app.try_instance::<AudioManager>(), Some(audio));
//! ```

use log::debug;

use crate::{
    component::Component,
    host::{Handle, Host, HostError, ObjectId},
    scene::Scene,
    singleton::{Registry, Singleton},
};

/// A host paired with its singleton registry.
pub struct App<H: Host> {
    host: H,
    singletons: Registry,
}

impl<H: Host> App<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            singletons: Registry::new(),
        }
    }

    #[inline]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[inline]
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[inline]
    pub fn singletons(&self) -> &Registry {
        &self.singletons
    }

    /// Create a root object carrying `value` and deliver its initialization hook.
    pub fn spawn<T: Singleton>(&mut self, name: &str, value: T) -> Handle<T> {
        let handle = self.host.create_with(name, value);
        self.singletons.awake::<T, H>(&mut self.host, handle.object());
        handle
    }

    /// Attach a singleton component to an existing object and deliver its initialization hook.
    pub fn attach<T: Singleton>(
        &mut self,
        object: ObjectId,
        value: T,
    ) -> Result<Handle<T>, HostError> {
        let handle = self.host.attach(object, value)?;
        self.singletons.awake::<T, H>(&mut self.host, object);
        Ok(handle)
    }

    /// Deliver the initialization hook for an object that already carries `T`, e.g. one that was
    /// created while the host was not running.
    pub fn awake<T: Singleton>(&mut self, object: ObjectId) {
        self.singletons.awake::<T, H>(&mut self.host, object);
    }

    /// Resolve-or-create the authoritative instance of `T`.
    pub fn instance<T: Singleton + Default>(&mut self) -> Handle<T> {
        self.singletons.instance::<T, H>(&mut self.host)
    }

    /// The authoritative instance of `T`, without creating one.
    pub fn try_instance<T: Singleton>(&self) -> Option<Handle<T>> {
        self.singletons.try_instance::<T, H>(&self.host)
    }

    pub fn has_instance<T: Singleton>(&self) -> bool {
        self.singletons.has_instance::<T, H>(&self.host)
    }

    /// Keep only the newest object carrying `T`. See [`Registry::regulate`].
    pub fn regulate<T: Singleton>(&mut self) -> Option<Handle<T>> {
        self.singletons.regulate::<T, H>(&mut self.host)
    }

    /// Get a component from the host.
    pub fn get<T: Component>(&self, handle: Handle<T>) -> Option<&T> {
        self.host.get(handle)
    }

    /// Get a component from the host mutably.
    pub fn get_mut<T: Component>(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.host.get_mut(handle)
    }

    /// Request destruction of an object.
    pub fn destroy(&mut self, object: ObjectId) {
        self.host.destroy(object);
    }
}

impl App<Scene> {
    /// Create an object under `parent` carrying `value` and deliver its initialization hook.
    pub fn spawn_child<T: Singleton>(
        &mut self,
        parent: ObjectId,
        name: &str,
        value: T,
    ) -> Result<Handle<T>, HostError> {
        let object = self.host.create_child(parent, name)?;
        self.attach(object, value)
    }

    /// Transition to another scene.
    pub fn load_scene(&mut self, name: &str) {
        debug!("loading scene {name}");
        self.host.load(name);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rusty_singletons_macros::{Component, Singleton};

    use super::*;
    use crate::host::State;

    #[derive(Component, Singleton, Default, Debug, PartialEq)]
    struct Hud {
        score: u32,
    }

    #[derive(Component, Singleton, Default, Debug, PartialEq)]
    #[singleton(persistent)]
    struct AudioManager {
        volume: u8,
    }

    #[derive(Component, Singleton, Default, Debug)]
    #[singleton(regulator)]
    struct MatchDirector;

    fn app() -> App<Scene> {
        App::new(Scene::new("Menu").with_state(State::Running))
    }

    #[test]
    fn spawn_claims_and_get_mut_updates() {
        // Given
        let mut app = app();
        let hud = app.spawn("Hud", Hud { score: 1 });

        // When
        app.get_mut(hud).unwrap().score = 10;

        // Then
        assert_eq!(app.try_instance::<Hud>(), Some(hud));
        let resolved = app.instance::<Hud>();
        assert_eq!(app.get(resolved), Some(&Hud { score: 10 }));
    }

    #[test]
    fn persistent_instance_follows_scene_loads() {
        // Given
        let mut app = app();
        let audio = app.instance::<AudioManager>();
        let hud = app.instance::<Hud>();

        // When
        app.load_scene("Level 1");

        // Then
        assert_eq!(app.host().name(), "Level 1");
        assert_eq!(app.try_instance::<AudioManager>(), Some(audio));
        assert!(!app.has_instance::<Hud>());
        assert_ne!(app.instance::<Hud>(), hud);
    }

    #[test]
    fn spawn_child_detaches_persistent_singletons() {
        // Given
        let mut app = app();
        let root = app.host_mut().create_object("Systems");

        // When
        let audio = app
            .spawn_child(root, "Audio", AudioManager { volume: 3 })
            .unwrap();

        // Then
        assert_eq!(app.host().parent(audio.object()), None);
        assert!(app.host().survives_transitions(audio.object()));
    }

    #[test]
    fn spawn_child_under_dead_parent_fails() {
        let mut app = app();
        let root = app.host_mut().create_object("Systems");
        app.destroy(root);

        let result = app.spawn_child(root, "Audio", AudioManager::default());

        assert_eq!(result, Err(HostError::ObjectNotFound(root)));
        assert!(!app.has_instance::<AudioManager>());
    }

    #[test]
    fn attach_runs_the_hook() {
        let mut app = app();
        let object = app.host_mut().create_object("Audio");

        let audio = app.attach(object, AudioManager::default()).unwrap();

        assert_eq!(app.try_instance::<AudioManager>(), Some(audio));
        assert!(app.attach(object, AudioManager::default()).is_err());
    }

    #[test]
    fn deferred_awake_after_host_starts() {
        // Given - objects spawned while authoring
        let mut app = App::new(Scene::new("Menu"));
        let director = app.spawn("Director", MatchDirector);
        assert!(!app.has_instance::<MatchDirector>());

        // When
        app.host_mut().set_state(State::Running);
        app.host_mut().time_mut().advance(Duration::from_millis(16));
        app.awake::<MatchDirector>(director.object());

        // Then
        assert_eq!(app.try_instance::<MatchDirector>(), Some(director));
        assert_eq!(
            app.singletons()
                .creation_time::<MatchDirector>(director.object()),
            Some(Duration::from_millis(16))
        );
    }

    #[test]
    fn regulate_through_app() {
        let mut app = App::new(Scene::new("Menu"));
        app.spawn("Director 1", MatchDirector);
        app.spawn("Director 2", MatchDirector);

        let survivor = app.regulate::<MatchDirector>();

        assert!(survivor.is_some());
        assert_eq!(app.host().find_all::<MatchDirector>().len(), 1);
        assert_eq!(app.try_instance::<MatchDirector>(), survivor);
    }
}
