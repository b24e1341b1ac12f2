//! Singleton lifecycle management for scene-graph components.
//!
//! This crate controls how exactly one logical instance of a component type is created, located,
//! and kept alive across a host's scene lifecycle. Three policies are provided:
//!
//! - **Singleton**: lazily resolved or created, scoped to the current scene.
//! - **Persistent**: survives scene transitions; the first instance keeps the slot.
//! - **Regulator**: survives scene transitions; every new instance destroys older ones.
//!
//! The scene graph itself is an external collaborator described by the [`Host`] trait. An
//! in-memory implementation, [`Scene`], is included.
//!
//! ```ignore
//! use rusty_singletons::{App, Component, Scene, Singleton, State};
//!
//! #[derive(Component, Singleton, Default)]
//! #[singleton(regulator)]
//! struct MatchDirector {
//!     round: u32,
//! }
//!
//! let mut app = App::new(Scene::new("Lobby").with_state(State::Running));
//! let director = app.instance::<MatchDirector>();
//! app.get_mut(director).unwrap().round += 1;
//! ```

// Lets the derive macros refer to `::rusty_singletons` from inside this crate too.
extern crate self as rusty_singletons;

pub mod app;
pub mod component;
pub mod host;
pub mod logging;
pub mod scene;
pub mod singleton;

pub use app::App;
pub use component::Component;
pub use host::{Handle, Host, HostError, ObjectId, State, Time};
pub use scene::Scene;
pub use singleton::{Claim, Duplicates, Policy, Registry, Singleton};

pub use rusty_singletons_macros::{Component, Singleton};
