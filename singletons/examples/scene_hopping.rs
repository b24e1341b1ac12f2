use std::time::Duration;

use log::LevelFilter;
use rusty_singletons::{
    App, Component, Host, Scene, Singleton, State, logging::ChannelLogger,
};

/// Lives only as long as the scene that owns it.
#[derive(Component, Singleton, Default)]
struct Hud {
    score: u32,
}

/// One mixer for the whole session.
#[derive(Component, Singleton, Default)]
#[singleton(persistent)]
struct AudioManager {
    volume: f32,
}

/// Every level ships its own director; the newest one takes over.
#[derive(Component, Singleton, Default)]
#[singleton(regulator)]
struct MatchDirector {
    level: String,
}

fn main() {
    let (logger, messages) = ChannelLogger::with_receiver(LevelFilter::Debug);
    if logger.install().is_err() {
        eprintln!("a logger is already installed");
    }

    let mut app = App::new(Scene::new("Menu").with_state(State::Running));

    let audio = app.instance::<AudioManager>();
    if let Some(mixer) = app.get_mut(audio) {
        mixer.volume = 0.8;
    }
    let hud = app.instance::<Hud>();
    app.spawn(
        "Menu Director",
        MatchDirector {
            level: "Menu".into(),
        },
    );

    for level in ["Level 1", "Level 2"] {
        app.load_scene(level);
        // Frames pass before the level's own director wakes up.
        std::thread::sleep(Duration::from_millis(5));
        let frame = app.host_mut().tick();
        log::debug!("{level} first frame after {frame:?}");
        app.spawn(
            "Level Director",
            MatchDirector {
                level: level.into(),
            },
        );

        let director = app.instance::<MatchDirector>();
        println!(
            "{level}: audio kept = {}, hud kept = {}, director = {}, directors alive = {}",
            app.try_instance::<AudioManager>() == Some(audio),
            app.try_instance::<Hud>() == Some(hud),
            app.get(director).map(|d| d.level.as_str()).unwrap_or("?"),
            app.host().find_all::<MatchDirector>().len(),
        );
    }

    for message in messages.try_iter() {
        println!("[{}] {}", message.level, message.message);
    }
}
