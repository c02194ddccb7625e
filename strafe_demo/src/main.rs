//! Headless strafe-movement demo
//!
//! Drops a player into an arena, then drives it with a scripted sequence
//! of key presses (run, strafe, jump, pause, reset) and logs what happens.
//!
//! Usage: `strafe_demo [config.toml|config.ron] [frames]`

mod arena;
mod script;

use arena::{Arena, PLAYER};
use script::Cue;
use strafe_engine::foundation::math::utils;
use strafe_engine::prelude::*;
use thiserror::Error;

const FRAME_TIME: f32 = 1.0 / 60.0;
const DEFAULT_FRAMES: u32 = 420;

#[derive(Error, Debug)]
enum DemoError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error("Invalid frame count '{0}'")]
    FrameCount(String),
}

fn main() {
    if let Err(e) = run() {
        log::error!("Demo failed: {}", e);
        eprintln!("strafe_demo: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), DemoError> {
    let mut args = std::env::args().skip(1);
    let engine = match args.next() {
        Some(path) => Engine::from_config_file(&path),
        None => Engine::new(ApplicationConfig::default()),
    };
    let frames = match args.next() {
        Some(count) => count.parse().map_err(|_| DemoError::FrameCount(count))?,
        None => DEFAULT_FRAMES,
    };

    let mut engine = engine?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&engine.config().engine.log_level))
        .format_timestamp_millis()
        .init();
    log::info!("Starting strafe demo for {} frames", frames);

    let mut scene = engine.create_scene(Arena::new(engine.config().character.clone()));
    scene.load()?;
    scene.log_entity_list();
    engine.with_frame(0.0, |frame| scene.play(frame))?;

    for frame in 0..frames {
        for cue in script::cues_at(frame) {
            apply_cue(&mut engine, &mut scene, cue)?;
        }

        engine.run_frame(&mut scene, FRAME_TIME)?;

        for request in engine.sounds.drain() {
            log::info!("[frame {}] sound '{}' at volume {:.2}", frame, request.id, request.volume);
        }
        if frame % 30 == 0 {
            report(frame, &scene);
        }
    }

    engine.with_frame(0.0, |frame| scene.destroy(frame))?;
    scene.unload()?;
    log::info!("Demo finished after {:.2}s of simulated time", engine.timer().total_time());
    Ok(())
}

fn apply_cue(engine: &mut Engine, scene: &mut Scene<Arena>, cue: Cue) -> Result<(), DemoError> {
    log::info!("Cue: {:?}", cue);
    match cue {
        Cue::Key(key, pressed) => engine.handle_event(EngineEvent::KeyInput { key, pressed }),
        Cue::Turn(degrees) => {
            let player = scene
                .get_entity_mut(PLAYER)
                .and_then(|player| player.component_mut::<CharacterController>());
            if let Some(controller) = player {
                controller.set_yaw(utils::deg_to_rad(degrees));
            }
        }
        Cue::Pause => scene.pause()?,
        Cue::Play => engine.with_frame(0.0, |frame| scene.play(frame))?,
        Cue::Reset => {
            engine.handle_event(EngineEvent::FocusLost);
            scene.reset()?;
            engine.with_frame(0.0, |frame| scene.play(frame))?;
        }
    }
    Ok(())
}

fn report(frame: u32, scene: &Scene<Arena>) {
    let (Some(controller), Some(world)) = (
        scene.entity_component::<CharacterController>(PLAYER),
        scene.physics_world(),
    ) else {
        log::warn!("[frame {}] no player in scene", frame);
        return;
    };

    let position = world.world_position(controller.body());
    let velocity = world.linear_velocity(controller.body());
    match (position, velocity) {
        (Ok(position), Ok(velocity)) => log::info!(
            "[frame {}] {} | pos ({:.2}, {:.2}, {:.2}) | horizontal speed {:.2} | grounded {}",
            frame,
            scene.state(),
            position.x,
            position.y,
            position.z,
            Vec3::new(velocity.x, 0.0, velocity.z).norm(),
            controller.is_grounded(),
        ),
        (Err(e), _) | (_, Err(e)) => log::warn!("[frame {}] player body missing: {}", frame, e),
    }
}
