//! Host frame loop
//!
//! The engine owns the collaborators a scene needs every frame (input,
//! sound requests, debug drawing) plus the fixed-timestep clock, and drives
//! one scene per call to [`Engine::run_frame`]:
//!
//! ```text
//! expire last frame's debug shapes
//! Update
//! 0..N × (PhysicsUpdate, physics step)   fixed dt, only while playing
//! RenderDebugUI + collider wireframes
//! ```

use crate::{
    audio::SoundManager,
    config::{ConfigError, Config},
    core::config::ApplicationConfig,
    debug::DebugDrawSystem,
    foundation::time::{FixedTimestep, Timer},
    input::{InputManager, KeyCode},
    scene::{Camera, FrameContext, Scene, SceneBehavior, SceneError, SceneState},
};
use std::path::Path;
use thiserror::Error;

/// Events the windowing backend forwards to the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    /// A key changed state
    KeyInput {
        /// Key code
        key: KeyCode,
        /// Whether the key is now held
        pressed: bool,
    },
    /// The window lost focus; every key counts as released
    FocusLost,
    /// The window was asked to close
    CloseRequested,
}

/// Main engine struct
///
/// The engine coordinates the per-frame collaborators and the physics clock.
pub struct Engine {
    /// Input handling system
    pub input: InputManager,

    /// Sound effect requests waiting for the audio device
    ///
    /// `run_frame` only queues requests; the host drains them every frame.
    pub sounds: SoundManager,

    /// Debug shapes waiting for the renderer
    pub debug_draw: DebugDrawSystem,

    /// Frame timing
    timer: Timer,

    /// Physics tick accumulator
    physics_clock: FixedTimestep,

    /// Engine configuration
    config: ApplicationConfig,

    /// Whether the engine should continue running
    running: bool,
}

impl Engine {
    /// Create a new engine instance from validated configuration
    pub fn new(config: ApplicationConfig) -> Result<Self, EngineError> {
        config.validate().map_err(ConfigError::Invalid)?;
        log::info!(
            "Initializing engine (fixed timestep {:.4}s, max {} steps per frame)",
            config.engine.fixed_timestep,
            config.engine.max_physics_steps
        );

        let mut debug_draw = DebugDrawSystem::new();
        debug_draw.enabled = config.engine.debug_mode;

        let mut sounds = SoundManager::new();
        if config.character.sound_effects_enabled {
            sounds.register(config.character.landing_sound.clone(), 1.0);
        }

        Ok(Self {
            input: InputManager::new(),
            sounds,
            debug_draw,
            timer: Timer::new(),
            physics_clock: FixedTimestep::new(config.engine.fixed_timestep, config.engine.max_physics_steps),
            config,
            running: true,
        })
    }

    /// Load configuration from a `.toml` or `.ron` file and create the engine
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let config = ApplicationConfig::load_from_file(path)?;
        Self::new(config)
    }

    /// Engine configuration
    pub fn config(&self) -> &ApplicationConfig {
        &self.config
    }

    /// Create an unloaded scene using the engine's physics settings and fly camera
    pub fn create_scene<B: SceneBehavior>(&self, behavior: B) -> Scene<B> {
        Scene::new(behavior, Camera::default(), self.config.physics.clone())
    }

    /// Run `f` with a frame context covering `delta_time`
    ///
    /// Used for messages the host sends outside the frame loop, such as
    /// `play` or `destroy`.
    pub fn with_frame<R>(&mut self, delta_time: f32, f: impl FnOnce(&mut FrameContext<'_>) -> R) -> R {
        let mut frame = FrameContext::new(delta_time, &self.input, &mut self.sounds, &mut self.debug_draw);
        f(&mut frame)
    }

    /// Drive one frame of `scene` and return the number of physics ticks run
    pub fn run_frame<B: SceneBehavior>(&mut self, scene: &mut Scene<B>, delta_time: f32) -> Result<u32, EngineError> {
        self.timer.advance(delta_time);
        self.debug_draw.update(delta_time);

        let mut frame = FrameContext::new(delta_time, &self.input, &mut self.sounds, &mut self.debug_draw);
        scene.update(&mut frame)?;

        let steps = if scene.state() == SceneState::Playing {
            self.physics_clock.accumulate(delta_time)
        } else {
            self.physics_clock.reset();
            0
        };

        let fixed_step = self.physics_clock.step();
        frame.delta_time = fixed_step;
        for _ in 0..steps {
            scene.physics_update(&mut frame)?;
            scene.step_physics(fixed_step)?;
        }

        frame.delta_time = delta_time;
        scene.render_debug_ui(&mut frame)?;
        if let Some(world) = scene.physics_world() {
            world.debug_draw(&mut self.debug_draw);
        }

        log::trace!("Frame {} ran {} physics steps", self.timer.frame_count(), steps);
        Ok(steps)
    }

    /// Handle an event from the windowing backend
    pub fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::KeyInput { key, pressed } => self.input.handle_key_input(key, pressed),
            EngineEvent::FocusLost => self.input.release_all(),
            EngineEvent::CloseRequested => self.quit(),
        }
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the host loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frame timing
    pub fn timer(&self) -> &Timer {
        &self.timer
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// A scene message failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
