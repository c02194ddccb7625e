//! Demo scene: a ground slab, a couple of crates and one player

use strafe_engine::prelude::*;

/// Name of the player entity
pub const PLAYER: &str = "Player";

/// Height the player spawns at
const SPAWN_HEIGHT: f32 = 3.0;

/// Flat arena with a controllable player
pub struct Arena {
    camera: Camera,
    character: CharacterConfig,
}

impl Arena {
    /// Create the arena using the configured character settings
    pub fn new(character: CharacterConfig) -> Self {
        let mut camera = Camera::perspective(Vec3::new(-8.0, 6.0, 0.0), 75.0, 16.0 / 9.0, 0.1, 200.0);
        camera.look_at(Vec3::zeros());
        Self { camera, character }
    }
}

impl SceneBehavior for Arena {
    fn main_camera(&self) -> &Camera {
        &self.camera
    }

    fn on_load(&mut self, entities: &mut EntityContainer, physics: &mut PhysicsWorld) -> Result<(), ComponentError> {
        physics.add_body(BodyDesc::fixed(
            CollisionShape::cuboid(Vec3::new(40.0, 0.5, 40.0)),
            Vec3::new(0.0, -0.5, 0.0),
        ))?;
        entities.add_entity(Some("Ground"));

        for position in [Vec3::new(6.0, 0.5, 2.0), Vec3::new(6.0, 0.5, -2.0)] {
            physics.add_body(BodyDesc::fixed(CollisionShape::cuboid(Vec3::new(0.5, 0.5, 0.5)), position))?;
            entities.add_entity(Some("Crate"));
        }

        let body = physics.add_body(
            BodyDesc::dynamic(CollisionShape::sphere(0.5), Vec3::new(0.0, SPAWN_HEIGHT, 0.0))
                .with_layers(CollisionLayers::CHARACTER, CollisionLayers::all()),
        )?;
        let controller = CharacterController::attach(physics, body, &self.character)?;
        entities.add_entity(Some(PLAYER)).add_component(controller);

        log::info!("Arena built with {} physics bodies", physics.body_count());
        Ok(())
    }

    fn on_unload(&mut self, entities: &mut EntityContainer, _physics: &mut PhysicsWorld) -> Result<(), ComponentError> {
        log::info!("Tearing down arena ({} entities)", entities.len());
        Ok(())
    }

    fn on_start(&mut self, _ctx: &mut SceneContext<'_, '_>) -> Result<(), ComponentError> {
        log::info!("Arena started");
        Ok(())
    }
}
