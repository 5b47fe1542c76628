use std::f32::consts::TAU;

use glam::{Mat4, Vec3};

use super::camera::aspect_ratio;
use super::{Camera, SceneConstants};

#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub camera: Camera,

    /// Rotation about Y added every tick, in radians.
    pub rotation_step: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            rotation_step: 0.05,
        }
    }
}

/// World/view/projection state of the single spinning mesh.
#[derive(Debug, Clone)]
pub struct SceneState {
    camera: Camera,
    rotation_step: f32,

    /// Accumulated rotation, kept in `[0, 2π)`.
    angle: f32,
    world: Mat4,
    view: Mat4,
    projection: Mat4,
    world_view_projection: Mat4,
}

impl SceneState {
    pub fn new(config: &SceneConfig, width: u32, height: u32) -> Self {
        let view = config.camera.view();
        let projection = config.camera.projection(aspect_ratio(width, height));
        Self {
            camera: config.camera,
            rotation_step: config.rotation_step,
            angle: 0.0,
            world: Mat4::IDENTITY,
            view,
            projection,
            world_view_projection: projection * view,
        }
    }

    /// Recomputes the projection for a new panel size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection = self.camera.projection(aspect_ratio(width, height));
        self.world_view_projection = self.projection * self.view * self.world;
    }

    /// Advances the rotation by one step and packs the constants for `light`.
    pub fn update(&mut self, light: Vec3) -> SceneConstants {
        self.angle = (self.angle + self.rotation_step).rem_euclid(TAU);
        self.world = Mat4::from_rotation_y(self.angle);
        self.world_view_projection = self.projection * self.view * self.world;

        SceneConstants::new(self.world_view_projection, self.world, light)
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn world(&self) -> Mat4 {
        self.world
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn world_view_projection(&self) -> Mat4 {
        self.world_view_projection
    }
}
