use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Per-frame constant buffer payload.
///
/// ```text
/// SceneConstants (144 bytes, 16-byte aligned)
/// ┌────────────────────────┬────────────────────────┬──────────────────┐
/// │ world_view_projection  │ world                  │ light_position   │
/// │ mat4 (column-major)    │ mat4 (column-major)    │ vec4, w = 1      │
/// │ offset 0               │ offset 64              │ offset 128       │
/// └────────────────────────┴────────────────────────┴──────────────────┘
/// ```
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SceneConstants {
    pub world_view_projection: [[f32; 4]; 4],
    pub world: [[f32; 4]; 4],
    pub light_position: [f32; 4],
}

impl SceneConstants {
    pub const SIZE: u64 = std::mem::size_of::<SceneConstants>() as u64;

    pub fn new(world_view_projection: Mat4, world: Mat4, light: Vec3) -> Self {
        Self {
            world_view_projection: world_view_projection.to_cols_array_2d(),
            world: world.to_cols_array_2d(),
            light_position: light.extend(1.0).to_array(),
        }
    }

    pub fn world_view_projection(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.world_view_projection)
    }

    pub fn world(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.world)
    }

    pub fn light(&self) -> Vec3 {
        let [x, y, z, _] = self.light_position;
        Vec3::new(x, y, z)
    }
}
