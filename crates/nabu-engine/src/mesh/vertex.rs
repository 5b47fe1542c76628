use std::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Mesh vertex as laid out in the GPU vertex buffer.
///
/// ```text
/// Vertex (24 bytes)
/// ┌──────────────┬──────────────┐
/// │ position     │ normal       │
/// │ [f32; 3]     │ [f32; 3]     │
/// │ offset 0     │ offset 12    │
/// └──────────────┴──────────────┘
/// ```
///
/// The input layout reads its attribute offsets from the constants below, so
/// reordering the fields keeps the pipeline consistent.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub const POSITION_OFFSET: u64 = offset_of!(Vertex, position) as u64;
    pub const NORMAL_OFFSET: u64 = offset_of!(Vertex, normal) as u64;
    pub const STRIDE: u64 = size_of::<Vertex>() as u64;

    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }
}

/// Converts a Z-up asset coordinate into the viewer's Y-up convention.
///
/// `(x, y, z) -> (x, z, -y)`. This is a rotation, so it is applied to
/// positions and normals alike and preserves triangle winding.
#[inline]
pub fn remap_axis(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, -v.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_two_packed_vec3() {
        assert_eq!(Vertex::POSITION_OFFSET, 0);
        assert_eq!(Vertex::NORMAL_OFFSET, 12);
        assert_eq!(Vertex::STRIDE, 24);
    }

    #[test]
    fn remap_moves_z_up_to_y_up() {
        assert_eq!(remap_axis(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 3.0, -2.0));
    }

    #[test]
    fn remap_is_not_an_involution() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(remap_axis(remap_axis(v)), Vec3::new(1.0, -2.0, -3.0));
        assert_ne!(remap_axis(remap_axis(v)), v);
    }

    #[test]
    fn remap_preserves_handedness() {
        let x = remap_axis(Vec3::X);
        let y = remap_axis(Vec3::Y);
        let z = remap_axis(Vec3::Z);
        assert_eq!(x.cross(y), z);
    }
}
