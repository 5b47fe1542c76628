use glam::Vec3;
use parking_lot::Mutex;

/// Light coordinate addressed by a single slider notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightAxis {
    X,
    Y,
    Z,
}

impl LightAxis {
    pub const ALL: [LightAxis; 3] = [LightAxis::X, LightAxis::Y, LightAxis::Z];

    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// Values written by the host thread and snapshotted by the render thread.
///
/// Each field has its own lock; the render thread takes each at most once
/// per tick and never holds both.
#[derive(Debug, Default)]
pub struct SceneInputs {
    light: Mutex<Vec3>,
    pending_resize: Mutex<Option<(u32, u32)>>,
}

impl SceneInputs {
    pub fn new(light: Vec3) -> Self {
        Self {
            light: Mutex::new(light),
            pending_resize: Mutex::new(None),
        }
    }

    pub fn set_light_x(&self, x: f32) {
        self.set_light_axis(LightAxis::X, x);
    }

    pub fn set_light_y(&self, y: f32) {
        self.set_light_axis(LightAxis::Y, y);
    }

    pub fn set_light_z(&self, z: f32) {
        self.set_light_axis(LightAxis::Z, z);
    }

    pub fn set_light_axis(&self, axis: LightAxis, value: f32) {
        self.light.lock()[axis.index()] = value;
    }

    pub fn set_light(&self, light: Vec3) {
        *self.light.lock() = light;
    }

    /// All three coordinates, read together.
    pub fn light(&self) -> Vec3 {
        *self.light.lock()
    }

    /// Records the latest panel size. Only the newest request survives.
    pub fn request_resize(&self, width: u32, height: u32) {
        *self.pending_resize.lock() = Some((width, height));
    }

    pub fn take_resize(&self) -> Option<(u32, u32)> {
        self.pending_resize.lock().take()
    }
}
