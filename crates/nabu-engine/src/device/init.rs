/// Capability tier requested from an adapter.
///
/// Tiers map onto wgpu limit presets. `DeviceInit::capability_tiers` lists them
/// in descending priority and the first one the adapter satisfies wins.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CapabilityTier {
    /// Desktop-class limits (`wgpu::Limits::default`).
    Full,
    /// Downlevel limits for older desktop and mobile GPUs.
    Downlevel,
    /// WebGL2-class limits, no compute.
    WebGl2,
}

impl CapabilityTier {
    /// Limits requested from the device for this tier.
    pub fn limits(self) -> wgpu::Limits {
        match self {
            Self::Full => wgpu::Limits::default(),
            Self::Downlevel => wgpu::Limits::downlevel_defaults(),
            Self::WebGl2 => wgpu::Limits::downlevel_webgl2_defaults(),
        }
    }
}

/// Adapter kind tried during device creation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DriverType {
    /// A physical GPU.
    Hardware,
    /// The platform's software rasterizer (`force_fallback_adapter`).
    Software,
}

/// Initialization parameters for the device layer.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct DeviceInit {
    /// Capability tiers, highest priority first.
    pub capability_tiers: Vec<CapabilityTier>,

    /// Driver types tried in order until one yields a device.
    pub driver_types: Vec<DriverType>,

    /// Enables backend validation and debug labels.
    pub debug: bool,

    pub power_preference: wgpu::PowerPreference,

    /// Required wgpu features.
    ///
    /// Favor an empty set for portability unless a feature is strictly necessary.
    pub required_features: wgpu::Features,
}

impl Default for DeviceInit {
    fn default() -> Self {
        Self {
            capability_tiers: vec![
                CapabilityTier::Full,
                CapabilityTier::Downlevel,
                CapabilityTier::WebGl2,
            ],
            driver_types: vec![DriverType::Hardware, DriverType::Software],
            debug: cfg!(debug_assertions),
            power_preference: wgpu::PowerPreference::HighPerformance,
            required_features: wgpu::Features::empty(),
        }
    }
}

/// Picks the first tier in `requested` whose limits fit inside `supported`.
pub fn select_tier(
    requested: &[CapabilityTier],
    supported: &wgpu::Limits,
) -> Option<CapabilityTier> {
    requested
        .iter()
        .copied()
        .find(|tier| tier.limits().check_limits(supported))
}
