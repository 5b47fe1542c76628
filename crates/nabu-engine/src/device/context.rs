use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

use super::{select_tier, CapabilityTier, DeviceCreationError, DeviceInit, DriverType};
use crate::render::TeardownReport;

/// Owns the wgpu instance, adapter, device and queue.
///
/// This is the "device + immediate context" half of the resource set. The
/// presentable surface lives in [`RenderSurface`](super::RenderSurface) and
/// borrows this type only while being created or reconfigured.
pub struct GpuDevice {
    /// Command queue.
    queue: wgpu::Queue,

    /// Logical device.
    device: wgpu::Device,

    /// Selected adapter.
    adapter: wgpu::Adapter,

    /// wgpu instance used to create the adapter and surface.
    instance: wgpu::Instance,

    tier: CapabilityTier,
    driver: DriverType,
}

impl GpuDevice {
    /// Creates a device, trying each driver type in `init.driver_types` in order.
    ///
    /// For each adapter the highest-priority capability tier it supports is
    /// selected. The error of the last attempted driver is returned when all of
    /// them fail.
    pub async fn new(init: &DeviceInit) -> Result<Self, DeviceCreationError> {
        Self::open(create_instance(init), init, None).await
    }

    /// Creates a device whose adapter can present to `window`, together with
    /// the window's surface.
    ///
    /// Adapters that cannot present to `window` are passed over and the next
    /// driver type is tried.
    pub async fn for_window<W>(
        init: &DeviceInit,
        window: W,
    ) -> Result<(Self, wgpu::Surface<'static>), DeviceCreationError>
    where
        W: HasWindowHandle + HasDisplayHandle + Send + Sync + 'static,
    {
        let instance = create_instance(init);
        let surface = instance.create_surface(window)?;
        let gpu = Self::open(instance, init, Some(&surface)).await?;
        Ok((gpu, surface))
    }

    pub(crate) async fn open(
        instance: wgpu::Instance,
        init: &DeviceInit,
        compatible_surface: Option<&wgpu::Surface<'_>>,
    ) -> Result<Self, DeviceCreationError> {
        let mut last_err = DeviceCreationError::NoAdapter(init.driver_types.clone());

        for &driver in &init.driver_types {
            match open_driver(&instance, init, driver, compatible_surface).await {
                Ok((adapter, device, queue, tier)) => {
                    let info = adapter.get_info();
                    log::info!(
                        "using {driver:?} adapter `{}` ({:?}), capability tier {tier:?}",
                        info.name,
                        info.backend
                    );

                    return Ok(Self {
                        queue,
                        device,
                        adapter,
                        instance,
                        tier,
                        driver,
                    });
                }
                Err(err) => {
                    log::warn!("{driver:?} driver unavailable: {err}");
                    last_err = err;
                }
            }
        }

        Err(last_err)
    }

    pub fn instance(&self) -> &wgpu::Instance {
        &self.instance
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Capability tier the device was created with.
    pub fn tier(&self) -> CapabilityTier {
        self.tier
    }

    pub fn driver(&self) -> DriverType {
        self.driver
    }

    /// Blocks until all submitted work has completed.
    pub fn flush(&self) -> Result<(), wgpu::PollError> {
        self.device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .map(|_| ())
    }

    /// Releases the queue, device, adapter and instance, in that order.
    pub(crate) fn release(self, report: &mut TeardownReport) {
        let Self {
            queue,
            device,
            adapter,
            instance,
            ..
        } = self;

        drop(queue);
        drop(device);
        report.record("device");
        drop(adapter);
        drop(instance);
        report.record("instance");
    }
}

fn create_instance(init: &DeviceInit) -> wgpu::Instance {
    let flags = if init.debug {
        wgpu::InstanceFlags::debugging()
    } else {
        wgpu::InstanceFlags::empty()
    };

    wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        flags,
        ..Default::default()
    })
}

async fn open_driver(
    instance: &wgpu::Instance,
    init: &DeviceInit,
    driver: DriverType,
    compatible_surface: Option<&wgpu::Surface<'_>>,
) -> Result<(wgpu::Adapter, wgpu::Device, wgpu::Queue, CapabilityTier), DeviceCreationError> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: init.power_preference,
            compatible_surface,
            force_fallback_adapter: driver == DriverType::Software,
        })
        .await
        .map_err(|err| {
            log::debug!("{driver:?} adapter request failed: {err}");
            DeviceCreationError::NoAdapter(vec![driver])
        })?;

    let tier = select_tier(&init.capability_tiers, &adapter.limits()).ok_or_else(|| {
        DeviceCreationError::NoSupportedTier {
            adapter: adapter.get_info().name,
            requested: init.capability_tiers.clone(),
        }
    })?;

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("nabu device"),
            required_features: init.required_features,
            required_limits: tier.limits(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        })
        .await?;

    Ok((adapter, device, queue, tier))
}

/// Device on wgpu's noop backend, for tests that need real wgpu objects.
#[cfg(test)]
pub(crate) fn noop_device() -> GpuDevice {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::NOOP,
        backend_options: wgpu::BackendOptions {
            noop: wgpu::NoopBackendOptions { enable: true },
            ..Default::default()
        },
        ..Default::default()
    });
    let init = DeviceInit {
        driver_types: vec![DriverType::Hardware],
        ..DeviceInit::default()
    };
    pollster::block_on(GpuDevice::open(instance, &init, None)).expect("noop device")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_list_opens_at_the_highest_tier() {
        let gpu = noop_device();
        assert_eq!(gpu.driver(), DriverType::Hardware);
        assert_eq!(gpu.tier(), CapabilityTier::Full);
        assert!(gpu.flush().is_ok());
    }

    #[test]
    fn device_goes_before_instance() {
        let mut report = TeardownReport::new();
        noop_device().release(&mut report);
        assert_eq!(report.released(), &["device", "instance"]);
    }
}
