// ============================================================================
// GPU CONTEXT — window surface, wgpu Device, Queue, and adapter initialization
// ============================================================================

use std::sync::Arc;

use thiserror::Error;
use winit::window::Window;

use crate::{log_info, log_warn};

/// Failures while bringing up or using the GPU.
#[derive(Error, Debug)]
pub enum GpuError {
    #[error("could not create a drawing surface for the window: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no GPU adapter (hardware or software) can present to this window")]
    NoAdapter,

    #[error("the GPU adapter reports no usable surface format")]
    SurfaceUnsupported,

    #[error("could not open the GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("{width}x{height} image exceeds the GPU texture limit of {max}")]
    TextureTooLarge { width: u32, height: u32, max: u32 },
}

/// Holds the core wgpu resources for the viewer window.
/// Created once at startup, after the window exists.
pub struct GpuContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub adapter_name: String,
    /// Maximum texture dimension supported by this device.
    pub max_texture_dim: u32,
}

impl GpuContext {
    /// Create a GPU context presenting to `window`.  Tries a hardware adapter
    /// first, then falls back to a software rasterizer
    /// (`force_fallback_adapter`) so the viewer still opens without a GPU.
    ///
    /// We use `pollster::block_on` because the viewer is single-threaded
    /// and has nothing else to do until the device exists.
    pub fn new(window: Arc<Window>) -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let size = window.inner_size();
        let surface = instance.create_surface(window)?;

        let adapter = match pollster::block_on(Self::request_adapter(&instance, &surface, false)) {
            Some(adapter) => adapter,
            None => {
                log_warn!("Hardware adapter unavailable, trying software fallback");
                pollster::block_on(Self::request_adapter(&instance, &surface, true))
                    .ok_or(GpuError::NoAdapter)?
            }
        };

        let info = adapter.get_info();
        let adapter_name = info.name.clone();
        log_info!("GPU adapter: {} ({:?})", adapter_name, info.backend);

        let limits = adapter.limits();
        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("quadview GPU"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: limits.max_texture_dimension_2d,
                    ..wgpu::Limits::downlevel_webgl2_defaults()
                },
            },
            None,
        ))?;

        let caps = surface.get_capabilities(&adapter);
        // Sample the raw bytes straight through: prefer a non-sRGB target so
        // colours match the file exactly.
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(GpuError::SurfaceUnsupported)?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log_info!(
            "Surface configured: {:?} {}x{}",
            format,
            config.width,
            config.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            adapter_name,
            max_texture_dim: limits.max_texture_dimension_2d,
        })
    }

    async fn request_adapter(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'static>,
        force_fallback: bool,
    ) -> Option<wgpu::Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: force_fallback,
            })
            .await
    }

    /// Check if a texture of the given dimensions can be created.
    pub fn supports_size(&self, width: u32, height: u32) -> bool {
        width <= self.max_texture_dim && height <= self.max_texture_dim
    }

    /// Track a new window size.  Zero-sized (minimised) windows keep a 1x1
    /// surface so the configuration stays valid.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
    }

    /// Re-apply the current configuration after the surface was lost.
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Framebuffer width over height, recomputed on every call.
    pub fn aspect_ratio(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    /// Submit a single encoder's commands.
    pub fn submit_one(&self, encoder: wgpu::CommandEncoder) {
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}
