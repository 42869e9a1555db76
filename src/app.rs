// ============================================================================
// VIEWER APP — winit event loop driving the view transform and quad renderer
// ============================================================================
//
// One thread owns everything: key events mutate `TransformState` in place and
// the next `RedrawRequested` reads it.  The loop polls and redraws every
// iteration; presentation is vsynced, which paces it.

use std::sync::Arc;

use thiserror::Error;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowBuilder};

use crate::cli::CliArgs;
use crate::gpu::{GpuContext, GpuError, ImageTexture, QuadPipeline};
use crate::ppm::{DecodeError, PixelBuffer};
use crate::transform::{ActionOutcome, TransformState, ViewAction};
use crate::{log_err, log_info, log_warn};

/// Anything that stops the viewer from starting or keeps it from running.
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("could not create the window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error(transparent)]
    Gpu(#[from] GpuError),
}

/// What a key event asks the viewer to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyBinding {
    Apply(ViewAction),
    Reset,
}

/// Map a physical key to a binding.  Presses and auto-repeats both count;
/// releases never do.  Escape and R only fire on the initial press.
pub fn binding_for_key(code: KeyCode, state: ElementState, repeat: bool) -> Option<KeyBinding> {
    if state != ElementState::Pressed {
        return None;
    }
    let action = match code {
        KeyCode::Escape if !repeat => ViewAction::Quit,
        KeyCode::KeyR if !repeat => return Some(KeyBinding::Reset),
        KeyCode::KeyQ => ViewAction::RotateCcw,
        KeyCode::KeyE => ViewAction::RotateCw,
        KeyCode::KeyW => ViewAction::PanUp,
        KeyCode::KeyS => ViewAction::PanDown,
        KeyCode::KeyA => ViewAction::PanLeft,
        KeyCode::KeyD => ViewAction::PanRight,
        KeyCode::KeyX => ViewAction::ShearPositiveX,
        KeyCode::KeyZ => ViewAction::ShearNegativeX,
        KeyCode::KeyV => ViewAction::ShearPositiveY,
        KeyCode::KeyC => ViewAction::ShearNegativeY,
        KeyCode::KeyN => ViewAction::ScaleUp,
        KeyCode::KeyM => ViewAction::ScaleDown,
        _ => return None,
    };
    Some(KeyBinding::Apply(action))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoopControl {
    Continue,
    Exit,
}

/// Open a window showing `image` and run until the user quits.
pub fn run(args: &CliArgs, image: &PixelBuffer) -> Result<(), ViewerError> {
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(args.window_title())
            .with_inner_size(LogicalSize::new(args.width, args.height))
            .build(&event_loop)?,
    );

    let mut viewer = Viewer::new(window, image, args)?;

    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { window_id, event } if window_id == viewer.window.id() => {
            if viewer.handle_window_event(event) == LoopControl::Exit {
                elwt.exit();
            }
        }
        Event::AboutToWait => viewer.window.request_redraw(),
        _ => {}
    })?;

    log_info!("Viewer closed");
    Ok(())
}

/// Everything the event loop owns.
struct Viewer {
    window: Arc<Window>,
    gpu: GpuContext,
    pipeline: QuadPipeline,
    texture: ImageTexture,
    state: TransformState,
}

impl Viewer {
    fn new(window: Arc<Window>, image: &PixelBuffer, args: &CliArgs) -> Result<Self, ViewerError> {
        let gpu = GpuContext::new(window.clone())?;
        if !gpu.supports_size(image.width(), image.height()) {
            return Err(GpuError::TextureTooLarge {
                width: image.width(),
                height: image.height(),
                max: gpu.max_texture_dim,
            }
            .into());
        }

        let pipeline = QuadPipeline::new(&gpu.device, gpu.config.format, args.filtering());
        let texture = ImageTexture::new(
            &gpu.device,
            &gpu.queue,
            &pipeline.texture_bind_group_layout,
            &pipeline.sampler,
            image,
        );
        log_info!(
            "Uploaded {}x{} texture to {}",
            texture.width,
            texture.height,
            gpu.adapter_name
        );

        Ok(Self {
            window,
            gpu,
            pipeline,
            texture,
            state: TransformState::with_pan_mode(args.pan_mode.into()),
        })
    }

    fn handle_window_event(&mut self, event: WindowEvent) -> LoopControl {
        match event {
            WindowEvent::CloseRequested => LoopControl::Exit,
            WindowEvent::Resized(size) => {
                self.gpu.resize(size.width, size.height);
                LoopControl::Continue
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(&event),
            WindowEvent::RedrawRequested => self.render(),
            _ => LoopControl::Continue,
        }
    }

    fn handle_key(&mut self, event: &KeyEvent) -> LoopControl {
        let PhysicalKey::Code(code) = event.physical_key else {
            return LoopControl::Continue;
        };
        match binding_for_key(code, event.state, event.repeat) {
            Some(KeyBinding::Apply(action)) => match self.state.apply_action(action) {
                ActionOutcome::Quit => {
                    log_info!("Quit requested");
                    LoopControl::Exit
                }
                ActionOutcome::Continue => LoopControl::Continue,
            },
            Some(KeyBinding::Reset) => {
                self.state.reset();
                LoopControl::Continue
            }
            None => LoopControl::Continue,
        }
    }

    fn render(&mut self) -> LoopControl {
        let frame = match self.gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log_warn!("Surface lost or outdated; reconfiguring");
                self.gpu.reconfigure();
                return LoopControl::Continue;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log_err!("GPU out of memory; closing viewer");
                return LoopControl::Exit;
            }
            Err(e) => {
                log_warn!("Skipping frame: {}", e);
                return LoopControl::Continue;
            }
        };

        // Projection follows the window every frame.
        let mvp = self.state.mvp(self.gpu.aspect_ratio());
        self.pipeline.write_mvp(&self.gpu.queue, &mvp);

        let target = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("quad_encoder"),
            });
        self.pipeline.draw(&mut encoder, &target, &self.texture);
        self.gpu.submit_one(encoder);
        frame.present();

        LoopControl::Continue
    }
}
