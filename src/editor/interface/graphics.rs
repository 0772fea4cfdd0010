//! Fully handles drawing of the editor window.
//!
//! Rendering is achieved with `wgpu`, which provides a very low-level API. The window only ever
//! shows a background and one line of text, so there are no shaders of our own: the background is
//! the render pass clear color, and text is drawn by `wgpu_glyph`.

use anyhow::Context;
use log::{debug, warn};
use wgpu_glyph::{ab_glyph::FontArc, GlyphBrush, GlyphBrushBuilder};

use super::{state::InterfaceState, SIZE_X, SIZE_Y};

const BACKGROUND_COLOR: wgpu::Color = wgpu::Color {
    r: 0.16,
    g: 0.18,
    b: 0.2,
    a: 1.0,
};
const FONT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const FONT_SCALE: f32 = 15.;

/// Contains all handles to GPU resources required for rendering the editor interface.
pub(super) struct Renderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface,

    /// `None` if no font could be loaded, in which case only the background is drawn.
    text_renderer: Option<GlyphBrush<()>>,
    /// Required by `wgpu_glyph`
    local_pool: futures::executor::LocalPool,
    /// Required by `wgpu_glyph`
    staging_belt: wgpu::util::StagingBelt,
}

impl Renderer {
    /// Creates a new `Renderer` by initializing the GPU to prepare it for rendering.
    pub fn new<W: raw_window_handle::HasRawWindowHandle>(
        handle: W,
        font: Option<FontArc>,
    ) -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(wgpu::Backends::PRIMARY);

        // Acquire the window as a surface to be rendered on.
        // This is the only unsafe code in the plugin; it is only required to satisfy the
        // `raw_window_handle` API. Safety is upheld by taking ownership of `handle` in the
        // function signature, ensuring it is only ever used to create a single surface.
        let surface = unsafe { instance.create_surface(&handle) };

        // Get a handle to the GPU and a queue of commands to be uploaded to it while rendering.
        let (device, queue, render_format) = futures::executor::block_on(async {
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::LowPower,
                    force_fallback_adapter: false,
                    compatible_surface: Some(&surface),
                })
                .await
                .context("no graphics adapter can render to the editor window")?;

            let render_format = surface
                .get_preferred_format(&adapter)
                .unwrap_or(wgpu::TextureFormat::Bgra8Unorm);

            let (device, queue) = adapter
                .request_device(
                    &wgpu::DeviceDescriptor {
                        label: None,
                        features: wgpu::Features::empty(),
                        limits: wgpu::Limits::downlevel_defaults(),
                    },
                    None,
                )
                .await
                .context("failed to open the graphics device")?;

            Ok::<_, anyhow::Error>((device, queue, render_format))
        })?;

        surface.configure(
            &device,
            &wgpu::SurfaceConfiguration {
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                format: render_format,
                width: SIZE_X as u32,
                height: SIZE_Y as u32,
                present_mode: wgpu::PresentMode::Fifo,
            },
        );

        // Font rendering is conveniently handled by `wgpu_glyph` :)
        let text_renderer =
            font.map(|font| GlyphBrushBuilder::using_font(font).build(&device, render_format));

        Ok(Self {
            device,
            queue,
            surface,

            text_renderer,
            local_pool: futures::executor::LocalPool::new(),
            staging_belt: wgpu::util::StagingBelt::new(1024),
        })
    }

    /// Render a single frame of the given interface state to the screen.
    pub fn draw_frame(&mut self, state: &InterfaceState) {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(e) => {
                debug!("Skipping editor frame: {}", e);
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        // The pass does nothing but clear the frame to the background color.
        drop(encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: None,
            color_attachments: &[wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(BACKGROUND_COLOR),
                    store: true,
                },
            }],
            depth_stencil_attachment: None,
        }));

        if let Some(text_renderer) = &mut self.text_renderer {
            let label = state.label();
            text_renderer.queue(wgpu_glyph::Section {
                text: vec![wgpu_glyph::Text::new(&label)
                    .with_color(FONT_COLOR)
                    .with_scale(FONT_SCALE)],
                layout: wgpu_glyph::Layout::default_single_line()
                    .h_align(wgpu_glyph::HorizontalAlign::Center)
                    .v_align(wgpu_glyph::VerticalAlign::Center),
                screen_position: (SIZE_X as f32 / 2., SIZE_Y as f32 / 2.),
                bounds: (SIZE_X as f32, SIZE_Y as f32),
            });
            if let Err(e) = text_renderer.draw_queued(
                &self.device,
                &mut self.staging_belt,
                &mut encoder,
                &view,
                SIZE_X as u32,
                SIZE_Y as u32,
            ) {
                warn!("Failed to draw editor label: {}", e);
            }
        }

        self.staging_belt.finish();
        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        use futures::task::SpawnExt;
        if let Err(e) = self.local_pool.spawner().spawn(self.staging_belt.recall()) {
            warn!("Failed to recall staging belt: {}", e);
        }
        self.local_pool.run_until_stalled();
    }
}
