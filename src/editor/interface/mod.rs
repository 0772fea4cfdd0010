//! All the logic behind the editor UI is contained within this module.
//!
//! The UI is split into graphics rendering and the label state, both of which are managed within
//! the `EditorInterface` type.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use log::warn;
use vst_window::{EditorWindow, EventSource};
use wgpu_glyph::ab_glyph::FontArc;

use crate::config::EditorConfig;

mod graphics;
mod state;

use super::EditorRemoteState;
pub(super) use state::InterfaceState;

/// Actual pixel width of the editor window.
pub(super) const SIZE_X: usize = 400;
/// Actual pixel height of the editor window.
pub(super) const SIZE_Y: usize = 300;

/// Fonts tried, in order, when no font is configured.
const SYSTEM_FONTS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
];

/// Represents a window containing an editor interface. A new one is used each time the parent
/// window provided by the host DAW is opened or closed.
pub(super) struct EditorInterface {
    renderer: graphics::Renderer,
    event_source: EventSource,
    state: InterfaceState,
}

impl EditorInterface {
    /// Setup the `EditorInterface` within the provided parent `EditorWindow` to respond to events
    /// from the corresponding `EventSource`.
    pub fn new(
        window: EditorWindow,
        event_source: EventSource,
        initial_state: InterfaceState,
        config: &EditorConfig,
    ) -> anyhow::Result<Self> {
        let font = match load_font(config.font_path.as_deref()) {
            Ok(font) => Some(font),
            Err(e) => {
                warn!("Editor label disabled: {:#}", e);
                None
            }
        };
        let renderer = graphics::Renderer::new(window, font)?;

        Ok(Self {
            renderer,
            event_source,
            state: initial_state,
        })
    }

    /// Run as much as possible of the editor interface without blocking. Window input is drained
    /// but otherwise ignored, the label is refreshed from the remote state, and the new state of
    /// the UI is rendered.
    pub fn run_tasks<S: EditorRemoteState>(&mut self, remote_state: &S) {
        while self.event_source.poll_event().is_some() {}

        self.state.refresh(Instant::now(), remote_state);
        self.renderer.draw_frame(&self.state);
    }
}

/// Loads the configured font, or the first system font that can be found.
fn load_font(configured: Option<&Path>) -> anyhow::Result<FontArc> {
    let candidates: Vec<PathBuf> = match configured {
        Some(path) => vec![path.to_path_buf()],
        None => SYSTEM_FONTS.iter().map(PathBuf::from).collect(),
    };

    let path = candidates
        .iter()
        .find(|path| path.is_file())
        .context("no usable font found")?;
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    FontArc::try_from_vec(bytes).with_context(|| format!("invalid font {}", path.display()))
}
