//! In VST terminology, the editor is a graphical window that can be used to display and interact
//! with a plugin using a custom visual appearance.
//!
//! This editor is passive. It runs fully on the UI thread, manages an OS window through the
//! cross-platform API exposed by the `vst_window` crate, and displays the precision of the most
//! recent render. It never writes to the plugin state.

use std::sync::Arc;
use std::time::Instant;

use log::{error, info};
use vst::editor::Editor;
use vst_window::setup;

use crate::config::EditorConfig;
use crate::plugin_state::{PluginState, Precision};

mod interface;
use interface::{EditorInterface, InterfaceState, SIZE_X, SIZE_Y};

/// Persistent VST-compatible wrapper that opens and closes an `EditorInterface`.
pub(super) struct PluginEditor {
    opened_interface: Option<EditorInterface>,
    remote_state: Arc<PluginState>,
    config: EditorConfig,
}

impl PluginEditor {
    pub fn new(remote_state: Arc<PluginState>, config: EditorConfig) -> Self {
        Self {
            opened_interface: None,
            remote_state,
            config,
        }
    }
}

/// `PluginEditor` responds directly to VST API calls specific to the UI thread.
impl Editor for PluginEditor {
    fn size(&self) -> (i32, i32) {
        (SIZE_X as i32, SIZE_Y as i32)
    }

    fn position(&self) -> (i32, i32) {
        (0, 0)
    }

    fn open(&mut self, parent: *mut core::ffi::c_void) -> bool {
        if self.opened_interface.is_some() {
            return false;
        }

        let (window, event_source) = setup(parent, (SIZE_X as i32, SIZE_Y as i32));
        let initial_state = InterfaceState::new(Instant::now(), self.config.settle_delay());
        match EditorInterface::new(window, event_source, initial_state, &self.config) {
            Ok(interface) => {
                info!("Editor opened");
                self.opened_interface = Some(interface);
                true
            }
            Err(e) => {
                error!("Failed to open editor: {:#}", e);
                false
            }
        }
    }

    fn close(&mut self) {
        drop(self.opened_interface.take());
    }

    fn is_open(&mut self) -> bool {
        self.opened_interface.is_some()
    }

    fn idle(&mut self) {
        if let Some(opened_interface) = &mut self.opened_interface {
            opened_interface.run_tasks(&*self.remote_state);
        }
    }
}

/// The editor interface holds a handle directly to the remote VST plugin state, which should
/// implement this trait. The editor only reads from it.
pub(super) trait EditorRemoteState {
    /// Precision of the render path that ran most recently.
    fn precision(&self) -> Precision;
}
