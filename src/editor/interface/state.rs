//! The editor interface is scheduled to be drawn periodically by the host DAW. This module holds
//! the `InterfaceState` struct, which decides what the label says on each frame.

use std::time::{Duration, Instant};

use crate::editor::EditorRemoteState;
use crate::plugin_state::Precision;

const LABEL_PREFIX: &str = "Current audio-processing precision is:  ";

/// Holds any state required to render the editor interface.
pub(in crate::editor) struct InterfaceState {
    opened_at: Instant,
    /// The host needs a moment to start processing after the editor opens; until then the
    /// indicator is not read.
    settle_delay: Duration,
    precision: Option<Precision>,
}

impl InterfaceState {
    pub fn new(opened_at: Instant, settle_delay: Duration) -> Self {
        Self {
            opened_at,
            settle_delay,
            precision: None,
        }
    }

    /// Reads the remote precision indicator, once the settle delay has passed.
    pub fn refresh<S: EditorRemoteState>(&mut self, now: Instant, remote_state: &S) {
        if now.saturating_duration_since(self.opened_at) >= self.settle_delay {
            self.precision = Some(remote_state.precision());
        }
    }

    pub fn label(&self) -> String {
        match self.precision {
            Some(precision) => format!("{}{}", LABEL_PREFIX, precision),
            None => LABEL_PREFIX.to_string(),
        }
    }
}
