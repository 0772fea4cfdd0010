//! The plugin's long-term state, as seen by the host and the editor.
//!
//! This plugin has no parameters and persists nothing: the host is offered a single unnamed
//! program, and preset/bank chunks are empty. The only value shared across threads is the
//! `PrecisionIndicator`, written by the audio processing thread whenever a render path runs and
//! polled by the editor on the UI thread.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use log::debug;
use vst::plugin::{HostCallback, PluginParameters};

/// The sample precision of the render path that most recently executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Precision {
    /// No audio has been processed yet.
    Unknown,
    Single,
    Double,
}

impl Precision {
    fn to_u8(self) -> u8 {
        match self {
            Precision::Unknown => 0,
            Precision::Single => 1,
            Precision::Double => 2,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Precision::Single,
            2 => Precision::Double,
            _ => Precision::Unknown,
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precision::Unknown => Ok(()),
            Precision::Single => f.write_str("single"),
            Precision::Double => f.write_str("double"),
        }
    }
}

/// Lock-free single value cell holding a `Precision`.
///
/// There is exactly one writer (the audio thread) and any number of readers, and no other memory
/// is published through it, so relaxed ordering is sufficient.
#[derive(Debug)]
pub struct PrecisionIndicator(AtomicU8);

impl PrecisionIndicator {
    pub fn new() -> Self {
        Self(AtomicU8::new(Precision::Unknown.to_u8()))
    }

    pub fn set(&self, precision: Precision) {
        self.0.store(precision.to_u8(), Ordering::Relaxed);
    }

    pub fn get(&self) -> Precision {
        Precision::from_u8(self.0.load(Ordering::Relaxed))
    }
}

impl Default for PrecisionIndicator {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of programs reported to the host. Some hosts misbehave when told there are none.
pub const NUM_PROGRAMS: i32 = 1;

pub struct PluginState {
    #[allow(dead_code)]
    host: HostCallback,
    precision: Arc<PrecisionIndicator>,
}

/// VST-accessible long-term plugin state storage. This is accessed through the audio processing
/// thread and the UI thread, so anything mutable must be thread-safe.
impl PluginState {
    pub fn new(host: HostCallback, precision: Arc<PrecisionIndicator>) -> Self {
        Self { host, precision }
    }

    pub fn precision(&self) -> Precision {
        self.precision.get()
    }
}

/// The DAW accesses programs and opaque state chunks through the VST API. All of them are
/// fixed or ignored.
impl PluginParameters for PluginState {
    fn change_preset(&self, preset: i32) {
        debug!("Ignoring change to program {}", preset);
    }

    fn get_preset_num(&self) -> i32 {
        0
    }

    fn set_preset_name(&self, name: String) {
        debug!("Ignoring program rename to {:?}", name);
    }

    fn get_preset_name(&self, _preset: i32) -> String {
        String::new()
    }

    fn get_preset_data(&self) -> Vec<u8> {
        Vec::new()
    }

    fn get_bank_data(&self) -> Vec<u8> {
        Vec::new()
    }

    fn load_preset_data(&self, data: &[u8]) {
        debug!("Ignoring {} bytes of preset data", data.len());
    }

    fn load_bank_data(&self, data: &[u8]) {
        debug!("Ignoring {} bytes of bank data", data.len());
    }
}

/// The editor only ever reads the precision indicator.
impl crate::editor::EditorRemoteState for PluginState {
    fn precision(&self) -> Precision {
        self.precision.get()
    }
}
