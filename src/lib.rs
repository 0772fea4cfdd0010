//! precision-poc is a minimal VST2 plugin demonstrating single- versus double-precision audio
//! rendering.
//!
//! The host decides which precision to use by calling either `process` or `process_f64`. Each
//! entry point renders a 440 Hz tone with its own oscillator configuration, added on top of the
//! incoming audio, and records which precision it used. The editor window displays the most
//! recently used precision.
//!
//! Timing of render calls and lifecycle events is written to a log file; see the `config` module
//! for how to change its location and the render mode used for profiling.

use std::sync::Arc;

use log::{debug, info, warn};
use vst::{
    api::Supported,
    buffer::AudioBuffer,
    editor::Editor,
    plugin::{CanDo, Category, HostCallback, Info, Plugin, PluginParameters},
};

pub mod config;
use config::Config;

pub mod dsp;
use dsp::PluginDsp;

mod editor;
use editor::PluginEditor;

pub mod layout;
use layout::BusLayout;

pub mod lifecycle;
pub mod logging;
pub mod profiler;

pub mod plugin_state;
use plugin_state::{PluginState, PrecisionIndicator, NUM_PROGRAMS};

/// Used until the host reports its actual sample rate.
const DEFAULT_SAMPLE_RATE: f64 = 44_100.;
/// Used until the host reports its actual maximum block size.
const DEFAULT_BLOCK_SIZE: usize = 512;

/// Top level wrapper that exposes a full `vst::Plugin` implementation.
pub struct PrecisionPocVst {
    /// The `PluginDsp` handles all of the plugin's audio processing, and is only accessed through
    /// the host's lifecycle and processing calls.
    dsp: PluginDsp,

    /// The `PluginState` answers the host's program and state queries, and gives the editor read
    /// access to the precision indicator.
    state_handle: Arc<PluginState>,

    /// The `PluginEditor` implements the plugin's editor window. It's temporarily stored here
    /// until being moved to the UI thread by the first `get_editor` method call.
    editor_placeholder: Option<PluginEditor>,

    sample_rate: f64,
    block_size: usize,
}

impl PrecisionPocVst {
    /// Initializes the VST plugin, along with an optional `HostCallback` handle.
    fn new_maybe_host(maybe_host: Option<HostCallback>) -> Self {
        let host = maybe_host.unwrap_or_default();

        let (config, config_error) = match Config::load() {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(e)),
        };

        match logging::init(&config.log) {
            Ok(path) => info!("Audio processor constructed; logging to {}", path.display()),
            Err(e) => eprintln!("precision-poc: logging disabled: {:#}", e),
        }
        if let Some(e) = config_error {
            warn!("Using default configuration: {:#}", e);
        }

        Self::with_config(host, &config)
    }

    /// Builds a plugin instance from an explicit configuration, without touching the
    /// environment or installing a logger.
    pub fn with_config(host: HostCallback, config: &Config) -> Self {
        let precision = Arc::new(PrecisionIndicator::new());
        let state_handle = Arc::new(PluginState::new(host, Arc::clone(&precision)));

        let editor_placeholder = Some(PluginEditor::new(
            Arc::clone(&state_handle),
            config.editor.clone(),
        ));

        let dsp = PluginDsp::new(config, precision);
        info!("Constructor done, render mode {:?}", config.render_mode);

        Self {
            dsp,
            state_handle,
            editor_placeholder,
            sample_rate: DEFAULT_SAMPLE_RATE,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }

    pub fn dsp(&self) -> &PluginDsp {
        &self.dsp
    }

    pub fn state(&self) -> &PluginState {
        &self.state_handle
    }
}

/// `vst::plugin_main` requires a `Default` implementation.
impl Default for PrecisionPocVst {
    fn default() -> Self {
        Self::new_maybe_host(None)
    }
}

/// Main `vst` plugin implementation.
impl Plugin for PrecisionPocVst {
    fn new(host: HostCallback) -> Self {
        Self::new_maybe_host(Some(host))
    }

    fn get_info(&self) -> Info {
        /// Use a hash of a string describing this plugin to avoid unique ID conflicts.
        const UNIQUE_ID_SEED: &str = "precision-poc Single/Double Precision VST2 Plugin";
        static UNIQUE_ID: once_cell::sync::Lazy<i32> = once_cell::sync::Lazy::new(|| {
            use std::collections::hash_map::DefaultHasher;
            use std::hash::{Hash, Hasher};

            let mut s = DefaultHasher::new();
            UNIQUE_ID_SEED.hash(&mut s);
            s.finish() as i32
        });

        Info {
            name: "precision-poc".to_string(),
            vendor: "precision-poc".to_string(),
            unique_id: *UNIQUE_ID,
            category: Category::Effect,
            inputs: BusLayout::DEFAULT.input.channel_count() as i32,
            outputs: BusLayout::DEFAULT.output.channel_count() as i32,
            presets: NUM_PROGRAMS,
            parameters: 0,
            initial_delay: 0,
            preset_chunks: true,
            f64_precision: true,
            ..Info::default()
        }
    }

    fn set_sample_rate(&mut self, rate: f32) {
        self.sample_rate = f64::from(rate);
    }

    fn set_block_size(&mut self, size: i64) {
        self.block_size = size.max(0) as usize;
    }

    /// Called by the host before processing starts; equivalent to "prepare to play".
    fn resume(&mut self) {
        self.dsp.prepare(
            self.sample_rate,
            self.block_size,
            BusLayout::DEFAULT.output.channel_count(),
        );
    }

    /// Called by the host once processing stops; equivalent to "release resources".
    fn suspend(&mut self) {
        self.dsp.release();
    }

    fn process(&mut self, buffer: &mut AudioBuffer<f32>) {
        self.dsp.process_f32(buffer);
    }

    fn process_f64(&mut self, buffer: &mut AudioBuffer<f64>) {
        self.dsp.process_f64(buffer);
    }

    fn can_do(&self, can_do: CanDo) -> Supported {
        match can_do {
            CanDo::ReceiveEvents
            | CanDo::ReceiveMidiEvent
            | CanDo::SendEvents
            | CanDo::SendMidiEvent => Supported::No,
            _ => Supported::Maybe,
        }
    }

    fn get_parameter_object(&mut self) -> Arc<dyn PluginParameters> {
        Arc::clone(&self.state_handle) as Arc<dyn PluginParameters>
    }

    fn get_editor(&mut self) -> Option<Box<dyn Editor>> {
        self.editor_placeholder
            .take()
            .map(|editor| Box::new(editor) as Box<dyn Editor>)
    }
}

impl Drop for PrecisionPocVst {
    fn drop(&mut self) {
        if self.dsp.lifecycle().can_render() {
            debug!("Plugin dropped while still prepared");
        }
        info!("Audio processor destroyed");
    }
}

vst::plugin_main!(PrecisionPocVst);
