//! The plugin's digital signal processing is fully implemented within this module.
//!
//! `PluginDsp` is only accessed from the host's calls into the plugin: lifecycle calls on
//! whatever thread the host chooses, and processing calls on the audio thread. All of them arrive
//! through `&mut self`, so they never overlap for a single instance. The only state leaving this
//! module is the `PrecisionIndicator`, which is updated lock-free on every render.

use std::sync::Arc;

use log::{debug, info, warn};
use vst::buffer::{AudioBuffer, Outputs};

use crate::config::{Config, RenderMode};
use crate::layout::BusLayout;
use crate::lifecycle::Lifecycle;
use crate::plugin_state::{Precision, PrecisionIndicator};
use crate::profiler::Profiler;

pub mod oscillator;
pub mod sample;
pub mod scratch;

use oscillator::{DoubleOscillator, OscillatorConfig, SingleOscillator};
use sample::{ChannelBuffer, Sample};
use scratch::ScratchBuffer;

/// The scratch buffer is sized generously, so that hosts delivering slightly larger blocks than
/// announced don't force an allocation on the audio thread.
const SCRATCH_OVERSIZE: usize = 2;

/// Largest block size the scratch buffer is prepared for. Hosts announcing more are capped here.
pub const MAX_BLOCK_SIZE: usize = 1 << 16;

/// Handles all audio processing algorithms for the plugin.
pub struct PluginDsp {
    lifecycle: Lifecycle,
    render_mode: RenderMode,

    single: SingleOscillator,
    double: DoubleOscillator,
    scratch: ScratchBuffer<f64>,

    profiler: Profiler,
    precision: Arc<PrecisionIndicator>,

    logged_single: bool,
    logged_double: bool,
    logged_bad_layout: bool,
}

impl PluginDsp {
    pub fn new(config: &Config, precision: Arc<PrecisionIndicator>) -> Self {
        Self {
            lifecycle: Lifecycle::default(),
            render_mode: config.render_mode,

            single: SingleOscillator::new(OscillatorConfig::SINGLE),
            double: DoubleOscillator::new(OscillatorConfig::DOUBLE),
            scratch: ScratchBuffer::new(),

            profiler: Profiler::new("PrecisionPoc_Profiler", config.profiler.clone()),
            precision,

            logged_single: false,
            logged_double: false,
            logged_bad_layout: false,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn single_oscillator(&self) -> &SingleOscillator {
        &self.single
    }

    pub fn double_oscillator(&self) -> &DoubleOscillator {
        &self.double
    }

    /// Resets both oscillators for the given sample rate and sizes the scratch buffer for blocks
    /// of up to `block_size` samples.
    pub fn prepare(&mut self, sample_rate: f64, block_size: usize, num_channels: usize) {
        self.single.prepare(sample_rate);
        self.double.prepare(sample_rate);

        if block_size > MAX_BLOCK_SIZE {
            warn!(
                "Host block size {} exceeds {}; capping",
                block_size, MAX_BLOCK_SIZE
            );
        }
        let block_size = block_size.min(MAX_BLOCK_SIZE);
        let num_samples = block_size
            .checked_mul(SCRATCH_OVERSIZE)
            .unwrap_or(MAX_BLOCK_SIZE);
        if self.scratch.is_allocated() {
            debug!(
                "PREPARE: resizing double buffer to {} channels, {} samples",
                num_channels, num_samples
            );
        } else {
            debug!(
                "PREPARE: allocating double buffer of {} channels, {} samples",
                num_channels, num_samples
            );
        }
        self.scratch.prepare(num_channels, num_samples);

        self.profiler.reset();
        self.lifecycle = self.lifecycle.prepare();
        info!("Prepared at {} Hz, block size {}", sample_rate, block_size);
    }

    /// Silences both oscillators. Processing calls are ignored until the next `prepare`.
    pub fn release(&mut self) {
        match self.lifecycle.release() {
            Some(next) => {
                self.single.release();
                self.double.release();
                self.lifecycle = next;
                info!("Released resources");
            }
            None => debug!("Release requested while {:?}; nothing to do", self.lifecycle),
        }
    }

    /// Single-precision entry point from the host.
    // Denormals are not flushed on either path.
    pub fn process_f32(&mut self, buffer: &mut AudioBuffer<f32>) {
        let num_samples = buffer.samples();
        if let Some(mut outputs) = self.pass_through(buffer) {
            self.render_single(&mut outputs, num_samples);
        }
    }

    /// Double-precision entry point from the host.
    pub fn process_f64(&mut self, buffer: &mut AudioBuffer<f64>) {
        let num_samples = buffer.samples();
        if let Some(mut outputs) = self.pass_through(buffer) {
            self.render_double(&mut outputs, num_samples);
        }
    }

    /// Adds the single-precision path's output onto `output`.
    pub fn render_single<B: ChannelBuffer<f32> + ?Sized>(
        &mut self,
        output: &mut B,
        num_samples: usize,
    ) {
        if !self.begin_render::<f32>() {
            return;
        }

        self.profiler.start();
        match self.render_mode {
            RenderMode::Native => self.single.render(output, 0, num_samples),
            RenderMode::SingleViaDouble => {
                self.scratch.copy_from(&*output, num_samples);
                let scratch_len = self.scratch.num_samples();
                self.double.render(&mut self.scratch, 0, scratch_len);
                self.scratch.copy_into(&mut *output);
            }
            RenderMode::CopyOnly => {
                self.scratch.copy_from(&*output, num_samples);
                self.scratch.copy_into(&mut *output);
            }
        }
        self.profiler.stop();
    }

    /// Adds the double-precision path's output onto `output`.
    pub fn render_double<B: ChannelBuffer<f64> + ?Sized>(
        &mut self,
        output: &mut B,
        num_samples: usize,
    ) {
        if !self.begin_render::<f64>() {
            return;
        }

        self.profiler.start();
        self.double.render(output, 0, num_samples);
        self.profiler.stop();
    }

    /// Publishes the precision of the path about to run, and reports whether it may run at all.
    fn begin_render<S: Sample>(&mut self) -> bool {
        if !self.lifecycle.can_render() {
            return false;
        }

        self.precision.set(S::PRECISION);
        let logged = match S::PRECISION {
            Precision::Single => &mut self.logged_single,
            Precision::Double => &mut self.logged_double,
            Precision::Unknown => return true,
        };
        if !*logged {
            debug!("Rendering in {}-precision mode...", S::PRECISION);
            *logged = true;
        }
        true
    }

    /// Copies the host's input onto its output, so that rendering adds to the incoming signal.
    /// Returns `None`, leaving the buffer untouched, while not prepared or if the host's channel
    /// arrangement isn't one this plugin accepts.
    fn pass_through<'a, S: Sample>(
        &mut self,
        buffer: &'a mut AudioBuffer<S>,
    ) -> Option<Outputs<'a, S>> {
        if !self.lifecycle.can_render() {
            return None;
        }

        let layout = BusLayout::from_counts(buffer.input_count(), buffer.output_count());
        if !layout.is_supported() {
            if !self.logged_bad_layout {
                warn!("Skipping processing for unsupported bus layout {:?}", layout);
                self.logged_bad_layout = true;
            }
            return None;
        }

        let num_samples = buffer.samples();
        let (inputs, mut outputs) = buffer.split();
        for channel in 0..outputs.len() {
            for i in 0..num_samples {
                outputs[channel][i] = inputs[channel][i];
            }
        }
        Some(outputs)
    }
}
