//! Sample types and the channel storage that audio is rendered into.
//!
//! Everything in the signal path is generic over `Sample`, so the same code serves both the
//! single-precision and the double-precision entry points of the host.

use std::ops::AddAssign;

use num_traits::Float;
use vst::buffer::Outputs;

use crate::plugin_state::Precision;

/// A floating-point sample format the host may ask the plugin to process.
pub trait Sample: Float + AddAssign + Send + 'static {
    /// The precision reported to the editor when rendering in this format.
    const PRECISION: Precision;

    /// Lossy conversion from the `f64` domain used for phase arithmetic.
    fn from_f64(value: f64) -> Self;

    fn into_f64(self) -> f64;
}

impl Sample for f32 {
    const PRECISION: Precision = Precision::Single;

    fn from_f64(value: f64) -> Self {
        value as f32
    }

    fn into_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Sample for f64 {
    const PRECISION: Precision = Precision::Double;

    fn from_f64(value: f64) -> Self {
        value
    }

    fn into_f64(self) -> f64 {
        self
    }
}

/// A set of equally sized output channels that can be rendered into.
///
/// This is implemented for the host's output buffers as well as plain nested `Vec`s, which keeps
/// the DSP code independent of the VST buffer types.
pub trait ChannelBuffer<S: Sample> {
    fn num_channels(&self) -> usize;

    fn num_samples(&self) -> usize;

    fn channel(&self, index: usize) -> &[S];

    fn channel_mut(&mut self, index: usize) -> &mut [S];

    /// Adds `value` onto the existing content of `channel` at position `index`.
    fn add_sample(&mut self, channel: usize, index: usize, value: S) {
        self.channel_mut(channel)[index] += value;
    }
}

impl<'a, S: Sample> ChannelBuffer<S> for Outputs<'a, S> {
    fn num_channels(&self) -> usize {
        self.len()
    }

    fn num_samples(&self) -> usize {
        if self.len() == 0 {
            0
        } else {
            self[0].len()
        }
    }

    fn channel(&self, index: usize) -> &[S] {
        &self[index]
    }

    fn channel_mut(&mut self, index: usize) -> &mut [S] {
        &mut self[index]
    }
}

impl<S: Sample> ChannelBuffer<S> for Vec<Vec<S>> {
    fn num_channels(&self) -> usize {
        self.len()
    }

    fn num_samples(&self) -> usize {
        self.iter().map(Vec::len).min().unwrap_or(0)
    }

    fn channel(&self, index: usize) -> &[S] {
        &self[index]
    }

    fn channel_mut(&mut self, index: usize) -> &mut [S] {
        &mut self[index]
    }
}
