//! A fixed-frequency sine oscillator shared by both precision paths.
//!
//! The single- and double-precision paths differ in their waveform and in how the phase
//! accumulator is kept in range. Both differences are captured by `OscillatorConfig` rather than by
//! separate oscillator types.

use std::f64::consts::TAU;

use super::sample::{ChannelBuffer, Sample};

/// How the phase accumulator behaves once it passes a full cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseWrap {
    /// The phase keeps growing for the lifetime of the oscillator. Precision of the generated
    /// tone degrades slowly as the argument to `sin` gets large.
    Unbounded,
    /// The phase is wrapped back into `[0, 2π)` after every sample.
    Cycle,
}

/// Constant parameters of an oscillator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OscillatorConfig {
    /// Tone frequency, in Hz.
    pub frequency: f64,
    /// Linear gain applied to the sum of all partials.
    pub level: f64,
    /// Number of harmonic partials summed into each sample. `1` is a pure sine; `2` adds the
    /// octave above at equal amplitude.
    pub partials: u32,
    pub wrap: PhaseWrap,
}

impl OscillatorConfig {
    /// Configuration used by the single-precision render path.
    pub const SINGLE: OscillatorConfig = OscillatorConfig {
        frequency: 440.,
        level: 0.25,
        partials: 1,
        wrap: PhaseWrap::Unbounded,
    };

    /// Configuration used by the double-precision render path.
    pub const DOUBLE: OscillatorConfig = OscillatorConfig {
        frequency: 440.,
        level: 0.1,
        partials: 2,
        wrap: PhaseWrap::Cycle,
    };
}

/// Renders a never-ending tone into a `ChannelBuffer` of sample type `S`.
///
/// The oscillator is silent until `prepare` has been called, and falls silent again after
/// `release`.
pub struct Oscillator<S: Sample> {
    config: OscillatorConfig,
    /// Current position in the waveform, in radians.
    phase: f64,
    /// Radians advanced per sample. Zero while unprepared or released.
    phase_delta: f64,
    level: S,
}

pub type SingleOscillator = Oscillator<f32>;
pub type DoubleOscillator = Oscillator<f64>;

impl<S: Sample> Oscillator<S> {
    pub fn new(config: OscillatorConfig) -> Self {
        Self {
            config,
            phase: 0.,
            phase_delta: 0.,
            level: S::zero(),
        }
    }

    pub fn config(&self) -> &OscillatorConfig {
        &self.config
    }

    /// Resets the phase and derives the per-sample increment from the host's sample rate.
    pub fn prepare(&mut self, sample_rate: f64) {
        self.phase = 0.;
        self.level = S::from_f64(self.config.level);

        let cycles_per_sample = self.config.frequency / sample_rate;
        self.phase_delta = if cycles_per_sample.is_finite() {
            cycles_per_sample * TAU
        } else {
            0.
        };
    }

    /// Stops the oscillator. Subsequent `render` calls leave the buffer untouched.
    pub fn release(&mut self) {
        self.phase_delta = 0.;
    }

    pub fn is_sounding(&self) -> bool {
        self.phase_delta > 0.
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn phase_delta(&self) -> f64 {
        self.phase_delta
    }

    /// The sample value at the current phase, without advancing it.
    pub fn current_value(&self) -> S {
        let sum = (1..=self.config.partials)
            .map(|k| S::from_f64((self.phase * f64::from(k)).sin()))
            .fold(S::zero(), |acc, partial| acc + partial);
        sum * self.level
    }

    /// Adds `num_samples` samples of the tone onto every channel of `output`, starting at
    /// `start_sample`. Samples that would land past the end of the buffer are not rendered.
    pub fn render<B: ChannelBuffer<S> + ?Sized>(
        &mut self,
        output: &mut B,
        start_sample: usize,
        num_samples: usize,
    ) {
        if !self.is_sounding() {
            return;
        }

        let end = (start_sample + num_samples).min(output.num_samples());
        for index in start_sample..end {
            let value = self.current_value();
            for channel in 0..output.num_channels() {
                output.add_sample(channel, index, value);
            }
            self.advance();
        }
    }

    fn advance(&mut self) {
        self.phase += self.phase_delta;
        if self.config.wrap == PhaseWrap::Cycle && self.phase >= TAU {
            self.phase -= TAU;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f64 = 48_000.;

    fn prepared<S: Sample>(config: OscillatorConfig) -> Oscillator<S> {
        let mut osc = Oscillator::new(config);
        osc.prepare(SAMPLE_RATE);
        osc
    }

    #[test]
    fn single_path_renders_440hz_sine_onto_existing_content() {
        let mut osc = prepared::<f32>(OscillatorConfig::SINGLE);
        let mut buffer = vec![vec![0.5f32; 64], vec![-0.5f32; 64]];
        osc.render(&mut buffer, 0, 64);

        let delta = TAU * 440. / SAMPLE_RATE;
        for i in 0..64 {
            let tone = (delta * i as f64).sin() as f32 * 0.25;
            assert!((buffer[0][i] - (0.5 + tone)).abs() < 1e-6, "sample {}", i);
            assert!((buffer[1][i] - (-0.5 + tone)).abs() < 1e-6, "sample {}", i);
        }
    }

    #[test]
    fn all_channels_receive_identical_tone() {
        let mut osc = prepared::<f32>(OscillatorConfig::SINGLE);
        let mut buffer = vec![vec![0f32; 128]; 4];
        osc.render(&mut buffer, 0, 128);
        for channel in &buffer[1..] {
            assert_eq!(channel, &buffer[0]);
        }
    }

    #[test]
    fn double_path_sums_fundamental_and_octave() {
        let mut osc = prepared::<f64>(OscillatorConfig::DOUBLE);
        let mut buffer = vec![vec![0f64; 32]];
        osc.render(&mut buffer, 0, 32);

        let delta = TAU * 440. / SAMPLE_RATE;
        for (i, sample) in buffer[0].iter().enumerate() {
            let phase = delta * i as f64;
            let expected = (phase.sin() + (2. * phase).sin()) * 0.1;
            assert!((sample - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn double_phase_wraps_within_one_cycle() {
        let mut osc = prepared::<f64>(OscillatorConfig::DOUBLE);
        let mut buffer = vec![vec![0f64; 512]];
        for _ in 0..200 {
            osc.render(&mut buffer, 0, 512);
            assert!(osc.phase() >= 0. && osc.phase() < TAU);
        }
    }

    #[test]
    fn single_phase_grows_without_wrapping() {
        let mut osc = prepared::<f32>(OscillatorConfig::SINGLE);
        let mut buffer = vec![vec![0f32; 512]];
        osc.render(&mut buffer, 0, 512);
        osc.render(&mut buffer, 0, 512);

        let expected = osc.phase_delta() * 1024.;
        assert!(osc.phase() > TAU);
        assert!((osc.phase() - expected).abs() < 1e-9);
    }

    #[test]
    fn release_then_prepare_restarts_from_zero_phase() {
        let mut osc = prepared::<f32>(OscillatorConfig::SINGLE);
        let mut first = vec![vec![0f32; 16]];
        osc.render(&mut first, 0, 16);

        let mut tail = vec![vec![0f32; 300]];
        osc.render(&mut tail, 0, 300);
        osc.release();
        osc.prepare(SAMPLE_RATE);

        let mut again = vec![vec![0f32; 16]];
        osc.render(&mut again, 0, 16);
        assert_eq!(first, again);
        assert!((osc.phase() - osc.phase_delta() * 16.).abs() < 1e-12);
    }

    #[test]
    fn released_oscillator_leaves_buffer_untouched() {
        let mut osc = prepared::<f64>(OscillatorConfig::DOUBLE);
        osc.release();
        assert!(!osc.is_sounding());

        let mut buffer = vec![vec![0.3f64; 8]];
        osc.render(&mut buffer, 0, 8);
        assert_eq!(buffer[0], vec![0.3; 8]);
    }

    #[test]
    fn unprepared_oscillator_is_silent() {
        let mut osc = SingleOscillator::new(OscillatorConfig::SINGLE);
        let mut buffer = vec![vec![0f32; 8]];
        osc.render(&mut buffer, 0, 8);
        assert_eq!(buffer[0], vec![0.; 8]);
    }

    #[test]
    fn render_respects_start_offset_and_buffer_end() {
        let mut osc = prepared::<f32>(OscillatorConfig::SINGLE);
        let mut buffer = vec![vec![0f32; 10]];
        osc.render(&mut buffer, 4, 100);

        assert!(buffer[0][..4].iter().all(|s| *s == 0.));
        // sin(0) at the first rendered position.
        assert_eq!(buffer[0][4], 0.);
        assert!(buffer[0][5] > 0.);
        assert!((osc.phase() - osc.phase_delta() * 6.).abs() < 1e-12);
    }

    #[test]
    fn zero_sample_rate_does_not_start_the_oscillator() {
        let mut osc = SingleOscillator::new(OscillatorConfig::SINGLE);
        osc.prepare(0.);
        assert!(!osc.is_sounding());
    }

    #[test]
    fn precision_variants_differ() {
        let mut single = prepared::<f64>(OscillatorConfig::SINGLE);
        let mut double = prepared::<f64>(OscillatorConfig::DOUBLE);
        let mut a = vec![vec![0f64; 64]];
        let mut b = vec![vec![0f64; 64]];
        single.render(&mut a, 0, 64);
        double.render(&mut b, 0, 64);
        assert_ne!(a, b);
    }
}
