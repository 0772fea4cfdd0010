use super::sample::{ChannelBuffer, Sample};

/// A preallocated set of channels used to route audio through a different sample precision.
///
/// Storage is allocated in `prepare`, off the audio thread. Copying in a block no larger than the
/// prepared capacity never allocates.
pub struct ScratchBuffer<S: Sample> {
    channels: Vec<Vec<S>>,
    /// Number of samples per channel holding valid audio.
    len: usize,
}

impl<S: Sample> ScratchBuffer<S> {
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
            len: 0,
        }
    }

    pub fn is_allocated(&self) -> bool {
        !self.channels.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.channels.iter().map(Vec::len).min().unwrap_or(0)
    }

    /// Sizes the buffer to `num_channels` channels of `num_samples` samples each. Existing
    /// allocations are kept if they are large enough.
    pub fn prepare(&mut self, num_channels: usize, num_samples: usize) {
        self.channels.resize_with(num_channels, Vec::new);
        for channel in &mut self.channels {
            channel.resize(num_samples, S::zero());
        }
        self.len = 0;
    }

    /// Replaces the content with the first `num_samples` samples of `source`, converted to `S`.
    /// Channels beyond the prepared channel count are dropped.
    pub fn copy_from<T: Sample, B: ChannelBuffer<T> + ?Sized>(
        &mut self,
        source: &B,
        num_samples: usize,
    ) {
        let num_samples = num_samples.min(source.num_samples());
        if num_samples > self.capacity() {
            // The host sent a larger block than announced.
            let num_channels = self.channels.len();
            self.prepare(num_channels, num_samples);
        }

        for (index, channel) in self.channels.iter_mut().enumerate() {
            if index < source.num_channels() {
                let input = &source.channel(index)[..num_samples];
                for (to, from) in channel.iter_mut().zip(input) {
                    *to = S::from_f64(from.into_f64());
                }
            } else {
                channel[..num_samples].iter_mut().for_each(|s| *s = S::zero());
            }
        }
        self.len = num_samples;
    }

    /// Overwrites the start of every channel in `destination` with the valid content of this
    /// buffer, converted to `T`.
    pub fn copy_into<T: Sample, B: ChannelBuffer<T> + ?Sized>(&self, destination: &mut B) {
        let num_samples = self.len.min(destination.num_samples());
        let num_channels = self.channels.len().min(destination.num_channels());
        for index in 0..num_channels {
            let output = &mut destination.channel_mut(index)[..num_samples];
            for (to, from) in output.iter_mut().zip(&self.channels[index]) {
                *to = T::from_f64(from.into_f64());
            }
        }
    }
}

impl<S: Sample> Default for ScratchBuffer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Sample> ChannelBuffer<S> for ScratchBuffer<S> {
    fn num_channels(&self) -> usize {
        self.channels.len()
    }

    fn num_samples(&self) -> usize {
        self.len
    }

    fn channel(&self, index: usize) -> &[S] {
        &self.channels[index][..self.len]
    }

    fn channel_mut(&mut self, index: usize) -> &mut [S] {
        &mut self.channels[index][..self.len]
    }
}
