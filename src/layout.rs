//! Channel arrangements the plugin is willing to run with.

/// The channel arrangement of a single bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelSet {
    Disabled,
    Mono,
    Stereo,
    Discrete(usize),
}

impl ChannelSet {
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => ChannelSet::Disabled,
            1 => ChannelSet::Mono,
            2 => ChannelSet::Stereo,
            n => ChannelSet::Discrete(n),
        }
    }

    pub fn channel_count(self) -> usize {
        match self {
            ChannelSet::Disabled => 0,
            ChannelSet::Mono => 1,
            ChannelSet::Stereo => 2,
            ChannelSet::Discrete(n) => n,
        }
    }
}

/// Main input and output buses of the plugin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusLayout {
    pub input: ChannelSet,
    pub output: ChannelSet,
}

impl BusLayout {
    /// The layout reported to the host when the plugin is loaded.
    pub const DEFAULT: BusLayout = BusLayout {
        input: ChannelSet::Stereo,
        output: ChannelSet::Stereo,
    };

    pub fn from_counts(inputs: usize, outputs: usize) -> Self {
        Self {
            input: ChannelSet::from_count(inputs),
            output: ChannelSet::from_count(outputs),
        }
    }

    /// Only mono or stereo output is supported, and the input must match the output. Some hosts
    /// will only load plugins that accept a stereo layout.
    pub fn is_supported(&self) -> bool {
        matches!(self.output, ChannelSet::Mono | ChannelSet::Stereo) && self.input == self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_is_supported_stereo() {
        assert!(BusLayout::DEFAULT.is_supported());
        assert_eq!(BusLayout::DEFAULT.output.channel_count(), 2);
    }

    #[test]
    fn mono_and_stereo_matching_pairs_are_supported() {
        assert!(BusLayout::from_counts(1, 1).is_supported());
        assert!(BusLayout::from_counts(2, 2).is_supported());
    }

    #[test]
    fn mismatched_or_wide_layouts_are_rejected() {
        assert!(!BusLayout::from_counts(1, 2).is_supported());
        assert!(!BusLayout::from_counts(2, 1).is_supported());
        assert!(!BusLayout::from_counts(6, 6).is_supported());
        assert!(!BusLayout::from_counts(0, 0).is_supported());
        assert!(!BusLayout::from_counts(0, 2).is_supported());
    }

    #[test]
    fn channel_counts_round_trip_through_sets() {
        for count in 0..8 {
            assert_eq!(ChannelSet::from_count(count).channel_count(), count);
        }
    }
}
