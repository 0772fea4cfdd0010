//! The host owns the plugin's lifecycle. These are the states it can leave the processor in.

/// Where the processor is in its host-driven lifecycle.
///
/// ```text
///                  prepare               release
/// Uninitialized ───────────▶ Prepared ───────────▶ Released
///                              ▲                      │
///                              └──────── prepare ─────┘
/// ```
///
/// `prepare` is accepted from any state, including `Prepared` (a host changing sample rate
/// re-prepares without releasing). `release` only has an effect on a prepared processor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Prepared,
    Released,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Lifecycle::Uninitialized
    }
}

impl Lifecycle {
    pub fn prepare(self) -> Self {
        Lifecycle::Prepared
    }

    /// Returns the state after a release request, or `None` if there is nothing to release.
    pub fn release(self) -> Option<Self> {
        match self {
            Lifecycle::Prepared => Some(Lifecycle::Released),
            Lifecycle::Uninitialized | Lifecycle::Released => None,
        }
    }

    /// Rendering is only valid between `prepare` and `release`.
    pub fn can_render(self) -> bool {
        self == Lifecycle::Prepared
    }
}
