use std::time::Duration;

/// Embedder-tunable knobs for the connect engine.
///
/// Currently just the grace window: the interval after the first successful
/// connect during which other in-flight attempts are still allowed to
/// finish before being torn down. Kept as a plain `Default`-able struct
/// rather than a `clap`/CLI surface — a command-line front-end is an
/// embedding application's concern, not this engine's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectOptions {
    /// How long other in-flight attempts are given to also finish after the
    /// first success, before the engine forces a definitive outcome.
    pub grace_window: Duration,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        ConnectOptions {
            grace_window: Duration::from_secs(1),
        }
    }
}
