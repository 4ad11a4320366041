//! Matchmaking configuration.

use std::time::Duration;

/// Tunables for batch formation and the readiness handshake.
///
/// The defaults are the production values; tests shrink the waits.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Players per batch. Sessions always hold exactly this many.
    pub batch_size: usize,

    /// How many times to poll the admission lock before giving up.
    pub lock_poll_attempts: u32,

    /// Delay between admission-lock polls.
    pub lock_poll_interval: Duration,

    /// How long players have to confirm readiness. The wait is armed
    /// once and not cancellable; a single poll decides the outcome.
    pub ready_wait: Duration,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 4,
            lock_poll_attempts: 5,
            lock_poll_interval: Duration::from_millis(500),
            ready_wait: Duration::from_secs(10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = MatchConfig::default();
        assert_eq!(config.batch_size, 4);
        assert_eq!(config.lock_poll_attempts, 5);
        assert_eq!(config.lock_poll_interval, Duration::from_millis(500));
        assert_eq!(config.ready_wait, Duration::from_secs(10));
    }
}
