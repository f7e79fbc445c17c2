//! Per-call options

use std::time::Duration;

/// Options passed with every operation.
///
/// A call without a timeout falls back to the accessor's configured default.
/// Dropping the operation future cancels the call; every connection-scoped
/// resource is released on drop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOptions {
    timeout: Option<Duration>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the whole call (connect, execute, read) by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub(crate) fn or_default(self, default: Option<Duration>) -> Self {
        Self {
            timeout: self.timeout.or(default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_timeout_wins() {
        let options = CallOptions::new()
            .with_timeout(Duration::from_secs(1))
            .or_default(Some(Duration::from_secs(30)));
        assert_eq!(options.timeout(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_default_fills_gap() {
        let options = CallOptions::new().or_default(Some(Duration::from_secs(30)));
        assert_eq!(options.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(CallOptions::new().or_default(None).timeout(), None);
    }
}
