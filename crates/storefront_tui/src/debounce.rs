//! Delayed propagation of typed search text.

use std::time::{Duration, Instant};

/// Default quiet period before typed search text is applied.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Holds the latest input until no new input arrives for `delay`.
///
/// Time is passed in explicitly so the behavior can be driven from the event
/// loop's clock and tested without sleeping.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use storefront_tui::Debouncer;
///
/// let start = Instant::now();
/// let mut debouncer = Debouncer::new(Duration::from_millis(500));
///
/// debouncer.input("lam", start);
/// debouncer.input("lamp", start + Duration::from_millis(200));
/// assert_eq!(debouncer.poll(start + Duration::from_millis(600)), None);
/// assert_eq!(
///     debouncer.poll(start + Duration::from_millis(700)),
///     Some("lamp".to_string())
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    /// Debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record new input, restarting the quiet period.
    pub fn input(&mut self, value: impl Into<String>, now: Instant) {
        self.pending = Some((value.into(), now));
    }

    /// The pending value once the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, at)) if now.saturating_duration_since(*at) >= self.delay => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    /// Whether input is waiting for the quiet period to end.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keystrokes_restart_the_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();
        debouncer.input("a", start);
        debouncer.input("ab", start + Duration::from_millis(400));
        assert_eq!(debouncer.poll(start + Duration::from_millis(800)), None);
        assert!(debouncer.is_pending());
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(900)),
            Some("ab".to_string())
        );
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(start + Duration::from_secs(5)), None);
    }
}
