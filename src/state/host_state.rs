use std::time::{Duration, Instant};

/// How long a host is left alone after answering HTTP 429
pub const RATE_LIMIT_COOLDOWN: Duration = Duration::from_secs(60);

/// Politeness state of a single host
#[derive(Debug, Clone, Default)]
pub struct HostState {
    /// Number of requests sent to this host in the current run
    pub request_count: u32,

    /// When the last request to this host was sent
    pub last_request_time: Option<Instant>,

    /// Requests are held back until this instant after a 429
    pub rate_limited_until: Option<Instant>,

    /// Crawl-delay announced by the host's robots.txt
    pub crawl_delay: Option<Duration>,
}

impl HostState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The delay to keep between two requests: the configured minimum or the
    /// robots.txt crawl-delay, whichever is longer
    pub fn effective_delay(&self, minimum: Duration) -> Duration {
        self.crawl_delay.map_or(minimum, |delay| delay.max(minimum))
    }

    /// Checks whether a request may be sent now
    pub fn can_request(&self, minimum: Duration, now: Instant) -> bool {
        self.time_until_next_request(minimum, now).is_none()
    }

    /// Returns how long to wait before the next request, or None if ready
    pub fn time_until_next_request(&self, minimum: Duration, now: Instant) -> Option<Duration> {
        let cooldown = self
            .rate_limited_until
            .and_then(|until| until.checked_duration_since(now))
            .filter(|wait| !wait.is_zero());

        let spacing = self.last_request_time.and_then(|last| {
            let ready_at = last + self.effective_delay(minimum);
            ready_at.checked_duration_since(now).filter(|wait| !wait.is_zero())
        });

        match (cooldown, spacing) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn record_request(&mut self, now: Instant) {
        self.request_count += 1;
        self.last_request_time = Some(now);
    }

    /// Backs the host off for [`RATE_LIMIT_COOLDOWN`]
    pub fn mark_rate_limited(&mut self, now: Instant) {
        self.rate_limited_until = Some(now + RATE_LIMIT_COOLDOWN);
    }

    pub fn is_rate_limited(&self, now: Instant) -> bool {
        self.rate_limited_until.is_some_and(|until| until > now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: Duration = Duration::from_millis(1000);

    #[test]
    fn test_new_host_can_request() {
        let state = HostState::new();
        assert!(state.can_request(MIN, Instant::now()));
        assert_eq!(state.request_count, 0);
    }

    #[test]
    fn test_minimum_delay_enforced() {
        let mut state = HostState::new();
        let start = Instant::now();
        state.record_request(start);

        assert!(!state.can_request(MIN, start + Duration::from_millis(500)));
        assert!(state.can_request(MIN, start + Duration::from_millis(1000)));
        assert_eq!(state.request_count, 1);
    }

    #[test]
    fn test_time_until_next_request() {
        let mut state = HostState::new();
        let start = Instant::now();
        state.record_request(start);

        let wait = state
            .time_until_next_request(MIN, start + Duration::from_millis(300))
            .unwrap();
        assert_eq!(wait, Duration::from_millis(700));
    }

    #[test]
    fn test_crawl_delay_extends_spacing() {
        let mut state = HostState::new();
        state.crawl_delay = Some(Duration::from_secs(5));
        assert_eq!(state.effective_delay(MIN), Duration::from_secs(5));

        state.crawl_delay = Some(Duration::from_millis(10));
        assert_eq!(state.effective_delay(MIN), MIN);
    }

    #[test]
    fn test_rate_limit_cooldown() {
        let mut state = HostState::new();
        let start = Instant::now();
        state.mark_rate_limited(start);

        assert!(state.is_rate_limited(start));
        assert!(!state.can_request(Duration::ZERO, start + Duration::from_secs(30)));
        assert!(state.can_request(Duration::ZERO, start + RATE_LIMIT_COOLDOWN));
        assert!(!state.is_rate_limited(start + RATE_LIMIT_COOLDOWN));
    }
}
