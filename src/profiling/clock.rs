use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use parking_lot::Mutex;

/// Time source for a profiler.
///
/// Section timings use the monotonic reading, the report gate uses wall-clock
/// milliseconds.
pub trait Clock {
    /// Monotonic nanoseconds.
    fn now_nanos(&self) -> u64;
    fn now_millis(&self) -> u64;
}

#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_nanos(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

#[derive(Debug)]
struct ManualTime {
    nanos: u64,
    millis: u64,
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    time: Arc<Mutex<ManualTime>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            time: Arc::new(Mutex::new(ManualTime { nanos: 0, millis: 0 })),
        }
    }

    /// Moves both the monotonic and the wall-clock reading forward.
    pub fn advance(&self, by: Duration) {
        let mut time = self.time.lock();
        time.nanos += by.as_nanos() as u64;
        time.millis += by.as_millis() as u64;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now_nanos(&self) -> u64 {
        self.time.lock().nanos
    }

    fn now_millis(&self) -> u64 {
        self.time.lock().millis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        let start = clock.now_nanos();

        handle.advance(Duration::from_millis(10));
        assert_eq!(clock.now_nanos() - start, 10_000_000);
        assert_eq!(clock.now_millis(), 10);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now_nanos();
        let second = clock.now_nanos();
        assert!(second >= first);
        assert!(clock.now_millis() > 0);
    }
}
