use std::time::{Duration, Instant};

/// The host clock.
///
/// `Time` tracks total elapsed time since the host started. It can be driven by the wall clock
/// with [`tick`](Self::tick), typically once per iteration of a game loop, or moved forward by an
/// exact amount with [`advance`](Self::advance). The reading only ever grows, which is all
/// creation-time ordering needs.
#[derive(Debug, Copy, Clone)]
pub struct Time {
    // The instant of the last reading
    instant: Instant,
    /// The time delta since the previous reading
    pub delta: Duration,
    /// The total elapsed time since the first reading
    pub time: Duration,
}

impl Time {
    /// Construct a new clock with delta and time set to `0`.
    pub fn new() -> Self {
        Self {
            instant: Instant::now(),
            delta: Duration::ZERO,
            time: Duration::ZERO,
        }
    }

    /// Take a new reading from the wall clock, capturing the delta since the last reading and
    /// updating the cumulative time. Returns the delta.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        self.delta = now.duration_since(self.instant);
        self.instant = now;
        self.time += self.delta;
        self.delta
    }

    /// Move the clock forward by a fixed amount, independent of the wall clock.
    pub fn advance(&mut self, delta: Duration) {
        self.instant = Instant::now();
        self.delta = delta;
        self.time += delta;
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
