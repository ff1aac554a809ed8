use crate::Ticks;

/// Simulated CPU clock.
///
/// Every tick is accounted either as busy (some process executes) or idle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    now: Ticks,
    busy: Ticks,
    idle: Ticks,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Ticks {
        self.now
    }

    pub fn busy_time(&self) -> Ticks {
        self.busy
    }

    pub fn idle_time(&self) -> Ticks {
        self.idle
    }

    /// Advance the clock by `delta` units of execution.
    pub fn run(&mut self, delta: Ticks) {
        self.now += delta;
        self.busy += delta;
    }

    /// Advance the clock by `delta` idle units.
    pub fn idle(&mut self, delta: Ticks) {
        self.now += delta;
        self.idle += delta;
    }

    /// Idle until `t`. No-op if `t` is not in the future.
    pub fn idle_until(&mut self, t: Ticks) {
        self.idle(t.saturating_sub(self.now));
    }
}

#[cfg(test)]
mod tests {
    use super::Clock;

    #[test]
    fn test_clock_accounting() {
        let mut clock = Clock::new();

        clock.idle_until(3);
        clock.run(2);
        clock.idle_until(4);
        clock.idle(1);
        clock.run(4);

        assert_eq!(clock.now(), 10);
        assert_eq!(clock.busy_time(), 6);
        assert_eq!(clock.idle_time(), 4);
    }
}
