use std::time::Instant;

/// Utility for recording the wall-clock time spent in an operation.
pub struct Timer {
    start: Option<Instant>,
    elapsed: u64,
}

impl Timer {
    /// Create a new, inactive timer with zero elapsed time.
    pub fn new() -> Timer {
        Timer {
            start: None,
            elapsed: 0,
        }
    }

    /// Start the timer, or reset it if already active.
    pub fn start(&mut self) {
        self.start = Some(Instant::now());
    }

    /// Stop an active timer and add the elapsed time to the running total.
    pub fn end(&mut self) {
        if let Some(start) = self.start.take() {
            self.elapsed += start.elapsed().as_micros() as u64;
        }
    }

    /// Return the cumulative time between calls to `start` and `end` in
    /// microseconds.
    pub fn elapsed_micros(&self) -> u64 {
        self.elapsed
    }

    /// Return the cumulative time between calls to `start` and `end` in
    /// milliseconds.
    pub fn elapsed_ms(&self) -> f32 {
        (self.elapsed as f32) / 1000.0
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Timer;

    #[test]
    fn test_timer_accumulates() {
        let mut timer = Timer::new();
        assert_eq!(timer.elapsed_micros(), 0);

        timer.start();
        std::thread::sleep(std::time::Duration::from_millis(2));
        timer.end();
        let first = timer.elapsed_micros();
        assert!(first >= 2000);

        // `end` without a matching `start` leaves the total unchanged.
        timer.end();
        assert_eq!(timer.elapsed_micros(), first);
    }
}
