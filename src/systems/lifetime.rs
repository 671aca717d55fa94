//! Countdown helpers shared by bombs, explosions, effects and AI re-evaluation.

/// A one-shot countdown measured in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timer {
    duration: f32,
    elapsed: f32,
}

impl Timer {
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    /// Advances the timer. Returns `true` once the timer has finished.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.finished()
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Forces the timer to completion.
    pub fn finish(&mut self) {
        self.elapsed = self.duration;
    }

    pub fn remaining(&self) -> f32 {
        self.duration - self.elapsed
    }

    /// Fraction of the duration still left, from 1.0 (fresh) to 0.0 (finished).
    pub fn remaining_fraction(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        self.remaining() / self.duration
    }
}

/// A repeating gate: ready when at least `interval` seconds have passed since the last use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    interval: f32,
    since_use: f32,
}

impl Cooldown {
    /// Creates a cooldown that starts out ready.
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            since_use: interval,
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.since_use = (self.since_use + dt.max(0.0)).min(self.interval.max(0.0));
    }

    pub fn is_ready(&self) -> bool {
        self.since_use >= self.interval
    }

    /// Consumes the cooldown if it is ready.
    pub fn try_use(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.since_use = 0.0;
        true
    }

    /// Makes the cooldown ready on the next check.
    pub fn expire(&mut self) {
        self.since_use = self.interval;
    }
}
