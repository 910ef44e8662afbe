//! Host-driven timing helpers
//!
//! The core owns no clock. Hosts feed elapsed time in, and these helpers turn
//! it into whole simulation steps or due/not-due decisions:
//! - `FixedStep`: fixed-timestep accumulator for the paddle game
//! - `IntervalTimer`: variable-interval ticks for the snake game
//! - `TaskSlot`: one cancellable delayed action (AI deliberation)

/// Fixed timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedStep {
    step: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl FixedStep {
    /// Longest frame we try to catch up on (seconds)
    const MAX_FRAME: f32 = 0.1;

    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            step,
            max_substeps,
            accumulator: 0.0,
        }
    }

    /// Add frame time (seconds) and return how many steps to run now
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, Self::MAX_FRAME);

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            self.accumulator -= self.step;
            substeps += 1;
        }
        // Drop whatever we could not catch up on
        if substeps == self.max_substeps {
            self.accumulator = self.accumulator.min(self.step);
        }
        substeps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Tick source whose interval may change between ticks
#[derive(Debug, Clone, Default)]
pub struct IntervalTimer {
    elapsed_ms: u32,
}

impl IntervalTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accumulate(&mut self, elapsed_ms: u32) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
    }

    /// Consume one tick if at least `interval_ms` has built up
    pub fn take_tick(&mut self, interval_ms: u32) -> bool {
        if interval_ms == 0 || self.elapsed_ms < interval_ms {
            return false;
        }
        self.elapsed_ms -= interval_ms;
        true
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
    }
}

/// Handle for an action due at a fixed time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTask {
    pub due_at_ms: u64,
}

/// Holds at most one pending `ScheduledTask`
#[derive(Debug, Clone, Default)]
pub struct TaskSlot {
    task: Option<ScheduledTask>,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule (or reschedule) the action `delay_ms` after `now_ms`
    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64) -> ScheduledTask {
        let task = ScheduledTask {
            due_at_ms: now_ms.saturating_add(delay_ms),
        };
        self.task = Some(task);
        task
    }

    /// Cancel the pending action. Returns true if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.task.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.task.is_some()
    }

    pub fn pending(&self) -> Option<ScheduledTask> {
        self.task
    }

    /// Returns true exactly once, on the first poll at or after the due time
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.task {
            Some(task) if now_ms >= task.due_at_ms => {
                self.task = None;
                true
            }
            _ => false,
        }
    }
}
