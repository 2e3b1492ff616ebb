/// Adaptive particle budget.
///
/// Watches measured frame times and shrinks the particle cap when the tick
/// runs over budget, then slowly grows it back once frames are consistently
/// cheap. The caller feeds the result to
/// [`ParticleSystem::set_capacity`](crate::system::ParticleSystem::set_capacity).
pub struct AdaptiveBudget {
    /// Target tick budget in milliseconds.
    pub budget_ms: f32,
    /// Smallest cap the controller will ever recommend.
    pub min_capacity: usize,
    /// The configured ("full quality") cap.
    pub max_capacity: usize,
    /// Fraction removed from the cap per over-budget frame.
    pub shrink: f32,
    /// Fraction of `max_capacity` restored per recovery step.
    pub grow: f32,
    pub enabled: bool,
    current: usize,
    /// Exponential moving average of the tick time.
    ema_ms: f32,
    /// Consecutive frames well under budget.
    frames_under_budget: u32,
}

impl AdaptiveBudget {
    pub fn new(max_capacity: usize) -> Self {
        let max_capacity = max_capacity.max(1);
        Self {
            budget_ms: 8.0,
            min_capacity: (max_capacity / 8).max(1),
            max_capacity,
            shrink: 0.1,
            grow: 0.05,
            enabled: false,
            current: max_capacity,
            ema_ms: 0.0,
            frames_under_budget: 0,
        }
    }

    /// Current recommended cap.
    pub fn capacity(&self) -> usize {
        if self.enabled {
            self.current
        } else {
            self.max_capacity
        }
    }

    pub fn average_ms(&self) -> f32 {
        self.ema_ms
    }

    /// Feed the latest measured tick time. Returns the new cap when it
    /// changed.
    pub fn update(&mut self, frame_ms: f32) -> Option<usize> {
        if !self.enabled || !frame_ms.is_finite() || frame_ms < 0.0 {
            return None;
        }

        self.ema_ms = self.ema_ms * 0.7 + frame_ms * 0.3;
        let before = self.current;

        if self.ema_ms > self.budget_ms {
            self.frames_under_budget = 0;
            let cut = ((self.current as f32) * self.shrink).ceil() as usize;
            self.current = self.current.saturating_sub(cut.max(1)).max(self.min_capacity);
        } else if self.ema_ms < self.budget_ms * 0.6 {
            self.frames_under_budget += 1;
            // Wait 30 frames between increases to avoid oscillation
            if self.frames_under_budget > 30 {
                self.frames_under_budget = 0;
                let step = ((self.max_capacity as f32) * self.grow).ceil() as usize;
                self.current = (self.current + step.max(1)).min(self.max_capacity);
            }
        } else {
            self.frames_under_budget = self.frames_under_budget.saturating_add(1).min(15);
        }

        if self.current != before {
            log::debug!("particle budget {before} -> {} ({:.2} ms avg)", self.current, self.ema_ms);
            Some(self.current)
        } else {
            None
        }
    }
}
