use crate::foundation::core::Millis;

/// Whether the user is currently scrolling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    /// No scroll tick within the quiet period.
    Idle,
    /// A scroll tick arrived recently.
    Active,
}

/// Debounced Idle/Active tracker with a resettable single-shot idle deadline.
#[derive(Clone, Debug)]
pub struct ScrollActivity {
    quiet_ms: u64,
    state: Activity,
    idle_at: Option<Millis>,
}

impl ScrollActivity {
    /// Create an idle tracker that goes idle `quiet_ms` after the last tick.
    pub fn new(quiet_ms: u64) -> Self {
        Self {
            quiet_ms,
            state: Activity::Idle,
            idle_at: None,
        }
    }

    /// Current state as of the last `tick`/`poll`.
    pub fn state(&self) -> Activity {
        self.state
    }

    /// Pending idle deadline, if armed.
    pub fn idle_deadline(&self) -> Option<Millis> {
        self.idle_at
    }

    /// Record a scroll tick: become Active and replace any pending deadline.
    pub fn tick(&mut self, now: Millis) {
        if self.state == Activity::Idle {
            tracing::debug!(at_ms = now.0, "scroll active");
        }
        self.state = Activity::Active;
        self.idle_at = Some(now.after(self.quiet_ms));
    }

    /// Fire the idle deadline if it has elapsed and return the resulting state.
    pub fn poll(&mut self, now: Millis) -> Activity {
        if let Some(deadline) = self.idle_at
            && now >= deadline
        {
            self.idle_at = None;
            self.state = Activity::Idle;
            tracing::debug!(at_ms = now.0, "scroll idle");
        }
        self.state
    }

    /// Drop any pending deadline and return to Idle.
    pub fn cancel(&mut self) {
        self.idle_at = None;
        self.state = Activity::Idle;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/driver/activity.rs"]
mod tests;
