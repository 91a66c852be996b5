//! Power-state machine of the simulated VM.
//!
//! ```text
//! deallocated ──start──▶ starting ──(transition)──▶ running
//!      ▲                                              │
//!      └──────(transition)────── stopping ◀───stop────┘
//! ```
//!
//! Time is passed in explicitly so the machine stays deterministic.

use std::time::Duration;

use tokio::time::Instant;
use vmdash_domain::power_state::PowerState;

const SECONDS_PER_HOUR: f64 = 3600.0;

#[derive(Debug)]
pub struct Machine {
    state: PowerState,
    transition: Duration,
    settles_at: Option<Instant>,
    running_since: Option<Instant>,
    accumulated: Duration,
}

impl Machine {
    pub fn new(transition: Duration) -> Self {
        Self {
            state: PowerState::Deallocated,
            transition,
            settles_at: None,
            running_since: None,
            accumulated: Duration::ZERO,
        }
    }

    /// Power state at `now`, completing any transition that is due.
    pub fn state(&mut self, now: Instant) -> PowerState {
        self.settle(now);
        self.state.clone()
    }

    pub fn start(&mut self, now: Instant) -> Result<(), String> {
        self.settle(now);
        match self.state {
            PowerState::Stopped | PowerState::Deallocated => {
                self.begin(PowerState::Starting, now);
                Ok(())
            }
            PowerState::Running => Err("VM is already running".to_string()),
            ref other => Err(format!("VM is busy ({other})")),
        }
    }

    pub fn stop(&mut self, now: Instant) -> Result<(), String> {
        self.settle(now);
        match self.state {
            PowerState::Running => {
                if let Some(since) = self.running_since.take() {
                    self.accumulated += now.saturating_duration_since(since);
                }
                self.begin(PowerState::Stopping, now);
                Ok(())
            }
            PowerState::Stopped | PowerState::Deallocated => {
                Err("VM is already deallocated".to_string())
            }
            ref other => Err(format!("VM is busy ({other})")),
        }
    }

    /// Hours spent running, rounded to two decimals.
    pub fn running_hours(&mut self, now: Instant) -> f64 {
        self.settle(now);
        let current = self
            .running_since
            .map_or(Duration::ZERO, |since| now.saturating_duration_since(since));
        round_cents((self.accumulated + current).as_secs_f64() / SECONDS_PER_HOUR)
    }

    fn begin(&mut self, state: PowerState, now: Instant) {
        self.state = state;
        self.settles_at = Some(now + self.transition);
    }

    fn settle(&mut self, now: Instant) {
        let Some(at) = self.settles_at else {
            return;
        };
        if now < at {
            return;
        }
        self.settles_at = None;
        self.state = match self.state {
            PowerState::Starting => {
                self.running_since = Some(at);
                PowerState::Running
            }
            PowerState::Stopping => PowerState::Deallocated,
            ref other => other.clone(),
        };
    }
}

/// Round to two decimal places.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
