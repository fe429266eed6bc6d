//! Cool-down gate for game-mode switches.
//!
//! A switch opens a fixed window during which further switches are refused.
//! The window cannot be cut short; it ends when the clock passes its deadline.

use std::time::{Duration, Instant};

pub const DEFAULT_MODE_SWITCH_COOLDOWN: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Idle,
    CoolingDown { until: Instant },
}

#[derive(Debug, Clone)]
pub struct ModeSwitchGate {
    cooldown: Duration,
    state: GateState,
}

impl Default for ModeSwitchGate {
    fn default() -> Self {
        Self::new(DEFAULT_MODE_SWITCH_COOLDOWN)
    }
}

impl ModeSwitchGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            state: GateState::Idle,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Advance the timed transition: an expired cool-down returns to `Idle`.
    pub fn poll(&mut self, now: Instant) -> GateState {
        if let GateState::CoolingDown { until } = self.state {
            if now >= until {
                self.state = GateState::Idle;
            }
        }
        self.state
    }

    pub fn is_switching(&mut self, now: Instant) -> bool {
        matches!(self.poll(now), GateState::CoolingDown { .. })
    }

    /// Whether `now` falls inside the current cool-down window. Does not advance state.
    pub fn is_cooling_down(&self, now: Instant) -> bool {
        matches!(self.state, GateState::CoolingDown { until } if now < until)
    }

    /// Claim the gate for one switch. Returns false while cooling down.
    pub fn try_begin(&mut self, now: Instant) -> bool {
        if self.is_switching(now) {
            return false;
        }
        self.state = GateState::CoolingDown {
            until: now + self.cooldown,
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_within_window() {
        let t0 = Instant::now();
        let mut gate = ModeSwitchGate::default();
        assert!(gate.try_begin(t0));
        assert!(!gate.try_begin(t0 + Duration::from_millis(100)));
        assert!(!gate.try_begin(t0 + Duration::from_millis(499)));
        assert!(gate.is_switching(t0 + Duration::from_millis(499)));
        assert!(gate.is_cooling_down(t0 + Duration::from_millis(499)));
        assert!(!gate.is_cooling_down(t0 + Duration::from_millis(500)));
    }

    #[test]
    fn test_reopens_after_window() {
        let t0 = Instant::now();
        let mut gate = ModeSwitchGate::new(Duration::from_millis(500));
        assert!(gate.try_begin(t0));
        assert_eq!(gate.poll(t0 + Duration::from_millis(500)), GateState::Idle);
        assert!(gate.try_begin(t0 + Duration::from_millis(600)));
    }

    #[test]
    fn test_refused_attempt_does_not_extend_window() {
        let t0 = Instant::now();
        let mut gate = ModeSwitchGate::new(Duration::from_millis(500));
        assert!(gate.try_begin(t0));
        assert!(!gate.try_begin(t0 + Duration::from_millis(400)));
        assert!(gate.try_begin(t0 + Duration::from_millis(510)));
    }
}
