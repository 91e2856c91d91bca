//! Interactive-mode redraw tick
//!
//! The scheduler owns a single timer slot. Every arm hands out a fresh
//! [`TickToken`]; firing with any other token is a no-op, so a timer that
//! raced with a cancel can never trigger a redraw.

use crate::mode::DisplayModeState;

/// Redraw cadence while visible and interactive
pub const INTERACTIVE_INTERVAL_MS: u64 = 1000;

/// Identifies one arming of the tick slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickToken(u32);

/// Scheduler slot state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickState {
    Idle,
    Armed { due_at: u64, token: TickToken },
}

/// What the platform timer must do
///
/// `Arm` replaces any previously armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerCommand {
    Arm { due_at: u64, token: TickToken },
    Cancel,
}

/// Result of a timer firing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Token was cancelled or superseded; nothing to do
    Stale,
    /// Redraw now; re-arm if a command is given
    Redraw { rearm: Option<TimerCommand> },
}

/// Next multiple of `interval` strictly after `now`
pub fn next_aligned(now: u64, interval: u64) -> u64 {
    now + interval - (now % interval)
}

/// Dual-rate redraw scheduler
///
/// Runs only while [`DisplayModeState::should_run_timer`] holds. Ambient
/// redraws come from the platform's minute tick instead.
#[derive(Debug, Clone)]
pub struct RedrawScheduler {
    state: TickState,
    interval_ms: u64,
    next_token: u32,
    shut_down: bool,
}

impl Default for RedrawScheduler {
    fn default() -> Self {
        Self::new(INTERACTIVE_INTERVAL_MS)
    }
}

impl RedrawScheduler {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            state: TickState::Idle,
            interval_ms: interval_ms.max(1),
            next_token: 0,
            shut_down: false,
        }
    }

    pub fn state(&self) -> TickState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, TickState::Armed { .. })
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Bring the slot in line with the current mode
    pub fn reconcile(&mut self, now: u64, mode: &DisplayModeState) -> Option<TimerCommand> {
        if self.shut_down {
            return None;
        }

        match (mode.should_run_timer(), self.state) {
            (false, TickState::Armed { .. }) => {
                self.state = TickState::Idle;
                Some(TimerCommand::Cancel)
            }
            (true, TickState::Idle) => Some(self.arm(now + self.interval_ms)),
            _ => None,
        }
    }

    /// Handle the platform timer firing with `token`
    pub fn fire(&mut self, now: u64, token: TickToken, mode: &DisplayModeState) -> TickOutcome {
        match self.state {
            TickState::Armed { token: armed, .. } if armed == token && !self.shut_down => {
                self.state = TickState::Idle;
                let rearm = mode
                    .should_run_timer()
                    .then(|| self.arm(next_aligned(now, self.interval_ms)));
                TickOutcome::Redraw { rearm }
            }
            _ => TickOutcome::Stale,
        }
    }

    /// Cancel the slot permanently
    ///
    /// After shutdown every token is stale and reconcile never re-arms.
    pub fn shutdown(&mut self) -> Option<TimerCommand> {
        self.shut_down = true;
        match core::mem::replace(&mut self.state, TickState::Idle) {
            TickState::Armed { .. } => Some(TimerCommand::Cancel),
            TickState::Idle => None,
        }
    }

    fn arm(&mut self, due_at: u64) -> TimerCommand {
        let token = TickToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        self.state = TickState::Armed { due_at, token };
        TimerCommand::Arm { due_at, token }
    }
}
