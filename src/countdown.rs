use std::fmt;

/// Remaining time as shown next to the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeDisplay {
    pub remaining: u32,
    /// `MM:SS`.
    pub text: String,
    /// Set once less than a fifth of the budget is left.
    pub urgent: bool,
}

impl fmt::Display for TimeDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Time: {}", self.text)
    }
}

pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CountdownState {
    Running,
    Cancelled,
    Expired,
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    Running(TimeDisplay),
    /// Reached zero on this tick.
    Expired,
    /// The countdown was already cancelled or expired; nothing changed.
    Idle,
}

/// Per-round deadline, advanced one second at a time by an external scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    budget: u32,
    remaining: u32,
    state: CountdownState,
}

impl Countdown {
    /// A zero budget is raised to one second, so expiry is still reported by the first tick.
    pub fn new(budget: u32) -> Self {
        let budget = budget.max(1);

        Self {
            budget,
            remaining: budget,
            state: CountdownState::Running,
        }
    }

    pub fn tick(&mut self) -> Tick {
        if self.state != CountdownState::Running {
            return Tick::Idle;
        }

        self.remaining = self.remaining.saturating_sub(1);

        if self.remaining == 0 {
            self.state = CountdownState::Expired;
            return Tick::Expired;
        }

        Tick::Running(self.display())
    }

    /// Stops the countdown. Calling it again, or after expiry, does nothing.
    pub fn cancel(&mut self) {
        if self.state == CountdownState::Running {
            self.state = CountdownState::Cancelled;
        }
    }

    pub fn expired(&self) -> bool {
        self.state == CountdownState::Expired
    }

    pub fn is_running(&self) -> bool {
        self.state == CountdownState::Running
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn is_urgent(&self) -> bool {
        // remaining < budget * 0.2
        u64::from(self.remaining) * 5 < u64::from(self.budget)
    }

    pub fn display(&self) -> TimeDisplay {
        TimeDisplay {
            remaining: self.remaining,
            text: format_clock(self.remaining),
            urgent: self.is_urgent(),
        }
    }
}
