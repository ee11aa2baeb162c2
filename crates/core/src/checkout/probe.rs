//! Bounded retry for locating the payment section.
//!
//! The payment section of a reactive checkout may not exist when the page
//! first loads. [`ContainerProbe`] counts polls and reports when to stop; the
//! caller owns the timer (see [`super::Scheduler`]).

use std::time::Duration;

/// Result of one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStep {
    /// Not found yet; poll again after [`ContainerProbe::interval`].
    Retry,
    /// Found. Terminal.
    Found,
    /// Attempt ceiling reached without finding it. Terminal.
    Exhausted,
}

/// Attempt counter with a fixed ceiling and interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerProbe {
    attempts: u32,
    max_attempts: u32,
    interval: Duration,
    outcome: Option<ProbeStep>,
}

impl ContainerProbe {
    /// Default attempt ceiling.
    pub const MAX_ATTEMPTS: u32 = 30;

    /// Default delay between polls.
    pub const INTERVAL: Duration = Duration::from_millis(500);

    /// A probe with the default ceiling (30 polls, 500 ms apart).
    #[must_use]
    pub const fn new() -> Self {
        Self::with_limits(Self::MAX_ATTEMPTS, Self::INTERVAL)
    }

    /// A probe with a custom ceiling and interval.
    ///
    /// A ceiling of zero is treated as one.
    #[must_use]
    pub const fn with_limits(max_attempts: u32, interval: Duration) -> Self {
        Self {
            attempts: 0,
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
            interval,
            outcome: None,
        }
    }

    /// Record one poll.
    ///
    /// `present` is whether the payment section exists right now. Once a
    /// terminal step is reached it is returned again without counting.
    pub const fn poll(&mut self, present: bool) -> ProbeStep {
        if let Some(outcome) = self.outcome {
            return outcome;
        }

        self.attempts += 1;

        let step = if present {
            ProbeStep::Found
        } else if self.attempts >= self.max_attempts {
            ProbeStep::Exhausted
        } else {
            ProbeStep::Retry
        };

        if !matches!(step, ProbeStep::Retry) {
            self.outcome = Some(step);
        }
        step
    }

    /// Number of polls recorded so far.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Delay between polls.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a terminal step has been reached.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }
}

impl Default for ContainerProbe {
    fn default() -> Self {
        Self::new()
    }
}
