//! Self-rescheduling status poll loop.
//!
//! The next cycle is only scheduled once the current one has settled, so a
//! slow or failing endpoint delays polling but never stacks requests.

use std::time::Duration;

use crate::effect::Effect;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollPhase {
    /// Not started yet.
    #[default]
    Idle,
    /// Status fetch for the current cycle is outstanding.
    InFlight,
    /// Timer armed for the next cycle.
    Waiting,
    /// Torn down; nothing is accepted anymore.
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPoller {
    url: String,
    interval: Duration,
    phase: PollPhase,
    cycle: u64,
    completed: u64,
    failed: u64,
}

impl StatusPoller {
    pub fn new(url: impl Into<String>, interval: Duration) -> Self {
        Self {
            url: url.into(),
            interval,
            phase: PollPhase::Idle,
            cycle: 0,
            completed: 0,
            failed: 0,
        }
    }

    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    pub fn in_flight(&self) -> bool {
        self.phase == PollPhase::InFlight
    }

    /// Issues the first fetch. Only valid once, from `Idle`.
    pub fn start(&mut self) -> Option<Effect> {
        if self.phase != PollPhase::Idle {
            return None;
        }
        Some(self.issue(self.cycle + 1))
    }

    /// True if a result for `cycle` is the one currently awaited.
    pub fn accepts(&self, cycle: u64) -> bool {
        self.phase == PollPhase::InFlight && cycle == self.cycle
    }

    /// Records the outcome of the in-flight cycle and schedules the next one,
    /// whatever the outcome. Results for other cycles are ignored.
    pub fn settle(&mut self, cycle: u64, succeeded: bool) -> Option<Effect> {
        if !self.accepts(cycle) {
            return None;
        }
        if succeeded {
            self.completed += 1;
        } else {
            self.failed += 1;
        }
        self.phase = PollPhase::Waiting;
        Some(Effect::SchedulePoll {
            cycle: self.cycle + 1,
            delay: self.interval,
        })
    }

    /// Issues the fetch for `cycle` if that is the cycle the armed timer was for.
    pub fn timer_fired(&mut self, cycle: u64) -> Option<Effect> {
        if self.phase != PollPhase::Waiting || cycle != self.cycle + 1 {
            return None;
        }
        Some(self.issue(cycle))
    }

    /// Stops polling for good. Any outstanding result or timer is ignored.
    pub fn stop(&mut self) -> Option<Effect> {
        match self.phase {
            PollPhase::Stopped => None,
            PollPhase::Waiting => {
                self.phase = PollPhase::Stopped;
                Some(Effect::CancelPoll)
            }
            PollPhase::Idle | PollPhase::InFlight => {
                self.phase = PollPhase::Stopped;
                None
            }
        }
    }

    fn issue(&mut self, cycle: u64) -> Effect {
        self.cycle = cycle;
        self.phase = PollPhase::InFlight;
        Effect::FetchStatus {
            cycle,
            url: self.url.clone(),
        }
    }
}
