use std::collections::BTreeMap;

use super::InstanceId;
use crate::action::CompiledAction;
use crate::catalog::TimerAssignment;

/// Runtime clock of one timer assignment.
#[derive(Debug, Clone, Copy)]
struct TimerClock {
    interval: f64,
    start_at: f64,
    last_run: Option<f64>,
}

impl TimerClock {
    fn start(assignment: &TimerAssignment, now: f64) -> Self {
        Self {
            interval: assignment.interval_secs,
            start_at: now + assignment.start_delay_secs,
            last_run: None,
        }
    }

    fn is_due(&self, now: f64) -> bool {
        match self.last_run {
            None => now >= self.start_at,
            Some(last_run) => now - last_run >= self.interval,
        }
    }
}

struct TimedEntry {
    instance: InstanceId,
    action: CompiledAction,
    clocks: Vec<TimerClock>,
}

/// Outcome of asking whether one timer of one entry should fire now.
pub(crate) enum Claim {
    /// Due; its clock already moved to `now`.
    Fire(CompiledAction),
    /// Not due yet.
    Idle,
    /// Entry is gone or has no timer at that index.
    Exhausted,
}

/// Flat store of enabled timed actions.
///
/// Keys increase with insertion, so iteration follows enable order.
#[derive(Default)]
pub(crate) struct TimedScheduler {
    entries: BTreeMap<u64, TimedEntry>,
    next_key: u64,
}

impl TimedScheduler {
    /// Add `action` with fresh clocks started at `now`. Ignores actions without timers.
    pub(crate) fn insert(&mut self, instance: InstanceId, action: &CompiledAction, now: f64) -> bool {
        if action.timers().is_empty() {
            return false;
        }

        let clocks = action
            .timers()
            .iter()
            .map(|assignment| TimerClock::start(assignment, now))
            .collect();

        let key = self.next_key;
        self.next_key += 1;
        self.entries.insert(
            key,
            TimedEntry {
                instance,
                action: action.clone(),
                clocks,
            },
        );
        true
    }

    /// Drop every entry of `instance` along with its timer progress.
    pub(crate) fn remove_instance(&mut self, instance: InstanceId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.instance != instance);
        before - self.entries.len()
    }

    pub(crate) fn keys(&self) -> Vec<u64> {
        self.entries.keys().copied().collect()
    }

    pub(crate) fn claim(&mut self, key: u64, timer: usize, now: f64) -> Claim {
        let Some(entry) = self.entries.get_mut(&key) else {
            return Claim::Exhausted;
        };
        let Some(clock) = entry.clocks.get_mut(timer) else {
            return Claim::Exhausted;
        };

        if !clock.is_due(now) {
            return Claim::Idle;
        }
        clock.last_run = Some(now);
        Claim::Fire(entry.action.clone())
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
