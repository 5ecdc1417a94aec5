use crate::runtime::event::ScreenEvent;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerCommand {
    EmitAfter {
        key: String,
        delay: Duration,
        event: ScreenEvent,
    },
    Cancel {
        key: String,
    },
}

#[derive(Debug, Clone)]
struct Guard {
    key: String,
    version: u64,
}

#[derive(Debug, Clone)]
struct DelayedTask {
    due_at: Instant,
    guard: Guard,
    event: ScreenEvent,
}

/// Keyed one-shot timers. Cancelling a key invalidates every task scheduled
/// under it before the cancel, without touching later ones.
#[derive(Default)]
pub struct Scheduler {
    ready: VecDeque<ScreenEvent>,
    delayed: Vec<DelayedTask>,
    key_versions: HashMap<String, u64>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, command: SchedulerCommand, now: Instant) {
        match command {
            SchedulerCommand::EmitAfter { key, delay, event } => {
                let version = *self.key_versions.entry(key.clone()).or_insert(0);
                self.delayed.push(DelayedTask {
                    due_at: now + delay,
                    guard: Guard { key, version },
                    event,
                });
            }
            SchedulerCommand::Cancel { key } => {
                self.bump_version(&key);
                self.prune_stale();
            }
        }
    }

    pub fn drain_ready(&mut self, now: Instant) -> Vec<ScreenEvent> {
        let mut idx = 0usize;
        while idx < self.delayed.len() {
            if self.delayed[idx].due_at <= now {
                let task = self.delayed.swap_remove(idx);
                if self.task_is_valid(&task) {
                    self.ready.push_back(task.event);
                }
            } else {
                idx += 1;
            }
        }

        self.ready.drain(..).collect()
    }

    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        let mut next = default_timeout;

        for task in &self.delayed {
            let due_in = task.due_at.saturating_duration_since(now);
            if due_in < next {
                next = due_in;
            }
        }

        next
    }

    pub fn is_scheduled(&self, key: &str) -> bool {
        self.delayed
            .iter()
            .any(|task| task.guard.key == key && self.task_is_valid(task))
    }

    /// Drops everything, ready or delayed. Used on teardown.
    pub fn clear(&mut self) {
        let keys: Vec<String> = self.delayed.iter().map(|t| t.guard.key.clone()).collect();
        for key in keys {
            self.bump_version(&key);
        }
        self.delayed.clear();
        self.ready.clear();
    }

    fn prune_stale(&mut self) {
        let versions = &self.key_versions;
        self.delayed.retain(|task| {
            versions.get(&task.guard.key).copied().unwrap_or(0) == task.guard.version
        });
    }

    fn task_is_valid(&self, task: &DelayedTask) -> bool {
        let current = *self.key_versions.get(&task.guard.key).unwrap_or(&0);
        current == task.guard.version
    }

    fn bump_version(&mut self, key: &str) -> u64 {
        let entry = self.key_versions.entry(key.to_string()).or_insert(0);
        *entry = entry.saturating_add(1);
        *entry
    }
}
