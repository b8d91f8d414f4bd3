//! Virtual-time scheduler for delayed and periodic work
//!
//! Nothing here runs on its own. The owner advances virtual time and pulls
//! due tasks out one at a time, so every task is an atomic unit of work on
//! the owner's thread. Tasks due at the same instant come out in the order
//! they were scheduled.

use std::collections::BTreeMap;
use std::time::Duration;

/// Handle returned for every scheduled task, used to cancel it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug)]
struct Slot<T> {
    id: u64,
    every: Option<Duration>,
    task: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    next_seq: u64,
    queue: BTreeMap<(Duration, u64), Slot<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            next_seq: 0,
            queue: BTreeMap::new(),
        }
    }

    /// Virtual time elapsed since the scheduler was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Run `task` once, `delay` after the current virtual time.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TaskHandle {
        let id = self.alloc_id();
        self.insert(self.now + delay, id, None, task);
        TaskHandle(id)
    }

    /// Run `task` every `interval`, first at `now + interval`.
    pub fn schedule_every(&mut self, interval: Duration, task: T) -> TaskHandle {
        let id = self.alloc_id();
        // A zero interval would never let virtual time move past it.
        let interval = interval.max(Duration::from_millis(1));
        self.insert(self.now + interval, id, Some(interval), task);
        TaskHandle(id)
    }

    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.queue.len();
        self.queue.retain(|_, slot| slot.id != handle.0);
        self.queue.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.queue.clear();
    }

    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.queue.values().any(|slot| slot.id == handle.0)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &T> {
        self.queue.values().map(|slot| &slot.task)
    }

    /// Pop the earliest task due at or before `until`, moving virtual time to
    /// its due instant. Periodic tasks are re-armed before being returned.
    pub fn pop_due(&mut self, until: Duration) -> Option<T>
    where
        T: Clone,
    {
        let (&(due, seq), _) = self.queue.iter().next()?;
        if due > until {
            return None;
        }
        let slot = self.queue.remove(&(due, seq))?;
        self.now = self.now.max(due);
        if let Some(every) = slot.every {
            self.insert(due + every, slot.id, Some(every), slot.task.clone());
        }
        Some(slot.task)
    }

    /// Move virtual time forward to `until` without running anything.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn insert(&mut self, due: Duration, id: u64, every: Option<Duration>, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert((due, seq), Slot { id, every, task });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(scheduler: &mut Scheduler<&'static str>, by: Duration) -> Vec<&'static str> {
        let until = scheduler.now() + by;
        let mut out = Vec::new();
        while let Some(task) = scheduler.pop_due(until) {
            out.push(task);
        }
        scheduler.settle(until);
        out
    }

    #[test]
    fn test_tasks_run_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Duration::from_millis(1500), "late");
        scheduler.schedule(Duration::from_millis(500), "early");
        scheduler.schedule(Duration::from_millis(1000), "middle");

        assert!(drain(&mut scheduler, Duration::from_millis(499)).is_empty());
        assert_eq!(
            drain(&mut scheduler, Duration::from_millis(1001)),
            vec!["early", "middle", "late"]
        );
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_ties_keep_schedule_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Duration::from_millis(10), "first");
        scheduler.schedule(Duration::from_millis(10), "second");
        assert_eq!(
            drain(&mut scheduler, Duration::from_millis(10)),
            vec!["first", "second"]
        );
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule(Duration::from_millis(10), "gone");
        assert!(scheduler.is_scheduled(handle));
        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));
        assert!(drain(&mut scheduler, Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_periodic_rearms() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule_every(Duration::from_secs(10), "tick");
        assert_eq!(drain(&mut scheduler, Duration::from_secs(35)).len(), 3);
        assert!(scheduler.is_scheduled(handle));
        assert_eq!(scheduler.now(), Duration::from_secs(35));

        scheduler.cancel(handle);
        assert!(drain(&mut scheduler, Duration::from_secs(100)).is_empty());
    }
}
