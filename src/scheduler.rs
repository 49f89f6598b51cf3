use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::time::Duration;

/// Identifies a scheduled task so it can be cancelled.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Single-threaded timer queue. Times are offsets from an arbitrary start,
/// supplied by the caller.
pub struct Scheduler<T> {
    queue: BinaryHeap<Reverse<(Duration, u64)>>,
    tasks: Vec<(u64, T)>,
    cancelled: HashSet<u64>,
    next_id: u64,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Scheduler { queue: BinaryHeap::new(), tasks: vec![], cancelled: HashSet::new(), next_id: 0 }
    }

    pub fn schedule(&mut self, at: Duration, task: T) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;

        // Ids increase, so tasks due at the same time run in scheduling order
        self.queue.push(Reverse((at, id)));
        self.tasks.push((id, task));
        TimerHandle(id)
    }

    pub fn cancel(&mut self, handle: TimerHandle) {
        if self.tasks.iter().any(|(id, _)| *id == handle.0) {
            self.cancelled.insert(handle.0);
        }
    }

    /// Deadline of the earliest live task.
    pub fn next_deadline(&mut self) -> Option<Duration> {
        self.drop_cancelled_front();
        self.queue.peek().map(|Reverse((at, _))| *at)
    }

    /// Removes and returns the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<T> {
        self.drop_cancelled_front();

        match self.queue.peek() {
            Some(Reverse((at, _))) if *at <= now => {}
            _ => return None,
        }

        let Reverse((_, id)) = self.queue.pop()?;
        self.take_task(id)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn drop_cancelled_front(&mut self) {
        while let Some(Reverse((_, id))) = self.queue.peek() {
            let id = *id;
            if !self.cancelled.remove(&id) {
                break;
            }
            self.queue.pop();
            self.take_task(id);
        }
    }

    fn take_task(&mut self, id: u64) -> Option<T> {
        let idx = self.tasks.iter().position(|(task_id, _)| *task_id == id)?;
        Some(self.tasks.swap_remove(idx).1)
    }
}
