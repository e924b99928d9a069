//! Cancellable virtual-time task scheduler.
//!
//! Every delayed or periodic callback in the match core is data in this
//! min-heap rather than a closure: countdown ticks, round polls, respawn
//! delays, effect expiries, spawn cycles. Cleanup can therefore enumerate
//! and cancel all outstanding work deterministically, and tests drive the
//! clock forward without touching wall time.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Opaque cancellable handle to a scheduled task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

#[derive(Debug)]
struct Slot<K> {
    kind: K,
    period_ms: Option<u64>,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct HeapEntry {
    due_ms: u64,
    /// Tie-breaker keeping same-instant tasks in scheduling order.
    seq: u64,
    id: TaskId,
}

#[derive(Debug)]
pub struct TaskScheduler<K> {
    now_ms: u64,
    next_id: u64,
    next_seq: u64,
    live: HashMap<TaskId, Slot<K>>,
    heap: BinaryHeap<Reverse<HeapEntry>>,
}

impl<K: Clone> TaskScheduler<K> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            next_seq: 0,
            live: HashMap::new(),
            heap: BinaryHeap::new(),
        }
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Number of outstanding tasks, cancelled ones excluded.
    pub fn pending(&self) -> usize {
        self.live.len()
    }

    /// Fire once after `delay_ms`.
    pub fn schedule_once(&mut self, delay_ms: u64, kind: K) -> TaskId {
        self.schedule(delay_ms, None, kind)
    }

    /// Fire every `period_ms`, starting one period from now.
    pub fn schedule_repeating(&mut self, period_ms: u64, kind: K) -> TaskId {
        debug_assert!(period_ms > 0, "zero-period task would never yield");
        self.schedule(period_ms, Some(period_ms), kind)
    }

    fn schedule(&mut self, delay_ms: u64, period_ms: Option<u64>, kind: K) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.live.insert(id, Slot { kind, period_ms });
        self.push_entry(self.now_ms + delay_ms, id);
        id
    }

    fn push_entry(&mut self, due_ms: u64, id: TaskId) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(HeapEntry { due_ms, seq, id }));
    }

    /// Cancel a task. Returns whether it was still outstanding.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.live.remove(&id).is_some()
    }

    /// Cancel everything. After this, `pending()` is zero and no stale
    /// entry will ever be yielded.
    pub fn cancel_all(&mut self) {
        self.live.clear();
        self.heap.clear();
    }

    /// Pop the next task due at or before `now_ms`, advancing virtual time
    /// to that task's due instant so follow-up scheduling happens relative
    /// to it. Cancelled entries are skipped. Returns `None` once nothing
    /// else is due, leaving the clock at `now_ms`.
    ///
    /// Dispatching one task at a time means a handler that cancels later
    /// tasks in the same batch actually prevents them from firing.
    pub fn next_due(&mut self, now_ms: u64) -> Option<(TaskId, K)> {
        while let Some(Reverse(head)) = self.heap.peek() {
            if head.due_ms > now_ms {
                break;
            }
            let Some(Reverse(entry)) = self.heap.pop() else {
                break;
            };
            let Some(slot) = self.live.get(&entry.id) else {
                continue; // cancelled
            };
            let kind = slot.kind.clone();
            self.now_ms = self.now_ms.max(entry.due_ms);
            match slot.period_ms {
                Some(period) => self.push_entry(entry.due_ms + period, entry.id),
                None => {
                    self.live.remove(&entry.id);
                }
            }
            return Some((entry.id, kind));
        }
        self.now_ms = self.now_ms.max(now_ms);
        None
    }
}

impl<K: Clone> Default for TaskScheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}
