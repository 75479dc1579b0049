//! Bounded min-heap of [`Event`], keyed by scheduled time and filtered by a
//! time horizon.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::event::Event;

/// A queued event plus a monotonically increasing sequence number so that
/// equal-time events still compare unequal and heap ordering stays
/// deterministic without relying on `BinaryHeap`'s unspecified tie behavior.
#[derive(Debug, Clone, Copy)]
struct Scheduled {
    event: Event,
    sequence: u64,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.event.time() == other.event.time() && self.sequence == other.sequence
    }
}
impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// `BinaryHeap` is a max-heap; reverse the comparison so the earliest time
/// (and, on ties, the earliest-inserted event) sorts to the top.
impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .event
            .time()
            .total_cmp(&self.event.time())
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// A priority queue of [`Event`], min-ordered by time, that silently drops
/// anything scheduled beyond `time_horizon`.
pub struct EventQueue {
    heap: BinaryHeap<Scheduled>,
    time_horizon: f64,
    next_sequence: u64,
}

impl EventQueue {
    /// Builds an empty queue that rejects events with `time > time_horizon`.
    pub fn new(time_horizon: f64) -> Self {
        Self { heap: BinaryHeap::new(), time_horizon, next_sequence: 0 }
    }

    /// Inserts `event` unless its time exceeds the horizon, in which case
    /// it is discarded silently.
    pub fn enqueue(&mut self, event: Event) {
        if event.time() > self.time_horizon {
            return;
        }
        self.heap.push(Scheduled { event, sequence: self.next_sequence });
        self.next_sequence += 1;
    }

    /// Removes and returns the earliest-time event. Panics if the queue is
    /// empty; callers must check [`Self::is_empty`] first.
    pub fn dequeue(&mut self) -> Event {
        self.heap.pop().expect("dequeue called on an empty EventQueue").event
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn non_empty(&self) -> bool {
        !self.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn time_horizon(&self) -> f64 {
        self.time_horizon
    }
}
