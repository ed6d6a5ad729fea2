//! Min-priority queue used by work centers and the factory clock
//!
//! Entries with the lowest priority value come out first. Insertion and
//! extraction are O(log n). Entries that share a priority come out in
//! insertion order so that a run is reproducible, but callers should not rely
//! on that; a policy that needs a tiebreak encodes it in the priority (as FIFO
//! does with its counter).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A payload paired with the priority it is ordered by
#[derive(Debug, Clone, PartialEq)]
pub struct PrioritizedItem<T> {
    /// Ordering key; lower values are served first
    pub priority: f64,
    /// The queued value
    pub item: T,
}

impl<T> PrioritizedItem<T> {
    /// Wrap a value with a priority
    pub fn new(priority: f64, item: T) -> Self {
        Self { priority, item }
    }
}

#[derive(Debug, Clone)]
struct HeapEntry<T> {
    priority: f64,
    insertion: u64,
    item: T,
}

impl<T> PartialEq for HeapEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for HeapEntry<T> {}

impl<T> PartialOrd for HeapEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for HeapEntry<T> {
    // BinaryHeap is a max-heap; reversing turns it into a min-heap
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then(self.insertion.cmp(&other.insertion))
            .reverse()
    }
}

/// Min-priority queue of prioritized items
#[derive(Debug, Clone)]
pub struct PriorityQueue<T> {
    heap: BinaryHeap<HeapEntry<T>>,
    insertions: u64,
}

impl<T> PriorityQueue<T> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self { heap: BinaryHeap::new(), insertions: 0 }
    }

    /// Insert an item
    pub fn push(&mut self, entry: PrioritizedItem<T>) {
        let insertion = self.insertions;
        self.insertions += 1;
        self.heap.push(HeapEntry { priority: entry.priority, insertion, item: entry.item });
    }

    /// Remove and return the lowest-priority entry, or `None` when empty
    pub fn pop(&mut self) -> Option<PrioritizedItem<T>> {
        self.heap.pop().map(|entry| PrioritizedItem::new(entry.priority, entry.item))
    }

    /// Priority of the entry `pop` would return next
    pub fn peek_priority(&self) -> Option<f64> {
        self.heap.peek().map(|entry| entry.priority)
    }

    /// Number of queued entries
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Iterate over queued items in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.heap.iter().map(|entry| &entry.item)
    }
}

impl<T: PartialEq> PriorityQueue<T> {
    /// Whether an item is queued
    pub fn contains(&self, item: &T) -> bool {
        self.iter().any(|queued| queued == item)
    }
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
