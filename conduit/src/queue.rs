use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::{Mutex, PoisonError};

use conduit_api::{Item, Queue};

/// In-process priority queue: lowest priority value first, FIFO among equal priorities.
#[derive(Debug, Default)]
pub struct MemoryQueue {
    inner: Mutex<Heap>,
}

#[derive(Debug, Default)]
struct Heap {
    items: BinaryHeap<Entry>,
    next_seq: u64,
}

#[derive(Debug)]
struct Entry {
    seq: u64,
    item: Item,
}

// BinaryHeap is a max-heap, so the ordering is reversed on both keys
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .item
            .priority
            .cmp(&self.item.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for Entry {}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Queue for MemoryQueue {
    fn insert(&self, item: Item) {
        let mut heap = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let seq = heap.next_seq;
        heap.next_seq += 1;
        heap.items.push(Entry { seq, item });
    }

    fn extract_min(&self) -> Option<Item> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .items
            .pop()
            .map(|entry| entry.item)
    }

    fn remove(&self, pipeline: &str) -> Vec<Item> {
        let mut heap = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let (removed, kept): (Vec<Entry>, Vec<Entry>) = std::mem::take(&mut heap.items)
            .into_vec()
            .into_iter()
            .partition(|entry| entry.item.pipeline == pipeline);
        heap.items = BinaryHeap::from(kept);

        let mut removed = removed;
        removed.sort_by_key(|entry| entry.seq);
        removed.into_iter().map(|entry| entry.item).collect()
    }

    fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).items.len()
    }
}
