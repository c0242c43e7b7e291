//! A reservable circular queue backing each worker's BFS front.
//!
//! `reserve` lets a worker size its frontier once, up front, so the search
//! loop almost never asks the allocator for memory while three sibling
//! threads are doing the same. A `VecDeque` would work; this keeps the
//! growth policy and the reserve-resets-state contract explicit.

/// Growth doubles, so the logical size can never actually reach this.
const FULL_QUEUE: usize = 1 << 63;
const INITIAL_CAPACITY: usize = 8;

pub struct RingQueue<T> {
    elems: Vec<T>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T: Copy + Default> RingQueue<T> {
    pub fn new() -> RingQueue<T> {
        RingQueue {
            elems: vec![T::default(); INITIAL_CAPACITY],
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    /// Reallocate to exactly `capacity` slots and forget all contents.
    pub fn reserve(&mut self, capacity: usize) {
        self.elems = vec![T::default(); capacity];
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }

    pub fn push(&mut self, elem: T) {
        assert!(self.len != FULL_QUEUE, "ring queue is at max capacity");
        if self.len == self.elems.len() {
            self.grow();
        }
        self.elems[self.tail] = elem;
        self.tail = (self.tail + 1) % self.elems.len();
        self.len += 1;
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let elem = self.elems[self.head];
        self.head = (self.head + 1) % self.elems.len();
        self.len -= 1;
        Some(elem)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn grow(&mut self) {
        let mut bigger = vec![T::default(); self.elems.len() * 2];
        for (slot, offset) in bigger.iter_mut().zip(0..self.len) {
            *slot = self.elems[(self.head + offset) % self.elems.len()];
        }
        self.head = 0;
        self.tail = self.len;
        self.elems = bigger;
    }
}

impl<T: Copy + Default> Default for RingQueue<T> {
    fn default() -> RingQueue<T> {
        RingQueue::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    #[test]
    fn pops_in_push_order_across_the_wrap_point() {
        let mut q = RingQueue::new();
        for v in 0..6 {
            q.push(v);
        }
        assert_eq!(q.pop(), Some(0));
        assert_eq!(q.pop(), Some(1));
        // head has advanced; these pushes wrap around the backing array
        for v in 6..10 {
            q.push(v);
        }
        let drained: Vec<i32> = std::iter::from_fn(|| q.pop()).collect();
        assert_eq!(drained, (2..10).collect::<Vec<_>>());
        assert!(q.is_empty());
    }

    #[test]
    fn growth_preserves_order() {
        let mut q = RingQueue::new();
        for v in 0..100 {
            q.push(v);
        }
        assert_eq!(q.len(), 100);
        for v in 0..100 {
            assert_eq!(q.pop(), Some(v));
        }
    }

    #[test]
    fn reserve_clears_logical_state() {
        let mut q = RingQueue::new();
        q.push(1);
        q.push(2);
        q.reserve(64);
        assert!(q.is_empty());
        assert_eq!(q.pop(), None);
        q.push(9);
        assert_eq!(q.pop(), Some(9));
    }

    proptest! {
        /// Any interleaving of pushes and pops behaves exactly like a
        /// double-ended queue used one-way.
        #[test]
        fn matches_a_fifo_model(ops in proptest::collection::vec(proptest::option::of(0u32..1000), 0..300)) {
            let mut q = RingQueue::new();
            let mut model: VecDeque<u32> = VecDeque::new();
            for op in ops {
                match op {
                    Some(v) => {
                        q.push(v);
                        model.push_back(v);
                    }
                    None => prop_assert_eq!(q.pop(), model.pop_front()),
                }
                prop_assert_eq!(q.len(), model.len());
            }
        }
    }
}
