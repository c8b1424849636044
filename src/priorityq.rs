// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Two-tier priority queue for sweep events.
//
//   Before `init`: keys are appended to a static array. `init` sorts an
//   index permutation once, in descending order, so the minimum sits at the
//   tail and extraction pops it.
//   After `init`: inserts go to a binary min-heap. Only intersection
//   vertices discovered during the sweep arrive this late.
//
// The ordering is passed to each call rather than stored, so the queue can
// hold plain vertex ids while the caller owns the coordinates.

/// Location of a queued key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PqHandle {
    /// Slot in the presorted array.
    Static(u32),
    /// Slot in the heap's handle table.
    Heap(u32),
}

#[derive(Clone, Debug)]
struct HeapSlot<K> {
    key: K,
    /// Position in `nodes` while live, next free slot while on the free list.
    node: u32,
    live: bool,
}

/// 1-based binary min-heap with stable handles.
#[derive(Clone, Debug)]
struct Heap<K> {
    nodes: Vec<u32>,
    handles: Vec<HeapSlot<K>>,
    size: usize,
    free_list: u32,
    initialized: bool,
}

impl<K: Copy + Default> Heap<K> {
    fn new() -> Self {
        Heap {
            nodes: vec![0, 0],
            handles: vec![HeapSlot {
                key: K::default(),
                node: 0,
                live: false,
            }],
            size: 0,
            free_list: 0,
            initialized: false,
        }
    }

    fn reset(&mut self) {
        self.nodes.truncate(2);
        self.handles.truncate(1);
        self.size = 0;
        self.free_list = 0;
        self.initialized = false;
    }

    #[inline]
    fn key_at(&self, node: usize) -> K {
        self.handles[self.nodes[node] as usize].key
    }

    fn float_down<F: Fn(K, K) -> bool>(&mut self, mut curr: usize, leq: &F) {
        let h_curr = self.nodes[curr];
        loop {
            let mut child = curr << 1;
            if child > self.size {
                break;
            }
            if child < self.size && leq(self.key_at(child + 1), self.key_at(child)) {
                child += 1;
            }
            let h_child = self.nodes[child];
            if leq(self.handles[h_curr as usize].key, self.handles[h_child as usize].key) {
                break;
            }
            self.nodes[curr] = h_child;
            self.handles[h_child as usize].node = curr as u32;
            curr = child;
        }
        self.nodes[curr] = h_curr;
        self.handles[h_curr as usize].node = curr as u32;
    }

    fn float_up<F: Fn(K, K) -> bool>(&mut self, mut curr: usize, leq: &F) {
        let h_curr = self.nodes[curr];
        loop {
            let parent = curr >> 1;
            if parent == 0 {
                break;
            }
            let h_parent = self.nodes[parent];
            if leq(self.handles[h_parent as usize].key, self.handles[h_curr as usize].key) {
                break;
            }
            self.nodes[curr] = h_parent;
            self.handles[h_parent as usize].node = curr as u32;
            curr = parent;
        }
        self.nodes[curr] = h_curr;
        self.handles[h_curr as usize].node = curr as u32;
    }

    fn init<F: Fn(K, K) -> bool>(&mut self, leq: &F) {
        for i in (1..=self.size).rev() {
            self.float_down(i, leq);
        }
        self.initialized = true;
    }

    fn insert<F: Fn(K, K) -> bool>(&mut self, key: K, leq: &F) -> u32 {
        self.size += 1;
        let curr = self.size;
        if self.nodes.len() <= curr {
            self.nodes.resize(curr * 2, 0);
        }

        let free = if self.free_list == 0 {
            // Every handle below `curr` is in use.
            curr as u32
        } else {
            let free = self.free_list;
            self.free_list = self.handles[free as usize].node;
            free
        };
        if self.handles.len() <= free as usize {
            self.handles.resize_with(free as usize + 1, || HeapSlot {
                key: K::default(),
                node: 0,
                live: false,
            });
        }

        self.nodes[curr] = free;
        self.handles[free as usize] = HeapSlot {
            key,
            node: curr as u32,
            live: true,
        };
        if self.initialized {
            self.float_up(curr, leq);
        }
        free
    }

    fn minimum(&self) -> Option<K> {
        if self.size == 0 {
            None
        } else {
            Some(self.key_at(1))
        }
    }

    fn release(&mut self, handle: u32) {
        let slot = &mut self.handles[handle as usize];
        slot.live = false;
        slot.node = self.free_list;
        self.free_list = handle;
    }

    fn extract_min<F: Fn(K, K) -> bool>(&mut self, leq: &F) -> Option<K> {
        if self.size == 0 {
            return None;
        }
        let h_min = self.nodes[1];
        let min = self.handles[h_min as usize].key;

        self.nodes[1] = self.nodes[self.size];
        let h_top = self.nodes[1];
        self.handles[h_top as usize].node = 1;
        self.release(h_min);
        self.size -= 1;
        if self.size > 0 {
            self.float_down(1, leq);
        }
        Some(min)
    }

    fn remove<F: Fn(K, K) -> bool>(&mut self, handle: u32, leq: &F) {
        debug_assert!(
            (handle as usize) < self.handles.len() && self.handles[handle as usize].live,
            "removing a dead heap handle"
        );
        let curr = self.handles[handle as usize].node as usize;
        self.nodes[curr] = self.nodes[self.size];
        let h_moved = self.nodes[curr];
        self.handles[h_moved as usize].node = curr as u32;

        self.size -= 1;
        if curr <= self.size {
            if curr <= 1 || leq(self.key_at(curr >> 1), self.key_at(curr)) {
                self.float_down(curr, leq);
            } else {
                self.float_up(curr, leq);
            }
        }
        self.release(handle);
    }
}

/// Sweep event queue. `K` is a small copyable id; ordering comes from the
/// `leq` closure given to each operation.
#[derive(Clone, Debug)]
pub struct PriorityQ<K> {
    heap: Heap<K>,
    keys: Vec<K>,
    live: Vec<bool>,
    order: Vec<u32>,
    /// Number of static entries not yet extracted.
    size: usize,
    initialized: bool,
    stack: Vec<(isize, isize)>,
}

impl<K: Copy + Default> Default for PriorityQ<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Default> PriorityQ<K> {
    pub fn new() -> Self {
        PriorityQ {
            heap: Heap::new(),
            keys: Vec::new(),
            live: Vec::new(),
            order: Vec::new(),
            size: 0,
            initialized: false,
            stack: Vec::new(),
        }
    }

    /// Empty the queue for the next pass, keeping every buffer.
    pub fn reset(&mut self) {
        self.heap.reset();
        self.keys.clear();
        self.live.clear();
        self.order.clear();
        self.size = 0;
        self.initialized = false;
        self.stack.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0 && self.heap.size == 0
    }

    pub fn len(&self) -> usize {
        self.size + self.heap.size
    }

    /// Queue `key`. Before `init` this only records it.
    pub fn insert<F: Fn(K, K) -> bool>(&mut self, key: K, leq: F) -> PqHandle {
        if self.initialized {
            return PqHandle::Heap(self.heap.insert(key, &leq));
        }
        let curr = self.keys.len();
        self.keys.push(key);
        self.live.push(true);
        self.size = self.keys.len();
        PqHandle::Static(curr as u32)
    }

    /// Sort the static entries. Must be called once, after the bulk inserts
    /// and before any extraction.
    pub fn init<F: Fn(K, K) -> bool>(&mut self, leq: F) {
        let keys = &self.keys;
        let order = &mut self.order;
        let stack = &mut self.stack;
        order.clear();
        order.extend(0..keys.len() as u32);
        stack.clear();

        let key = |order: &[u32], i: isize| keys[order[i as usize] as usize];
        let mut seed: u32 = 2016473283;

        if keys.len() > 1 {
            stack.push((0, keys.len() as isize - 1));
        }
        while let Some((mut p, mut r)) = stack.pop() {
            while r > p + 10 {
                seed = seed.wrapping_mul(1539415821).wrapping_add(1);
                let pick = p + (seed % (r - p + 1) as u32) as isize;
                order.swap(pick as usize, p as usize);
                let pivot = key(&order[..], p);

                let mut i = p - 1;
                let mut j = r + 1;
                loop {
                    loop {
                        i += 1;
                        if leq(key(&order[..], i), pivot) {
                            break;
                        }
                    }
                    loop {
                        j -= 1;
                        if leq(pivot, key(&order[..], j)) {
                            break;
                        }
                    }
                    order.swap(i as usize, j as usize);
                    if i >= j {
                        break;
                    }
                }
                // Undo the swap made after the pointers crossed.
                order.swap(i as usize, j as usize);

                // Recurse on the smaller side, push the larger one.
                if i - p < r - j {
                    stack.push((j + 1, r));
                    r = i - 1;
                } else {
                    stack.push((p, i - 1));
                    p = j + 1;
                }
            }
            // Insertion sort on the short run.
            for i in (p + 1)..=r {
                let moving = order[i as usize];
                let mut j = i;
                while j > p && !leq(keys[moving as usize], key(&order[..], j - 1)) {
                    order[j as usize] = order[j as usize - 1];
                    j -= 1;
                }
                order[j as usize] = moving;
            }
        }

        self.size = self.keys.len();
        self.initialized = true;
        self.heap.init(&leq);

        debug_assert!(self
            .order
            .windows(2)
            .all(|w| leq(self.keys[w[1] as usize], self.keys[w[0] as usize])));
    }

    /// Smallest key without removing it.
    pub fn minimum<F: Fn(K, K) -> bool>(&self, leq: F) -> Option<K> {
        if self.size == 0 {
            return self.heap.minimum();
        }
        let sort_min = self.keys[self.order[self.size - 1] as usize];
        match self.heap.minimum() {
            Some(heap_min) if leq(heap_min, sort_min) => Some(heap_min),
            _ => Some(sort_min),
        }
    }

    pub fn extract_min<F: Fn(K, K) -> bool>(&mut self, leq: F) -> Option<K> {
        if self.size == 0 {
            return self.heap.extract_min(&leq);
        }
        let sort_min = self.keys[self.order[self.size - 1] as usize];
        if let Some(heap_min) = self.heap.minimum() {
            if leq(heap_min, sort_min) {
                return self.heap.extract_min(&leq);
            }
        }
        self.size -= 1;
        self.skip_removed();
        Some(sort_min)
    }

    /// Drop a queued key. Static entries are tombstoned in place.
    pub fn remove<F: Fn(K, K) -> bool>(&mut self, handle: PqHandle, leq: F) {
        match handle {
            PqHandle::Heap(h) => self.heap.remove(h, &leq),
            PqHandle::Static(i) => {
                debug_assert!(self.live[i as usize], "removing a dead static handle");
                self.live[i as usize] = false;
                self.skip_removed();
            }
        }
    }

    fn skip_removed(&mut self) {
        while self.size > 0 && !self.live[self.order[self.size - 1] as usize] {
            self.size -= 1;
        }
    }
}
