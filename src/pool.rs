// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Generation-checked arena used for every short-lived entity of a pass:
// mesh vertices, faces and edge pairs, active regions and dictionary nodes.
//
// A pool is owned by one tessellator. `reset()` releases every slot in O(n)
// while keeping the backing storage, so the next pass allocates nothing.

use std::ops::{Index, IndexMut};

/// A stable reference into a [`Pool`]. Stale handles (freed or from before a
/// reset) never alias a newer value because the generation no longer matches.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }
}

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

#[derive(Clone, Debug)]
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
    // Slots at or above this index are free and not on the free list.
    watermark: usize,
    live: usize,
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Pool {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            watermark: 0,
            live: 0,
        }
    }

    /// Store `value` and return its handle. Freed slots are reused first,
    /// most recently freed on top.
    pub fn insert(&mut self, value: T) -> Handle {
        self.live += 1;
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return Handle {
                index,
                generation: slot.generation,
            };
        }
        let index = self.watermark;
        self.watermark += 1;
        if index == self.slots.len() {
            self.slots.push(Slot {
                generation: 0,
                value: Some(value),
            });
        } else {
            self.slots[index].value = Some(value);
        }
        Handle {
            index: index as u32,
            generation: self.slots[index].generation,
        }
    }

    /// Release the slot behind `handle`. Returns `None` for stale handles.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index())?;
        if slot.generation != handle.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(handle.index);
        self.live -= 1;
        Some(value)
    }

    #[inline]
    pub fn get(&self, handle: Handle) -> Option<&T> {
        let slot = self.slots.get(handle.index())?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index())?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()
    }

    #[inline]
    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Free every value at once. Capacity is retained and every outstanding
    /// handle becomes stale.
    pub fn reset(&mut self) {
        for slot in &mut self.slots[..self.watermark] {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
        self.free_list.clear();
        self.watermark = 0;
        self.live = 0;
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<Handle> for Pool<T> {
    type Output = T;

    #[inline]
    fn index(&self, handle: Handle) -> &T {
        match self.get(handle) {
            Some(value) => value,
            None => panic!("stale pool handle {:?}", handle),
        }
    }
}

impl<T> IndexMut<Handle> for Pool<T> {
    #[inline]
    fn index_mut(&mut self, handle: Handle) -> &mut T {
        match self.get_mut(handle) {
            Some(value) => value,
            None => panic!("stale pool handle {:?}", handle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_remove() {
        let mut pool: Pool<u32> = Pool::new();
        let a = pool.insert(7);
        let b = pool.insert(9);
        assert_ne!(a, b);
        assert_eq!(pool[a], 7);
        assert_eq!(pool.remove(a), Some(7));
        assert_eq!(pool.len(), 1);
        let c = pool.insert(11);
        // c reuses a's slot with a fresh generation
        assert_eq!(c.index(), a.index());
        assert_ne!(c, a);
        assert!(pool.get(a).is_none());
        assert_eq!(pool[c], 11);
    }

    #[test]
    fn double_remove_is_rejected() {
        let mut pool: Pool<i32> = Pool::new();
        let a = pool.insert(1);
        assert_eq!(pool.remove(a), Some(1));
        assert_eq!(pool.remove(a), None);
        assert!(pool.is_empty());
    }

    #[test]
    fn reset_invalidates_and_reuses_storage() {
        let mut pool: Pool<String> = Pool::new();
        let handles: Vec<Handle> = (0..5).map(|i| pool.insert(i.to_string())).collect();
        pool.remove(handles[2]);
        pool.reset();
        assert_eq!(pool.len(), 0);
        for h in &handles {
            assert!(!pool.contains(*h), "handle {:?} survived reset", h);
        }
        let fresh = pool.insert("x".to_string());
        assert_eq!(fresh.index(), 0);
        assert_eq!(pool[fresh], "x");
    }

    #[test]
    #[should_panic(expected = "stale pool handle")]
    fn index_with_stale_handle_panics() {
        let mut pool: Pool<u8> = Pool::new();
        let a = pool.insert(1);
        pool.remove(a);
        let _ = pool[a];
    }
}
