// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame work coalescing.
//!
//! High-frequency signals (scroll, resize) mark keys dirty; the host drains the
//! set once per animation frame. However many times a key is marked between two
//! drains, it is returned once.
//!
//! ```
//! use trellis_event_state::frame::FrameCoalescer;
//!
//! let mut frames = FrameCoalescer::new();
//! for _ in 0..50 {
//!     frames.mark(7_u32);
//! }
//! assert_eq!(frames.take(), [7]);
//! assert!(frames.take().is_empty());
//! ```

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashSet;

/// Keys with work pending for the next frame, in first-marked order.
#[derive(Clone, Debug)]
pub struct FrameCoalescer<K> {
    order: Vec<K>,
    dirty: HashSet<K>,
}

impl<K> Default for FrameCoalescer<K> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            dirty: HashSet::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> FrameCoalescer<K> {
    /// Create an empty coalescer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` dirty. Returns true if it was not already pending, meaning the
    /// caller should request an animation frame.
    pub fn mark(&mut self, key: K) -> bool {
        if self.dirty.insert(key) {
            self.order.push(key);
            true
        } else {
            false
        }
    }

    /// Forget a pending key (for example when its owner is torn down).
    pub fn forget(&mut self, key: K) {
        if self.dirty.remove(&key) {
            self.order.retain(|k| *k != key);
        }
    }

    /// Returns true if `key` is pending.
    pub fn is_pending(&self, key: K) -> bool {
        self.dirty.contains(&key)
    }

    /// Returns true if any key is pending.
    pub fn has_pending(&self) -> bool {
        !self.order.is_empty()
    }

    /// Drain pending keys for this frame.
    pub fn take(&mut self) -> Vec<K> {
        self.dirty.clear();
        core::mem::take(&mut self.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn keys_come_back_once_in_first_marked_order() {
        let mut f = FrameCoalescer::new();
        assert!(f.mark(2));
        assert!(f.mark(1));
        assert!(!f.mark(2));
        assert_eq!(f.take(), vec![2, 1]);
        assert!(!f.has_pending());
        assert!(f.mark(2), "marking after a drain schedules again");
    }

    #[test]
    fn forget_removes_pending_key() {
        let mut f = FrameCoalescer::new();
        f.mark(1);
        f.mark(2);
        f.forget(1);
        assert!(!f.is_pending(1));
        assert_eq!(f.take(), vec![2]);
    }
}
