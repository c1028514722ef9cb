// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener registry and routing.
//!
//! ## Overview
//!
//! A [`ListenerSet`] records *which* listeners exist (target, event kind, capture
//! flag, owner) without storing any callbacks. [`ListenerSet::route`] turns an
//! event into the ordered list of listeners that should observe it; the caller
//! then runs its own handlers over that list, usually through
//! [`dispatcher::run`](crate::dispatcher::run).
//!
//! Keeping handlers out of the registry means a handler can remove listeners
//! (including its own) while a dispatch is in flight: the caller checks
//! [`ListenerSet::is_live`] before running each entry.
//!
//! ## Ordering
//!
//! For an element-targeted event whose target is connected, the propagation path
//! is `Window → Document → body → … → target`:
//!
//! - Capture: capturing listeners on the path, outermost first, excluding the target.
//! - Target: every listener on the target, in installation order.
//! - Bubble: non-capturing listeners on the path, innermost first, excluding the target.
//!
//! Detached targets route through their own ancestor chain only. Window-only
//! events ([`UiEvent::Scroll`], [`UiEvent::Resize`]) reach window listeners in
//! the target phase.

use alloc::vec::Vec;

use trellis_dom::Document;

use crate::types::{Dispatch, EventKind, ListenerId, ListenerTarget, Phase, UiEvent};

#[derive(Clone, Debug)]
struct Entry<O> {
    id: ListenerId,
    owner: O,
    target: ListenerTarget,
    kind: EventKind,
    capture: bool,
}

/// Registry of installed listeners, keyed by owner.
#[derive(Clone, Debug)]
pub struct ListenerSet<O> {
    entries: Vec<Entry<O>>,
    next_id: u64,
}

impl<O> Default for ListenerSet<O> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }
}

impl<O: Copy + PartialEq> ListenerSet<O> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a listener for `kind` at `target` on behalf of `owner`.
    pub fn add(
        &mut self,
        owner: O,
        target: ListenerTarget,
        kind: EventKind,
        capture: bool,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            owner,
            target,
            kind,
            capture,
        });
        id
    }

    /// Remove a listener. Returns `false` if it was already removed.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Remove every listener installed by `owner`, returning how many were removed.
    pub fn remove_owner(&mut self, owner: O) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.owner != owner);
        before - self.entries.len()
    }

    /// Returns true if the listener is still installed.
    pub fn is_live(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Number of installed listeners.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no listeners are installed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of listeners installed by `owner`.
    pub fn count_for(&self, owner: O) -> usize {
        self.entries.iter().filter(|e| e.owner == owner).count()
    }

    /// Compute the ordered dispatch sequence for `event`.
    pub fn route(&self, doc: &Document, event: &UiEvent) -> Vec<Dispatch<O>> {
        let kind = event.kind();
        let mut out = Vec::new();

        let Some(target) = event.target() else {
            self.emit(&mut out, ListenerTarget::Window, kind, Phase::Target, None);
            return out;
        };

        let mut path: Vec<ListenerTarget> = Vec::new();
        if doc.is_connected(target) {
            path.push(ListenerTarget::Window);
            path.push(ListenerTarget::Document);
        }
        path.extend(
            doc.path_from_root(target)
                .into_iter()
                .map(ListenerTarget::Element),
        );
        let Some((&at, ancestors)) = path.split_last() else {
            return out;
        };

        for &node in ancestors {
            self.emit(&mut out, node, kind, Phase::Capture, Some(true));
        }
        self.emit(&mut out, at, kind, Phase::Target, None);
        for &node in ancestors.iter().rev() {
            self.emit(&mut out, node, kind, Phase::Bubble, Some(false));
        }
        tracing::trace!(?kind, steps = out.len(), "routed event");
        out
    }

    fn emit(
        &self,
        out: &mut Vec<Dispatch<O>>,
        at: ListenerTarget,
        kind: EventKind,
        phase: Phase,
        capture: Option<bool>,
    ) {
        let matching = self.entries.iter().filter(|e| {
            e.target == at && e.kind == kind && capture.is_none_or(|c| c == e.capture)
        });
        out.extend(matching.map(|e| Dispatch {
            phase,
            listener: e.id,
            owner: e.owner,
            current: at,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Key, KeyEvent, PointerButton, PointerEvent};
    use kurbo::{Point, Size};
    use trellis_dom::{ElementData, ElementId};

    fn setup() -> (Document, ElementId, ElementId) {
        let mut doc = Document::new(Size::new(100.0, 100.0));
        let body = doc.body();
        let outer = doc.create_element(ElementData::default());
        let inner = doc.create_element(ElementData::default());
        doc.append_child(body, outer).unwrap();
        doc.append_child(outer, inner).unwrap();
        (doc, outer, inner)
    }

    fn pointer(target: ElementId) -> UiEvent {
        UiEvent::PointerDown(PointerEvent {
            target,
            position: Point::ZERO,
            button: PointerButton::Primary,
        })
    }

    #[test]
    fn capture_target_bubble_order() {
        let (doc, outer, inner) = setup();
        let mut set = ListenerSet::<u32>::new();
        set.add(1, ListenerTarget::Document, EventKind::PointerDown, true);
        set.add(2, ListenerTarget::Element(outer), EventKind::PointerDown, true);
        set.add(3, ListenerTarget::Element(inner), EventKind::PointerDown, false);
        set.add(4, ListenerTarget::Element(outer), EventKind::PointerDown, false);
        set.add(5, ListenerTarget::Window, EventKind::PointerDown, false);

        let seq = set.route(&doc, &pointer(inner));
        let order: Vec<(Phase, u32)> = seq.iter().map(|d| (d.phase, d.owner)).collect();
        assert_eq!(
            order,
            alloc::vec![
                (Phase::Capture, 1),
                (Phase::Capture, 2),
                (Phase::Target, 3),
                (Phase::Bubble, 4),
                (Phase::Bubble, 5),
            ]
        );
    }

    #[test]
    fn kinds_do_not_cross() {
        let (doc, _, inner) = setup();
        let mut set = ListenerSet::<u32>::new();
        set.add(1, ListenerTarget::Document, EventKind::KeyDown, true);
        assert!(set.route(&doc, &pointer(inner)).is_empty());

        let key = UiEvent::KeyDown {
            target: inner,
            event: KeyEvent::new(Key::Escape),
        };
        assert_eq!(set.route(&doc, &key).len(), 1);
    }

    #[test]
    fn window_events_reach_only_window_listeners() {
        let (doc, outer, _) = setup();
        let mut set = ListenerSet::<u32>::new();
        set.add(1, ListenerTarget::Window, EventKind::Scroll, false);
        set.add(2, ListenerTarget::Document, EventKind::Scroll, true);
        set.add(3, ListenerTarget::Element(outer), EventKind::Scroll, false);
        let seq = set.route(&doc, &UiEvent::Scroll);
        assert_eq!(seq.len(), 1);
        assert_eq!(seq[0].owner, 1);
        assert_eq!(seq[0].phase, Phase::Target);
    }

    #[test]
    fn detached_targets_skip_document_listeners() {
        let (mut doc, outer, inner) = setup();
        let mut set = ListenerSet::<u32>::new();
        set.add(1, ListenerTarget::Document, EventKind::PointerDown, true);
        set.add(2, ListenerTarget::Element(outer), EventKind::PointerDown, true);
        doc.detach(outer);
        let seq = set.route(&doc, &pointer(inner));
        assert_eq!(seq.iter().map(|d| d.owner).collect::<Vec<_>>(), alloc::vec![2]);
    }

    #[test]
    fn remove_owner_drops_all_and_ids_stay_unique() {
        let mut set = ListenerSet::<u32>::new();
        let a = set.add(7, ListenerTarget::Window, EventKind::Scroll, false);
        let b = set.add(7, ListenerTarget::Window, EventKind::Resize, false);
        let c = set.add(8, ListenerTarget::Window, EventKind::Resize, false);
        assert_eq!(set.count_for(7), 2);
        assert_eq!(set.remove_owner(7), 2);
        assert!(!set.is_live(a) && !set.is_live(b));
        assert!(set.is_live(c));
        assert!(!set.remove(a), "second removal is a no-op");

        let d = set.add(7, ListenerTarget::Window, EventKind::Scroll, false);
        assert!(d != a && d != b && d != c);
    }
}
