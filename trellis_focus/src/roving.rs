// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Roving focus: a single tab stop over an ordered, sparse-disabled item list.
//!
//! ## Overview
//!
//! A composite widget (menu, listbox, radio group, tab list) exposes exactly one
//! item to sequential Tab navigation. Arrow keys move an internal *active* pointer
//! between items; the active item holds tab priority and receives input focus.
//!
//! [`RovingFocus`] owns the ordered registry and maintains the invariant:
//!
//! - at most one item has tab priority at any time, and
//! - whenever at least one item is enabled, exactly one enabled item has it.
//!
//! The registry is re-validated after every registration change and on
//! [`RovingFocus::revalidate`], falling back to the first enabled item.
//!
//! Items are driven through the [`RovingItem`] trait with an explicit host
//! context `Cx`, so rows can be elements in a
//! [`Document`](trellis_dom::Document) or plain test doubles.
//!
//! ## Example
//!
//! ```
//! use trellis_focus::{RovingFocus, RovingItem};
//!
//! #[derive(Default)]
//! struct Log { focused: Vec<&'static str> }
//!
//! struct Row { name: &'static str, disabled: bool, tab_stop: bool }
//!
//! impl RovingItem<Log> for Row {
//!     fn is_disabled(&self, _: &Log) -> bool { self.disabled }
//!     fn set_tab_priority(&mut self, _: &mut Log, has: bool) { self.tab_stop = has; }
//!     fn focus(&mut self, log: &mut Log) { log.focused.push(self.name); }
//!     fn activate(&mut self, _: &mut Log) {}
//! }
//!
//! let mut log = Log::default();
//! let mut roving = RovingFocus::new();
//! let a = roving.register(&mut log, Row { name: "a", disabled: false, tab_stop: false });
//! roving.register(&mut log, Row { name: "b", disabled: true, tab_stop: false });
//! let c = roving.register(&mut log, Row { name: "c", disabled: false, tab_stop: false });
//!
//! assert_eq!(roving.active_key(), Some(a));
//! assert_eq!(roving.focus_next(&mut log), Some(c));
//! assert_eq!(roving.focus_next(&mut log), Some(a));
//! assert_eq!(log.focused, ["c", "a"]);
//! ```

use alloc::vec::Vec;

use trellis_event_state::typeahead::TypeAhead;
use trellis_events::{Key, KeyEvent};

use crate::nav::{KeyIntent, Orientation, Step, WrapMode, first_enabled, last_enabled, step_enabled};

/// Behavior a roving-focus row provides.
///
/// `Cx` is whatever the row needs to act on: a document, a test log, or `()`.
pub trait RovingItem<Cx: ?Sized> {
    /// Whether the row is currently disabled. Disabled rows are skipped by
    /// navigation and never hold tab priority.
    fn is_disabled(&self, cx: &Cx) -> bool;
    /// Make this row the single tab stop (`true`) or remove it from the tab order.
    fn set_tab_priority(&mut self, cx: &mut Cx, has: bool);
    /// Move input focus to this row.
    fn focus(&mut self, cx: &mut Cx);
    /// Simulated click / selection.
    fn activate(&mut self, cx: &mut Cx);
    /// Accessible label used for typeahead. Rows without one are never matched.
    fn label(&self) -> Option<&str> {
        None
    }
}

/// Stable identity of a registered item. Keys are never reused by a registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey(u64);

/// Result of feeding a key or intent to [`RovingFocus`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RovingResponse {
    /// The active item changed (or was re-focused).
    Moved(ItemKey),
    /// The active item was activated.
    Activated(ItemKey),
    /// The user asked to dismiss; the owner decides what closes.
    Dismissed,
    /// Nothing happened; the caller should let the key continue.
    Unhandled,
}

#[derive(Debug)]
struct Slot<I> {
    key: ItemKey,
    item: I,
}

/// Ordered roving-focus registry.
#[derive(Debug)]
pub struct RovingFocus<I> {
    items: Vec<Slot<I>>,
    active: Option<usize>,
    next_key: u64,
    /// Whether stepping past either end wraps around.
    pub wrap: WrapMode,
    /// Which arrow keys [`RovingFocus::handle_key`] interprets.
    pub orientation: Orientation,
    typeahead: TypeAhead,
}

impl<I> Default for RovingFocus<I> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            active: None,
            next_key: 1,
            wrap: WrapMode::Scope,
            orientation: Orientation::Both,
            typeahead: TypeAhead::default(),
        }
    }
}

impl<I> RovingFocus<I> {
    /// Create an empty registry with wraparound and both arrow axes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the wrap mode.
    pub fn with_wrap(mut self, wrap: WrapMode) -> Self {
        self.wrap = wrap;
        self
    }

    /// Set the arrow-key orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the typeahead timeout in milliseconds.
    pub fn with_typeahead_timeout(mut self, timeout: u64) -> Self {
        self.typeahead = TypeAhead::new(timeout);
        self
    }

    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The active (tab-stop) item.
    pub fn active_key(&self) -> Option<ItemKey> {
        self.active.map(|i| self.items[i].key)
    }

    /// Position of the active item in registration order.
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Position of `key` in registration order.
    pub fn index_of(&self, key: ItemKey) -> Option<usize> {
        self.items.iter().position(|s| s.key == key)
    }

    /// Key at `index`.
    pub fn key_at(&self, index: usize) -> Option<ItemKey> {
        self.items.get(index).map(|s| s.key)
    }

    /// Borrow an item.
    pub fn item(&self, key: ItemKey) -> Option<&I> {
        self.items.iter().find(|s| s.key == key).map(|s| &s.item)
    }

    /// Mutably borrow an item. Call [`RovingFocus::revalidate`] afterwards if the
    /// change affects whether it is disabled.
    pub fn item_mut(&mut self, key: ItemKey) -> Option<&mut I> {
        self.items
            .iter_mut()
            .find(|s| s.key == key)
            .map(|s| &mut s.item)
    }

    /// Iterate `(key, item)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemKey, &I)> + '_ {
        self.items.iter().map(|s| (s.key, &s.item))
    }

    /// Append an item. It starts without tab priority; if no item holds it, the
    /// first enabled item (possibly this one) receives it.
    pub fn register<Cx: ?Sized>(&mut self, cx: &mut Cx, mut item: I) -> ItemKey
    where
        I: RovingItem<Cx>,
    {
        let key = ItemKey(self.next_key);
        self.next_key += 1;
        item.set_tab_priority(cx, false);
        self.items.push(Slot { key, item });
        self.repair(cx);
        key
    }

    /// Remove an item and return it. If it held tab priority, priority moves to
    /// the first remaining enabled item (or nowhere).
    pub fn unregister<Cx: ?Sized>(&mut self, cx: &mut Cx, key: ItemKey) -> Option<I>
    where
        I: RovingItem<Cx>,
    {
        let idx = self.index_of(key)?;
        let Slot { mut item, .. } = self.items.remove(idx);
        self.active = match self.active {
            Some(a) if a == idx => {
                item.set_tab_priority(cx, false);
                None
            }
            Some(a) if a > idx => Some(a - 1),
            other => other,
        };
        self.repair(cx);
        Some(item)
    }

    /// Re-check disabled state after external changes and repair tab priority.
    pub fn revalidate<Cx: ?Sized>(&mut self, cx: &mut Cx)
    where
        I: RovingItem<Cx>,
    {
        self.repair(cx);
    }

    /// Focus the first enabled item.
    pub fn focus_first<Cx: ?Sized>(&mut self, cx: &mut Cx) -> Option<ItemKey>
    where
        I: RovingItem<Cx>,
    {
        let idx = first_enabled(self.items.len(), |i| self.enabled_at(cx, i))?;
        Some(self.move_to(cx, idx, true))
    }

    /// Focus the last enabled item.
    pub fn focus_last<Cx: ?Sized>(&mut self, cx: &mut Cx) -> Option<ItemKey>
    where
        I: RovingItem<Cx>,
    {
        let idx = last_enabled(self.items.len(), |i| self.enabled_at(cx, i))?;
        Some(self.move_to(cx, idx, true))
    }

    /// Focus the next enabled item, skipping disabled ones.
    pub fn focus_next<Cx: ?Sized>(&mut self, cx: &mut Cx) -> Option<ItemKey>
    where
        I: RovingItem<Cx>,
    {
        self.step(cx, Step::Forward)
    }

    /// Focus the previous enabled item, skipping disabled ones.
    pub fn focus_prev<Cx: ?Sized>(&mut self, cx: &mut Cx) -> Option<ItemKey>
    where
        I: RovingItem<Cx>,
    {
        self.step(cx, Step::Backward)
    }

    /// Make `key` active and focus it (click or programmatic focus).
    ///
    /// Returns `false` for unknown or disabled items.
    pub fn focus_key<Cx: ?Sized>(&mut self, cx: &mut Cx, key: ItemKey) -> bool
    where
        I: RovingItem<Cx>,
    {
        self.select_key(cx, key, true)
    }

    /// Make `key` the tab stop without moving input focus.
    pub fn set_active<Cx: ?Sized>(&mut self, cx: &mut Cx, key: ItemKey) -> bool
    where
        I: RovingItem<Cx>,
    {
        self.select_key(cx, key, false)
    }

    /// Activate the active item unless it is disabled.
    pub fn activate_focused<Cx: ?Sized>(&mut self, cx: &mut Cx) -> Option<ItemKey>
    where
        I: RovingItem<Cx>,
    {
        let idx = self.active?;
        if !self.enabled_at(cx, idx) {
            return None;
        }
        let slot = &mut self.items[idx];
        slot.item.activate(cx);
        Some(slot.key)
    }

    /// Apply a keyboard intent.
    pub fn handle_intent<Cx: ?Sized>(&mut self, cx: &mut Cx, intent: KeyIntent) -> RovingResponse
    where
        I: RovingItem<Cx>,
    {
        let moved = match intent {
            KeyIntent::Next => self.focus_next(cx),
            KeyIntent::Prev => self.focus_prev(cx),
            KeyIntent::First => self.focus_first(cx),
            KeyIntent::Last => self.focus_last(cx),
            KeyIntent::Activate => {
                return self
                    .activate_focused(cx)
                    .map_or(RovingResponse::Unhandled, RovingResponse::Activated);
            }
            KeyIntent::Dismiss => return RovingResponse::Dismissed,
        };
        moved.map_or(RovingResponse::Unhandled, RovingResponse::Moved)
    }

    /// Interpret a key press through the keyboard contract, falling back to
    /// typeahead for printable characters.
    pub fn handle_key<Cx: ?Sized>(
        &mut self,
        cx: &mut Cx,
        event: &KeyEvent,
        now: u64,
    ) -> RovingResponse
    where
        I: RovingItem<Cx>,
    {
        // Space continues a typeahead word instead of activating.
        let in_word = self.typeahead.is_active(now) && !self.typeahead.buffer().is_empty();
        if let Some(intent) = KeyIntent::from_key(event, self.orientation)
            && !(in_word && event.key == Key::Space)
        {
            return self.handle_intent(cx, intent);
        }
        if event.has_command_modifier() {
            return RovingResponse::Unhandled;
        }
        match event.key.printable() {
            Some(ch) => self
                .typeahead(cx, ch, now)
                .map_or(RovingResponse::Unhandled, RovingResponse::Moved),
            None => RovingResponse::Unhandled,
        }
    }

    /// Jump to the next enabled item whose label starts with the typed prefix.
    ///
    /// Characters typed within the typeahead timeout accumulate; repeating one
    /// character cycles through items sharing that initial.
    pub fn typeahead<Cx: ?Sized>(&mut self, cx: &mut Cx, ch: char, now: u64) -> Option<ItemKey>
    where
        I: RovingItem<Cx>,
    {
        let len = self.items.len();
        if len == 0 {
            return None;
        }
        let found = {
            let items = &self.items;
            let query = self.typeahead.push(ch, now);
            query.find(len, self.active, |i| {
                let item = &items[i].item;
                if item.is_disabled(cx) {
                    None
                } else {
                    item.label()
                }
            })
        }?;
        tracing::trace!(index = found, "typeahead match");
        Some(self.move_to(cx, found, true))
    }

    /// Forget buffered typeahead input.
    pub fn reset_typeahead(&mut self) {
        self.typeahead.clear();
    }

    fn step<Cx: ?Sized>(&mut self, cx: &mut Cx, step: Step) -> Option<ItemKey>
    where
        I: RovingItem<Cx>,
    {
        let idx = step_enabled(self.items.len(), self.active, step, self.wrap, |i| {
            self.enabled_at(cx, i)
        })?;
        Some(self.move_to(cx, idx, true))
    }

    fn select_key<Cx: ?Sized>(&mut self, cx: &mut Cx, key: ItemKey, focus: bool) -> bool
    where
        I: RovingItem<Cx>,
    {
        let Some(idx) = self.index_of(key) else {
            return false;
        };
        if !self.enabled_at(cx, idx) {
            return false;
        }
        self.move_to(cx, idx, focus);
        true
    }

    fn enabled_at<Cx: ?Sized>(&self, cx: &Cx, idx: usize) -> bool
    where
        I: RovingItem<Cx>,
    {
        self.items
            .get(idx)
            .is_some_and(|s| !s.item.is_disabled(cx))
    }

    fn move_to<Cx: ?Sized>(&mut self, cx: &mut Cx, idx: usize, focus: bool) -> ItemKey
    where
        I: RovingItem<Cx>,
    {
        let prev = self.active.replace(idx);
        if prev != Some(idx) {
            if let Some(p) = prev
                && let Some(slot) = self.items.get_mut(p)
            {
                slot.item.set_tab_priority(cx, false);
            }
            self.items[idx].item.set_tab_priority(cx, true);
        }
        if focus {
            self.items[idx].item.focus(cx);
        }
        tracing::trace!(index = idx, focus, "roving focus moved");
        self.items[idx].key
    }

    /// Restore the invariant: the active item is enabled (else the first enabled
    /// item takes over) and it alone holds tab priority.
    fn repair<Cx: ?Sized>(&mut self, cx: &mut Cx)
    where
        I: RovingItem<Cx>,
    {
        let valid = self.active.filter(|&a| self.enabled_at(cx, a));
        let next = valid.or_else(|| first_enabled(self.items.len(), |i| self.enabled_at(cx, i)));
        if let Some(stale) = self.active
            && Some(stale) != next
            && let Some(slot) = self.items.get_mut(stale)
        {
            slot.item.set_tab_priority(cx, false);
        }
        if next != self.active {
            tracing::trace!(from = ?self.active, to = ?next, "roving tab stop repaired");
        }
        self.active = next;
        if let Some(n) = next {
            self.items[n].item.set_tab_priority(cx, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[derive(Default)]
    struct Log {
        focused: Vec<&'static str>,
        activated: Vec<&'static str>,
    }

    #[derive(Debug)]
    struct Row {
        name: &'static str,
        disabled: bool,
        tab_stop: bool,
    }

    fn row(name: &'static str) -> Row {
        Row {
            name,
            disabled: false,
            tab_stop: false,
        }
    }

    fn disabled(name: &'static str) -> Row {
        Row {
            disabled: true,
            ..row(name)
        }
    }

    impl RovingItem<Log> for Row {
        fn is_disabled(&self, _: &Log) -> bool {
            self.disabled
        }
        fn set_tab_priority(&mut self, _: &mut Log, has: bool) {
            self.tab_stop = has;
        }
        fn focus(&mut self, log: &mut Log) {
            log.focused.push(self.name);
        }
        fn activate(&mut self, log: &mut Log) {
            log.activated.push(self.name);
        }
        fn label(&self) -> Option<&str> {
            Some(self.name)
        }
    }

    fn tab_stops(r: &RovingFocus<Row>) -> Vec<&'static str> {
        r.iter()
            .filter(|(_, row)| row.tab_stop)
            .map(|(_, row)| row.name)
            .collect()
    }

    fn assert_invariant(r: &RovingFocus<Row>) {
        let stops = tab_stops(r);
        let any_enabled = r.iter().any(|(_, row)| !row.disabled);
        if any_enabled {
            assert_eq!(stops.len(), 1, "exactly one tab stop when any item is enabled");
            let holder = r.iter().find(|(_, row)| row.tab_stop).unwrap().1;
            assert!(!holder.disabled, "tab stop must be enabled");
        } else {
            assert!(stops.is_empty(), "no tab stop without enabled items");
            assert_eq!(r.active_key(), None);
        }
    }

    #[test]
    fn first_enabled_registration_gets_tab_priority() {
        let mut log = Log::default();
        let mut r = RovingFocus::new();
        r.register(&mut log, disabled("a"));
        assert_eq!(r.active_key(), None);
        let b = r.register(&mut log, row("b"));
        r.register(&mut log, row("c"));
        assert_eq!(r.active_key(), Some(b));
        assert_eq!(tab_stops(&r), vec!["b"]);
        assert!(log.focused.is_empty(), "registration never moves input focus");
    }

    #[test]
    fn invariant_holds_under_register_unregister_sequences() {
        let mut log = Log::default();
        let mut r = RovingFocus::new();
        let names = ["a", "b", "c", "d", "e", "f"];
        let mut keys = Vec::new();
        for (i, name) in names.iter().enumerate() {
            let item = if i % 3 == 1 { disabled(name) } else { row(name) };
            keys.push(r.register(&mut log, item));
            assert_invariant(&r);
        }
        r.focus_last(&mut log);
        // Remove in an interleaved order, checking after each step.
        for &i in &[5_usize, 0, 3, 1, 4, 2] {
            r.unregister(&mut log, keys[i]);
            assert_invariant(&r);
        }
        assert!(r.is_empty());
    }

    #[test]
    fn unregistering_the_tab_stop_moves_it_to_first_enabled() {
        let mut log = Log::default();
        let mut r = RovingFocus::new();
        let a = r.register(&mut log, row("a"));
        let b = r.register(&mut log, row("b"));
        let c = r.register(&mut log, row("c"));
        r.focus_key(&mut log, c);
        let removed = r.unregister(&mut log, c).unwrap();
        assert!(!removed.tab_stop);
        assert_eq!(r.active_key(), Some(a));
        r.unregister(&mut log, a);
        assert_eq!(r.active_key(), Some(b));
        assert_eq!(r.unregister(&mut log, a).map(|row| row.name), None);
    }

    #[test]
    fn next_skips_disabled_and_wraps() {
        let mut log = Log::default();
        let mut r = RovingFocus::new();
        let a = r.register(&mut log, row("A"));
        r.register(&mut log, disabled("B"));
        let c = r.register(&mut log, row("C"));

        assert_eq!(r.focus_next(&mut log), Some(c));
        assert_eq!(r.focus_next(&mut log), Some(a));
        assert_eq!(r.focus_prev(&mut log), Some(c));
        assert_eq!(log.focused, vec!["C", "A", "C"]);
        assert_eq!(tab_stops(&r), vec!["C"]);
    }

    #[test]
    fn empty_and_all_disabled_registries_are_no_ops() {
        let mut log = Log::default();
        let mut r: RovingFocus<Row> = RovingFocus::new();
        assert_eq!(r.focus_next(&mut log), None);
        assert_eq!(r.focus_first(&mut log), None);
        assert_eq!(r.activate_focused(&mut log), None);

        r.register(&mut log, disabled("a"));
        r.register(&mut log, disabled("b"));
        assert_eq!(r.focus_prev(&mut log), None);
        assert_eq!(r.focus_last(&mut log), None);
        assert_eq!(r.active_key(), None);
        assert!(log.focused.is_empty());
    }

    #[test]
    fn activate_skips_disabled_active_item() {
        let mut log = Log::default();
        let mut r = RovingFocus::new();
        let a = r.register(&mut log, row("a"));
        assert_eq!(r.activate_focused(&mut log), Some(a));
        r.item_mut(a).unwrap().disabled = true;
        assert_eq!(r.activate_focused(&mut log), None);
        assert_eq!(log.activated, vec!["a"]);
    }

    #[test]
    fn revalidate_moves_priority_off_newly_disabled_item() {
        let mut log = Log::default();
        let mut r = RovingFocus::new();
        let a = r.register(&mut log, row("a"));
        let b = r.register(&mut log, row("b"));
        r.item_mut(a).unwrap().disabled = true;
        r.revalidate(&mut log);
        assert_eq!(r.active_key(), Some(b));
        assert_eq!(tab_stops(&r), vec!["b"]);
    }

    #[test]
    fn no_wrap_stays_at_end() {
        let mut log = Log::default();
        let mut r = RovingFocus::new().with_wrap(WrapMode::Never);
        r.register(&mut log, row("a"));
        let b = r.register(&mut log, row("b"));
        assert_eq!(r.focus_next(&mut log), Some(b));
        assert_eq!(r.focus_next(&mut log), None);
        assert_eq!(r.active_key(), Some(b));
    }

    #[test]
    fn keyboard_contract_drives_registry() {
        let mut log = Log::default();
        let mut r = RovingFocus::new();
        let a = r.register(&mut log, row("a"));
        let b = r.register(&mut log, row("b"));
        let key = |k: Key| KeyEvent::new(k);

        assert_eq!(r.handle_key(&mut log, &key(Key::End), 0), RovingResponse::Moved(b));
        assert_eq!(r.handle_key(&mut log, &key(Key::Home), 0), RovingResponse::Moved(a));
        assert_eq!(r.handle_key(&mut log, &key(Key::Enter), 0), RovingResponse::Activated(a));
        assert_eq!(r.handle_key(&mut log, &key(Key::Escape), 0), RovingResponse::Dismissed);
        assert_eq!(r.handle_key(&mut log, &key(Key::Tab), 0), RovingResponse::Unhandled);
    }

    #[test]
    fn typeahead_matches_prefix_and_cycles() {
        let mut log = Log::default();
        let mut r = RovingFocus::new();
        r.register(&mut log, row("apple"));
        let banana = r.register(&mut log, row("Banana"));
        r.register(&mut log, disabled("blueberry"));
        let cherry = r.register(&mut log, row("cherry"));
        let boysenberry = r.register(&mut log, row("boysenberry"));

        assert_eq!(r.typeahead(&mut log, 'b', 0), Some(banana));
        assert_eq!(r.typeahead(&mut log, 'b', 100), Some(boysenberry), "repeat cycles, skipping disabled");
        assert_eq!(r.typeahead(&mut log, 'c', 5_000), Some(cherry), "buffer resets after timeout");
        assert_eq!(r.typeahead(&mut log, 'z', 10_000), None);
        assert_eq!(r.active_key(), Some(cherry));
    }

    #[test]
    fn space_extends_typeahead_word() {
        let mut log = Log::default();
        let mut r = RovingFocus::new();
        r.register(&mut log, row("new file"));
        let new_folder = r.register(&mut log, row("new folder"));
        for (i, ch) in "new fo".chars().enumerate() {
            r.handle_key(&mut log, &KeyEvent::new(Key::from_char(ch)), i as u64 * 10);
        }
        assert_eq!(r.active_key(), Some(new_folder));
        assert!(log.activated.is_empty(), "space inside a word must not activate");
    }
}
