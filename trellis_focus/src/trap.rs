// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Modal focus trapping.
//!
//! A [`FocusTrap`] confines Tab/Shift+Tab cycling to the focusable descendants of
//! a surface root and remembers which element to return focus to on release.
//! The focusable set is recomputed on every key press, so rows added, removed,
//! disabled, or hidden while the trap is installed are honored immediately.

use alloc::vec::Vec;

use trellis_dom::{Document, ElementId};
use trellis_events::{Key, KeyEvent, Modifiers};

/// Where focus goes when a modal surface opens.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InitialFocus {
    /// The first focusable descendant, falling back to the root.
    #[default]
    FirstFocusable,
    /// The surface root itself.
    Root,
    /// A specific descendant, falling back to [`InitialFocus::FirstFocusable`]
    /// when it is outside the root or cannot take focus.
    Element(ElementId),
    /// Leave focus where it is.
    None,
}

/// Result of [`FocusTrap::handle_key`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TrapOutcome {
    /// The trap moved focus; the host should suppress its default Tab behavior.
    Moved(ElementId),
    /// The key was not a trapped Tab press.
    Ignored,
}

/// Elements inside `root` reachable by sequential navigation, in tab order.
///
/// Candidates are rendered, not disabled, not aria-hidden (including through an
/// ancestor), and have a non-negative effective tab index. Positive tab indices
/// come first in ascending order, then everything else in document order.
/// `root` itself is never included.
pub fn focusable_descendants(doc: &Document, root: ElementId) -> Vec<ElementId> {
    let mut out: Vec<(i32, ElementId)> = doc
        .descendants(root)
        .into_iter()
        .filter(|&id| doc.is_tabbable(id) && !doc.is_aria_hidden(id))
        .filter_map(|id| Some((doc.effective_tab_index(id)?, id)))
        .collect();
    // Stable: document order survives within each tab index.
    out.sort_by_key(|&(tab, _)| if tab > 0 { (0, tab) } else { (1, 0) });
    out.into_iter().map(|(_, id)| id).collect()
}

/// A focus trap installed on a surface root.
#[derive(Clone, Debug)]
pub struct FocusTrap {
    root: ElementId,
    restore_to: Option<ElementId>,
    released: bool,
}

impl FocusTrap {
    /// Install a trap on `root`, capturing the currently focused element as the
    /// restoration target.
    pub fn install(doc: &Document, root: ElementId) -> Self {
        let active = doc.active_element();
        let restore_to = (active != doc.body()).then_some(active);
        tracing::debug!(?root, ?restore_to, "focus trap installed");
        Self {
            root,
            restore_to,
            released: false,
        }
    }

    /// The trapped surface root.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// The element focus returns to on release.
    pub fn restore_target(&self) -> Option<ElementId> {
        self.restore_to
    }

    /// Returns true once [`FocusTrap::release`] has run.
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// The live focusable list for this trap.
    pub fn focusable_elements(&self, doc: &Document) -> Vec<ElementId> {
        focusable_descendants(doc, self.root)
    }

    /// Apply an initial-focus policy. Returns the element that received focus.
    pub fn focus_initial(&self, doc: &mut Document, policy: InitialFocus) -> Option<ElementId> {
        match policy {
            InitialFocus::None => None,
            InitialFocus::Root => self.focus_root(doc),
            InitialFocus::Element(id) if doc.contains(self.root, id) && doc.focus(id) => Some(id),
            InitialFocus::Element(_) | InitialFocus::FirstFocusable => {
                match self.focusable_elements(doc).first() {
                    Some(&first) if doc.focus(first) => Some(first),
                    _ => self.focus_root(doc),
                }
            }
        }
    }

    /// Cycle focus on `Tab` / `Shift+Tab` while focus is inside the root.
    ///
    /// Tab from the last focusable wraps to the first and Shift+Tab from the first
    /// wraps to the last. With no focusable descendants focus is forced onto the
    /// root.
    pub fn handle_key(&self, doc: &mut Document, event: &KeyEvent) -> TrapOutcome {
        if self.released || event.key != Key::Tab || event.has_command_modifier() {
            return TrapOutcome::Ignored;
        }
        if !doc.has_focus_within(self.root) {
            return TrapOutcome::Ignored;
        }
        let list = self.focusable_elements(doc);
        if list.is_empty() {
            return self
                .focus_root(doc)
                .map_or(TrapOutcome::Ignored, TrapOutcome::Moved);
        }
        let len = list.len();
        let backward = event.modifiers.contains(Modifiers::SHIFT);
        let current = list.iter().position(|&id| id == doc.active_element());
        let target = match (current, backward) {
            (Some(p), false) => list[(p + 1) % len],
            (Some(p), true) => list[(p + len - 1) % len],
            (None, false) => list[0],
            (None, true) => list[len - 1],
        };
        if doc.focus(target) {
            tracing::trace!(?target, backward, "focus trap cycled");
            TrapOutcome::Moved(target)
        } else {
            TrapOutcome::Ignored
        }
    }

    /// Release the trap and restore focus to the captured element if it is still
    /// connected. A second release is a no-op.
    pub fn release(&mut self, doc: &mut Document) -> Option<ElementId> {
        if self.released {
            return None;
        }
        self.released = true;
        let target = self.restore_to?;
        if doc.is_connected(target) && doc.focus(target) {
            tracing::debug!(root = ?self.root, ?target, "focus trap released");
            Some(target)
        } else {
            tracing::warn!(root = ?self.root, ?target, "focus restoration target is gone");
            None
        }
    }

    fn focus_root(&self, doc: &mut Document) -> Option<ElementId> {
        if doc.focus(self.root) {
            Some(self.root)
        } else {
            tracing::warn!(root = ?self.root, "trap root is not programmatically focusable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use kurbo::Size;
    use trellis_dom::{ElementData, ElementFlags};

    struct Fixture {
        doc: Document,
        trigger: ElementId,
        surface: ElementId,
    }

    fn fixture() -> Fixture {
        let mut doc = Document::new(Size::new(400.0, 300.0));
        let body = doc.body();
        let trigger = doc.create_element(ElementData::new("button").focusable());
        let surface = doc.create_element(ElementData::new("div").with_tab_index(-1));
        doc.append_child(body, trigger).unwrap();
        doc.append_child(body, surface).unwrap();
        doc.focus(trigger);
        Fixture {
            doc,
            trigger,
            surface,
        }
    }

    fn button(doc: &mut Document, parent: ElementId) -> ElementId {
        let id = doc.create_element(ElementData::new("button").focusable());
        doc.append_child(parent, id).unwrap();
        id
    }

    #[test]
    fn tab_and_shift_tab_wrap() {
        let Fixture {
            mut doc, surface, ..
        } = fixture();
        let f1 = button(&mut doc, surface);
        let f2 = button(&mut doc, surface);
        let f3 = button(&mut doc, surface);
        let trap = FocusTrap::install(&doc, surface);

        doc.focus(f3);
        assert_eq!(trap.handle_key(&mut doc, &KeyEvent::new(Key::Tab)), TrapOutcome::Moved(f1));
        assert_eq!(doc.active_element(), f1);
        assert_eq!(
            trap.handle_key(&mut doc, &KeyEvent::shift(Key::Tab)),
            TrapOutcome::Moved(f3)
        );
        assert_eq!(trap.handle_key(&mut doc, &KeyEvent::shift(Key::Tab)), TrapOutcome::Moved(f2));
    }

    #[test]
    fn excluded_elements_are_skipped() {
        let Fixture {
            mut doc, surface, ..
        } = fixture();
        let f1 = button(&mut doc, surface);
        let disabled = button(&mut doc, surface);
        doc.set_disabled(disabled, true);
        let hidden = button(&mut doc, surface);
        doc.set_flags(hidden, ElementFlags::FOCUSABLE | ElementFlags::HIDDEN);
        let aria_wrapper = doc.create_element(ElementData::new("div").with_flags(ElementFlags::ARIA_HIDDEN));
        doc.append_child(surface, aria_wrapper).unwrap();
        button(&mut doc, aria_wrapper);
        let scripted = doc.create_element(ElementData::new("div").with_tab_index(-1));
        doc.append_child(surface, scripted).unwrap();
        let f2 = button(&mut doc, surface);

        assert_eq!(focusable_descendants(&doc, surface), vec![f1, f2]);
    }

    #[test]
    fn positive_tab_indices_come_first() {
        let Fixture {
            mut doc, surface, ..
        } = fixture();
        let plain = button(&mut doc, surface);
        let second = doc.create_element(ElementData::new("input").with_tab_index(2));
        let first = doc.create_element(ElementData::new("input").with_tab_index(1));
        doc.append_child(surface, second).unwrap();
        doc.append_child(surface, first).unwrap();
        assert_eq!(focusable_descendants(&doc, surface), vec![first, second, plain]);
    }

    #[test]
    fn empty_surface_forces_focus_to_root() {
        let Fixture { mut doc, surface, .. } = fixture();
        let trap = FocusTrap::install(&doc, surface);
        assert_eq!(trap.focus_initial(&mut doc, InitialFocus::FirstFocusable), Some(surface));
        assert_eq!(trap.handle_key(&mut doc, &KeyEvent::new(Key::Tab)), TrapOutcome::Moved(surface));
        assert_eq!(doc.active_element(), surface);
    }

    #[test]
    fn keys_outside_the_surface_are_ignored() {
        let Fixture {
            mut doc,
            surface,
            trigger,
        } = fixture();
        button(&mut doc, surface);
        let trap = FocusTrap::install(&doc, surface);
        assert_eq!(trap.handle_key(&mut doc, &KeyEvent::new(Key::Tab)), TrapOutcome::Ignored);
        assert_eq!(doc.active_element(), trigger);
        assert_eq!(
            trap.handle_key(&mut doc, &KeyEvent::new(Key::ArrowDown)),
            TrapOutcome::Ignored
        );
    }

    #[test]
    fn release_restores_once() {
        let Fixture {
            mut doc,
            surface,
            trigger,
        } = fixture();
        let f1 = button(&mut doc, surface);
        let mut trap = FocusTrap::install(&doc, surface);
        assert_eq!(trap.focus_initial(&mut doc, InitialFocus::FirstFocusable), Some(f1));

        assert_eq!(trap.release(&mut doc), Some(trigger));
        assert_eq!(doc.active_element(), trigger);
        doc.focus(f1);
        assert_eq!(trap.release(&mut doc), None, "second release is a no-op");
        assert_eq!(doc.active_element(), f1);
        assert_eq!(trap.handle_key(&mut doc, &KeyEvent::new(Key::Tab)), TrapOutcome::Ignored);
    }

    #[test]
    fn release_with_detached_target_does_nothing() {
        let Fixture {
            mut doc,
            surface,
            trigger,
        } = fixture();
        let f1 = button(&mut doc, surface);
        let mut trap = FocusTrap::install(&doc, surface);
        trap.focus_initial(&mut doc, InitialFocus::FirstFocusable);
        doc.detach(trigger);
        assert_eq!(trap.release(&mut doc), None);
        assert_eq!(doc.active_element(), f1);
    }

    #[test]
    fn initial_focus_policies() {
        let Fixture {
            mut doc,
            surface,
            trigger,
        } = fixture();
        button(&mut doc, surface);
        let f2 = button(&mut doc, surface);
        let trap = FocusTrap::install(&doc, surface);

        assert_eq!(trap.focus_initial(&mut doc, InitialFocus::None), None);
        assert_eq!(doc.active_element(), trigger);
        assert_eq!(trap.focus_initial(&mut doc, InitialFocus::Element(f2)), Some(f2));
        assert_eq!(trap.focus_initial(&mut doc, InitialFocus::Root), Some(surface));
        // An element outside the root falls back to the first focusable.
        let first = focusable_descendants(&doc, surface)[0];
        assert_eq!(trap.focus_initial(&mut doc, InitialFocus::Element(trigger)), Some(first));
    }
}
