// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event vocabulary and routing types.

use kurbo::Point;
use trellis_dom::{Document, ElementId};

/// Logical key identity, independent of layout and platform.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Sequential focus navigation.
    Tab,
    /// Dismiss.
    Escape,
    /// Activate / commit.
    Enter,
    /// Activate.
    Space,
    /// Previous item (vertical).
    ArrowUp,
    /// Next item (vertical).
    ArrowDown,
    /// Previous item (horizontal).
    ArrowLeft,
    /// Next item (horizontal).
    ArrowRight,
    /// First item.
    Home,
    /// Last item.
    End,
    /// Delete backwards.
    Backspace,
    /// A printable character.
    Character(char),
    /// Anything the engine does not interpret.
    Other,
}

impl Key {
    /// Map a printable character to a key. `' '` maps to [`Key::Space`].
    pub fn from_char(ch: char) -> Self {
        if ch == ' ' { Self::Space } else { Self::Character(ch) }
    }

    /// The printable character this key produces, if any.
    pub fn printable(self) -> Option<char> {
        match self {
            Self::Character(ch) => Some(ch),
            Self::Space => Some(' '),
            _ => None,
        }
    }
}

bitflags::bitflags! {
    /// Modifier keys held during a key or pointer event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 0b0001;
        /// Control.
        const CTRL  = 0b0010;
        /// Alt / Option.
        const ALT   = 0b0100;
        /// Meta / Command / Super.
        const META  = 0b1000;
    }
}

/// A key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// Which key.
    pub key: Key,
    /// Held modifiers.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key press without modifiers.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
        }
    }

    /// Add modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }

    /// Shorthand for `Shift` + `key`.
    pub fn shift(key: Key) -> Self {
        Self::new(key).with_modifiers(Modifiers::SHIFT)
    }

    /// Returns true if no modifier is held.
    pub fn is_plain(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Returns true if a shortcut modifier (Ctrl, Alt, Meta) is held.
    ///
    /// Shift alone does not count; it is part of ordinary text entry.
    pub fn has_command_modifier(&self) -> bool {
        self.modifiers
            .intersects(Modifiers::CTRL | Modifiers::ALT | Modifiers::META)
    }
}

impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}

/// Pointer button.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Usually the left mouse button, or a touch/pen contact.
    #[default]
    Primary,
    /// Usually the right mouse button.
    Secondary,
    /// Usually the middle mouse button.
    Auxiliary,
}

/// A pointer press.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// Element under the pointer.
    pub target: ElementId,
    /// Client-space position.
    pub position: Point,
    /// Pressed button.
    pub button: PointerButton,
}

/// The events the interaction engine consumes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum UiEvent {
    /// A pointer was pressed over `target`.
    PointerDown(PointerEvent),
    /// A key was pressed while `target` had focus.
    KeyDown {
        /// Focused element (or the body).
        target: ElementId,
        /// The key press.
        event: KeyEvent,
    },
    /// The document scrolled. Only window listeners observe it.
    Scroll,
    /// The viewport was resized. Only window listeners observe it.
    Resize,
}

impl UiEvent {
    /// A pointer-down at `position`, targeted at the topmost element there.
    ///
    /// Returns `None` if nothing is rendered under the point.
    pub fn pointer_down_at(doc: &Document, position: Point) -> Option<Self> {
        let target = doc.hit_test_point(position)?;
        Some(Self::PointerDown(PointerEvent {
            target,
            position,
            button: PointerButton::Primary,
        }))
    }

    /// A key press targeted at the document's active element.
    pub fn key_down(doc: &Document, event: impl Into<KeyEvent>) -> Self {
        Self::KeyDown {
            target: doc.active_element(),
            event: event.into(),
        }
    }

    /// The kind used to match listeners.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PointerDown(_) => EventKind::PointerDown,
            Self::KeyDown { .. } => EventKind::KeyDown,
            Self::Scroll => EventKind::Scroll,
            Self::Resize => EventKind::Resize,
        }
    }

    /// The element the event is dispatched at, if it has one.
    pub fn target(&self) -> Option<ElementId> {
        match self {
            Self::PointerDown(p) => Some(p.target),
            Self::KeyDown { target, .. } => Some(*target),
            Self::Scroll | Self::Resize => None,
        }
    }
}

/// Event kinds a listener can subscribe to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// [`UiEvent::PointerDown`].
    PointerDown,
    /// [`UiEvent::KeyDown`].
    KeyDown,
    /// [`UiEvent::Scroll`].
    Scroll,
    /// [`UiEvent::Resize`].
    Resize,
}

/// Where a listener is installed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    /// The window, outermost in every propagation path.
    Window,
    /// The document, just inside the window.
    Document,
    /// A specific element.
    Element(ElementId),
}

/// Propagation phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Outermost to innermost, before the target.
    Capture,
    /// At the target.
    Target,
    /// Innermost to outermost, after the target.
    Bubble,
}

/// Handler outcome controlling propagation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Outcome {
    /// Keep propagating.
    #[default]
    Continue,
    /// Stop propagation immediately.
    Stop,
}

/// Identifier of an installed listener. Never reused within a [`ListenerSet`](crate::ListenerSet).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

/// One step of a routed event: which listener runs, on whose behalf, and where.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dispatch<O> {
    /// Propagation phase.
    pub phase: Phase,
    /// The listener to run.
    pub listener: ListenerId,
    /// The listener's owner (for example an overlay handle).
    pub owner: O,
    /// Where the listener is installed.
    pub current: ListenerTarget,
}
