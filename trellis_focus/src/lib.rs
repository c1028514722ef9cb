// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Focus: keyboard navigation primitives for composite widgets and modals.
//!
//! This crate models focus handling as three layers:
//! - **Navigation vocabulary** ([`KeyIntent`], [`Step`], [`WrapMode`], [`Orientation`]) and
//!   the linear helpers [`step_enabled`], [`first_enabled`], and [`last_enabled`], which
//!   walk a list with sparse disabled entries. The same helpers drive the combobox's
//!   active option.
//! - **Roving focus** ([`RovingFocus`], [`RovingItem`]): a single tab stop over an
//!   ordered registry, moved by arrow keys, `Home`/`End`, and typeahead.
//! - **Focus trapping** ([`FocusTrap`], [`focusable_descendants`]): Tab/Shift+Tab
//!   cycling confined to a modal surface, with initial-focus policies and focus
//!   restoration on release.
//!
//! ## Keyboard contract
//!
//! | Key | Intent |
//! |---|---|
//! | `ArrowDown` / `ArrowRight` | [`KeyIntent::Next`] |
//! | `ArrowUp` / `ArrowLeft` | [`KeyIntent::Prev`] |
//! | `Home` / `End` | [`KeyIntent::First`] / [`KeyIntent::Last`] |
//! | `Enter` / `Space` | [`KeyIntent::Activate`] |
//! | `Escape` | [`KeyIntent::Dismiss`] |
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Size;
//! use trellis_dom::{Document, ElementData};
//! use trellis_events::{Key, KeyEvent};
//! use trellis_focus::{FocusTrap, InitialFocus, TrapOutcome};
//!
//! let mut doc = Document::new(Size::new(400.0, 300.0));
//! let body = doc.body();
//! let dialog = doc.create_element(ElementData::new("div").with_tab_index(-1));
//! doc.append_child(body, dialog).unwrap();
//! let ok = doc.create_element(ElementData::new("button").focusable());
//! let cancel = doc.create_element(ElementData::new("button").focusable());
//! doc.append_child(dialog, ok).unwrap();
//! doc.append_child(dialog, cancel).unwrap();
//!
//! let mut trap = FocusTrap::install(&doc, dialog);
//! assert_eq!(trap.focus_initial(&mut doc, InitialFocus::FirstFocusable), Some(ok));
//! assert_eq!(trap.handle_key(&mut doc, &KeyEvent::new(Key::Tab)), TrapOutcome::Moved(cancel));
//! // Tab from the last focusable wraps to the first.
//! assert_eq!(trap.handle_key(&mut doc, &KeyEvent::new(Key::Tab)), TrapOutcome::Moved(ok));
//! trap.release(&mut doc);
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod nav;
mod roving;
mod trap;

pub use nav::{
    KeyIntent, Orientation, Step, WrapMode, first_enabled, last_enabled, step_enabled,
};
pub use roving::{ItemKey, RovingFocus, RovingItem, RovingResponse};
pub use trap::{FocusTrap, InitialFocus, TrapOutcome, focusable_descendants};
