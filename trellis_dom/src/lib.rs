// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis DOM: the host element tree the interaction engine runs against.
//!
//! Overlays, focus traps, and roving focus all need the same handful of host
//! facts: who contains whom, which element is focused, whether something can take
//! focus, and where an element sits on screen. This crate models exactly those
//! facts and nothing more.
//!
//! - Generational [`ElementId`] handles; a stale id never aliases a reused slot.
//! - Parent/child structure rooted at a permanent body ([`Document::body`]).
//!   Elements are created detached and become *connected* once linked under it.
//! - [`ElementFlags`] for focusability, disabled, hidden, and aria-hidden state,
//!   plus optional tab indices with browser-like effective values.
//! - A small [`Style`]: `display`, fixed `left`/`top`, forced `width`, [`ZIndex`].
//! - Client geometry via Kurbo: local bounds and transforms fold into
//!   [`Document::bounding_client_rect`], honoring the viewport scroll offset and
//!   fixed positioning.
//! - An active element that falls back to the body when the focused element is
//!   detached, hidden, disabled, or destroyed.
//!
//! ## Not a layout engine
//!
//! Upstream code computes sizes and positions and writes them as local bounds and
//! transforms. The only positioning this crate interprets is the fixed
//! `left`/`top` pair overlay containers use.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Rect, Size};
//! use trellis_dom::{Document, ElementData, ZIndex};
//!
//! let mut doc = Document::new(Size::new(320.0, 240.0));
//! let body = doc.body();
//! let card = doc.create_element(ElementData::new("div").with_bounds(Rect::new(0.0, 0.0, 100.0, 100.0)));
//! let popup = doc.create_element(ElementData::new("div").with_bounds(Rect::new(0.0, 0.0, 50.0, 50.0)));
//! doc.append_child(body, card).unwrap();
//! doc.append_child(body, popup).unwrap();
//!
//! // Later siblings paint on top...
//! assert_eq!(doc.hit_test_point(Point::new(10.0, 10.0)), Some(popup));
//! // ...unless an explicit z-index says otherwise.
//! doc.set_z_index(card, ZIndex::Value(5));
//! assert_eq!(doc.hit_test_point(Point::new(10.0, 10.0)), Some(card));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod document;
mod error;
mod types;
mod util;

pub use document::{Document, Viewport};
pub use error::DomError;
pub use types::{Display, ElementData, ElementFlags, ElementId, ParseZIndexError, Style, ZIndex};
