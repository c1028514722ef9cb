// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Events: event vocabulary and deterministic listener routing.
//!
//! ## Overview
//!
//! This crate defines the events the interaction engine consumes
//! ([`UiEvent`], [`KeyEvent`], [`PointerEvent`]) and a [`ListenerSet`] that
//! routes them through the document in capture → target → bubble order.
//! It does not perform hit testing; [`UiEvent::pointer_down_at`] asks the
//! [`Document`](trellis_dom::Document) for the topmost element.
//!
//! Listeners are plain records (target, kind, capture flag, owner). Routing
//! yields [`Dispatch`] steps that name the owner, so the component that installed
//! a listener decides what it means. This is what lets an overlay close itself
//! (removing its listeners) from inside a handler.
//!
//! ## Dispatcher
//!
//! Execute handlers over the routed sequence with [`dispatcher::run`], which
//! honors [`Outcome::Stop`] and skips listeners removed during dispatch.
//!
//! ```
//! use kurbo::{Point, Rect, Size};
//! use trellis_dom::{Document, ElementData};
//! use trellis_events::{dispatcher, EventKind, ListenerSet, ListenerTarget, Outcome, Phase, UiEvent};
//!
//! let mut doc = Document::new(Size::new(100.0, 100.0));
//! let body = doc.body();
//! let button = doc.create_element(ElementData::new("button").with_bounds(Rect::new(0.0, 0.0, 20.0, 20.0)));
//! doc.append_child(body, button).unwrap();
//!
//! let mut listeners = ListenerSet::<&str>::new();
//! listeners.add("outside-click", ListenerTarget::Document, EventKind::PointerDown, true);
//! listeners.add("button", ListenerTarget::Element(button), EventKind::PointerDown, false);
//!
//! let ev = UiEvent::pointer_down_at(&doc, Point::new(5.0, 5.0)).unwrap();
//! let seq = listeners.route(&doc, &ev);
//! let mut seen = Vec::new();
//! dispatcher::run(&seq, &mut listeners, |d, _| {
//!     seen.push((d.phase, d.owner));
//!     Outcome::Continue
//! });
//! assert_eq!(seen, [(Phase::Capture, "outside-click"), (Phase::Target, "button")]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod dispatcher;
mod listeners;
mod types;

pub use listeners::ListenerSet;
pub use types::{
    Dispatch, EventKind, Key, KeyEvent, ListenerId, ListenerTarget, Modifiers, Outcome, Phase,
    PointerButton, PointerEvent, UiEvent,
};
