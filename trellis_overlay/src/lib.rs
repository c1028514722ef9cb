// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Overlay: anchored floating surfaces with a managed lifecycle.
//!
//! An overlay is a container element appended to the document body and
//! positioned relative to an anchor element. [`OverlayManager`] owns every open
//! overlay together with the listeners it installed, so closing an overlay (for
//! any reason, any number of times) always leaves the document and the listener
//! set exactly as they were before it opened.
//!
//! - Dismissal: pointer-down outside the container and anchor, or an unmodified
//!   `Escape`, each switchable through [`OverlayConfig`].
//! - Positioning: [`compute_position`] is a pure function of the configuration,
//!   the anchor's client rect, and the viewport. Scroll and resize only mark an
//!   overlay dirty; [`OverlayManager::on_animation_frame`] recomputes each dirty
//!   overlay once.
//! - Anchor loss: a disconnected anchor hides the container; a destroyed anchor
//!   closes the overlay on the next frame.
//!
//! ## Minimal example
//!
//! ```rust
//! use core::convert::Infallible;
//! use kurbo::{Rect, Size};
//! use trellis_dom::{Document, ElementData};
//! use trellis_events::UiEvent;
//! use trellis_overlay::{DismissReason, OverlayConfig, OverlayManager, PositionState};
//!
//! let mut doc = Document::new(Size::new(800.0, 600.0));
//! let body = doc.body();
//! let trigger = doc.create_element(
//!     ElementData::new("button").with_bounds(Rect::new(10.0, 10.0, 110.0, 40.0)),
//! );
//! doc.append_child(body, trigger).unwrap();
//!
//! let mut overlays = OverlayManager::new();
//! let handle = overlays
//!     .attach(&mut doc, trigger, OverlayConfig::default(), |_, _| Ok::<_, Infallible>(()))
//!     .unwrap();
//! assert_eq!(
//!     overlays.position(handle),
//!     Some(PositionState::Placed { left: 10.0, top: 40.0, width: Some(100.0) })
//! );
//!
//! let escape = UiEvent::key_down(&doc, trellis_events::Key::Escape);
//! let dismissed = overlays.handle_event(&mut doc, &escape);
//! assert_eq!(dismissed[0].reason, DismissReason::Escape);
//! assert!(overlays.is_closed(handle));
//! assert_eq!(overlays.listener_count(), 0);
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

mod config;
mod error;
mod manager;
mod position;

pub use config::{OverlayConfig, Placement};
pub use error::OverlayError;
pub use manager::{CONTAINER_CLASS, DismissReason, Dismissals, Dismissed, OverlayHandle, OverlayManager};
pub use position::{PositionState, compute_position};
