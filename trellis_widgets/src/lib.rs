// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Widgets: composite-widget adapters over the Trellis engine.
//!
//! Each adapter wires a few host elements to the engine primitives and keeps the
//! ARIA state in sync:
//!
//! - Overlay-backed: [`Menu`], [`Select`], [`Autocomplete`], [`Tooltip`], and
//!   [`Modal`] (dialog and bottom sheet).
//! - In-place: [`RadioGroup`], [`Tabs`], [`Stepper`], and [`SortHeaders`].
//!
//! Adapters hold no references to shared services. The [`Document`](trellis_dom::Document)
//! and [`OverlayManager`](trellis_overlay::OverlayManager) are passed into every
//! call, and results come back as events. When the overlay manager dismisses an
//! overlay on its own (outside pointer, `Escape`, anchor removed), the host hands
//! the [`Dismissed`](trellis_overlay::Dismissed) record to the owning widget's
//! `on_overlay_closed`.
//!
//! ARIA ids come from [`next_id`], a single process-wide counter.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use trellis_dom::{Document, ElementData};
//! use trellis_events::{Key, KeyEvent};
//! use trellis_overlay::OverlayManager;
//! use trellis_widgets::{Menu, MenuConfig, MenuEntry, MenuEvent};
//!
//! let mut doc = Document::new(Size::new(640.0, 480.0));
//! let mut overlays = OverlayManager::new();
//! let body = doc.body();
//! let trigger = doc.create_element(
//!     ElementData::new("button")
//!         .focusable()
//!         .with_bounds(Rect::new(10.0, 10.0, 110.0, 40.0)),
//! );
//! doc.append_child(body, trigger).unwrap();
//! doc.focus(trigger);
//!
//! let entries = vec![MenuEntry::new("Cut"), MenuEntry::new("Copy"), MenuEntry::new("Paste")];
//! let mut menu = Menu::new(&mut doc, trigger, entries, MenuConfig::default()).unwrap();
//!
//! // ArrowDown on the trigger opens the menu with the first entry focused.
//! menu.handle_trigger_key(&mut doc, &mut overlays, &KeyEvent::new(Key::ArrowDown)).unwrap();
//! menu.handle_key(&mut doc, &mut overlays, &KeyEvent::new(Key::ArrowDown), 0);
//! let chosen = menu.handle_key(&mut doc, &mut overlays, &KeyEvent::new(Key::Enter), 10);
//! assert_eq!(chosen, Some(MenuEvent::Selected(1)));
//! assert_eq!(doc.active_element(), trigger);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod autocomplete;
mod error;
mod ids;
mod item;
mod listbox;
mod menu;
mod modal;
mod radio;
mod select;
mod sort;
mod stepper;
mod tabs;
mod tooltip;

pub use autocomplete::{Autocomplete, AutocompleteConfig};
pub use error::WidgetError;
pub use ids::next_id;
pub use item::ElementItem;
pub use menu::{Menu, MenuConfig, MenuEntry, MenuEvent, OpenOrigin};
pub use modal::{BACKDROP_CLASS, Modal, ModalConfig, ModalKind};
pub use radio::RadioGroup;
pub use select::{Select, SelectConfig, SelectEvent, SelectEvents};
pub use sort::{SortConfig, SortDirection, SortHeaders, SortState};
pub use stepper::{StepState, Stepper, StepperConfig, StepperEvent};
pub use tabs::{Tabs, TabsActivation, TabsConfig, TabsEvent};
pub use tooltip::{Tooltip, TooltipConfig, TooltipEvent};
