// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Modal surfaces: dialogs and bottom sheets.
//!
//! A modal attaches an overlay on the body, covers the page with a backdrop,
//! traps Tab inside its surface, and returns focus to whatever was focused
//! before it opened, however it ends up closing.

use alloc::string::{String, ToString};
use core::any::Any;
use core::fmt;

use kurbo::Rect;
use trellis_dom::{Document, ElementData, ElementId, ZIndex};
use trellis_events::{KeyEvent, PointerEvent};
use trellis_focus::{FocusTrap, InitialFocus, TrapOutcome};
use trellis_overlay::{Dismissed, OverlayConfig, OverlayHandle, OverlayManager, Placement};

use crate::error::WidgetError;
use crate::ids::next_id;

/// Class of the element covering the page behind a modal.
pub const BACKDROP_CLASS: &str = "trellis-overlay-backdrop";

/// Presentation of a modal surface.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ModalKind {
    /// Centered in the viewport.
    #[default]
    Dialog,
    /// Flush with the bottom edge of the viewport.
    BottomSheet,
}

impl ModalKind {
    fn placement(self) -> Placement {
        match self {
            Self::Dialog => Placement::Centered,
            Self::BottomSheet => Placement::BottomCenter,
        }
    }

    fn panel_class(self) -> &'static str {
        match self {
            Self::Dialog => "trellis-dialog-panel",
            Self::BottomSheet => "trellis-bottom-sheet-panel",
        }
    }
}

/// Modal configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModalConfig {
    /// Dialog or bottom sheet.
    pub kind: ModalKind,
    /// Where focus goes once the surface is mounted.
    pub initial_focus: InitialFocus,
    /// Close on an unmodified `Escape`.
    pub close_on_escape: bool,
    /// Close on a pointer press on the backdrop.
    pub close_on_backdrop: bool,
    /// Accessible name of the surface.
    pub label: Option<String>,
    /// Stacking order of the backdrop and surface.
    pub z_index: ZIndex,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            kind: ModalKind::Dialog,
            initial_focus: InitialFocus::FirstFocusable,
            close_on_escape: true,
            close_on_backdrop: true,
            label: None,
            z_index: ZIndex::Auto,
        }
    }
}

/// A dialog or bottom sheet.
#[derive(Debug)]
pub struct Modal {
    config: ModalConfig,
    surface_id: String,
    handle: Option<OverlayHandle>,
    surface: Option<ElementId>,
    backdrop: Option<ElementId>,
    trap: Option<FocusTrap>,
}

impl Modal {
    /// Create a closed modal.
    pub fn new(config: ModalConfig) -> Self {
        Self {
            config,
            surface_id: next_id("dialog"),
            handle: None,
            surface: None,
            backdrop: None,
            trap: None,
        }
    }

    /// The configuration.
    pub fn config(&self) -> &ModalConfig {
        &self.config
    }

    /// Returns true while the modal is open.
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// The modal's overlay.
    pub fn handle(&self) -> Option<OverlayHandle> {
        self.handle
    }

    /// The surface element content is rendered into.
    pub fn surface(&self) -> Option<ElementId> {
        self.surface
    }

    /// The backdrop element.
    pub fn backdrop(&self) -> Option<ElementId> {
        self.backdrop
    }

    /// Open the modal, rendering content into its surface.
    ///
    /// `render` should give the surface its size; the overlay is placed from it.
    /// Content is available afterwards through
    /// [`OverlayManager::content`](trellis_overlay::OverlayManager::content).
    /// Opening an open modal returns its handle and does not render again.
    pub fn open<C: Any, E: fmt::Display>(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
        render: impl FnOnce(&mut Document, ElementId) -> Result<C, E>,
    ) -> Result<OverlayHandle, WidgetError> {
        if let Some(handle) = self.handle {
            return Ok(handle);
        }
        let body = doc.body();
        let viewport = doc.viewport().size;
        let backdrop = doc.create_element(
            ElementData::new("div")
                .with_class(BACKDROP_CLASS)
                .with_bounds(Rect::from_origin_size((0.0, 0.0), viewport)),
        );
        doc.append_child(body, backdrop)?;
        doc.set_z_index(backdrop, self.config.z_index);
        if let Some(style) = doc.style_mut(backdrop) {
            style.left = Some(0.0);
            style.top = Some(0.0);
        }

        let overlay = OverlayConfig::default()
            .with_match_anchor_width(false)
            .with_close_on_outside_pointer_down(false)
            .with_close_on_escape(self.config.close_on_escape)
            .with_placement(self.config.kind.placement())
            .with_panel_class(self.config.kind.panel_class())
            .with_z_index(self.config.z_index);
        let mut surface = None;
        let (surface_id, label) = (&self.surface_id, self.config.label.as_deref());
        let attached = overlays.attach(doc, body, overlay, |doc, container| {
            let mut data = ElementData::new("div")
                .with_tab_index(-1)
                .with_attribute("role", "dialog")
                .with_attribute("aria-modal", "true")
                .with_attribute("id", surface_id);
            if let Some(label) = label {
                data = data.with_attribute("aria-label", label);
            }
            let el = doc.create_element(data);
            doc.append_child(container, el).map_err(|e| e.to_string())?;
            surface = Some(el);
            let content = render(doc, el).map_err(|e| e.to_string())?;
            if let Some(bounds) = doc.local_bounds(el) {
                doc.set_local_bounds(container, bounds.with_origin((0.0, 0.0)));
            }
            Ok::<_, String>(content)
        });
        let handle = match attached {
            Ok(handle) => handle,
            Err(err) => {
                doc.destroy(backdrop);
                return Err(err.into());
            }
        };
        // The trap captures the restore target, so it goes in before focus moves.
        if let Some(surface) = surface {
            let trap = FocusTrap::install(doc, surface);
            trap.focus_initial(doc, self.config.initial_focus);
            self.trap = Some(trap);
        }
        self.handle = Some(handle);
        self.surface = surface;
        self.backdrop = Some(backdrop);
        tracing::debug!(%handle, kind = ?self.config.kind, "modal opened");
        Ok(handle)
    }

    /// Keys pressed while focus is inside the modal. `Tab` cycles within the surface.
    pub fn handle_key(&self, doc: &mut Document, event: &KeyEvent) -> TrapOutcome {
        match &self.trap {
            Some(trap) if self.handle.is_some() => trap.handle_key(doc, event),
            _ => TrapOutcome::Ignored,
        }
    }

    /// A pointer press anywhere. Closes the modal when it lands on the backdrop
    /// and backdrop dismissal is enabled. Returns true if the modal closed.
    pub fn handle_pointer_down(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
        event: &PointerEvent,
    ) -> bool {
        if !self.config.close_on_backdrop || self.backdrop != Some(event.target) {
            return false;
        }
        self.close(doc, overlays)
    }

    /// Close the modal. Returns false if it was not open.
    pub fn close(&mut self, doc: &mut Document, overlays: &mut OverlayManager) -> bool {
        let Some(handle) = self.handle.take() else {
            return false;
        };
        overlays.close(doc, handle);
        self.teardown(doc);
        tracing::debug!(%handle, "modal closed");
        true
    }

    /// React to the overlay manager closing the modal (`Escape`, anchor removed).
    pub fn on_overlay_closed(&mut self, doc: &mut Document, dismissed: &Dismissed) -> bool {
        if self.handle != Some(dismissed.handle) {
            return false;
        }
        self.handle = None;
        self.teardown(doc);
        tracing::debug!(handle = %dismissed.handle, reason = ?dismissed.reason, "modal dismissed");
        true
    }

    fn teardown(&mut self, doc: &mut Document) {
        if let Some(mut trap) = self.trap.take() {
            trap.release(doc);
        }
        if let Some(backdrop) = self.backdrop.take() {
            doc.destroy(backdrop);
        }
        self.surface = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use kurbo::{Point, Size};
    use trellis_dom::DomError;
    use trellis_events::{Key, UiEvent};
    use trellis_overlay::PositionState;

    fn page() -> (Document, OverlayManager, ElementId) {
        let mut doc = Document::new(Size::new(800.0, 600.0));
        let body = doc.body();
        let opener = doc.create_element(
            ElementData::new("button")
                .focusable()
                .with_bounds(Rect::new(20.0, 20.0, 120.0, 50.0)),
        );
        doc.append_child(body, opener).unwrap();
        doc.focus(opener);
        (doc, OverlayManager::new(), opener)
    }

    fn form(doc: &mut Document, surface: ElementId) -> Result<Vec<ElementId>, DomError> {
        doc.set_local_bounds(surface, Rect::new(0.0, 0.0, 300.0, 200.0));
        let mut buttons = Vec::new();
        for x in [10.0, 110.0] {
            let b = doc.create_element(
                ElementData::new("button")
                    .focusable()
                    .with_bounds(Rect::new(x, 150.0, x + 90.0, 190.0)),
            );
            doc.append_child(surface, b)?;
            buttons.push(b);
        }
        Ok(buttons)
    }

    #[test]
    fn dialog_traps_focus_and_restores_on_escape() {
        let (mut doc, mut overlays, opener) = page();
        let mut modal = Modal::new(ModalConfig {
            label: Some("Confirm".into()),
            ..ModalConfig::default()
        });
        let handle = modal.open(&mut doc, &mut overlays, form).unwrap();
        let surface = modal.surface().unwrap();
        assert_eq!(doc.attribute(surface, "aria-modal"), Some("true"));
        assert_eq!(doc.attribute(surface, "aria-label"), Some("Confirm"));
        assert_eq!(
            overlays.position(handle),
            Some(PositionState::Placed {
                left: 250.0,
                top: 200.0,
                width: None
            })
        );

        let buttons = overlays.content::<Vec<ElementId>>(handle).unwrap().clone();
        assert_eq!(doc.active_element(), buttons[0]);
        modal.handle_key(&mut doc, &KeyEvent::new(Key::Tab));
        assert_eq!(doc.active_element(), buttons[1]);
        assert_eq!(
            modal.handle_key(&mut doc, &KeyEvent::new(Key::Tab)),
            TrapOutcome::Moved(buttons[0]),
            "Tab wraps inside the surface"
        );

        let escape = UiEvent::key_down(&doc, Key::Escape);
        let dismissed = overlays.handle_event(&mut doc, &escape);
        assert!(modal.on_overlay_closed(&mut doc, &dismissed[0]));
        assert_eq!(doc.active_element(), opener);
        assert!(!doc.is_alive(surface));
        assert_eq!(overlays.open_count(), 0);
    }

    #[test]
    fn bottom_sheet_closes_on_backdrop() {
        let (mut doc, mut overlays, opener) = page();
        let baseline = doc.element_count();
        let mut modal = Modal::new(ModalConfig {
            kind: ModalKind::BottomSheet,
            ..ModalConfig::default()
        });
        let handle = modal.open(&mut doc, &mut overlays, form).unwrap();
        assert_eq!(
            overlays.position(handle),
            Some(PositionState::Placed {
                left: 250.0,
                top: 400.0,
                width: None
            })
        );

        let UiEvent::PointerDown(press) = UiEvent::pointer_down_at(&doc, Point::new(30.0, 30.0)).unwrap() else {
            unreachable!();
        };
        assert_eq!(Some(press.target), modal.backdrop(), "the backdrop covers the page");
        assert!(modal.handle_pointer_down(&mut doc, &mut overlays, &press));
        assert!(!modal.is_open());
        assert_eq!(doc.active_element(), opener);
        assert_eq!(doc.element_count(), baseline, "backdrop and surface are gone");
        assert!(!modal.close(&mut doc, &mut overlays), "second close is a no-op");
    }

    #[test]
    fn backdrop_dismissal_can_be_disabled() {
        let (mut doc, mut overlays, _) = page();
        let mut modal = Modal::new(ModalConfig {
            close_on_backdrop: false,
            close_on_escape: false,
            initial_focus: InitialFocus::Root,
            ..ModalConfig::default()
        });
        let handle = modal.open(&mut doc, &mut overlays, form).unwrap();
        assert_eq!(doc.active_element(), modal.surface().unwrap());
        assert_eq!(modal.open(&mut doc, &mut overlays, form).unwrap(), handle);

        let press = PointerEvent {
            target: modal.backdrop().unwrap(),
            position: Point::new(5.0, 5.0),
            button: trellis_events::PointerButton::Primary,
        };
        assert!(!modal.handle_pointer_down(&mut doc, &mut overlays, &press));
        let escape = UiEvent::key_down(&doc, Key::Escape);
        let dismissed = overlays.handle_event(&mut doc, &escape);
        assert!(dismissed.is_empty());
        assert!(modal.is_open());
    }

    #[test]
    fn failed_render_still_opens_and_cleans_up() {
        let (mut doc, mut overlays, opener) = page();
        let baseline = doc.element_count();
        let mut modal = Modal::new(ModalConfig::default());
        let handle = modal
            .open(&mut doc, &mut overlays, |_, _| Err::<(), _>("no content"))
            .unwrap();
        assert!(!overlays.has_content(handle));
        assert_eq!(doc.active_element(), modal.surface().unwrap(), "falls back to the surface");
        assert!(modal.close(&mut doc, &mut overlays));
        assert_eq!(doc.active_element(), opener);
        assert_eq!(doc.element_count(), baseline);
    }
}
