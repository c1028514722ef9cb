// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tooltip: hover and focus intent with cancellable delays.
//!
//! The host forwards pointer-enter/leave and focus/blur on the anchor, then calls
//! [`Tooltip::poll`] with the current time (for example when the deadline from
//! [`Tooltip::next_deadline`] passes). Pointer and focus intent combine: the
//! tooltip hides only once neither holds.

use alloc::string::String;

use kurbo::Rect;
use trellis_dom::{Document, DomError, ElementData, ElementId};
use trellis_event_state::delay::{DelayedToggle, Transition};
use trellis_events::{Key, KeyEvent};
use trellis_overlay::{Dismissed, OverlayConfig, OverlayHandle, OverlayManager};

use crate::error::WidgetError;
use crate::ids::next_id;

/// Approximate advance of one character, used to size the bubble.
const CHAR_WIDTH: f64 = 7.0;
const PADDING: f64 = 8.0;
const HEIGHT: f64 = 24.0;

/// Tooltip configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TooltipConfig {
    /// Milliseconds between intent and showing.
    pub show_delay: u64,
    /// Milliseconds between losing intent and hiding.
    pub hide_delay: u64,
    /// Overlay settings for the bubble.
    pub overlay: OverlayConfig,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            show_delay: 500,
            hide_delay: 100,
            overlay: OverlayConfig::default()
                .with_close_on_outside_pointer_down(false)
                .with_close_on_escape(false)
                .with_match_anchor_width(false)
                .with_panel_class("trellis-tooltip-panel"),
        }
    }
}

/// Visibility changes applied by a tooltip.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TooltipEvent {
    /// The bubble was attached.
    Shown(OverlayHandle),
    /// The bubble was removed.
    Hidden,
}

/// A tooltip on one anchor.
#[derive(Debug)]
pub struct Tooltip {
    anchor: ElementId,
    text: String,
    tooltip_id: String,
    overlay: OverlayConfig,
    toggle: DelayedToggle,
    handle: Option<OverlayHandle>,
    hovered: bool,
    focused: bool,
}

impl Tooltip {
    /// Create a hidden tooltip for `anchor`.
    pub fn new(doc: &Document, anchor: ElementId, text: &str, config: TooltipConfig) -> Result<Self, WidgetError> {
        if !doc.is_alive(anchor) {
            return Err(WidgetError::StaleElement(anchor));
        }
        Ok(Self {
            anchor,
            text: String::from(text),
            tooltip_id: next_id("tooltip"),
            overlay: config.overlay,
            toggle: DelayedToggle::new(config.show_delay, config.hide_delay),
            handle: None,
            hovered: false,
            focused: false,
        })
    }

    /// The anchor element.
    pub fn anchor(&self) -> ElementId {
        self.anchor
    }

    /// The tooltip text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns true while the bubble is attached.
    pub fn is_visible(&self) -> bool {
        self.handle.is_some()
    }

    /// The bubble's overlay.
    pub fn handle(&self) -> Option<OverlayHandle> {
        self.handle
    }

    /// When the host should next call [`Tooltip::poll`].
    pub fn next_deadline(&self) -> Option<u64> {
        self.toggle.next_deadline()
    }

    /// The pointer entered the anchor.
    pub fn pointer_enter(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
        now: u64,
    ) -> Result<Option<TooltipEvent>, WidgetError> {
        self.hovered = true;
        let transition = self.toggle.request_show(now);
        self.apply(doc, overlays, transition)
    }

    /// The pointer left the anchor.
    pub fn pointer_leave(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
        now: u64,
    ) -> Result<Option<TooltipEvent>, WidgetError> {
        self.hovered = false;
        self.lose_intent(doc, overlays, now)
    }

    /// The anchor gained focus.
    pub fn focus(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
        now: u64,
    ) -> Result<Option<TooltipEvent>, WidgetError> {
        self.focused = true;
        let transition = self.toggle.request_show(now);
        self.apply(doc, overlays, transition)
    }

    /// The anchor lost focus.
    pub fn blur(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
        now: u64,
    ) -> Result<Option<TooltipEvent>, WidgetError> {
        self.focused = false;
        self.lose_intent(doc, overlays, now)
    }

    /// Apply a transition whose delay has elapsed.
    pub fn poll(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
        now: u64,
    ) -> Result<Option<TooltipEvent>, WidgetError> {
        let transition = self.toggle.poll(now);
        self.apply(doc, overlays, transition)
    }

    /// `Escape` hides at once and cancels a pending show.
    pub fn handle_key(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
        event: &KeyEvent,
    ) -> Option<TooltipEvent> {
        if event.key != Key::Escape || !event.is_plain() {
            return None;
        }
        let transition = self.toggle.force_hide();
        // Hiding never attaches, so it cannot fail.
        self.apply(doc, overlays, transition).ok().flatten()
    }

    /// Change the text, updating a visible bubble in place.
    pub fn set_text(&mut self, doc: &mut Document, overlays: &mut OverlayManager, text: &str) {
        self.text = String::from(text);
        if let Some(handle) = self.handle
            && let Some(&bubble) = overlays.content::<ElementId>(handle)
        {
            doc.set_label(bubble, text);
            doc.set_local_bounds(bubble, bubble_bounds(text));
            overlays.request_reposition(handle);
        }
    }

    /// React to the overlay manager closing the bubble (anchor removed).
    pub fn on_overlay_closed(&mut self, doc: &mut Document, dismissed: &Dismissed) -> Option<TooltipEvent> {
        if self.handle != Some(dismissed.handle) {
            return None;
        }
        self.handle = None;
        self.toggle.force_hide();
        self.hovered = false;
        self.focused = false;
        doc.remove_attribute(self.anchor, "aria-describedby");
        Some(TooltipEvent::Hidden)
    }

    /// Cancel pending delays and remove the bubble.
    pub fn dispose(&mut self, doc: &mut Document, overlays: &mut OverlayManager) {
        self.toggle.force_hide();
        self.hovered = false;
        self.focused = false;
        self.hide(doc, overlays);
    }

    fn lose_intent(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
        now: u64,
    ) -> Result<Option<TooltipEvent>, WidgetError> {
        if self.hovered || self.focused {
            return Ok(None);
        }
        let transition = self.toggle.request_hide(now);
        self.apply(doc, overlays, transition)
    }

    fn apply(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
        transition: Option<Transition>,
    ) -> Result<Option<TooltipEvent>, WidgetError> {
        match transition {
            Some(Transition::Show) if self.handle.is_none() => self.show(doc, overlays).map(Some),
            Some(Transition::Hide) if self.handle.is_some() => {
                self.hide(doc, overlays);
                Ok(Some(TooltipEvent::Hidden))
            }
            _ => Ok(None),
        }
    }

    fn show(&mut self, doc: &mut Document, overlays: &mut OverlayManager) -> Result<TooltipEvent, WidgetError> {
        let (text, id) = (&self.text, &self.tooltip_id);
        let attached = overlays.attach(doc, self.anchor, self.overlay.clone(), |doc, container| {
            let bounds = bubble_bounds(text);
            let bubble = doc.create_element(
                ElementData::new("div")
                    .with_label(text)
                    .with_bounds(bounds)
                    .with_attribute("role", "tooltip")
                    .with_attribute("id", id),
            );
            doc.append_child(container, bubble)?;
            doc.set_local_bounds(container, bounds);
            Ok::<_, DomError>(bubble)
        });
        match attached {
            Ok(handle) => {
                self.handle = Some(handle);
                doc.set_attribute(self.anchor, "aria-describedby", &self.tooltip_id);
                tracing::debug!(%handle, anchor = ?self.anchor, "tooltip shown");
                Ok(TooltipEvent::Shown(handle))
            }
            Err(err) => {
                self.toggle.force_hide();
                Err(err.into())
            }
        }
    }

    fn hide(&mut self, doc: &mut Document, overlays: &mut OverlayManager) {
        if let Some(handle) = self.handle.take() {
            overlays.close(doc, handle);
            tracing::debug!(%handle, "tooltip hidden");
        }
        doc.remove_attribute(self.anchor, "aria-describedby");
    }
}

fn bubble_bounds(text: &str) -> Rect {
    let width = text.chars().count() as f64 * CHAR_WIDTH + 2.0 * PADDING;
    Rect::new(0.0, 0.0, width, HEIGHT)
}
