// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Menu button: a trigger that opens a panel of actions.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use trellis_dom::{Document, DomError, ElementData, ElementFlags, ElementId};
use trellis_events::{Key, KeyEvent};
use trellis_focus::{Orientation, RovingFocus, RovingResponse, WrapMode};
use trellis_overlay::{DismissReason, Dismissed, OverlayConfig, OverlayHandle, OverlayManager};

use crate::error::WidgetError;
use crate::ids::next_id;
use crate::item::ElementItem;
use crate::listbox::{ROW_HEIGHT, anchor_width, set_expanded};

/// Narrowest menu panel.
const MIN_PANEL_WIDTH: f64 = 112.0;

/// One action in a menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuEntry {
    /// Accessible label, also used for typeahead.
    pub label: String,
    /// Disabled entries are shown but skipped by navigation and never selected.
    pub disabled: bool,
}

impl MenuEntry {
    /// Create an enabled entry.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            disabled: false,
        }
    }

    /// Mark the entry disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// Menu configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuConfig {
    /// Overlay settings for the panel.
    pub overlay: OverlayConfig,
    /// Whether arrow navigation wraps at the ends.
    pub wrap: WrapMode,
    /// Typeahead reset timeout in milliseconds.
    pub typeahead_timeout: u64,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            overlay: OverlayConfig::default()
                .with_match_anchor_width(false)
                .with_panel_class("trellis-menu-panel"),
            wrap: WrapMode::Scope,
            typeahead_timeout: 500,
        }
    }
}

/// How a menu was opened, which decides where focus lands.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OpenOrigin {
    /// Keyboard: focus the first enabled entry.
    #[default]
    Keyboard,
    /// Keyboard from the end (`ArrowUp` on the trigger): focus the last enabled entry.
    KeyboardFromEnd,
    /// Pointer: focus the panel itself.
    Pointer,
}

/// What a menu interaction produced.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MenuEvent {
    /// The panel opened.
    Opened,
    /// An entry was chosen; the panel has closed.
    Selected(usize),
    /// The panel closed without a choice.
    Closed,
}

#[derive(Debug)]
struct MenuPanel {
    list: ElementId,
    rows: Vec<ElementId>,
    roving: RovingFocus<ElementItem>,
}

/// A menu button and its panel.
#[derive(Debug)]
pub struct Menu {
    trigger: ElementId,
    entries: Vec<MenuEntry>,
    config: MenuConfig,
    menu_id: String,
    handle: Option<OverlayHandle>,
}

impl Menu {
    /// Wire `trigger` as a menu button.
    pub fn new(
        doc: &mut Document,
        trigger: ElementId,
        entries: Vec<MenuEntry>,
        config: MenuConfig,
    ) -> Result<Self, WidgetError> {
        if !doc.is_alive(trigger) {
            return Err(WidgetError::StaleElement(trigger));
        }
        let menu_id = next_id("menu");
        doc.set_attribute(trigger, "aria-haspopup", "menu");
        set_expanded(doc, trigger, false);
        Ok(Self {
            trigger,
            entries,
            config,
            menu_id,
            handle: None,
        })
    }

    /// The trigger element.
    pub fn trigger(&self) -> ElementId {
        self.trigger
    }

    /// The entries.
    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// Id of the panel's `menu` element.
    pub fn menu_id(&self) -> &str {
        &self.menu_id
    }

    /// The open panel's overlay.
    pub fn handle(&self) -> Option<OverlayHandle> {
        self.handle
    }

    /// Returns true if the panel is open.
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Row elements of the open panel.
    pub fn rows<'a>(&self, overlays: &'a OverlayManager) -> Option<&'a [ElementId]> {
        Some(&overlays.content::<MenuPanel>(self.handle?)?.rows)
    }

    /// Index of the focused (tab-stop) entry of the open panel.
    pub fn active_index(&self, overlays: &OverlayManager) -> Option<usize> {
        overlays
            .content::<MenuPanel>(self.handle?)?
            .roving
            .active_index()
    }

    /// Entry index of the row containing `element`.
    pub fn entry_at(
        &self,
        doc: &Document,
        overlays: &OverlayManager,
        element: ElementId,
    ) -> Option<usize> {
        self.rows(overlays)?
            .iter()
            .position(|&row| doc.contains(row, element))
    }

    /// Open the panel. Returns `None` if it is already open.
    pub fn open(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
        origin: OpenOrigin,
    ) -> Result<Option<MenuEvent>, WidgetError> {
        if self.handle.is_some() {
            return Ok(None);
        }
        let menu_id = &self.menu_id;
        let entries = &self.entries;
        let roving = RovingFocus::new()
            .with_wrap(self.config.wrap)
            .with_orientation(Orientation::Vertical)
            .with_typeahead_timeout(self.config.typeahead_timeout);
        let width = anchor_width(doc, self.trigger).max(MIN_PANEL_WIDTH);
        let handle = overlays.attach(
            doc,
            self.trigger,
            self.config.overlay.clone(),
            |doc, container| build_panel(doc, container, menu_id, entries, roving, width),
        )?;
        self.handle = Some(handle);
        set_expanded(doc, self.trigger, true);
        doc.set_attribute(self.trigger, "aria-controls", &self.menu_id);
        if let Some(panel) = overlays.content_mut::<MenuPanel>(handle) {
            match origin {
                OpenOrigin::Keyboard => {
                    panel.roving.focus_first(doc);
                }
                OpenOrigin::KeyboardFromEnd => {
                    panel.roving.focus_last(doc);
                }
                OpenOrigin::Pointer => {
                    doc.focus(panel.list);
                }
            }
        }
        tracing::debug!(menu = %self.menu_id, %handle, ?origin, "menu opened");
        Ok(Some(MenuEvent::Opened))
    }

    /// Close the panel and return focus to the trigger.
    pub fn close(&mut self, doc: &mut Document, overlays: &mut OverlayManager) -> Option<MenuEvent> {
        self.close_with(doc, overlays, true)
            .then_some(MenuEvent::Closed)
    }

    /// Keys pressed while the trigger has focus: `ArrowDown`, `Enter`, and
    /// `Space` open at the first entry, `ArrowUp` at the last.
    pub fn handle_trigger_key(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
        event: &KeyEvent,
    ) -> Result<Option<MenuEvent>, WidgetError> {
        if self.is_open() || event.has_command_modifier() {
            return Ok(None);
        }
        match event.key {
            Key::ArrowDown | Key::Enter | Key::Space => {
                self.open(doc, overlays, OpenOrigin::Keyboard)
            }
            Key::ArrowUp => self.open(doc, overlays, OpenOrigin::KeyboardFromEnd),
            _ => Ok(None),
        }
    }

    /// Keys pressed inside the open panel.
    ///
    /// Arrows, `Home`/`End`, and typeahead move focus; `Enter`/`Space` choose the
    /// focused entry; `Escape` closes and refocuses the trigger; `Tab` closes and
    /// lets focus move on.
    pub fn handle_key(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
        event: &KeyEvent,
        now: u64,
    ) -> Option<MenuEvent> {
        let handle = self.handle?;
        if event.key == Key::Tab {
            return self
                .close_with(doc, overlays, false)
                .then_some(MenuEvent::Closed);
        }
        let response = {
            let panel = overlays.content_mut::<MenuPanel>(handle)?;
            match panel.roving.handle_key(doc, event, now) {
                RovingResponse::Activated(key) => panel.roving.index_of(key).map(Some),
                RovingResponse::Dismissed => Some(None),
                RovingResponse::Moved(_) | RovingResponse::Unhandled => None,
            }
        };
        match response? {
            Some(index) => self.select(doc, overlays, index),
            None => self.close(doc, overlays),
        }
    }

    /// Choose an entry (pointer click). Disabled entries are ignored.
    pub fn activate(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
        index: usize,
    ) -> Option<MenuEvent> {
        if !self.is_open() || self.entries.get(index).is_none_or(|e| e.disabled) {
            return None;
        }
        self.select(doc, overlays, index)
    }

    /// Move focus to an entry (pointer hover).
    pub fn hover(&mut self, doc: &mut Document, overlays: &mut OverlayManager, index: usize) -> bool {
        let Some(panel) = self.panel_mut(overlays) else {
            return false;
        };
        panel
            .roving
            .key_at(index)
            .is_some_and(|key| panel.roving.focus_key(doc, key))
    }

    /// Enable or disable an entry, repairing the panel's tab stop if it is open.
    pub fn set_disabled(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
        index: usize,
        disabled: bool,
    ) {
        let Some(entry) = self.entries.get_mut(index) else {
            return;
        };
        entry.disabled = disabled;
        let Some(panel) = self.panel_mut(overlays) else {
            return;
        };
        if let Some(&row) = panel.rows.get(index) {
            doc.set_disabled(row, disabled);
            if disabled {
                doc.set_attribute(row, "aria-disabled", "true");
            } else {
                doc.remove_attribute(row, "aria-disabled");
            }
        }
        panel.roving.revalidate(doc);
    }

    /// React to the overlay manager closing the panel (outside click, Escape).
    pub fn on_overlay_closed(&mut self, doc: &mut Document, dismissed: &Dismissed) -> Option<MenuEvent> {
        if self.handle != Some(dismissed.handle) {
            return None;
        }
        self.handle = None;
        set_expanded(doc, self.trigger, false);
        if dismissed.reason == DismissReason::Escape {
            doc.focus(self.trigger);
        }
        tracing::debug!(menu = %self.menu_id, reason = ?dismissed.reason, "menu dismissed");
        Some(MenuEvent::Closed)
    }

    /// Close the panel (if open) when the trigger is being torn down.
    pub fn dispose(&mut self, doc: &mut Document, overlays: &mut OverlayManager) {
        self.close_with(doc, overlays, false);
    }

    fn panel_mut<'a>(&self, overlays: &'a mut OverlayManager) -> Option<&'a mut MenuPanel> {
        overlays.content_mut::<MenuPanel>(self.handle?)
    }

    fn select(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
        index: usize,
    ) -> Option<MenuEvent> {
        self.close_with(doc, overlays, true);
        tracing::debug!(menu = %self.menu_id, index, "menu entry selected");
        Some(MenuEvent::Selected(index))
    }

    fn close_with(&mut self, doc: &mut Document, overlays: &mut OverlayManager, refocus: bool) -> bool {
        let Some(handle) = self.handle.take() else {
            return false;
        };
        overlays.close(doc, handle);
        set_expanded(doc, self.trigger, false);
        if refocus {
            doc.focus(self.trigger);
        }
        true
    }
}

fn build_panel(
    doc: &mut Document,
    container: ElementId,
    menu_id: &str,
    entries: &[MenuEntry],
    mut roving: RovingFocus<ElementItem>,
    width: f64,
) -> Result<MenuPanel, DomError> {
    let list = doc.create_element(
        ElementData::new("ul")
            .with_tab_index(-1)
            .with_attribute("role", "menu")
            .with_attribute("id", menu_id),
    );
    doc.append_child(container, list)?;
    let mut rows = Vec::with_capacity(entries.len());
    let mut y = 0.0;
    for entry in entries {
        let mut data = ElementData::new("li")
            .with_label(&entry.label)
            .with_tab_index(-1)
            .with_bounds(Rect::new(0.0, y, width, y + ROW_HEIGHT))
            .with_attribute("role", "menuitem");
        if entry.disabled {
            data = data
                .with_flags(ElementFlags::DISABLED)
                .with_attribute("aria-disabled", "true");
        }
        let row = doc.create_element(data);
        doc.append_child(list, row)?;
        let item = ElementItem::new(doc, row);
        roving.register(doc, item);
        rows.push(row);
        y += ROW_HEIGHT;
    }
    let bounds = Rect::new(0.0, 0.0, width, y);
    doc.set_local_bounds(list, bounds);
    doc.set_local_bounds(container, bounds);
    Ok(MenuPanel { list, rows, roving })
}
