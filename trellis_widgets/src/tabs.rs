// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tabs: a tab list with roving focus and one visible panel.

use alloc::string::String;
use alloc::vec::Vec;

use trellis_dom::{Document, ElementFlags, ElementId};
use trellis_events::KeyEvent;
use trellis_focus::{ItemKey, Orientation, RovingFocus, RovingResponse, WrapMode};

use crate::error::WidgetError;
use crate::ids::next_id;
use crate::item::ElementItem;

/// When moving focus to a tab selects it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TabsActivation {
    /// Selection follows focus.
    #[default]
    Automatic,
    /// Focus moves freely; `Enter` or `Space` selects.
    Manual,
}

/// Tabs configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TabsConfig {
    /// Selection policy.
    pub activation: TabsActivation,
    /// Arrow axis of the tab list.
    pub orientation: Orientation,
    /// Whether arrows wrap at the ends.
    pub wrap: WrapMode,
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self {
            activation: TabsActivation::Automatic,
            orientation: Orientation::Horizontal,
            wrap: WrapMode::Scope,
        }
    }
}

/// What a tabs interaction produced.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TabsEvent {
    /// A different tab was selected.
    Selected {
        /// The newly selected tab.
        index: usize,
        /// The tab selected before.
        previous: Option<usize>,
    },
}

/// A tab list and its panels.
#[derive(Debug)]
pub struct Tabs {
    list: ElementId,
    tabs: Vec<ElementId>,
    panels: Vec<ElementId>,
    keys: Vec<ItemKey>,
    roving: RovingFocus<ElementItem>,
    activation: TabsActivation,
    selected: Option<usize>,
}

impl Tabs {
    /// Wire `tabs` (inside `list`) to `panels`, one panel per tab.
    ///
    /// The first enabled tab starts selected; every other panel is hidden.
    pub fn new(
        doc: &mut Document,
        list: ElementId,
        tabs: Vec<ElementId>,
        panels: Vec<ElementId>,
        config: TabsConfig,
    ) -> Result<Self, WidgetError> {
        if tabs.is_empty() {
            return Err(WidgetError::Empty("tab list"));
        }
        if tabs.len() != panels.len() {
            return Err(WidgetError::LengthMismatch {
                elements: tabs.len(),
                values: panels.len(),
            });
        }
        if let Some(&stale) = core::iter::once(&list)
            .chain(&tabs)
            .chain(&panels)
            .find(|&&el| !doc.is_alive(el))
        {
            return Err(WidgetError::StaleElement(stale));
        }
        doc.set_attribute(list, "role", "tablist");
        let axis = match config.orientation {
            Orientation::Vertical => "vertical",
            Orientation::Horizontal | Orientation::Both => "horizontal",
        };
        doc.set_attribute(list, "aria-orientation", axis);

        let mut roving = RovingFocus::new()
            .with_wrap(config.wrap)
            .with_orientation(config.orientation);
        let mut keys = Vec::with_capacity(tabs.len());
        for (&tab, &panel) in tabs.iter().zip(&panels) {
            let tab_id = existing_or_new_id(doc, tab, "tab");
            let panel_id = existing_or_new_id(doc, panel, "tabpanel");
            doc.set_attribute(tab, "role", "tab");
            doc.set_attribute(tab, "aria-controls", &panel_id);
            doc.set_attribute(tab, "aria-selected", "false");
            doc.set_attribute(panel, "role", "tabpanel");
            doc.set_attribute(panel, "aria-labelledby", &tab_id);
            doc.set_tab_index(panel, Some(0));
            set_hidden(doc, panel, true);
            let item = ElementItem::new(doc, tab);
            keys.push(roving.register(doc, item));
        }
        let mut this = Self {
            list,
            tabs,
            panels,
            keys,
            roving,
            activation: config.activation,
            selected: None,
        };
        if let Some(first) = this.roving.active_index() {
            this.select_index(doc, first);
        }
        Ok(this)
    }

    /// The tab list element.
    pub fn list(&self) -> ElementId {
        self.list
    }

    /// The tab elements.
    pub fn tabs(&self) -> &[ElementId] {
        &self.tabs
    }

    /// The panel elements.
    pub fn panels(&self) -> &[ElementId] {
        &self.panels
    }

    /// Index of the selected tab.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Index of the focused (or tab-stop) tab.
    pub fn focused(&self) -> Option<usize> {
        self.roving.active_index()
    }

    /// Keys pressed while a tab has focus.
    pub fn handle_key(&mut self, doc: &mut Document, event: &KeyEvent, now: u64) -> Option<TabsEvent> {
        match self.roving.handle_key(doc, event, now) {
            RovingResponse::Moved(key) if self.activation == TabsActivation::Automatic => {
                let index = self.roving.index_of(key)?;
                self.select_index(doc, index)
            }
            RovingResponse::Activated(key) => {
                let index = self.roving.index_of(key)?;
                self.select_index(doc, index)
            }
            _ => None,
        }
    }

    /// Pointer press on a tab: focus and select it.
    pub fn click(&mut self, doc: &mut Document, index: usize) -> Option<TabsEvent> {
        let key = *self.keys.get(index)?;
        if !self.roving.focus_key(doc, key) {
            return None;
        }
        self.select_index(doc, index)
    }

    /// Select a tab without moving focus. Disabled tabs are ignored.
    pub fn select(&mut self, doc: &mut Document, index: usize) -> Option<TabsEvent> {
        let key = *self.keys.get(index)?;
        if !self.roving.set_active(doc, key) {
            return None;
        }
        self.select_index(doc, index)
    }

    /// Enable or disable one tab.
    ///
    /// Disabling the selected tab keeps it selected; it just cannot be reached
    /// by arrows until re-enabled.
    pub fn set_disabled(&mut self, doc: &mut Document, index: usize, disabled: bool) {
        let Some(&tab) = self.tabs.get(index) else {
            return;
        };
        doc.set_disabled(tab, disabled);
        if disabled {
            doc.set_attribute(tab, "aria-disabled", "true");
        } else {
            doc.remove_attribute(tab, "aria-disabled");
        }
        self.roving.revalidate(doc);
    }

    fn select_index(&mut self, doc: &mut Document, index: usize) -> Option<TabsEvent> {
        let previous = self.selected;
        if previous == Some(index) {
            return None;
        }
        if let Some(prev) = previous {
            doc.set_attribute(self.tabs[prev], "aria-selected", "false");
            set_hidden(doc, self.panels[prev], true);
        }
        doc.set_attribute(self.tabs[index], "aria-selected", "true");
        set_hidden(doc, self.panels[index], false);
        self.selected = Some(index);
        tracing::trace!(index, ?previous, "tab selected");
        Some(TabsEvent::Selected { index, previous })
    }
}

fn existing_or_new_id(doc: &mut Document, el: ElementId, prefix: &str) -> String {
    if let Some(id) = doc.attribute(el, "id") {
        return String::from(id);
    }
    let id = next_id(prefix);
    doc.set_attribute(el, "id", &id);
    id
}

fn set_hidden(doc: &mut Document, el: ElementId, hidden: bool) {
    let mut flags = doc.flags(el).unwrap_or_default();
    flags.set(ElementFlags::HIDDEN, hidden);
    doc.set_flags(el, flags);
}
