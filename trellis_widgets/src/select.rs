// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Select: a trigger showing the chosen value(s) and a listbox panel.
//!
//! The panel's active option is tracked by a [`ComboboxController`] with an
//! empty query. Focus stays on the trigger; the active option is exposed through
//! `aria-activedescendant`. In [`SelectionMode::Multiple`] the widget keeps its
//! own selection set and the panel stays open while options are toggled.

use alloc::string::String;
use alloc::vec::Vec;

use smallvec::SmallVec;
use trellis_combobox::{ComboboxConfig, ComboboxController, ComboboxOption, SelectionMode};
use trellis_dom::{Document, DomError, ElementId};
use trellis_event_state::typeahead::TypeAhead;
use trellis_events::{Key, KeyEvent};
use trellis_focus::Step;
use trellis_overlay::{DismissReason, Dismissed, OverlayConfig, OverlayHandle, OverlayManager};

use crate::error::WidgetError;
use crate::ids::next_id;
use crate::listbox::{ListboxPanel, anchor_width, set_active_descendant, set_expanded};

/// Select configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectConfig {
    /// Single or multiple selection.
    pub selection: SelectionMode,
    /// Overlay settings for the panel.
    pub overlay: OverlayConfig,
    /// Typeahead reset timeout in milliseconds.
    pub typeahead_timeout: u64,
    /// Trigger label while nothing is selected.
    pub placeholder: String,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            selection: SelectionMode::Single,
            overlay: OverlayConfig::default().with_panel_class("trellis-select-panel"),
            typeahead_timeout: 500,
            placeholder: String::new(),
        }
    }
}

/// What a select interaction produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectEvent<V> {
    /// The panel opened.
    Opened,
    /// The panel closed.
    Closed,
    /// A value became selected.
    Selected(V),
    /// A value was deselected (multiple mode).
    Deselected(V),
}

/// Events produced by one call, in order.
pub type SelectEvents<V> = SmallVec<[SelectEvent<V>; 2]>;

/// A select widget.
#[derive(Debug)]
pub struct Select<V> {
    trigger: ElementId,
    listbox_id: String,
    option_ids: Vec<String>,
    combobox: ComboboxController<V>,
    config: SelectConfig,
    /// Selected source indices, ascending.
    selected: Vec<usize>,
    typeahead: TypeAhead,
    handle: Option<OverlayHandle>,
}

impl<V: Clone + PartialEq> Select<V> {
    /// Wire `trigger` as a select over `options`.
    pub fn new(
        doc: &mut Document,
        trigger: ElementId,
        options: Vec<ComboboxOption<V>>,
        config: SelectConfig,
    ) -> Result<Self, WidgetError> {
        if !doc.is_alive(trigger) {
            return Err(WidgetError::StaleElement(trigger));
        }
        let option_ids = options.iter().map(|_| next_id("option")).collect();
        // Selection lives here; the controller only tracks the active option.
        let combobox = ComboboxController::new(
            options,
            ComboboxConfig {
                open_on_input: false,
                ..ComboboxConfig::default()
            },
        )?;
        let listbox_id = next_id("listbox");
        doc.set_attribute(trigger, "role", "combobox");
        doc.set_attribute(trigger, "aria-haspopup", "listbox");
        doc.set_attribute(trigger, "aria-controls", &listbox_id);
        set_expanded(doc, trigger, false);
        let select = Self {
            trigger,
            listbox_id,
            option_ids,
            combobox,
            typeahead: TypeAhead::new(config.typeahead_timeout),
            config,
            selected: Vec::new(),
            handle: None,
        };
        select.update_display(doc);
        Ok(select)
    }

    /// The trigger element.
    pub fn trigger(&self) -> ElementId {
        self.trigger
    }

    /// The options.
    pub fn options(&self) -> &[ComboboxOption<V>] {
        self.combobox.options()
    }

    /// Generated id of each option row, by source index.
    pub fn option_ids(&self) -> &[String] {
        &self.option_ids
    }

    /// Id of the listbox element.
    pub fn listbox_id(&self) -> &str {
        &self.listbox_id
    }

    /// The open panel's overlay.
    pub fn handle(&self) -> Option<OverlayHandle> {
        self.handle
    }

    /// Returns true if the panel is open.
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Source index of the active option while open.
    pub fn active(&self) -> Option<usize> {
        self.combobox.active()
    }

    /// Selected source indices, ascending.
    pub fn selected_indices(&self) -> &[usize] {
        &self.selected
    }

    /// The selected value (single mode), or the first selected value.
    pub fn value(&self) -> Option<&V> {
        let &first = self.selected.first()?;
        Some(&self.options()[first].value)
    }

    /// Every selected value in source order.
    pub fn values(&self) -> Vec<&V> {
        self.selected
            .iter()
            .map(|&i| &self.options()[i].value)
            .collect()
    }

    /// Option index of the rendered row containing `element`.
    pub fn option_at(
        &self,
        doc: &Document,
        overlays: &OverlayManager,
        element: ElementId,
    ) -> Option<usize> {
        let panel = overlays.content::<ListboxPanel>(self.handle?)?;
        doc.ancestors_or_self(element)
            .find_map(|el| panel.index_of_row(el))
    }

    /// Open the panel, making the selected option (or the first enabled one)
    /// active. Does nothing while disabled or already open.
    pub fn open(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
    ) -> Result<SelectEvents<V>, WidgetError> {
        let mut events = SelectEvents::new();
        if self.handle.is_some() {
            return Ok(events);
        }
        self.combobox.set_focused(true);
        self.combobox.open();
        if !self.combobox.is_open() {
            return Ok(events);
        }
        let multiple = self.config.selection == SelectionMode::Multiple;
        let width = anchor_width(doc, self.trigger);
        let (listbox_id, combobox, option_ids) = (&self.listbox_id, &self.combobox, &self.option_ids);
        let attached = overlays.attach(doc, self.trigger, self.config.overlay.clone(), |doc, container| {
            let mut panel = ListboxPanel::mount(doc, container, listbox_id, multiple)?;
            panel.render_rows(doc, container, combobox, option_ids, width);
            Ok::<_, DomError>(panel)
        });
        let handle = match attached {
            Ok(handle) => handle,
            Err(err) => {
                self.combobox.close();
                return Err(err.into());
            }
        };
        self.handle = Some(handle);
        let initial = self
            .selected
            .iter()
            .copied()
            .find(|&i| !self.combobox.options()[i].disabled);
        match initial {
            Some(index) => {
                self.combobox.set_active(index);
            }
            None => {
                self.combobox.move_active_to_first();
            }
        }
        set_expanded(doc, self.trigger, true);
        self.sync(doc, overlays);
        tracing::debug!(listbox = %self.listbox_id, %handle, "select opened");
        events.push(SelectEvent::Opened);
        Ok(events)
    }

    /// Close the panel and return focus to the trigger.
    pub fn close(&mut self, doc: &mut Document, overlays: &mut OverlayManager) -> SelectEvents<V> {
        self.close_with(doc, overlays, true)
    }

    /// Keys pressed while the trigger has focus.
    ///
    /// Closed: arrows, `Enter`, and `Space` open the panel. Open: arrows and
    /// `Home`/`End` move the active option, printable keys run typeahead,
    /// `Enter`/`Space` choose, `Escape` and `Tab` close.
    pub fn handle_key(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
        event: &KeyEvent,
        now: u64,
    ) -> Result<SelectEvents<V>, WidgetError> {
        if event.has_command_modifier() {
            return Ok(SelectEvents::new());
        }
        if !self.is_open() {
            return match event.key {
                Key::ArrowDown | Key::ArrowUp | Key::Enter | Key::Space => self.open(doc, overlays),
                _ => Ok(SelectEvents::new()),
            };
        }
        let in_word = self.typeahead.is_active(now) && !self.typeahead.buffer().is_empty();
        let mut events = SelectEvents::new();
        match event.key {
            Key::ArrowDown => {
                self.combobox.move_active(Step::Forward);
            }
            Key::ArrowUp => {
                self.combobox.move_active(Step::Backward);
            }
            Key::Home => {
                self.combobox.move_active_to_first();
            }
            Key::End => {
                self.combobox.move_active_to_last();
            }
            Key::Space if in_word => self.typeahead(' ', now),
            Key::Enter | Key::Space => {
                if let Some(index) = self.combobox.active() {
                    events = self.choose(doc, overlays, index);
                }
            }
            Key::Escape => return Ok(self.close_with(doc, overlays, true)),
            Key::Tab => return Ok(self.close_with(doc, overlays, false)),
            Key::Character(ch) => self.typeahead(ch, now),
            _ => {}
        }
        self.sync(doc, overlays);
        Ok(events)
    }

    /// Choose an option by pointer. Disabled and filtered-out options are ignored.
    pub fn click_option(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
        index: usize,
    ) -> SelectEvents<V> {
        if !self.is_open() {
            return SelectEvents::new();
        }
        self.combobox.set_active(index);
        if self.active() != Some(index) {
            return SelectEvents::new();
        }
        let events = self.choose(doc, overlays, index);
        self.sync(doc, overlays);
        events
    }

    /// Set the selection from outside (form binding) without opening the panel.
    ///
    /// Values with no matching option are ignored. In single mode more than one
    /// value is rejected and the selection is left as it was.
    pub fn write_values(
        &mut self,
        doc: &mut Document,
        overlays: &OverlayManager,
        values: &[V],
    ) -> Result<(), WidgetError> {
        if self.config.selection == SelectionMode::Single && values.len() > 1 {
            return Err(WidgetError::TooManyValues(values.len()));
        }
        let options = self.combobox.options();
        self.selected = (0..options.len())
            .filter(|&i| values.contains(&options[i].value))
            .collect();
        self.update_display(doc);
        self.sync(doc, overlays);
        Ok(())
    }

    /// Enable or disable the select. Disabling closes the panel.
    pub fn set_disabled(&mut self, doc: &mut Document, overlays: &mut OverlayManager, disabled: bool) {
        if disabled {
            self.close_with(doc, overlays, false);
            doc.set_attribute(self.trigger, "aria-disabled", "true");
        } else {
            doc.remove_attribute(self.trigger, "aria-disabled");
        }
        self.combobox.set_enabled(!disabled);
    }

    /// React to the overlay manager closing the panel (outside click, Escape).
    pub fn on_overlay_closed(&mut self, doc: &mut Document, dismissed: &Dismissed) -> SelectEvents<V> {
        let mut events = SelectEvents::new();
        if self.handle != Some(dismissed.handle) {
            return events;
        }
        self.handle = None;
        self.after_close(doc, dismissed.reason == DismissReason::Escape);
        events.push(SelectEvent::Closed);
        events
    }

    fn choose(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
        index: usize,
    ) -> SelectEvents<V> {
        let mut events = SelectEvents::new();
        let Some(option) = self.combobox.options().get(index).filter(|o| !o.disabled) else {
            return events;
        };
        let value = option.value.clone();
        match self.config.selection {
            SelectionMode::Single => {
                if self.selected != [index] {
                    self.selected.clear();
                    self.selected.push(index);
                    events.push(SelectEvent::Selected(value));
                }
                self.update_display(doc);
                events.extend(self.close_with(doc, overlays, true));
            }
            SelectionMode::Multiple => {
                match self.selected.binary_search(&index) {
                    Ok(pos) => {
                        self.selected.remove(pos);
                        events.push(SelectEvent::Deselected(value));
                    }
                    Err(pos) => {
                        self.selected.insert(pos, index);
                        events.push(SelectEvent::Selected(value));
                    }
                }
                self.update_display(doc);
            }
        }
        tracing::debug!(listbox = %self.listbox_id, index, selected = ?self.selected, "select choice");
        events
    }

    fn typeahead(&mut self, ch: char, now: u64) {
        let filtered = self.combobox.filtered();
        if filtered.is_empty() {
            return;
        }
        let found = {
            let options = self.combobox.options();
            let query = self.typeahead.push(ch, now);
            query.find(filtered.len(), self.combobox.active_position(), |p| {
                let option = &options[filtered[p]];
                (!option.disabled).then_some(option.label.as_str())
            })
        };
        if let Some(index) = found.map(|position| filtered[position]) {
            self.combobox.set_active(index);
        }
    }

    fn close_with(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
        refocus: bool,
    ) -> SelectEvents<V> {
        let mut events = SelectEvents::new();
        let Some(handle) = self.handle.take() else {
            return events;
        };
        overlays.close(doc, handle);
        self.after_close(doc, refocus);
        events.push(SelectEvent::Closed);
        events
    }

    fn after_close(&mut self, doc: &mut Document, refocus: bool) {
        self.combobox.close();
        self.typeahead.clear();
        set_expanded(doc, self.trigger, false);
        set_active_descendant(doc, self.trigger, None);
        if refocus {
            doc.focus(self.trigger);
        }
    }

    fn sync(&self, doc: &mut Document, overlays: &OverlayManager) {
        let Some(panel) = self.handle.and_then(|h| overlays.content::<ListboxPanel>(h)) else {
            return;
        };
        let active = self.combobox.active();
        panel.sync_state(doc, active, |i| self.selected.contains(&i));
        let id = active.and_then(|i| self.option_ids.get(i)).map(String::as_str);
        set_active_descendant(doc, self.trigger, id);
    }

    fn update_display(&self, doc: &mut Document) {
        let options = self.combobox.options();
        let text = if self.selected.is_empty() {
            self.config.placeholder.clone()
        } else {
            let labels: Vec<&str> = self.selected.iter().map(|&i| options[i].label.as_str()).collect();
            labels.join(", ")
        };
        doc.set_label(self.trigger, &text);
    }
}
