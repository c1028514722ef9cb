// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Autocomplete: a text input whose query filters a listbox panel.

use alloc::string::String;
use alloc::vec::Vec;

use trellis_combobox::{ComboboxConfig, ComboboxController, ComboboxEvents, ComboboxOption};
use trellis_dom::{Document, DomError, ElementId};
use trellis_events::{Key, KeyEvent};
use trellis_focus::Step;
use trellis_overlay::{Dismissed, OverlayConfig, OverlayHandle, OverlayManager};

use crate::error::WidgetError;
use crate::ids::next_id;
use crate::listbox::{ListboxPanel, anchor_width, set_active_descendant, set_expanded};

/// Autocomplete configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutocompleteConfig {
    /// Filtering, gating, and active-option behavior. Multiple selection is rejected.
    pub combobox: ComboboxConfig,
    /// Overlay settings for the panel.
    pub overlay: OverlayConfig,
    /// Open the panel when the input gains focus (subject to gating).
    pub open_on_focus: bool,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            combobox: ComboboxConfig::default(),
            overlay: OverlayConfig::default().with_panel_class("trellis-autocomplete-panel"),
            open_on_focus: true,
        }
    }
}

/// An autocomplete input.
///
/// Every call returns the [`ComboboxEvent`](trellis_combobox::ComboboxEvent)s it
/// produced; the input's `value` attribute always mirrors the query.
#[derive(Debug)]
pub struct Autocomplete<V> {
    input: ElementId,
    listbox_id: String,
    option_ids: Vec<String>,
    combobox: ComboboxController<V>,
    overlay: OverlayConfig,
    open_on_focus: bool,
    handle: Option<OverlayHandle>,
    rendered: Vec<usize>,
}

impl<V: Clone + PartialEq> Autocomplete<V> {
    /// Wire `input` as an autocomplete over `options`.
    pub fn new(
        doc: &mut Document,
        input: ElementId,
        options: Vec<ComboboxOption<V>>,
        config: AutocompleteConfig,
    ) -> Result<Self, WidgetError> {
        if !doc.is_alive(input) {
            return Err(WidgetError::StaleElement(input));
        }
        let option_ids = options.iter().map(|_| next_id("option")).collect();
        let combobox = ComboboxController::new(options, config.combobox)?;
        let listbox_id = next_id("listbox");
        doc.set_attribute(input, "role", "combobox");
        doc.set_attribute(input, "aria-autocomplete", "list");
        doc.set_attribute(input, "aria-controls", &listbox_id);
        doc.set_attribute(input, "value", "");
        set_expanded(doc, input, false);
        Ok(Self {
            input,
            listbox_id,
            option_ids,
            combobox,
            overlay: config.overlay,
            open_on_focus: config.open_on_focus,
            handle: None,
            rendered: Vec::new(),
        })
    }

    /// The input element.
    pub fn input(&self) -> ElementId {
        self.input
    }

    /// The underlying state machine.
    pub fn combobox(&self) -> &ComboboxController<V> {
        &self.combobox
    }

    /// Current query text.
    pub fn query(&self) -> &str {
        self.combobox.query()
    }

    /// The committed value.
    pub fn value(&self) -> Option<&V> {
        self.combobox.value()
    }

    /// Returns true if the panel is open.
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// The open panel's overlay.
    pub fn handle(&self) -> Option<OverlayHandle> {
        self.handle
    }

    /// Source indices of the rendered rows, in display order.
    pub fn rendered(&self) -> &[usize] {
        &self.rendered
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

    /// The input gained focus.
    pub fn focus(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
    ) -> Result<ComboboxEvents<V>, WidgetError> {
        let mut events = self.combobox.set_focused(true);
        if self.open_on_focus {
            events.extend(self.combobox.open());
        }
        self.reconcile(doc, overlays)?;
        Ok(events)
    }

    /// The input lost focus; the panel closes.
    pub fn blur(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
    ) -> Result<ComboboxEvents<V>, WidgetError> {
        let events = self.combobox.set_focused(false);
        self.reconcile(doc, overlays)?;
        Ok(events)
    }

    /// The user edited the text.
    pub fn input_text(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
        text: &str,
    ) -> Result<ComboboxEvents<V>, WidgetError> {
        let events = self.combobox.set_query(text);
        self.reconcile(doc, overlays)?;
        Ok(events)
    }

    /// Keys pressed in the input.
    ///
    /// `ArrowDown`/`ArrowUp` move the active option, opening the panel first if
    /// needed; `Enter` commits; `Escape` and `Tab` close. Other keys belong to
    /// the text field.
    pub fn handle_key(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
        event: &KeyEvent,
    ) -> Result<ComboboxEvents<V>, WidgetError> {
        if event.has_command_modifier() {
            return Ok(ComboboxEvents::new());
        }
        let events = match event.key {
            Key::ArrowDown | Key::ArrowUp => {
                let step = if event.key == Key::ArrowDown {
                    Step::Forward
                } else {
                    Step::Backward
                };
                let mut events = self.combobox.open();
                events.extend(self.combobox.move_active(step));
                events
            }
            Key::Enter => self.combobox.commit_active(),
            Key::Escape | Key::Tab => self.combobox.close(),
            _ => ComboboxEvents::new(),
        };
        self.reconcile(doc, overlays)?;
        Ok(events)
    }

    /// Commit an option by pointer. Disabled and filtered-out options are ignored.
    pub fn click_option(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
        index: usize,
    ) -> Result<ComboboxEvents<V>, WidgetError> {
        let mut events = self.combobox.set_active(index);
        if self.combobox.active() == Some(index) {
            events.extend(self.combobox.commit_active());
        }
        self.reconcile(doc, overlays)?;
        Ok(events)
    }

    /// Write a value from outside (form binding). Sets the text; never opens.
    pub fn write_value(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
        value: Option<V>,
    ) -> Result<ComboboxEvents<V>, WidgetError> {
        let events = self.combobox.write_external_value(value);
        self.reconcile(doc, overlays)?;
        Ok(events)
    }

    /// React to the overlay manager closing the panel (outside click, Escape).
    pub fn on_overlay_closed(
        &mut self,
        doc: &mut Document,
        overlays: &mut OverlayManager,
        dismissed: &Dismissed,
    ) -> Result<ComboboxEvents<V>, WidgetError> {
        if self.handle != Some(dismissed.handle) {
            return Ok(ComboboxEvents::new());
        }
        self.handle = None;
        self.rendered.clear();
        let events = self.combobox.close();
        self.reconcile(doc, overlays)?;
        Ok(events)
    }

    /// Close the panel when the input is being torn down.
    pub fn dispose(&mut self, doc: &mut Document, overlays: &mut OverlayManager) {
        self.combobox.close();
        if let Some(handle) = self.handle.take() {
            overlays.close(doc, handle);
        }
        self.rendered.clear();
    }

    /// Bring the document and overlay in line with the controller.
    fn reconcile(&mut self, doc: &mut Document, overlays: &mut OverlayManager) -> Result<(), WidgetError> {
        doc.set_attribute(self.input, "value", self.combobox.query());
        match (self.combobox.is_open(), self.handle) {
            (true, None) => self.attach(doc, overlays)?,
            (false, Some(handle)) => {
                overlays.close(doc, handle);
                self.handle = None;
                self.rendered.clear();
                tracing::debug!(listbox = %self.listbox_id, %handle, "autocomplete closed");
            }
            (true, Some(handle)) if self.rendered != self.combobox.filtered() => {
                let width = anchor_width(doc, self.input);
                if let Some(container) = overlays.container(handle)
                    && let Some(panel) = overlays.content_mut::<ListboxPanel>(handle)
                {
                    panel.render_rows(doc, container, &self.combobox, &self.option_ids, width);
                    self.rendered = self.combobox.filtered().to_vec();
                }
            }
            _ => {}
        }
        set_expanded(doc, self.input, self.handle.is_some());
        self.sync(doc, overlays);
        Ok(())
    }

    fn attach(&mut self, doc: &mut Document, overlays: &mut OverlayManager) -> Result<(), WidgetError> {
        let width = anchor_width(doc, self.input);
        let (listbox_id, combobox, option_ids) = (&self.listbox_id, &self.combobox, &self.option_ids);
        let attached = overlays.attach(doc, self.input, self.overlay.clone(), |doc, container| {
            let mut panel = ListboxPanel::mount(doc, container, listbox_id, false)?;
            panel.render_rows(doc, container, combobox, option_ids, width);
            Ok::<_, DomError>(panel)
        });
        match attached {
            Ok(handle) => {
                self.handle = Some(handle);
                self.rendered = self.combobox.filtered().to_vec();
                tracing::debug!(listbox = %self.listbox_id, %handle, "autocomplete opened");
                Ok(())
            }
            Err(err) => {
                self.combobox.close();
                Err(err.into())
            }
        }
    }

    fn sync(&self, doc: &mut Document, overlays: &OverlayManager) {
        let active = self.combobox.active();
        let id = active.and_then(|i| self.option_ids.get(i)).map(String::as_str);
        set_active_descendant(doc, self.input, id);
        let Some(panel) = self.handle.and_then(|h| overlays.content::<ListboxPanel>(h)) else {
            return;
        };
        let options = self.combobox.options();
        let value = self.combobox.value();
        panel.sync_state(doc, active, |i| value.is_some_and(|v| *v == options[i].value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use kurbo::{Rect, Size};
    use trellis_combobox::{ComboboxError, ComboboxEvent, SelectionMode};
    use trellis_dom::ElementData;
    use trellis_events::UiEvent;

    struct Fixture {
        doc: Document,
        overlays: OverlayManager,
        input: ElementId,
    }

    fn fixture() -> Fixture {
        let mut doc = Document::new(Size::new(800.0, 600.0));
        let body = doc.body();
        let input = doc.create_element(
            ElementData::new("input")
                .focusable()
                .with_bounds(Rect::new(10.0, 10.0, 310.0, 50.0)),
        );
        doc.append_child(body, input).unwrap();
        doc.focus(input);
        Fixture {
            doc,
            overlays: OverlayManager::new(),
            input,
        }
    }

    fn fruit() -> Vec<ComboboxOption<&'static str>> {
        vec![
            ComboboxOption::new("apple", "Apple"),
            ComboboxOption::new("banana", "Banana"),
            ComboboxOption::new("cherry", "Cherry").disabled(),
            ComboboxOption::new("mango", "Mango"),
        ]
    }

    #[test]
    fn multiple_selection_is_rejected() {
        let Fixture { mut doc, input, .. } = fixture();
        let config = AutocompleteConfig {
            combobox: ComboboxConfig {
                selection: SelectionMode::Multiple,
                ..ComboboxConfig::default()
            },
            ..AutocompleteConfig::default()
        };
        assert_eq!(
            Autocomplete::new(&mut doc, input, fruit(), config).err(),
            Some(WidgetError::Combobox(ComboboxError::MultipleSelectionUnsupported))
        );
    }

    #[test]
    fn typing_filters_and_enter_commits() {
        let Fixture {
            mut doc,
            mut overlays,
            input,
        } = fixture();
        let mut ac = Autocomplete::new(&mut doc, input, fruit(), AutocompleteConfig::default()).unwrap();
        ac.focus(&mut doc, &mut overlays).unwrap();
        assert!(ac.is_open());
        assert_eq!(ac.rendered(), &[0, 1, 2, 3]);

        let events = ac.input_text(&mut doc, &mut overlays, "an").unwrap();
        assert_eq!(events.as_slice(), &[ComboboxEvent::QueryChanged("an".into())]);
        assert_eq!(ac.rendered(), &[1, 3], "rows rebuilt for the new query");
        assert_eq!(doc.attribute(input, "value"), Some("an"));

        ac.handle_key(&mut doc, &mut overlays, &KeyEvent::new(Key::ArrowDown)).unwrap();
        ac.handle_key(&mut doc, &mut overlays, &KeyEvent::new(Key::ArrowDown)).unwrap();
        assert_eq!(ac.combobox().active(), Some(3));
        assert_eq!(
            doc.attribute(input, "aria-activedescendant"),
            Some(ac.option_ids[3].as_str())
        );

        let events = ac.handle_key(&mut doc, &mut overlays, &KeyEvent::new(Key::Enter)).unwrap();
        assert!(events.contains(&ComboboxEvent::Committed("mango")));
        assert_eq!(ac.value(), Some(&"mango"));
        assert_eq!(doc.attribute(input, "value"), Some("Mango"));
        assert!(!ac.is_open());
        assert_eq!(overlays.open_count(), 0);
        assert_eq!(doc.attribute(input, "aria-expanded"), Some("false"));
        assert!(doc.attribute(input, "aria-activedescendant").is_none());
    }

    #[test]
    fn arrow_opens_a_closed_panel() {
        let Fixture {
            mut doc,
            mut overlays,
            input,
        } = fixture();
        let config = AutocompleteConfig {
            open_on_focus: false,
            ..AutocompleteConfig::default()
        };
        let mut ac = Autocomplete::new(&mut doc, input, fruit(), config).unwrap();
        ac.focus(&mut doc, &mut overlays).unwrap();
        assert!(!ac.is_open());
        let events = ac
            .handle_key(&mut doc, &mut overlays, &KeyEvent::new(Key::ArrowUp))
            .unwrap();
        assert_eq!(
            events.as_slice(),
            &[ComboboxEvent::Opened, ComboboxEvent::ActiveChanged(Some(3))]
        );
        assert!(ac.is_open());
        assert_eq!(doc.attribute(input, "aria-expanded"), Some("true"));
    }

    #[test]
    fn min_chars_gates_opening() {
        let Fixture {
            mut doc,
            mut overlays,
            input,
        } = fixture();
        let config = AutocompleteConfig {
            combobox: ComboboxConfig {
                min_chars: 2,
                ..ComboboxConfig::default()
            },
            ..AutocompleteConfig::default()
        };
        let mut ac = Autocomplete::new(&mut doc, input, fruit(), config).unwrap();
        ac.focus(&mut doc, &mut overlays).unwrap();
        assert!(!ac.is_open());
        ac.input_text(&mut doc, &mut overlays, "a").unwrap();
        assert!(!ac.is_open());
        ac.input_text(&mut doc, &mut overlays, "ap").unwrap();
        assert!(ac.is_open());
        assert_eq!(ac.rendered(), &[0]);
        ac.input_text(&mut doc, &mut overlays, "").unwrap();
        assert!(!ac.is_open(), "shrinking below the minimum closes");
        assert_eq!(overlays.listener_count(), 0);
    }

    #[test]
    fn blur_escape_and_outside_click_close() {
        let Fixture {
            mut doc,
            mut overlays,
            input,
        } = fixture();
        let mut ac = Autocomplete::new(&mut doc, input, fruit(), AutocompleteConfig::default()).unwrap();
        ac.focus(&mut doc, &mut overlays).unwrap();
        ac.handle_key(&mut doc, &mut overlays, &KeyEvent::new(Key::Escape)).unwrap();
        assert!(!ac.is_open());

        ac.input_text(&mut doc, &mut overlays, "b").unwrap();
        assert!(ac.is_open(), "typing reopens");
        ac.blur(&mut doc, &mut overlays).unwrap();
        assert!(!ac.is_open());

        ac.focus(&mut doc, &mut overlays).unwrap();
        let body = doc.body();
        let dismissed = overlays.handle_event(
            &mut doc,
            &UiEvent::PointerDown(trellis_events::PointerEvent {
                target: body,
                position: kurbo::Point::new(700.0, 500.0),
                button: trellis_events::PointerButton::Primary,
            }),
        );
        ac.on_overlay_closed(&mut doc, &mut overlays, &dismissed[0]).unwrap();
        assert!(!ac.is_open());
        assert!(!ac.combobox().is_open());
    }

    #[test]
    fn external_write_sets_text_without_opening() {
        let Fixture {
            mut doc,
            mut overlays,
            input,
        } = fixture();
        let config = AutocompleteConfig {
            open_on_focus: false,
            ..AutocompleteConfig::default()
        };
        let mut ac = Autocomplete::new(&mut doc, input, fruit(), config).unwrap();
        ac.focus(&mut doc, &mut overlays).unwrap();
        ac.write_value(&mut doc, &mut overlays, Some("banana")).unwrap();
        assert_eq!(doc.attribute(input, "value"), Some("Banana"));
        assert!(!ac.is_open());
        ac.write_value(&mut doc, &mut overlays, Some("kiwi")).unwrap();
        assert_eq!(doc.attribute(input, "value"), Some(""));
    }

    #[test]
    fn click_commits_enabled_rows_only() {
        let Fixture {
            mut doc,
            mut overlays,
            input,
        } = fixture();
        let mut ac = Autocomplete::new(&mut doc, input, fruit(), AutocompleteConfig::default()).unwrap();
        ac.focus(&mut doc, &mut overlays).unwrap();
        let hit = doc
            .hit_test_point(kurbo::Point::new(100.0, 50.0 + 32.0 * 2.5))
            .unwrap();
        assert_eq!(ac.option_at(&doc, &overlays, hit), Some(2));
        assert!(ac.click_option(&mut doc, &mut overlays, 2).unwrap().is_empty());
        assert!(ac.is_open());
        let events = ac.click_option(&mut doc, &mut overlays, 0).unwrap();
        assert!(events.contains(&ComboboxEvent::Committed("apple")));
        assert!(!ac.is_open());
    }
}
