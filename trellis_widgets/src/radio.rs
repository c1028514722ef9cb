// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Radio group: selection follows focus, and the checked radio is the tab stop.

use alloc::vec::Vec;

use trellis_dom::{Document, ElementId};
use trellis_events::KeyEvent;
use trellis_focus::{ItemKey, RovingFocus, RovingResponse};

use crate::error::WidgetError;
use crate::item::ElementItem;

/// A group of mutually exclusive radios, each carrying a value.
#[derive(Debug)]
pub struct RadioGroup<V> {
    group: ElementId,
    radios: Vec<ElementId>,
    values: Vec<V>,
    keys: Vec<ItemKey>,
    roving: RovingFocus<ElementItem>,
    checked: Option<usize>,
}

impl<V: Clone + PartialEq> RadioGroup<V> {
    /// Wire `radios` (inside `group`) with one value each. Nothing starts checked.
    pub fn new(
        doc: &mut Document,
        group: ElementId,
        radios: Vec<ElementId>,
        values: Vec<V>,
    ) -> Result<Self, WidgetError> {
        if radios.is_empty() {
            return Err(WidgetError::Empty("radio group"));
        }
        if radios.len() != values.len() {
            return Err(WidgetError::LengthMismatch {
                elements: radios.len(),
                values: values.len(),
            });
        }
        if let Some(&stale) = core::iter::once(&group)
            .chain(&radios)
            .find(|&&el| !doc.is_alive(el))
        {
            return Err(WidgetError::StaleElement(stale));
        }
        doc.set_attribute(group, "role", "radiogroup");
        let mut roving = RovingFocus::new();
        let mut keys = Vec::with_capacity(radios.len());
        for &radio in &radios {
            doc.set_attribute(radio, "role", "radio");
            doc.set_attribute(radio, "aria-checked", "false");
            let item = ElementItem::new(doc, radio);
            keys.push(roving.register(doc, item));
        }
        Ok(Self {
            group,
            radios,
            values,
            keys,
            roving,
            checked: None,
        })
    }

    /// The group element.
    pub fn group(&self) -> ElementId {
        self.group
    }

    /// The radio elements.
    pub fn radios(&self) -> &[ElementId] {
        &self.radios
    }

    /// Index of the checked radio.
    pub fn checked_index(&self) -> Option<usize> {
        self.checked
    }

    /// Value of the checked radio.
    pub fn value(&self) -> Option<&V> {
        self.values.get(self.checked?)
    }

    /// The radio that currently takes Tab focus.
    pub fn tab_stop(&self) -> Option<ElementId> {
        self.radios.get(self.roving.active_index()?).copied()
    }

    /// Keys pressed while a radio has focus. Returns the newly checked value.
    ///
    /// Arrows move focus and check the radio they land on; `Space` and `Enter`
    /// check the focused radio.
    pub fn handle_key(&mut self, doc: &mut Document, event: &KeyEvent, now: u64) -> Option<V> {
        match self.roving.handle_key(doc, event, now) {
            RovingResponse::Moved(key) | RovingResponse::Activated(key) => {
                let index = self.roving.index_of(key)?;
                self.check_index(doc, index)
            }
            RovingResponse::Dismissed | RovingResponse::Unhandled => None,
        }
    }

    /// Pointer press on a radio: focus and check it. Disabled radios are ignored.
    pub fn click(&mut self, doc: &mut Document, index: usize) -> Option<V> {
        let key = *self.keys.get(index)?;
        if !self.roving.focus_key(doc, key) {
            return None;
        }
        self.check_index(doc, index)
    }

    /// Check a radio without moving focus. Returns the value if it changed.
    pub fn check(&mut self, doc: &mut Document, index: usize) -> Option<V> {
        if doc.is_disabled(*self.radios.get(index)?) {
            return None;
        }
        self.check_index(doc, index)
    }

    /// Write a value from outside (form binding). Unknown values clear the group.
    pub fn set_value(&mut self, doc: &mut Document, value: Option<&V>) {
        let index = value.and_then(|v| self.values.iter().position(|x| x == v));
        if index == self.checked {
            return;
        }
        if let Some(prev) = self.checked.take() {
            doc.set_attribute(self.radios[prev], "aria-checked", "false");
        }
        if let Some(index) = index {
            self.mark_checked(doc, index);
        }
    }

    /// Enable or disable one radio.
    pub fn set_disabled(&mut self, doc: &mut Document, index: usize, disabled: bool) {
        let Some(&radio) = self.radios.get(index) else {
            return;
        };
        doc.set_disabled(radio, disabled);
        if disabled {
            doc.set_attribute(radio, "aria-disabled", "true");
        } else {
            doc.remove_attribute(radio, "aria-disabled");
        }
        self.roving.revalidate(doc);
        if let Some(checked) = self.checked
            && !doc.is_disabled(self.radios[checked])
        {
            self.roving.set_active(doc, self.keys[checked]);
        }
    }

    fn check_index(&mut self, doc: &mut Document, index: usize) -> Option<V> {
        if self.checked == Some(index) {
            return None;
        }
        if let Some(prev) = self.checked {
            doc.set_attribute(self.radios[prev], "aria-checked", "false");
        }
        self.mark_checked(doc, index);
        tracing::trace!(index, "radio checked");
        self.values.get(index).cloned()
    }

    fn mark_checked(&mut self, doc: &mut Document, index: usize) {
        self.checked = Some(index);
        doc.set_attribute(self.radios[index], "aria-checked", "true");
        self.roving.set_active(doc, self.keys[index]);
    }
}
