// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stepper: a row of step headers with optional linear gating.

use alloc::vec::Vec;

use trellis_dom::{Document, ElementId};
use trellis_events::KeyEvent;
use trellis_focus::{ItemKey, Orientation, RovingFocus, RovingResponse};

use crate::error::WidgetError;
use crate::item::ElementItem;

/// Stepper configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StepperConfig {
    /// Refuse to select a step while an earlier required step is incomplete.
    pub linear: bool,
    /// Arrow axis of the header row.
    pub orientation: Orientation,
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            linear: false,
            orientation: Orientation::Horizontal,
        }
    }
}

/// Progress of one step.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepState {
    /// The step's work is done.
    pub completed: bool,
    /// The step may be skipped in linear mode.
    pub optional: bool,
}

/// What a stepper interaction produced.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepperEvent {
    /// A different step was selected.
    Selected {
        /// The newly selected step.
        index: usize,
        /// The step selected before.
        previous: usize,
    },
}

/// Step headers driving a multi-step flow.
#[derive(Debug)]
pub struct Stepper {
    headers: Vec<ElementId>,
    steps: Vec<StepState>,
    keys: Vec<ItemKey>,
    roving: RovingFocus<ElementItem>,
    linear: bool,
    selected: usize,
}

impl Stepper {
    /// Wire one header per step. The first step starts selected.
    pub fn new(
        doc: &mut Document,
        headers: Vec<ElementId>,
        config: StepperConfig,
    ) -> Result<Self, WidgetError> {
        if headers.is_empty() {
            return Err(WidgetError::Empty("stepper"));
        }
        if let Some(&stale) = headers.iter().find(|&&el| !doc.is_alive(el)) {
            return Err(WidgetError::StaleElement(stale));
        }
        let mut roving = RovingFocus::new().with_orientation(config.orientation);
        let mut keys = Vec::with_capacity(headers.len());
        for &header in &headers {
            doc.set_attribute(header, "role", "tab");
            let item = ElementItem::new(doc, header);
            keys.push(roving.register(doc, item));
        }
        let mut this = Self {
            steps: alloc::vec![StepState::default(); headers.len()],
            headers,
            keys,
            roving,
            linear: config.linear,
            selected: 0,
        };
        this.roving.set_active(doc, this.keys[0]);
        this.sync(doc);
        Ok(this)
    }

    /// The header elements.
    pub fn headers(&self) -> &[ElementId] {
        &self.headers
    }

    /// Per-step progress.
    pub fn steps(&self) -> &[StepState] {
        &self.steps
    }

    /// Index of the selected step.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Returns true if `index` may be selected right now.
    ///
    /// Outside linear mode every step may be. In linear mode a step is reachable
    /// when every earlier step is completed or optional; going back is always
    /// allowed.
    pub fn can_select(&self, index: usize) -> bool {
        if index >= self.steps.len() {
            return false;
        }
        !self.linear
            || index <= self.selected
            || self.steps[..index]
                .iter()
                .all(|s| s.completed || s.optional)
    }

    /// Select a step. Returns `None` when it is already selected or gated.
    pub fn select(&mut self, doc: &mut Document, index: usize) -> Option<StepperEvent> {
        if index == self.selected {
            return None;
        }
        if !self.can_select(index) {
            tracing::debug!(index, selected = self.selected, "linear stepper refused step");
            return None;
        }
        let previous = self.selected;
        self.selected = index;
        self.roving.set_active(doc, self.keys[index]);
        self.sync(doc);
        Some(StepperEvent::Selected { index, previous })
    }

    /// Select the following step.
    pub fn next(&mut self, doc: &mut Document) -> Option<StepperEvent> {
        self.select(doc, self.selected + 1)
    }

    /// Select the preceding step.
    pub fn previous(&mut self, doc: &mut Document) -> Option<StepperEvent> {
        let index = self.selected.checked_sub(1)?;
        self.select(doc, index)
    }

    /// Mark a step complete or incomplete.
    pub fn set_completed(&mut self, doc: &mut Document, index: usize, completed: bool) {
        if let Some(step) = self.steps.get_mut(index) {
            step.completed = completed;
            self.sync(doc);
        }
    }

    /// Mark a step optional.
    pub fn set_optional(&mut self, doc: &mut Document, index: usize, optional: bool) {
        if let Some(step) = self.steps.get_mut(index) {
            step.optional = optional;
            self.sync(doc);
        }
    }

    /// Clear all progress and return to the first step.
    pub fn reset(&mut self, doc: &mut Document) -> Option<StepperEvent> {
        for step in &mut self.steps {
            step.completed = false;
        }
        let previous = self.selected;
        self.selected = 0;
        self.roving.set_active(doc, self.keys[0]);
        self.sync(doc);
        (previous != 0).then_some(StepperEvent::Selected { index: 0, previous })
    }

    /// Keys pressed on a header: arrows move focus, `Enter`/`Space` select.
    pub fn handle_key(&mut self, doc: &mut Document, event: &KeyEvent, now: u64) -> Option<StepperEvent> {
        match self.roving.handle_key(doc, event, now) {
            RovingResponse::Activated(key) => {
                let index = self.roving.index_of(key)?;
                self.select(doc, index)
            }
            _ => None,
        }
    }

    /// Pointer press on a header.
    pub fn click(&mut self, doc: &mut Document, index: usize) -> Option<StepperEvent> {
        let key = *self.keys.get(index)?;
        self.roving.focus_key(doc, key);
        self.select(doc, index)
    }

    fn sync(&self, doc: &mut Document) {
        for (i, &header) in self.headers.iter().enumerate() {
            if i == self.selected {
                doc.set_attribute(header, "aria-current", "step");
                doc.set_attribute(header, "aria-selected", "true");
            } else {
                doc.remove_attribute(header, "aria-current");
                doc.set_attribute(header, "aria-selected", "false");
            }
            if self.can_select(i) {
                doc.remove_attribute(header, "aria-disabled");
            } else {
                doc.set_attribute(header, "aria-disabled", "true");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Rect, Size};
    use trellis_dom::ElementData;
    use trellis_events::Key;

    fn headers(doc: &mut Document, n: usize) -> Vec<ElementId> {
        let body = doc.body();
        (0..n)
            .map(|i| {
                let x = i as f64 * 80.0;
                let el = doc.create_element(
                    ElementData::new("button")
                        .focusable()
                        .with_bounds(Rect::new(x, 0.0, x + 80.0, 40.0)),
                );
                doc.append_child(body, el).unwrap();
                el
            })
            .collect()
    }

    #[test]
    fn linear_mode_gates_forward_steps() {
        let mut doc = Document::new(Size::new(400.0, 100.0));
        let hs = headers(&mut doc, 3);
        let config = StepperConfig {
            linear: true,
            ..StepperConfig::default()
        };
        let mut stepper = Stepper::new(&mut doc, hs.clone(), config).unwrap();
        assert_eq!(doc.attribute(hs[0], "aria-current"), Some("step"));
        assert_eq!(doc.attribute(hs[1], "aria-disabled"), Some("true"));

        assert_eq!(stepper.next(&mut doc), None, "step 0 is incomplete");
        assert_eq!(stepper.click(&mut doc, 2), None);
        assert_eq!(stepper.selected(), 0);

        stepper.set_completed(&mut doc, 0, true);
        stepper.set_optional(&mut doc, 1, true);
        assert!(doc.attribute(hs[2], "aria-disabled").is_none());
        assert_eq!(
            stepper.click(&mut doc, 2),
            Some(StepperEvent::Selected {
                index: 2,
                previous: 0
            }),
            "optional step 1 may be skipped"
        );
        assert_eq!(doc.attribute(hs[2], "aria-current"), Some("step"));
        assert!(doc.attribute(hs[0], "aria-current").is_none());

        assert_eq!(
            stepper.previous(&mut doc),
            Some(StepperEvent::Selected {
                index: 1,
                previous: 2
            })
        );
        assert_eq!(
            stepper.reset(&mut doc),
            Some(StepperEvent::Selected {
                index: 0,
                previous: 1
            })
        );
        assert!(!stepper.steps()[0].completed);
        assert!(!stepper.can_select(2));
    }

    #[test]
    fn free_mode_selects_with_keyboard() {
        let mut doc = Document::new(Size::new(400.0, 100.0));
        let hs = headers(&mut doc, 3);
        let mut stepper = Stepper::new(&mut doc, hs.clone(), StepperConfig::default()).unwrap();
        doc.focus(hs[0]);
        assert_eq!(stepper.handle_key(&mut doc, &KeyEvent::new(Key::ArrowRight), 0), None);
        assert_eq!(doc.active_element(), hs[1], "arrows only move focus");
        assert_eq!(
            stepper.handle_key(&mut doc, &KeyEvent::new(Key::Space), 10),
            Some(StepperEvent::Selected {
                index: 1,
                previous: 0
            })
        );
        assert_eq!(stepper.next(&mut doc).map(|_| stepper.selected()), Some(2));
        assert_eq!(stepper.next(&mut doc), None, "no step past the last");
    }
}
