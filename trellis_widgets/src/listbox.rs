// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listbox panel markup shared by select and autocomplete.
//!
//! Rows are not focusable: focus stays on the trigger or input, and the active
//! row is announced through `aria-activedescendant`.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use trellis_combobox::ComboboxController;
use trellis_dom::{Document, ElementData, ElementFlags, ElementId};

/// Height of one option row.
pub(crate) const ROW_HEIGHT: f64 = 32.0;

/// Class carried by the active row.
pub(crate) const ACTIVE_CLASS: &str = "trellis-option-active";

/// Overlay content of a listbox panel.
#[derive(Debug)]
pub(crate) struct ListboxPanel {
    pub(crate) listbox: ElementId,
    /// `(source index, row)` for every rendered option, in display order.
    pub(crate) rows: Vec<(usize, ElementId)>,
}

impl ListboxPanel {
    /// Create the listbox element inside `container`.
    pub(crate) fn mount(
        doc: &mut Document,
        container: ElementId,
        listbox_id: &str,
        multiselectable: bool,
    ) -> Result<Self, trellis_dom::DomError> {
        let listbox = doc.create_element(
            ElementData::new("ul")
                .with_attribute("role", "listbox")
                .with_attribute("id", listbox_id),
        );
        if multiselectable {
            doc.set_attribute(listbox, "aria-multiselectable", "true");
        }
        doc.append_child(container, listbox)?;
        Ok(Self {
            listbox,
            rows: Vec::new(),
        })
    }

    /// Rebuild the rows from the combobox's filtered options. `width` is the
    /// panel width, normally the width of the anchoring trigger.
    pub(crate) fn render_rows<V: Clone + PartialEq>(
        &mut self,
        doc: &mut Document,
        container: ElementId,
        combobox: &ComboboxController<V>,
        option_ids: &[String],
        width: f64,
    ) {
        for (_, row) in self.rows.drain(..) {
            doc.destroy(row);
        }
        let mut y = 0.0;
        for (index, option) in combobox.filtered_options() {
            let mut data = ElementData::new("li")
                .with_label(&option.label)
                .with_bounds(Rect::new(0.0, y, width, y + ROW_HEIGHT))
                .with_attribute("role", "option");
            if let Some(id) = option_ids.get(index) {
                data = data.with_attribute("id", id);
            }
            if option.disabled {
                data = data
                    .with_flags(ElementFlags::DISABLED)
                    .with_attribute("aria-disabled", "true");
            }
            let row = doc.create_element(data);
            if doc.append_child(self.listbox, row).is_ok() {
                self.rows.push((index, row));
            }
            y += ROW_HEIGHT;
        }
        let bounds = Rect::new(0.0, 0.0, width, y);
        doc.set_local_bounds(self.listbox, bounds);
        doc.set_local_bounds(container, bounds);
    }

    /// Mirror active and selected state onto the rows.
    pub(crate) fn sync_state(
        &self,
        doc: &mut Document,
        active: Option<usize>,
        is_selected: impl Fn(usize) -> bool,
    ) {
        for &(index, row) in &self.rows {
            let selected = if is_selected(index) { "true" } else { "false" };
            doc.set_attribute(row, "aria-selected", selected);
            if active == Some(index) {
                doc.add_class(row, ACTIVE_CLASS);
            } else {
                doc.remove_class(row, ACTIVE_CLASS);
            }
        }
    }

    /// Source index of the option rendered as `row`.
    pub(crate) fn index_of_row(&self, row: ElementId) -> Option<usize> {
        self.rows.iter().find(|(_, r)| *r == row).map(|(i, _)| *i)
    }

    /// Rendered row for source index `index`.
    pub(crate) fn row_of(&self, index: usize) -> Option<ElementId> {
        self.rows.iter().find(|(i, _)| *i == index).map(|(_, r)| *r)
    }
}

/// Set or clear `aria-activedescendant` on the focus owner.
pub(crate) fn set_active_descendant(doc: &mut Document, owner: ElementId, id: Option<&str>) {
    match id {
        Some(id) => doc.set_attribute(owner, "aria-activedescendant", id),
        None => doc.remove_attribute(owner, "aria-activedescendant"),
    }
}

/// Set `aria-expanded` on a trigger.
pub(crate) fn set_expanded(doc: &mut Document, trigger: ElementId, expanded: bool) {
    doc.set_attribute(trigger, "aria-expanded", if expanded { "true" } else { "false" });
}

/// Width of an anchor in client space, or zero when it is not rendered.
pub(crate) fn anchor_width(doc: &Document, anchor: ElementId) -> f64 {
    doc.bounding_client_rect(anchor).map_or(0.0, |r| r.width())
}
