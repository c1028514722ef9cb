// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use trellis_dom::{Document, ElementId};
use trellis_focus::RovingItem;

/// A roving-focus row backed by a document element.
///
/// Tab priority maps to the element's tab index (`0` for the tab stop, `-1`
/// otherwise); disabled state is read from the element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementItem {
    /// The row element.
    pub element: ElementId,
    /// Typeahead label.
    pub label: Option<String>,
}

impl ElementItem {
    /// Wrap an element, using its document label for typeahead.
    pub fn new(doc: &Document, element: ElementId) -> Self {
        Self {
            element,
            label: doc.label(element).map(String::from),
        }
    }
}

impl RovingItem<Document> for ElementItem {
    fn is_disabled(&self, doc: &Document) -> bool {
        doc.is_disabled(self.element)
    }

    fn set_tab_priority(&mut self, doc: &mut Document, has: bool) {
        doc.set_tab_index(self.element, Some(if has { 0 } else { -1 }));
    }

    fn focus(&mut self, doc: &mut Document) {
        doc.focus(self.element);
    }

    // Widgets read `RovingResponse::Activated` and act on the index themselves.
    fn activate(&mut self, _: &mut Document) {}

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Rect, Size};
    use trellis_dom::ElementData;
    use trellis_focus::RovingFocus;

    #[test]
    fn tab_priority_maps_to_tab_index() {
        let mut doc = Document::new(Size::new(100.0, 100.0));
        let body = doc.body();
        let rows: alloc::vec::Vec<_> = ["One", "Two", "Three"]
            .into_iter()
            .map(|label| {
                let el = doc.create_element(
                    ElementData::new("li")
                        .with_label(label)
                        .with_bounds(Rect::new(0.0, 0.0, 10.0, 10.0)),
                );
                doc.append_child(body, el).unwrap();
                el
            })
            .collect();
        doc.set_disabled(rows[0], true);

        let mut roving = RovingFocus::new();
        for &row in &rows {
            let item = ElementItem::new(&doc, row);
            roving.register(&mut doc, item);
        }
        assert_eq!(doc.tab_index(rows[0]), Some(-1));
        assert_eq!(doc.tab_index(rows[1]), Some(0), "first enabled row is the tab stop");
        assert_eq!(doc.tab_index(rows[2]), Some(-1));

        roving.typeahead(&mut doc, 't', 0);
        roving.typeahead(&mut doc, 'h', 10);
        assert_eq!(doc.active_element(), rows[2]);
        assert_eq!(doc.tab_index(rows[2]), Some(0));
        assert_eq!(doc.tab_index(rows[1]), Some(-1));
    }
}
