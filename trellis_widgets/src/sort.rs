// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sortable column headers.

use alloc::vec::Vec;

use trellis_dom::{Document, ElementId};
use trellis_events::KeyEvent;
use trellis_focus::{ItemKey, Orientation, RovingFocus, RovingResponse};

use crate::error::WidgetError;
use crate::item::ElementItem;

/// Sort direction of a column.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// The other direction.
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    fn aria(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }
}

/// The active sort.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SortState {
    /// Sorted column.
    pub column: usize,
    /// Direction.
    pub direction: SortDirection,
}

/// Sort header configuration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SortConfig {
    /// Direction a column takes when first activated.
    pub start: SortDirection,
    /// Never return to the unsorted state once a column is sorted.
    pub disable_clear: bool,
}

/// A row of sortable column headers.
///
/// Activating a header cycles it through `start`, the opposite direction, and
/// unsorted; switching to another column starts that column over.
#[derive(Debug)]
pub struct SortHeaders {
    headers: Vec<ElementId>,
    keys: Vec<ItemKey>,
    roving: RovingFocus<ElementItem>,
    config: SortConfig,
    active: Option<SortState>,
}

impl SortHeaders {
    /// Wire one header per column. Nothing starts sorted.
    pub fn new(doc: &mut Document, headers: Vec<ElementId>, config: SortConfig) -> Result<Self, WidgetError> {
        if headers.is_empty() {
            return Err(WidgetError::Empty("sort headers"));
        }
        if let Some(&stale) = headers.iter().find(|&&el| !doc.is_alive(el)) {
            return Err(WidgetError::StaleElement(stale));
        }
        let mut roving = RovingFocus::new().with_orientation(Orientation::Horizontal);
        let keys = headers
            .iter()
            .map(|&header| {
                let item = ElementItem::new(doc, header);
                roving.register(doc, item)
            })
            .collect();
        let this = Self {
            headers,
            keys,
            roving,
            config,
            active: None,
        };
        this.sync(doc);
        Ok(this)
    }

    /// The header elements.
    pub fn headers(&self) -> &[ElementId] {
        &self.headers
    }

    /// The active sort, if any.
    pub fn active(&self) -> Option<SortState> {
        self.active
    }

    /// The state activating `column` would produce.
    pub fn next_state(&self, column: usize) -> Option<SortState> {
        let start = self.config.start;
        let direction = match self.active {
            Some(s) if s.column == column && s.direction == start => Some(start.reversed()),
            Some(s) if s.column == column => self.config.disable_clear.then_some(start),
            _ => Some(start),
        };
        direction.map(|direction| SortState { column, direction })
    }

    /// Advance `column` through the cycle. Returns the new sort; disabled
    /// headers are ignored and return the current one.
    pub fn toggle(&mut self, doc: &mut Document, column: usize) -> Option<SortState> {
        let Some(&header) = self.headers.get(column) else {
            return self.active;
        };
        if doc.is_disabled(header) {
            return self.active;
        }
        self.active = self.next_state(column);
        tracing::trace!(column, active = ?self.active, "sort toggled");
        self.sync(doc);
        self.active
    }

    /// Write the sort from outside (for example restored view state).
    pub fn set_sort(&mut self, doc: &mut Document, sort: Option<SortState>) {
        self.active = sort.filter(|s| s.column < self.headers.len());
        self.sync(doc);
    }

    /// Pointer press on a header: focus and toggle it.
    pub fn click(&mut self, doc: &mut Document, column: usize) -> Option<SortState> {
        if let Some(&key) = self.keys.get(column) {
            self.roving.focus_key(doc, key);
        }
        self.toggle(doc, column)
    }

    /// Keys pressed on a header. Returns the new sort when the key toggled one.
    pub fn handle_key(&mut self, doc: &mut Document, event: &KeyEvent, now: u64) -> Option<Option<SortState>> {
        match self.roving.handle_key(doc, event, now) {
            RovingResponse::Activated(key) => {
                let column = self.roving.index_of(key)?;
                Some(self.toggle(doc, column))
            }
            _ => None,
        }
    }

    /// Enable or disable one header.
    pub fn set_disabled(&mut self, doc: &mut Document, column: usize, disabled: bool) {
        if let Some(&header) = self.headers.get(column) {
            doc.set_disabled(header, disabled);
            self.roving.revalidate(doc);
        }
    }

    fn sync(&self, doc: &mut Document) {
        for (i, &header) in self.headers.iter().enumerate() {
            let value = match self.active {
                Some(s) if s.column == i => s.direction.aria(),
                _ => "none",
            };
            doc.set_attribute(header, "aria-sort", value);
        }
    }
}
