// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The combobox state machine.

use alloc::string::String;
use alloc::vec::Vec;

use smallvec::SmallVec;
use trellis_focus::{Step, WrapMode, first_enabled, last_enabled, step_enabled};

use crate::error::ComboboxError;
use crate::filter::{ComboboxOption, FilterMode, filter, normalize};

/// How many values a combobox may hold.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SelectionMode {
    /// One committed value.
    #[default]
    Single,
    /// Several values. [`ComboboxController`] rejects this mode; widgets that
    /// support it keep their own selection set.
    Multiple,
}

/// Combobox configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ComboboxConfig {
    /// How the query matches option labels.
    pub filter_mode: FilterMode,
    /// Minimum normalized query length (in characters) for the panel to open.
    pub min_chars: usize,
    /// Selection mode; only [`SelectionMode::Single`] is accepted.
    pub selection: SelectionMode,
    /// Make the first enabled option active whenever the panel is open and
    /// nothing is active.
    pub auto_active_first_option: bool,
    /// Open the panel when the query changes and gating allows it.
    pub open_on_input: bool,
    /// Whether active-option stepping wraps at the ends.
    pub wrap: WrapMode,
}

impl Default for ComboboxConfig {
    fn default() -> Self {
        Self {
            filter_mode: FilterMode::Contains,
            min_chars: 0,
            selection: SelectionMode::Single,
            auto_active_first_option: false,
            open_on_input: true,
            wrap: WrapMode::Scope,
        }
    }
}

/// A state change reported by a mutating [`ComboboxController`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComboboxEvent<V> {
    /// The query text changed.
    QueryChanged(String),
    /// The panel opened.
    Opened,
    /// The panel closed.
    Closed,
    /// The active option changed; carries its source index.
    ActiveChanged(Option<usize>),
    /// A value was committed.
    Committed(V),
}

/// Events produced by one call, in the order they happened.
pub type ComboboxEvents<V> = SmallVec<[ComboboxEvent<V>; 4]>;

/// Query filtering, open state, active-option tracking, and commit.
///
/// The panel is open only while the control is enabled, focused, and the
/// normalized query has at least [`ComboboxConfig::min_chars`] characters.
/// The active option is tracked by source index and always refers to an
/// enabled option in the current filtered list; when refiltering drops it, it
/// clears instead of jumping elsewhere.
///
/// ```
/// use trellis_combobox::{ComboboxConfig, ComboboxController, ComboboxEvent, ComboboxOption};
/// use trellis_focus::Step;
///
/// let mut cb = ComboboxController::new(
///     vec![
///         ComboboxOption::new('a', "Alpha"),
///         ComboboxOption::new('b', "Beta").disabled(),
///         ComboboxOption::new('c', "Gamma"),
///     ],
///     ComboboxConfig::default(),
/// )
/// .unwrap();
/// cb.set_focused(true);
/// cb.open();
/// cb.move_active(Step::Forward);
/// cb.move_active(Step::Forward);
/// let events = cb.commit_active();
/// assert!(events.contains(&ComboboxEvent::Committed('c')));
/// assert_eq!(cb.query(), "Gamma");
/// assert!(!cb.is_open());
/// ```
#[derive(Clone, Debug)]
pub struct ComboboxController<V> {
    options: Vec<ComboboxOption<V>>,
    config: ComboboxConfig,
    query: String,
    filtered: Vec<usize>,
    active: Option<usize>,
    value: Option<V>,
    open: bool,
    enabled: bool,
    focused: bool,
    query_dirty: bool,
}

impl<V: Clone + PartialEq> ComboboxController<V> {
    /// Create a controller. Fails for [`SelectionMode::Multiple`].
    pub fn new(
        options: Vec<ComboboxOption<V>>,
        config: ComboboxConfig,
    ) -> Result<Self, ComboboxError> {
        if config.selection == SelectionMode::Multiple {
            return Err(ComboboxError::MultipleSelectionUnsupported);
        }
        let filtered = filter(&options, "", config.filter_mode);
        Ok(Self {
            options,
            config,
            query: String::new(),
            filtered,
            active: None,
            value: None,
            open: false,
            enabled: true,
            focused: false,
            query_dirty: false,
        })
    }

    // --- accessors ---

    /// The configuration.
    pub fn config(&self) -> &ComboboxConfig {
        &self.config
    }

    /// Source options.
    pub fn options(&self) -> &[ComboboxOption<V>] {
        &self.options
    }

    /// Current query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Source indices of the options matching the query, in source order.
    pub fn filtered(&self) -> &[usize] {
        &self.filtered
    }

    /// Iterate over the filtered options with their source indices.
    pub fn filtered_options(&self) -> impl Iterator<Item = (usize, &ComboboxOption<V>)> + '_ {
        self.filtered.iter().map(|&i| (i, &self.options[i]))
    }

    /// Source index of the active option.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Position of the active option within [`filtered`](Self::filtered).
    pub fn active_position(&self) -> Option<usize> {
        let active = self.active?;
        self.filtered.iter().position(|&i| i == active)
    }

    /// The active option.
    pub fn active_option(&self) -> Option<&ComboboxOption<V>> {
        self.options.get(self.active?)
    }

    /// The committed value.
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Returns true if the panel is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns true if the control is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns true if the control has focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Returns true if the query was edited since the last commit or external write.
    pub fn is_query_dirty(&self) -> bool {
        self.query_dirty
    }

    /// Returns true if gating currently allows the panel to be open.
    pub fn can_open(&self) -> bool {
        self.enabled
            && self.focused
            && normalize(&self.query).chars().count() >= self.config.min_chars
    }

    // --- mutations ---

    /// Replace the query with user-entered text.
    ///
    /// Refilters, repairs the active option, closes the panel if the query fell
    /// below the minimum length, and opens it if [`ComboboxConfig::open_on_input`]
    /// is set and gating allows. The query stays decoupled from the committed value
    /// until the next commit.
    pub fn set_query(&mut self, text: &str) -> ComboboxEvents<V> {
        let mut events = ComboboxEvents::new();
        if self.query == text {
            return events;
        }
        self.query_dirty = true;
        self.replace_query(text, &mut events);
        if !self.open && self.config.open_on_input {
            self.open_into(&mut events);
        }
        events
    }

    /// Open the panel. No-op when gating forbids it or it is already open.
    pub fn open(&mut self) -> ComboboxEvents<V> {
        let mut events = ComboboxEvents::new();
        self.open_into(&mut events);
        events
    }

    /// Close the panel and clear the active option.
    pub fn close(&mut self) -> ComboboxEvents<V> {
        let mut events = ComboboxEvents::new();
        self.close_into(&mut events);
        events
    }

    /// Set whether the control has focus. Losing focus closes the panel.
    pub fn set_focused(&mut self, focused: bool) -> ComboboxEvents<V> {
        let mut events = ComboboxEvents::new();
        self.focused = focused;
        if !focused {
            self.close_into(&mut events);
        }
        events
    }

    /// Enable or disable the control. Disabling closes the panel.
    pub fn set_enabled(&mut self, enabled: bool) -> ComboboxEvents<V> {
        let mut events = ComboboxEvents::new();
        self.enabled = enabled;
        if !enabled {
            self.close_into(&mut events);
        }
        events
    }

    /// Replace the source options, refilter, and repair the active option.
    pub fn set_options(&mut self, options: Vec<ComboboxOption<V>>) -> ComboboxEvents<V> {
        let mut events = ComboboxEvents::new();
        // Source indices are meaningless across a replacement; follow the value.
        let active_value = self.active_option().map(|o| o.value.clone());
        self.options = options;
        self.filtered = filter(&self.options, &self.query, self.config.filter_mode);
        let carried = active_value.and_then(|v| {
            self.filtered
                .iter()
                .copied()
                .find(|&i| self.options[i].value == v && !self.options[i].disabled)
        });
        self.set_active_into(carried, &mut events);
        if self.open {
            self.auto_activate(&mut events);
        }
        events
    }

    /// Step the active option over the filtered list, skipping disabled options.
    ///
    /// With no active option, forward selects the first enabled option and backward
    /// the last. No-op while the panel is closed or when nothing is enabled.
    pub fn move_active(&mut self, step: Step) -> ComboboxEvents<V> {
        let mut events = ComboboxEvents::new();
        if !self.open {
            return events;
        }
        let next = step_enabled(
            self.filtered.len(),
            self.active_position(),
            step,
            self.config.wrap,
            |p| self.is_enabled_at(p),
        );
        if let Some(pos) = next {
            self.set_active_into(Some(self.filtered[pos]), &mut events);
        }
        events
    }

    /// Make the first enabled filtered option active.
    pub fn move_active_to_first(&mut self) -> ComboboxEvents<V> {
        let mut events = ComboboxEvents::new();
        if self.open
            && let Some(pos) = first_enabled(self.filtered.len(), |p| self.is_enabled_at(p))
        {
            self.set_active_into(Some(self.filtered[pos]), &mut events);
        }
        events
    }

    /// Make the last enabled filtered option active.
    pub fn move_active_to_last(&mut self) -> ComboboxEvents<V> {
        let mut events = ComboboxEvents::new();
        if self.open
            && let Some(pos) = last_enabled(self.filtered.len(), |p| self.is_enabled_at(p))
        {
            self.set_active_into(Some(self.filtered[pos]), &mut events);
        }
        events
    }

    /// Make the option at `source_index` active (pointer hover, typeahead).
    ///
    /// Ignored unless the panel is open and the option is filtered in and enabled.
    pub fn set_active(&mut self, source_index: usize) -> ComboboxEvents<V> {
        let mut events = ComboboxEvents::new();
        if self.open && self.is_selectable(source_index) {
            self.set_active_into(Some(source_index), &mut events);
        }
        events
    }

    /// Commit the active option.
    ///
    /// Sets the value, forces the query to the option's label, and closes the
    /// panel. No-op when no enabled option is active.
    pub fn commit_active(&mut self) -> ComboboxEvents<V> {
        let mut events = ComboboxEvents::new();
        let Some(index) = self.active.filter(|&i| self.is_selectable(i)) else {
            return events;
        };
        let option = &self.options[index];
        let value = option.value.clone();
        let label = option.label.clone();
        tracing::debug!(index, label = %label, "combobox commit");
        self.value = Some(value.clone());
        events.push(ComboboxEvent::Committed(value));
        self.query_dirty = false;
        self.replace_query(&label, &mut events);
        self.close_into(&mut events);
        events
    }

    /// Write a value from outside (form binding).
    ///
    /// The query becomes the label of the first option whose value equals `value`,
    /// or empty when none does. The panel is not opened.
    pub fn write_external_value(&mut self, value: Option<V>) -> ComboboxEvents<V> {
        let mut events = ComboboxEvents::new();
        let label = value
            .as_ref()
            .and_then(|v| self.options.iter().find(|o| &o.value == v))
            .map(|o| o.label.clone())
            .unwrap_or_default();
        self.value = value;
        self.query_dirty = false;
        self.replace_query(&label, &mut events);
        events
    }

    // --- internals ---

    fn is_enabled_at(&self, position: usize) -> bool {
        self.filtered
            .get(position)
            .is_some_and(|&i| !self.options[i].disabled)
    }

    fn is_selectable(&self, source_index: usize) -> bool {
        self.options
            .get(source_index)
            .is_some_and(|o| !o.disabled)
            && self.filtered.contains(&source_index)
    }

    fn replace_query(&mut self, text: &str, events: &mut ComboboxEvents<V>) {
        if self.query != text {
            self.query = String::from(text);
            events.push(ComboboxEvent::QueryChanged(self.query.clone()));
        }
        self.filtered = filter(&self.options, &self.query, self.config.filter_mode);
        let keep = self.active.filter(|&i| self.is_selectable(i));
        self.set_active_into(keep, events);
        if self.open {
            if self.can_open() {
                self.auto_activate(events);
            } else {
                self.close_into(events);
            }
        }
    }

    fn open_into(&mut self, events: &mut ComboboxEvents<V>) {
        if self.open || !self.can_open() {
            return;
        }
        self.open = true;
        events.push(ComboboxEvent::Opened);
        self.auto_activate(events);
    }

    fn close_into(&mut self, events: &mut ComboboxEvents<V>) {
        if !self.open {
            return;
        }
        self.open = false;
        self.set_active_into(None, events);
        events.push(ComboboxEvent::Closed);
    }

    fn auto_activate(&mut self, events: &mut ComboboxEvents<V>) {
        if !self.config.auto_active_first_option || self.active.is_some() {
            return;
        }
        if let Some(pos) = first_enabled(self.filtered.len(), |p| self.is_enabled_at(p)) {
            self.set_active_into(Some(self.filtered[pos]), events);
        }
    }

    fn set_active_into(&mut self, active: Option<usize>, events: &mut ComboboxEvents<V>) {
        if self.active != active {
            tracing::trace!(from = ?self.active, to = ?active, "combobox active option");
            self.active = active;
            events.push(ComboboxEvent::ActiveChanged(active));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn greek() -> ComboboxController<char> {
        ComboboxController::new(
            vec![
                ComboboxOption::new('a', "Alpha"),
                ComboboxOption::new('b', "Beta").disabled(),
                ComboboxOption::new('c', "Gamma"),
            ],
            ComboboxConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn commit_round_trip_skips_disabled() {
        let mut cb = greek();
        cb.set_focused(true);
        assert_eq!(cb.open().as_slice(), &[ComboboxEvent::Opened]);
        cb.move_active(Step::Forward);
        assert_eq!(cb.active(), Some(0));
        cb.move_active(Step::Forward);
        assert_eq!(cb.active(), Some(2), "Beta is skipped");

        let events = cb.commit_active();
        assert_eq!(
            events.as_slice(),
            &[
                ComboboxEvent::Committed('c'),
                ComboboxEvent::QueryChanged("Gamma".into()),
                ComboboxEvent::ActiveChanged(None),
                ComboboxEvent::Closed,
            ]
        );
        assert_eq!(cb.value(), Some(&'c'));
        assert_eq!(cb.query(), "Gamma");
        assert!(!cb.is_open());
        assert!(!cb.is_query_dirty());
    }

    #[test]
    fn typing_after_commit_does_not_recommit() {
        let mut cb = greek();
        cb.set_focused(true);
        cb.open();
        cb.move_active_to_last();
        cb.commit_active();

        let events = cb.set_query("Gam");
        assert!(!events.iter().any(|e| matches!(e, ComboboxEvent::Committed(_))));
        assert_eq!(cb.value(), Some(&'c'), "value unchanged by editing");
        assert!(cb.is_query_dirty());
        assert!(cb.is_open(), "typing reopens");
    }

    #[test]
    fn open_requires_enabled_focus_and_min_chars() {
        let mut cb = ComboboxController::new(
            vec![ComboboxOption::new(1, "one"), ComboboxOption::new(2, "two")],
            ComboboxConfig {
                min_chars: 2,
                ..ComboboxConfig::default()
            },
        )
        .unwrap();
        assert!(cb.open().is_empty(), "not focused");
        cb.set_focused(true);
        cb.set_query("o");
        assert!(!cb.is_open(), "below minimum");
        cb.set_query(" on ");
        assert!(cb.is_open());

        let events = cb.set_query("o");
        assert!(events.contains(&ComboboxEvent::Closed), "shrinking below the minimum closes");

        cb.set_query("tw");
        assert!(cb.is_open());
        cb.set_enabled(false);
        assert!(!cb.is_open());
        assert!(cb.open().is_empty());
        cb.set_enabled(true);
        cb.open();
        cb.set_focused(false);
        assert!(!cb.is_open(), "blur closes");
    }

    #[test]
    fn refilter_clears_active_instead_of_snapping() {
        let mut cb = ComboboxController::new(
            vec![
                ComboboxOption::new(0, "Red"),
                ComboboxOption::new(1, "Green"),
                ComboboxOption::new(2, "Blue"),
            ],
            ComboboxConfig::default(),
        )
        .unwrap();
        cb.set_focused(true);
        cb.open();
        cb.move_active(Step::Backward);
        assert_eq!(cb.active(), Some(2));

        let events = cb.set_query("e");
        assert_eq!(cb.filtered(), &[0, 1, 2]);
        assert_eq!(cb.active(), Some(2), "still present");
        assert!(!events.iter().any(|e| matches!(e, ComboboxEvent::ActiveChanged(_))));

        cb.set_query("re");
        assert_eq!(cb.filtered(), &[0, 1]);
        assert_eq!(cb.active(), None);
        assert_eq!(cb.active_position(), None);
    }

    #[test]
    fn auto_active_first_option_follows_filtering() {
        let mut cb = ComboboxController::new(
            vec![
                ComboboxOption::new(0, "Oslo").disabled(),
                ComboboxOption::new(1, "Ottawa"),
                ComboboxOption::new(2, "Paris"),
            ],
            ComboboxConfig {
                auto_active_first_option: true,
                filter_mode: FilterMode::StartsWith,
                ..ComboboxConfig::default()
            },
        )
        .unwrap();
        cb.set_focused(true);
        cb.open();
        assert_eq!(cb.active(), Some(1));
        cb.set_query("p");
        assert_eq!(cb.active(), Some(2));
        cb.set_query("x");
        assert_eq!(cb.active(), None);
        assert!(cb.commit_active().is_empty(), "nothing to commit");
    }

    #[test]
    fn move_active_respects_wrap_mode_and_closed_panel() {
        let mut cb = ComboboxController::new(
            vec![ComboboxOption::new(0, "a"), ComboboxOption::new(1, "b")],
            ComboboxConfig {
                wrap: WrapMode::Never,
                ..ComboboxConfig::default()
            },
        )
        .unwrap();
        assert!(cb.move_active(Step::Forward).is_empty(), "closed panel");
        cb.set_focused(true);
        cb.open();
        cb.move_active(Step::Forward);
        cb.move_active(Step::Forward);
        assert_eq!(cb.active(), Some(1));
        assert!(cb.move_active(Step::Forward).is_empty());
        assert_eq!(cb.active(), Some(1), "no wrap");
    }

    #[test]
    fn set_active_ignores_disabled_and_filtered_out() {
        let mut cb = greek();
        cb.set_focused(true);
        cb.open();
        assert!(cb.set_active(1).is_empty());
        cb.set_query("al");
        assert!(cb.set_active(2).is_empty());
        assert_eq!(cb.set_active(0).as_slice(), &[ComboboxEvent::ActiveChanged(Some(0))]);
        assert_eq!(cb.active_option().map(|o| o.label.as_str()), Some("Alpha"));
    }

    #[test]
    fn external_write_sets_query_without_opening() {
        let mut cb = greek();
        cb.set_focused(true);
        let events = cb.write_external_value(Some('a'));
        assert_eq!(events.as_slice(), &[ComboboxEvent::QueryChanged("Alpha".into())]);
        assert!(!cb.is_open());
        assert_eq!(cb.value(), Some(&'a'));

        cb.write_external_value(Some('z'));
        assert_eq!(cb.query(), "");
        assert_eq!(cb.value(), Some(&'z'));
        cb.write_external_value(None);
        assert_eq!(cb.value(), None);
    }

    #[test]
    fn set_options_follows_active_value() {
        let mut cb = greek();
        cb.set_focused(true);
        cb.open();
        cb.move_active_to_last();
        assert_eq!(cb.active(), Some(2));
        cb.set_options(vec![
            ComboboxOption::new('c', "Gamma"),
            ComboboxOption::new('d', "Delta"),
        ]);
        assert_eq!(cb.active(), Some(0));
        cb.set_options(vec![ComboboxOption::new('d', "Delta")]);
        assert_eq!(cb.active(), None);
    }

    #[test]
    fn multiple_selection_is_rejected() {
        let result = ComboboxController::<u8>::new(
            vec![],
            ComboboxConfig {
                selection: SelectionMode::Multiple,
                ..ComboboxConfig::default()
            },
        );
        assert_eq!(result.err(), Some(ComboboxError::MultipleSelectionUnsupported));
    }
}
