// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pure option filtering.

use alloc::string::String;
use alloc::vec::Vec;

/// One selectable option: an opaque value plus its accessible label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComboboxOption<V> {
    /// Value committed when this option is chosen.
    pub value: V,
    /// Text shown in the panel and written to the query on commit.
    pub label: String,
    /// Disabled options are listed but never become active or committed.
    pub disabled: bool,
}

impl<V> ComboboxOption<V> {
    /// Create an enabled option.
    pub fn new(value: V, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
            disabled: false,
        }
    }

    /// Mark the option disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// How a query matches a label.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FilterMode {
    /// The normalized label contains the normalized query.
    #[default]
    Contains,
    /// The normalized label starts with the normalized query.
    StartsWith,
}

impl FilterMode {
    /// Match already-normalized text.
    pub fn matches(self, label: &str, query: &str) -> bool {
        match self {
            Self::Contains => label.contains(query),
            Self::StartsWith => label.starts_with(query),
        }
    }
}

/// Trim surrounding whitespace and fold case.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Source indices of the options matching `query`, in source order.
///
/// An empty (or all-whitespace) query matches everything. Disabled options are
/// kept: they stay visible, they just cannot become active.
///
/// ```
/// use trellis_combobox::{filter, ComboboxOption, FilterMode};
///
/// let options = [
///     ComboboxOption::new(1, "Apple"),
///     ComboboxOption::new(2, "Banana"),
///     ComboboxOption::new(3, "Pineapple"),
/// ];
/// assert_eq!(filter(&options, " APP", FilterMode::Contains), [0, 2]);
/// assert_eq!(filter(&options, "app", FilterMode::StartsWith), [0]);
/// assert_eq!(filter(&options, "", FilterMode::StartsWith), [0, 1, 2]);
/// ```
pub fn filter<V>(options: &[ComboboxOption<V>], query: &str, mode: FilterMode) -> Vec<usize> {
    let query = normalize(query);
    if query.is_empty() {
        return (0..options.len()).collect();
    }
    options
        .iter()
        .enumerate()
        .filter(|(_, o)| mode.matches(&normalize(&o.label), &query))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn fruit() -> Vec<ComboboxOption<u8>> {
        vec![
            ComboboxOption::new(0, "Cherry"),
            ComboboxOption::new(1, "  banana "),
            ComboboxOption::new(2, "Blueberry").disabled(),
            ComboboxOption::new(3, "Blackberry"),
        ]
    }

    #[test]
    fn empty_query_is_identity() {
        let options = fruit();
        assert_eq!(filter(&options, "", FilterMode::Contains), [0, 1, 2, 3]);
        assert_eq!(filter(&options, "   ", FilterMode::Contains), [0, 1, 2, 3]);
    }

    #[test]
    fn filtering_is_pure_and_order_preserving() {
        let options = fruit();
        let snapshot = options.clone();
        let first = filter(&options, "BERRY", FilterMode::Contains);
        let second = filter(&options, "BERRY", FilterMode::Contains);
        assert_eq!(first, [2, 3]);
        assert_eq!(first, second);
        assert_eq!(options, snapshot, "source untouched");
    }

    #[test]
    fn starts_with_uses_trimmed_labels() {
        let options = fruit();
        assert_eq!(filter(&options, "b", FilterMode::StartsWith), [1, 2, 3]);
        assert_eq!(filter(&options, "ban", FilterMode::StartsWith), [1]);
        assert!(filter(&options, "erry", FilterMode::StartsWith).is_empty());
    }

    #[test]
    fn normalize_folds_case_and_trims() {
        assert_eq!(normalize("  MiXeD Case\t"), "mixed case");
        assert_eq!(normalize(""), "");
    }
}
