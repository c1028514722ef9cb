// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Invalid combobox configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ComboboxError {
    /// The controller commits a single value; multi-select widgets track their
    /// own selection set.
    #[error("combobox does not support multiple selection")]
    MultipleSelectionUnsupported,
}
