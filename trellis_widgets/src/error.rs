// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use trellis_combobox::ComboboxError;
use trellis_dom::{DomError, ElementId};
use trellis_overlay::OverlayError;

/// Errors raised when building or opening a widget.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WidgetError {
    /// Attaching the widget's overlay failed.
    #[error(transparent)]
    Overlay(#[from] OverlayError),
    /// The widget's combobox configuration is invalid.
    #[error(transparent)]
    Combobox(#[from] ComboboxError),
    /// Building the widget's markup failed.
    #[error(transparent)]
    Dom(#[from] DomError),
    /// An element handed to the widget has been destroyed.
    #[error("widget element {0:?} is stale")]
    StaleElement(ElementId),
    /// The widget needs at least one item.
    #[error("{0} needs at least one item")]
    Empty(&'static str),
    /// Parallel element and value lists have different lengths.
    #[error("{elements} elements but {values} values")]
    LengthMismatch {
        /// Number of elements supplied.
        elements: usize,
        /// Number of values supplied.
        values: usize,
    },
    /// A single-selection widget was given more than one value.
    #[error("single selection cannot hold {0} values")]
    TooManyValues(usize),
}
