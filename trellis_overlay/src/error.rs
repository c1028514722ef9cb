// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use trellis_dom::{DomError, ElementId, ParseZIndexError};

/// Errors raised when attaching or configuring an overlay.
///
/// Transient conditions (an anchor that disconnects after attach, closing a
/// closed handle) are not errors; they degrade to hidden or no-op states.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OverlayError {
    /// The anchor refers to a destroyed element.
    #[error("overlay anchor {0:?} is stale")]
    StaleAnchor(ElementId),
    /// The anchor exists but is not connected to the document.
    #[error("overlay anchor {0:?} is not connected to the document")]
    AnchorDisconnected(ElementId),
    /// The configured z-index string is neither `"auto"` nor an integer.
    #[error(transparent)]
    InvalidZIndex(#[from] ParseZIndexError),
    /// Building the container failed.
    #[error(transparent)]
    Dom(#[from] DomError),
}
