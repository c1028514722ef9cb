// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::types::ElementId;

/// Structural errors raised by [`Document`](crate::Document) mutations.
///
/// These are programmer errors (wiring a stale id, building a cycle); transient
/// conditions such as a disconnected element are reported through `Option`/`bool`
/// instead.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The identifier refers to a destroyed element.
    #[error("element {0:?} is stale")]
    StaleElement(ElementId),
    /// Appending `child` under `parent` would make an element its own ancestor.
    #[error("appending {child:?} under {parent:?} would create a cycle")]
    WouldCycle {
        /// Requested parent.
        parent: ElementId,
        /// Requested child.
        child: ElementId,
    },
    /// The document body cannot be moved or destroyed.
    #[error("the document body cannot be reparented or destroyed")]
    BodyIsPermanent,
}
