// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher helper: walk a dispatch sequence and honor stop outcomes.
//!
//! [`Outcome`] only controls propagation. Higher-level semantics such as
//! "handled" or "default prevented" live on the event payload passed to [`run`].
//!
//! Sequences come from [`ListenerSet::route`](crate::ListenerSet::route). Listeners
//! removed while the sequence is running are skipped, so a handler may tear down
//! its owner (and every listener it installed) mid-dispatch.
//!
//! ```
//! use kurbo::Size;
//! use trellis_dom::Document;
//! use trellis_events::{dispatcher, EventKind, ListenerSet, ListenerTarget, Outcome, UiEvent};
//!
//! let doc = Document::new(Size::new(10.0, 10.0));
//! let mut set = ListenerSet::<u8>::new();
//! set.add(1, ListenerTarget::Window, EventKind::Resize, false);
//! set.add(2, ListenerTarget::Window, EventKind::Resize, false);
//!
//! let seq = set.route(&doc, &UiEvent::Resize);
//! let mut seen = Vec::new();
//! let stopped = dispatcher::run(&seq, &mut set, |d, set| {
//!     seen.push(d.owner);
//!     // The first owner tears down the second before it runs.
//!     set.remove_owner(2);
//!     Outcome::Continue
//! });
//! assert!(stopped.is_none());
//! assert_eq!(seen, [1]);
//! ```

use crate::listeners::ListenerSet;
use crate::types::{Dispatch, Outcome};

/// Run `handler` over `seq`, honoring [`Outcome::Stop`] and skipping listeners
/// that are no longer live in `listeners`.
///
/// Returns the entry where propagation stopped, or `None` if the sequence ran
/// to completion.
pub fn run<'a, O: Copy + PartialEq>(
    seq: &'a [Dispatch<O>],
    listeners: &mut ListenerSet<O>,
    mut handler: impl FnMut(&Dispatch<O>, &mut ListenerSet<O>) -> Outcome,
) -> Option<&'a Dispatch<O>> {
    for d in seq {
        if !listeners.is_live(d.listener) {
            continue;
        }
        match handler(d, listeners) {
            Outcome::Continue => {}
            Outcome::Stop => return Some(d),
        }
    }
    None
}
