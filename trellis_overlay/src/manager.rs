// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay lifecycle: attach, position, dismiss.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use hashbrown::HashMap;
use kurbo::Size;
use smallvec::SmallVec;
use trellis_dom::{Document, ElementData, ElementId};
use trellis_event_state::frame::FrameCoalescer;
use trellis_events::{
    EventKind, Key, ListenerSet, ListenerTarget, Outcome, UiEvent, dispatcher,
};

use crate::config::OverlayConfig;
use crate::error::OverlayError;
use crate::position::{PositionState, apply_position, compute_position};

/// Class name every overlay container carries.
pub const CONTAINER_CLASS: &str = "trellis-overlay-pane";

/// Handle to an attached overlay. Handles are never reused by a manager.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayHandle(u64);

impl fmt::Display for OverlayHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "overlay#{}", self.0)
    }
}

/// Why an overlay closed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DismissReason {
    /// Pointer-down outside the container and the anchor.
    OutsidePointer,
    /// Unmodified `Escape`.
    Escape,
    /// [`OverlayManager::close`] or [`OverlayManager::close_all`].
    Explicit,
    /// The anchor was destroyed, or its owner tore down through
    /// [`OverlayManager::close_anchored_to`].
    AnchorRemoved,
}

/// An overlay that closed while processing an event or frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dismissed {
    /// The closed handle.
    pub handle: OverlayHandle,
    /// What closed it.
    pub reason: DismissReason,
    /// The anchor it was attached to.
    pub anchor: ElementId,
}

/// Dismissals produced by one call. Usually zero or one.
pub type Dismissals = SmallVec<[Dismissed; 2]>;

struct Instance {
    anchor: ElementId,
    container: ElementId,
    content: Option<Box<dyn Any>>,
    config: OverlayConfig,
    position: PositionState,
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("anchor", &self.anchor)
            .field("container", &self.container)
            .field("has_content", &self.content.is_some())
            .field("config", &self.config)
            .field("position", &self.position)
            .finish()
    }
}

/// Owns every open overlay, its container element, and its listeners.
///
/// Event flow: the host forwards each [`UiEvent`] to
/// [`OverlayManager::handle_event`] and calls
/// [`OverlayManager::on_animation_frame`] once per frame. Both report the overlays
/// they closed, so widgets can react (restore focus, update ARIA state).
///
/// Stacking: containers are appended to the body in attach order, so a later
/// overlay paints and hit-tests above an earlier one unless an explicit
/// [`ZIndex`](trellis_dom::ZIndex) says otherwise. A pointer-down inside a
/// later-attached overlay does not count as "outside" for earlier ones, so a
/// panel opened from inside a dialog does not dismiss the dialog.
#[derive(Debug, Default)]
pub struct OverlayManager {
    instances: HashMap<OverlayHandle, Instance>,
    stack: Vec<OverlayHandle>,
    listeners: ListenerSet<OverlayHandle>,
    frames: FrameCoalescer<OverlayHandle>,
    next_handle: u64,
    position_updates: u64,
}

impl OverlayManager {
    /// Create a manager with no open overlays.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an overlay to `anchor`.
    ///
    /// Creates a container under the body, mounts content through `render`,
    /// installs the dismissal and repositioning listeners the configuration calls
    /// for, positions the container immediately, and schedules a recomputation for
    /// the next animation frame.
    ///
    /// If `render` fails the error is logged and the overlay stays open without
    /// content; its container is still removed on close.
    pub fn attach<C, E>(
        &mut self,
        doc: &mut Document,
        anchor: ElementId,
        config: OverlayConfig,
        render: impl FnOnce(&mut Document, ElementId) -> Result<C, E>,
    ) -> Result<OverlayHandle, OverlayError>
    where
        C: Any,
        E: fmt::Display,
    {
        if !doc.is_alive(anchor) {
            return Err(OverlayError::StaleAnchor(anchor));
        }
        if !doc.is_connected(anchor) {
            return Err(OverlayError::AnchorDisconnected(anchor));
        }

        self.next_handle += 1;
        let handle = OverlayHandle(self.next_handle);

        let mut data = ElementData::new("div").with_class(CONTAINER_CLASS);
        for class in &config.panel_class_names {
            data = data.with_class(class);
        }
        let container = doc.create_element(data);
        if let Err(err) = doc.append_child(doc.body(), container) {
            doc.destroy(container);
            return Err(err.into());
        }
        doc.set_z_index(container, config.z_index);

        let content = match render(doc, container) {
            Ok(content) => Some(Box::new(content) as Box<dyn Any>),
            Err(err) => {
                tracing::warn!(%handle, error = %err, "overlay content failed to render");
                None
            }
        };

        if config.close_on_outside_pointer_down {
            self.listeners
                .add(handle, ListenerTarget::Document, EventKind::PointerDown, true);
        }
        if config.close_on_escape {
            self.listeners
                .add(handle, ListenerTarget::Document, EventKind::KeyDown, true);
        }
        self.listeners
            .add(handle, ListenerTarget::Window, EventKind::Scroll, false);
        self.listeners
            .add(handle, ListenerTarget::Window, EventKind::Resize, false);

        self.instances.insert(
            handle,
            Instance {
                anchor,
                container,
                content,
                config,
                position: PositionState::Hidden,
            },
        );
        self.stack.push(handle);
        self.reposition(doc, handle);
        self.frames.mark(handle);
        tracing::debug!(%handle, ?anchor, ?container, "overlay attached");
        Ok(handle)
    }

    /// Close an overlay. Returns `false` if it was already closed.
    pub fn close(&mut self, doc: &mut Document, handle: OverlayHandle) -> bool {
        self.teardown(doc, handle, DismissReason::Explicit).is_some()
    }

    /// Close every open overlay, newest first. Returns how many closed.
    pub fn close_all(&mut self, doc: &mut Document) -> usize {
        let open: Vec<_> = self.stack.iter().rev().copied().collect();
        open.into_iter()
            .filter(|&h| self.teardown(doc, h, DismissReason::Explicit).is_some())
            .count()
    }

    /// Close every overlay anchored to `anchor` (the trigger is being torn down).
    pub fn close_anchored_to(&mut self, doc: &mut Document, anchor: ElementId) -> Dismissals {
        let owned: Vec<_> = self
            .stack
            .iter()
            .rev()
            .copied()
            .filter(|h| self.instances.get(h).is_some_and(|i| i.anchor == anchor))
            .collect();
        owned
            .into_iter()
            .filter_map(|h| self.teardown(doc, h, DismissReason::AnchorRemoved))
            .collect()
    }

    /// Route an event through the overlays' listeners.
    ///
    /// Pointer-downs outside an overlay close it when outside dismissal is enabled,
    /// unmodified `Escape` closes it when Escape dismissal is enabled, and
    /// scroll/resize schedule a repositioning for the next frame.
    pub fn handle_event(&mut self, doc: &mut Document, event: &UiEvent) -> Dismissals {
        let seq = self.listeners.route(doc, event);
        let mut closing: SmallVec<[(OverlayHandle, DismissReason); 2]> = SmallVec::new();
        {
            let instances = &self.instances;
            let stack = &self.stack;
            let frames = &mut self.frames;
            let doc_ref: &Document = doc;
            dispatcher::run(&seq, &mut self.listeners, |d, listeners| {
                let Some(inst) = instances.get(&d.owner) else {
                    return Outcome::Continue;
                };
                let reason = match event {
                    UiEvent::PointerDown(p) => {
                        let inside = doc_ref.contains(inst.container, p.target)
                            || doc_ref.contains(inst.anchor, p.target)
                            || inside_later_overlay(doc_ref, instances, stack, d.owner, p.target);
                        (!inside).then_some(DismissReason::OutsidePointer)
                    }
                    UiEvent::KeyDown { event: key, .. } => (key.key == Key::Escape
                        && key.is_plain())
                    .then_some(DismissReason::Escape),
                    UiEvent::Scroll | UiEvent::Resize => {
                        frames.mark(d.owner);
                        None
                    }
                };
                if let Some(reason) = reason {
                    // Drop the owner's remaining entries before anything else runs.
                    listeners.remove_owner(d.owner);
                    closing.push((d.owner, reason));
                }
                Outcome::Continue
            });
        }
        closing
            .into_iter()
            .filter_map(|(h, reason)| self.teardown(doc, h, reason))
            .collect()
    }

    /// Run coalesced repositioning: at most one recomputation per dirty overlay.
    ///
    /// Every open anchor is checked each frame, dirty or not. Overlays whose
    /// anchor has been destroyed are closed with [`DismissReason::AnchorRemoved`];
    /// an anchor that was detached or reattached since the last frame gets a
    /// recomputation, so a disconnected anchor hides the container until it
    /// reconnects.
    pub fn on_animation_frame(&mut self, doc: &mut Document) -> Dismissals {
        let mut dismissed = Dismissals::new();
        let open = self.stack.clone();
        for handle in open {
            let Some(inst) = self.instances.get(&handle) else {
                continue;
            };
            if !doc.is_alive(inst.anchor) {
                if let Some(d) = self.teardown(doc, handle, DismissReason::AnchorRemoved) {
                    dismissed.push(d);
                }
                continue;
            }
            let rendered = doc.bounding_client_rect(inst.anchor).is_some();
            let placed = matches!(inst.position, PositionState::Placed { .. });
            if rendered != placed {
                self.frames.mark(handle);
            }
        }
        for handle in self.frames.take() {
            let Some(inst) = self.instances.get(&handle) else {
                continue;
            };
            if doc.is_alive(inst.anchor) {
                self.reposition(doc, handle);
            } else if let Some(d) = self.teardown(doc, handle, DismissReason::AnchorRemoved) {
                dismissed.push(d);
            }
        }
        dismissed
    }

    /// Schedule a recomputation for the next frame, for example after the host
    /// moves or reconnects an anchor. Returns `false` for closed handles.
    pub fn request_reposition(&mut self, handle: OverlayHandle) -> bool {
        if !self.instances.contains_key(&handle) {
            return false;
        }
        self.frames.mark(handle);
        true
    }

    /// Schedule a recomputation of every open overlay.
    pub fn invalidate_all(&mut self) {
        for &h in &self.stack {
            self.frames.mark(h);
        }
    }

    /// Returns true if a repositioning is waiting for the next frame.
    pub fn has_pending_frame(&self) -> bool {
        self.frames.has_pending()
    }

    // --- accessors ---

    /// Returns true if the overlay is open.
    pub fn is_open(&self, handle: OverlayHandle) -> bool {
        self.instances.contains_key(&handle)
    }

    /// Returns true if the overlay has closed.
    pub fn is_closed(&self, handle: OverlayHandle) -> bool {
        !self.is_open(handle)
    }

    /// Number of open overlays.
    pub fn open_count(&self) -> usize {
        self.instances.len()
    }

    /// Open overlays in attach order (last is topmost by default).
    pub fn stack(&self) -> &[OverlayHandle] {
        &self.stack
    }

    /// The most recently attached open overlay.
    pub fn topmost(&self) -> Option<OverlayHandle> {
        self.stack.last().copied()
    }

    /// Anchor of an open overlay.
    pub fn anchor(&self, handle: OverlayHandle) -> Option<ElementId> {
        self.instances.get(&handle).map(|i| i.anchor)
    }

    /// Container of an open overlay.
    pub fn container(&self, handle: OverlayHandle) -> Option<ElementId> {
        self.instances.get(&handle).map(|i| i.container)
    }

    /// The open overlay whose container contains `element`, innermost (newest) first.
    pub fn overlay_containing(&self, doc: &Document, element: ElementId) -> Option<OverlayHandle> {
        self.stack.iter().rev().copied().find(|h| {
            self.instances
                .get(h)
                .is_some_and(|i| doc.contains(i.container, element))
        })
    }

    /// Configuration snapshot of an open overlay.
    pub fn config(&self, handle: OverlayHandle) -> Option<&OverlayConfig> {
        self.instances.get(&handle).map(|i| &i.config)
    }

    /// Last computed position of an open overlay.
    pub fn position(&self, handle: OverlayHandle) -> Option<PositionState> {
        self.instances.get(&handle).map(|i| i.position)
    }

    /// Returns true if content rendered successfully.
    pub fn has_content(&self, handle: OverlayHandle) -> bool {
        self.instances
            .get(&handle)
            .is_some_and(|i| i.content.is_some())
    }

    /// Borrow the content instance if it is a `T`.
    pub fn content<T: Any>(&self, handle: OverlayHandle) -> Option<&T> {
        self.instances
            .get(&handle)?
            .content
            .as_ref()?
            .downcast_ref::<T>()
    }

    /// Mutably borrow the content instance if it is a `T`.
    pub fn content_mut<T: Any>(&mut self, handle: OverlayHandle) -> Option<&mut T> {
        self.instances
            .get_mut(&handle)?
            .content
            .as_mut()?
            .downcast_mut::<T>()
    }

    /// Total installed listeners across all open overlays.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Listeners installed by one overlay (zero once closed).
    pub fn listener_count_for(&self, handle: OverlayHandle) -> usize {
        self.listeners.count_for(handle)
    }

    /// Number of position recomputations performed so far.
    pub fn position_updates(&self) -> u64 {
        self.position_updates
    }

    // --- internals ---

    fn reposition(&mut self, doc: &mut Document, handle: OverlayHandle) {
        let Some(inst) = self.instances.get_mut(&handle) else {
            return;
        };
        let anchor = doc.bounding_client_rect(inst.anchor);
        let content = doc
            .local_bounds(inst.container)
            .map_or(Size::ZERO, |r| r.size());
        let state = compute_position(&inst.config, anchor, doc.viewport().size, content);
        apply_position(doc, inst.container, state);
        if state != inst.position {
            tracing::trace!(%handle, ?state, "overlay repositioned");
        }
        inst.position = state;
        self.position_updates += 1;
    }

    fn teardown(
        &mut self,
        doc: &mut Document,
        handle: OverlayHandle,
        reason: DismissReason,
    ) -> Option<Dismissed> {
        let inst = self.instances.remove(&handle)?;
        self.listeners.remove_owner(handle);
        self.frames.forget(handle);
        self.stack.retain(|&h| h != handle);
        doc.destroy(inst.container);
        tracing::debug!(%handle, ?reason, "overlay closed");
        Some(Dismissed {
            handle,
            reason,
            anchor: inst.anchor,
        })
    }
}

fn inside_later_overlay(
    doc: &Document,
    instances: &HashMap<OverlayHandle, Instance>,
    stack: &[OverlayHandle],
    owner: OverlayHandle,
    target: ElementId,
) -> bool {
    let Some(pos) = stack.iter().position(|&h| h == owner) else {
        return false;
    };
    stack[pos + 1..].iter().any(|h| {
        instances
            .get(h)
            .is_some_and(|i| doc.contains(i.container, target))
    })
}
