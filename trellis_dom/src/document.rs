// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, focus, style, and queries.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::error::DomError;
use crate::types::{Display, ElementData, ElementFlags, ElementId, Style, ZIndex};
use crate::util::{transform_rect_bbox, with_width};

/// Size and scroll offset of the visible area.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Visible size in client coordinates.
    pub size: Size,
    /// Document scroll offset. Non-fixed elements move by `-scroll` in client space.
    pub scroll: Vec2,
}

#[derive(Clone, Debug)]
struct Element {
    generation: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    data: ElementData,
    style: Style,
}

impl Element {
    fn new(generation: u32, data: ElementData) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            data,
            style: Style::default(),
        }
    }
}

/// The host element tree.
///
/// A `Document` owns every element, a permanent `body` root, the viewport, and
/// the active (focused) element. Elements created with
/// [`Document::create_element`] start detached; they become *connected* once an
/// ancestor chain links them to [`Document::body`].
///
/// Geometry is computed on demand: [`Document::bounding_client_rect`] folds the
/// local transforms from the body (or the nearest fixed-positioned ancestor) down
/// to the element each time it is called, so there is no commit step.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Rect, Size};
/// use trellis_dom::{Document, ElementData};
///
/// let mut doc = Document::new(Size::new(800.0, 600.0));
/// let button = doc.create_element(
///     ElementData::new("button")
///         .focusable()
///         .with_bounds(Rect::new(10.0, 10.0, 90.0, 30.0)),
/// );
/// assert!(!doc.is_connected(button));
///
/// doc.append_child(doc.body(), button).unwrap();
/// assert!(doc.focus(button));
/// assert_eq!(doc.active_element(), button);
/// assert_eq!(
///     doc.bounding_client_rect(button),
///     Some(Rect::new(10.0, 10.0, 90.0, 30.0))
/// );
/// ```
pub struct Document {
    /// slots
    elements: Vec<Option<Element>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    body: ElementId,
    active: Option<ElementId>,
    viewport: Viewport,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Document")
            .field("elements_total", &self.elements.len())
            .field("elements_alive", &self.element_count())
            .field("free_list", &self.free_list.len())
            .field("body", &self.body)
            .field("active", &self.active)
            .field("viewport", &self.viewport)
            .finish()
    }
}

impl Document {
    /// Create an empty document whose body fills a viewport of the given size.
    pub fn new(viewport_size: Size) -> Self {
        let mut doc = Self {
            elements: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            body: ElementId::new(0, 1),
            active: None,
            viewport: Viewport {
                size: viewport_size,
                scroll: Vec2::ZERO,
            },
        };
        doc.body = doc.create_element(
            ElementData::new("body").with_bounds(Rect::from_origin_size(Point::ZERO, viewport_size)),
        );
        doc
    }

    /// The permanent root element.
    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Update the document scroll offset.
    pub fn set_scroll_offset(&mut self, scroll: Vec2) {
        self.viewport.scroll = scroll;
    }

    /// Update the viewport size. The body is resized to match.
    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport.size = size;
        let body = self.body;
        if let Some(el) = self.element_mut(body) {
            el.data.local_bounds = Rect::from_origin_size(Point::ZERO, size);
        }
    }

    /// Number of live elements, including the body.
    pub fn element_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_some()).count()
    }

    // --- structure ---

    /// Create a detached element.
    pub fn create_element(&mut self, data: ElementData) -> ElementId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.elements[idx] = Some(Element::new(generation, data));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.elements.push(Some(Element::new(generation, data)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            ((self.elements.len() - 1) as u32, generation)
        };
        ElementId::new(idx, generation)
    }

    /// Append `child` as the last child of `parent`, moving it if it already has a parent.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), DomError> {
        if !self.is_alive(parent) {
            return Err(DomError::StaleElement(parent));
        }
        if !self.is_alive(child) {
            return Err(DomError::StaleElement(child));
        }
        if child == self.body {
            return Err(DomError::BodyIsPermanent);
        }
        if self.contains(child, parent) {
            return Err(DomError::WouldCycle { parent, child });
        }
        self.unlink_parent(child);
        if let Some(p) = self.element_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.element_mut(child) {
            c.parent = Some(parent);
        }
        Ok(())
    }

    /// Remove `id` from its parent, keeping it (and its subtree) alive.
    ///
    /// If the active element was inside the detached subtree, focus falls back to
    /// the body. Returns `false` for stale ids, the body, and already-detached roots.
    pub fn detach(&mut self, id: ElementId) -> bool {
        if id == self.body || self.parent_of(id).is_none() {
            return false;
        }
        self.release_focus_within(id);
        self.unlink_parent(id);
        true
    }

    /// Destroy an element and its subtree.
    ///
    /// Returns `false` for stale ids and for the body; destroying twice is a no-op.
    pub fn destroy(&mut self, id: ElementId) -> bool {
        if id == self.body || !self.is_alive(id) {
            return false;
        }
        self.release_focus_within(id);
        self.unlink_parent(id);
        let doomed = {
            let mut all = self.descendants(id);
            all.push(id);
            all
        };
        for el in doomed {
            self.elements[el.idx()] = None;
            self.free_list.push(el.idx());
        }
        true
    }

    /// Returns true if `id` refers to a live element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.element(id).is_some()
    }

    /// Returns true if `id` is live and linked to the body through its ancestors.
    pub fn is_connected(&self, id: ElementId) -> bool {
        self.is_alive(id) && self.ancestors_or_self(id).last() == Some(self.body)
    }

    /// Returns true if `node` is `ancestor` or one of its descendants.
    ///
    /// Stale ids are contained by nothing.
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        if !self.is_alive(ancestor) || !self.is_alive(node) {
            return false;
        }
        self.ancestors_or_self(node).any(|a| a == ancestor)
    }

    /// Returns the parent of a live element, or `None` for roots and stale ids.
    pub fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.element(id).and_then(|el| el.parent)
    }

    /// Get the children of an element, or an empty slice if the element is stale.
    pub fn children_of(&self, id: ElementId) -> &[ElementId] {
        self.element(id).map(|el| el.children.as_slice()).unwrap_or(&[])
    }

    /// Iterate `id` and its ancestors, innermost first.
    pub fn ancestors_or_self(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        let start = self.is_alive(id).then_some(id);
        core::iter::successors(start, move |cur| self.parent_of(*cur))
    }

    /// The path from the outermost ancestor down to `id` (inclusive).
    pub fn path_from_root(&self, id: ElementId) -> Vec<ElementId> {
        let mut path: Vec<ElementId> = self.ancestors_or_self(id).collect();
        path.reverse();
        path
    }

    /// All descendants of `root` in document (depth-first, pre-order) order,
    /// excluding `root` itself.
    pub fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children_of(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            // Reverse so children are visited in the order they are stored.
            stack.extend(self.children_of(id).iter().rev().copied());
        }
        out
    }

    /// Get the next element in depth-first traversal order.
    ///
    /// Returns `None` at the end of the traversal or if `current` is stale.
    /// This does not wrap around.
    pub fn next_depth_first(&self, current: ElementId) -> Option<ElementId> {
        if let Some(&first_child) = self.children_of(current).first() {
            return Some(first_child);
        }
        let mut node = current;
        while let Some(parent) = self.parent_of(node) {
            if let Some(next) = self.sibling(node, 1) {
                return Some(next);
            }
            node = parent;
        }
        None
    }

    /// Get the previous element in reverse depth-first traversal order.
    ///
    /// Returns `None` at the start of the traversal or if `current` is stale.
    pub fn prev_depth_first(&self, current: ElementId) -> Option<ElementId> {
        if let Some(mut node) = self.sibling(current, -1) {
            while let Some(&last) = self.children_of(node).last() {
                node = last;
            }
            return Some(node);
        }
        self.parent_of(current)
    }

    // --- element data ---

    /// Tag name of a live element.
    pub fn tag(&self, id: ElementId) -> Option<&str> {
        self.element(id).map(|el| el.data.tag.as_str())
    }

    /// Accessible name of a live element.
    pub fn label(&self, id: ElementId) -> Option<&str> {
        self.element(id).map(|el| el.data.label.as_str())
    }

    /// Replace the accessible name.
    pub fn set_label(&mut self, id: ElementId, label: &str) {
        if let Some(el) = self.element_mut(id) {
            el.data.label = label.to_string();
        }
    }

    /// Flags of a live element.
    pub fn flags(&self, id: ElementId) -> Option<ElementFlags> {
        self.element(id).map(|el| el.data.flags)
    }

    /// Replace the flags of a live element.
    pub fn set_flags(&mut self, id: ElementId, flags: ElementFlags) {
        if let Some(el) = self.element_mut(id) {
            el.data.flags = flags;
        }
        if flags.intersects(ElementFlags::DISABLED | ElementFlags::HIDDEN) {
            self.release_focus_within(id);
        }
    }

    /// Toggle [`ElementFlags::DISABLED`]. A disabled element loses focus.
    pub fn set_disabled(&mut self, id: ElementId, disabled: bool) {
        if let Some(mut flags) = self.flags(id) {
            flags.set(ElementFlags::DISABLED, disabled);
            self.set_flags(id, flags);
        }
    }

    /// Returns true if the element carries [`ElementFlags::DISABLED`].
    ///
    /// Stale elements report `true`: nothing can interact with them.
    pub fn is_disabled(&self, id: ElementId) -> bool {
        self.flags(id)
            .is_none_or(|f| f.contains(ElementFlags::DISABLED))
    }

    /// Explicit tab index of a live element.
    pub fn tab_index(&self, id: ElementId) -> Option<i32> {
        self.element(id).and_then(|el| el.data.tab_index)
    }

    /// Set or clear the explicit tab index.
    pub fn set_tab_index(&mut self, id: ElementId, tab_index: Option<i32>) {
        if let Some(el) = self.element_mut(id) {
            el.data.tab_index = tab_index;
        }
    }

    /// The tab index sequential navigation uses: the explicit value, else `0`
    /// for natively focusable elements, else `None`.
    pub fn effective_tab_index(&self, id: ElementId) -> Option<i32> {
        let el = self.element(id)?;
        el.data.tab_index.or_else(|| {
            el.data
                .flags
                .contains(ElementFlags::FOCUSABLE)
                .then_some(0)
        })
    }

    /// Class names of a live element.
    pub fn class_names(&self, id: ElementId) -> &[String] {
        self.element(id)
            .map(|el| el.data.class_names.as_slice())
            .unwrap_or(&[])
    }

    /// Returns true if the element carries `class`.
    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.class_names(id).iter().any(|c| c == class)
    }

    /// Add a class name (no duplicates).
    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if self.has_class(id, class) {
            return;
        }
        if let Some(el) = self.element_mut(id) {
            el.data.class_names.push(class.to_string());
        }
    }

    /// Remove a class name.
    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(el) = self.element_mut(id) {
            el.data.class_names.retain(|c| c != class);
        }
    }

    /// Read an attribute.
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.element(id)?
            .data
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        let Some(el) = self.element_mut(id) else {
            return;
        };
        match el.data.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => {
                v.clear();
                v.push_str(value);
            }
            None => el
                .data
                .attributes
                .push((name.to_string(), value.to_string())),
        }
    }

    /// Remove an attribute.
    pub fn remove_attribute(&mut self, id: ElementId, name: &str) {
        if let Some(el) = self.element_mut(id) {
            el.data.attributes.retain(|(n, _)| n != name);
        }
    }

    /// Style of a live element.
    pub fn style(&self, id: ElementId) -> Option<&Style> {
        self.element(id).map(|el| &el.style)
    }

    /// Mutable style of a live element.
    pub fn style_mut(&mut self, id: ElementId) -> Option<&mut Style> {
        self.element_mut(id).map(|el| &mut el.style)
    }

    // --- geometry ---

    /// Local bounds of a live element.
    pub fn local_bounds(&self, id: ElementId) -> Option<Rect> {
        self.element(id).map(|el| el.data.local_bounds)
    }

    /// Update local bounds.
    pub fn set_local_bounds(&mut self, id: ElementId, bounds: Rect) {
        if let Some(el) = self.element_mut(id) {
            el.data.local_bounds = bounds;
        }
    }

    /// Update the local transform.
    pub fn set_local_transform(&mut self, id: ElementId, transform: Affine) {
        if let Some(el) = self.element_mut(id) {
            el.data.local_transform = transform;
        }
    }

    /// Map from the element's local space into client (viewport) space.
    ///
    /// Returns `None` if the element is not connected. Fixed-positioned elements
    /// (and their descendants) ignore the scroll offset and everything above them.
    pub fn client_transform(&self, id: ElementId) -> Option<Affine> {
        if !self.is_connected(id) {
            return None;
        }
        let mut chain = Vec::new();
        let mut base = Affine::translate(-self.viewport.scroll);
        for cur in self.ancestors_or_self(id) {
            let el = self.element(cur)?;
            if let (Some(left), Some(top)) = (el.style.left, el.style.top) {
                base = Affine::translate((left, top)) * el.data.local_transform;
                break;
            }
            chain.push(cur);
        }
        let mut tf = base;
        for cur in chain.iter().rev() {
            tf = tf * self.element(*cur)?.data.local_transform;
        }
        Some(tf)
    }

    /// Axis-aligned bounds of a rendered element in client (viewport) coordinates.
    ///
    /// Returns `None` if the element is not connected or not rendered (hidden,
    /// `display: none`, or under such an ancestor).
    pub fn bounding_client_rect(&self, id: ElementId) -> Option<Rect> {
        if !self.is_rendered(id) {
            return None;
        }
        let el = self.element(id)?;
        let tf = self.client_transform(id)?;
        Some(transform_rect_bbox(
            tf,
            with_width(el.data.local_bounds, el.style.width),
        ))
    }

    /// Returns true if the element is connected and neither it nor an ancestor is
    /// hidden or `display: none`.
    pub fn is_rendered(&self, id: ElementId) -> bool {
        self.is_connected(id)
            && self.ancestors_or_self(id).all(|a| {
                self.element(a).is_some_and(|el| {
                    !el.data.flags.contains(ElementFlags::HIDDEN)
                        && el.style.display != Display::None
                })
            })
    }

    /// Returns true if the element or an ancestor carries [`ElementFlags::ARIA_HIDDEN`].
    pub fn is_aria_hidden(&self, id: ElementId) -> bool {
        self.ancestors_or_self(id).any(|a| {
            self.flags(a)
                .is_some_and(|f| f.contains(ElementFlags::ARIA_HIDDEN))
        })
    }

    /// Find the topmost rendered element under a client-space point.
    ///
    /// Candidates are ranked by the nearest explicit [`ZIndex`] in their ancestor
    /// chain (auto counts as `0`), then by document order: later elements paint
    /// on top, so overlay containers appended to the body win over page content.
    pub fn hit_test_point(&self, point: Point) -> Option<ElementId> {
        let mut best: Option<(i32, ElementId)> = None;
        let order = core::iter::once(self.body).chain(self.descendants(self.body));
        for id in order {
            let Some(rect) = self.bounding_client_rect(id) else {
                continue;
            };
            if !rect.contains(point) {
                continue;
            }
            let z = self.effective_z(id);
            // `>=` keeps the later element on ties.
            if best.is_none_or(|(best_z, _)| z >= best_z) {
                best = Some((z, id));
            }
        }
        best.map(|(_, id)| id)
    }

    // --- focus ---

    /// The focused element, or the body when nothing (connected) is focused.
    pub fn active_element(&self) -> ElementId {
        match self.active {
            Some(a) if self.is_connected(a) => a,
            _ => self.body,
        }
    }

    /// Move focus to `id`.
    ///
    /// Focusing the body clears focus. Returns `false` (leaving focus unchanged)
    /// when the element cannot take focus; see [`Document::is_focusable`].
    pub fn focus(&mut self, id: ElementId) -> bool {
        if id == self.body {
            self.active = None;
            return true;
        }
        if !self.is_focusable(id) {
            tracing::trace!(?id, "focus refused");
            return false;
        }
        self.active = Some(id);
        true
    }

    /// Clear focus (the body becomes the active element).
    pub fn blur(&mut self) {
        self.active = None;
    }

    /// Returns true if the active element is `root` or inside it.
    pub fn has_focus_within(&self, root: ElementId) -> bool {
        self.contains(root, self.active_element())
    }

    /// Returns true if the element can take focus programmatically: it is
    /// rendered, not disabled, and natively focusable or carries a tab index.
    pub fn is_focusable(&self, id: ElementId) -> bool {
        let Some(el) = self.element(id) else {
            return false;
        };
        if el.data.flags.contains(ElementFlags::DISABLED) {
            return false;
        }
        let focus_capable =
            el.data.flags.contains(ElementFlags::FOCUSABLE) || el.data.tab_index.is_some();
        focus_capable && self.is_rendered(id)
    }

    /// Returns true if the element is focusable and reachable by sequential
    /// (Tab) navigation, i.e. its effective tab index is non-negative.
    pub fn is_tabbable(&self, id: ElementId) -> bool {
        self.is_focusable(id) && self.effective_tab_index(id).is_some_and(|t| t >= 0)
    }

    // --- internals ---

    fn element(&self, id: ElementId) -> Option<&Element> {
        let el = self.elements.get(id.idx())?.as_ref()?;
        (el.generation == id.1).then_some(el)
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        let el = self.elements.get_mut(id.idx())?.as_mut()?;
        if el.generation != id.1 {
            return None;
        }
        Some(el)
    }

    fn unlink_parent(&mut self, id: ElementId) {
        let Some(parent) = self.parent_of(id) else {
            return;
        };
        if let Some(p) = self.element_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(c) = self.element_mut(id) {
            c.parent = None;
        }
    }

    fn sibling(&self, node: ElementId, offset: isize) -> Option<ElementId> {
        let parent = self.parent_of(node)?;
        let siblings = self.children_of(parent);
        let pos = siblings.iter().position(|&id| id == node)?;
        let target = pos.checked_add_signed(offset)?;
        siblings.get(target).copied()
    }

    fn release_focus_within(&mut self, root: ElementId) {
        if let Some(active) = self.active
            && self.contains(root, active)
        {
            tracing::trace!(?active, ?root, "focused element left the tree; focus returns to body");
            self.active = None;
        }
    }

    fn effective_z(&self, id: ElementId) -> i32 {
        self.ancestors_or_self(id)
            .find_map(|a| self.style(a).and_then(|s| s.z_index.value()))
            .unwrap_or(0)
    }
}

/// Convenience for hosts that track a `ZIndex` per element.
impl Document {
    /// Set the stacking order of a live element.
    pub fn set_z_index(&mut self, id: ElementId, z_index: ZIndex) {
        if let Some(style) = self.style_mut(id) {
            style.z_index = z_index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn doc() -> Document {
        Document::new(Size::new(800.0, 600.0))
    }

    fn boxed(doc: &mut Document, parent: ElementId, bounds: Rect) -> ElementId {
        let id = doc.create_element(ElementData::new("div").with_bounds(bounds));
        doc.append_child(parent, id).unwrap();
        id
    }

    #[test]
    fn append_connects_and_detach_disconnects() {
        let mut doc = doc();
        let body = doc.body();
        let a = doc.create_element(ElementData::default());
        let b = doc.create_element(ElementData::default());
        doc.append_child(a, b).unwrap();
        assert!(!doc.is_connected(b), "detached subtree is not connected");

        doc.append_child(body, a).unwrap();
        assert!(doc.is_connected(b));
        assert!(doc.contains(a, b));
        assert!(doc.contains(b, b), "contains is inclusive");
        assert!(!doc.contains(b, a));

        assert!(doc.detach(a));
        assert!(!doc.is_connected(b));
        assert!(doc.is_alive(b));
        assert!(!doc.detach(a), "already detached");
    }

    #[test]
    fn append_rejects_cycles_and_body_moves() {
        let mut doc = doc();
        let body = doc.body();
        let a = boxed(&mut doc, body, Rect::ZERO);
        let b = boxed(&mut doc, a, Rect::ZERO);
        assert_eq!(
            doc.append_child(b, a),
            Err(DomError::WouldCycle {
                parent: b,
                child: a
            })
        );
        assert_eq!(doc.append_child(a, a), Err(DomError::WouldCycle { parent: a, child: a }));
        assert_eq!(doc.append_child(a, body), Err(DomError::BodyIsPermanent));
    }

    #[test]
    fn destroy_frees_subtree_and_bumps_generation() {
        let mut doc = doc();
        let body = doc.body();
        let a = boxed(&mut doc, body, Rect::ZERO);
        let b = boxed(&mut doc, a, Rect::ZERO);
        assert_eq!(doc.element_count(), 3);

        assert!(doc.destroy(a));
        assert!(!doc.is_alive(a));
        assert!(!doc.is_alive(b));
        assert_eq!(doc.element_count(), 1);
        assert!(doc.children_of(body).is_empty());
        assert!(!doc.destroy(a), "destroying twice is a no-op");
        assert!(!doc.destroy(body));

        let c = doc.create_element(ElementData::default());
        assert!(doc.is_alive(c));
        assert!(!doc.is_alive(a), "reused slot must not revive a stale id");
        assert!(!doc.is_alive(b));
    }

    #[test]
    fn descendants_follow_document_order() {
        let mut doc = doc();
        let body = doc.body();
        // body -> [a -> [c, d], b]
        let a = boxed(&mut doc, body, Rect::ZERO);
        let b = boxed(&mut doc, body, Rect::ZERO);
        let c = boxed(&mut doc, a, Rect::ZERO);
        let d = boxed(&mut doc, a, Rect::ZERO);

        assert_eq!(doc.descendants(body), vec![a, c, d, b]);
        assert_eq!(doc.next_depth_first(a), Some(c));
        assert_eq!(doc.next_depth_first(d), Some(b));
        assert_eq!(doc.next_depth_first(b), None);
        assert_eq!(doc.prev_depth_first(b), Some(d));
        assert_eq!(doc.prev_depth_first(c), Some(a));
        assert_eq!(doc.path_from_root(d), vec![body, a, d]);
    }

    #[test]
    fn focus_requires_focusable_rendered_enabled() {
        let mut doc = doc();
        let body = doc.body();
        let plain = boxed(&mut doc, body, Rect::ZERO);
        let button = doc.create_element(ElementData::new("button").focusable());
        let disabled = doc.create_element(ElementData::new("button").focusable().disabled());
        let scripted = doc.create_element(ElementData::new("div").with_tab_index(-1));
        for id in [button, disabled, scripted] {
            doc.append_child(body, id).unwrap();
        }

        assert!(!doc.focus(plain));
        assert!(!doc.focus(disabled));
        assert!(doc.focus(scripted));
        assert!(!doc.is_tabbable(scripted), "negative tab index is not tabbable");
        assert!(doc.focus(button));
        assert!(doc.is_tabbable(button));
        assert_eq!(doc.active_element(), button);

        doc.style_mut(button).unwrap().display = Display::None;
        assert!(!doc.is_focusable(button));
    }

    #[test]
    fn focus_falls_back_to_body_when_element_leaves() {
        let mut doc = doc();
        let body = doc.body();
        let wrapper = boxed(&mut doc, body, Rect::ZERO);
        let button = doc.create_element(ElementData::new("button").focusable());
        doc.append_child(wrapper, button).unwrap();
        assert!(doc.focus(button));

        doc.detach(wrapper);
        assert_eq!(doc.active_element(), body);

        doc.append_child(body, wrapper).unwrap();
        assert!(doc.focus(button));
        doc.set_disabled(button, true);
        assert_eq!(doc.active_element(), body, "disabling drops focus");
    }

    #[test]
    fn client_rect_applies_transforms_and_scroll() {
        let mut doc = doc();
        let body = doc.body();
        let panel = doc.create_element(
            ElementData::new("div")
                .with_bounds(Rect::new(0.0, 0.0, 100.0, 100.0))
                .with_transform(Affine::translate((50.0, 20.0))),
        );
        doc.append_child(body, panel).unwrap();
        let child = boxed(&mut doc, panel, Rect::new(10.0, 10.0, 30.0, 20.0));

        assert_eq!(
            doc.bounding_client_rect(child),
            Some(Rect::new(60.0, 30.0, 80.0, 40.0))
        );
        doc.set_scroll_offset(Vec2::new(0.0, 25.0));
        assert_eq!(
            doc.bounding_client_rect(child),
            Some(Rect::new(60.0, 5.0, 80.0, 15.0))
        );
    }

    #[test]
    fn fixed_elements_ignore_scroll_and_use_forced_width() {
        let mut doc = doc();
        let body = doc.body();
        let fixed = boxed(&mut doc, body, Rect::new(0.0, 0.0, 40.0, 40.0));
        {
            let style = doc.style_mut(fixed).unwrap();
            style.left = Some(100.0);
            style.top = Some(200.0);
            style.width = Some(120.0);
        }
        doc.set_scroll_offset(Vec2::new(0.0, 500.0));
        assert_eq!(
            doc.bounding_client_rect(fixed),
            Some(Rect::new(100.0, 200.0, 220.0, 240.0))
        );
    }

    #[test]
    fn hidden_and_detached_elements_have_no_client_rect() {
        let mut doc = doc();
        let body = doc.body();
        let a = boxed(&mut doc, body, Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = boxed(&mut doc, a, Rect::new(0.0, 0.0, 5.0, 5.0));
        doc.set_flags(a, ElementFlags::HIDDEN);
        assert_eq!(doc.bounding_client_rect(b), None);
        doc.set_flags(a, ElementFlags::empty());
        assert!(doc.bounding_client_rect(b).is_some());
        doc.detach(a);
        assert_eq!(doc.bounding_client_rect(b), None);
    }

    #[test]
    fn hit_test_prefers_explicit_z_then_later_elements() {
        let mut doc = doc();
        let body = doc.body();
        let under = boxed(&mut doc, body, Rect::new(0.0, 0.0, 100.0, 100.0));
        let over = boxed(&mut doc, body, Rect::new(50.0, 50.0, 150.0, 150.0));
        assert_eq!(doc.hit_test_point(Point::new(60.0, 60.0)), Some(over));
        assert_eq!(doc.hit_test_point(Point::new(10.0, 10.0)), Some(under));

        doc.set_z_index(under, ZIndex::Value(10));
        assert_eq!(doc.hit_test_point(Point::new(60.0, 60.0)), Some(under));
        assert_eq!(doc.hit_test_point(Point::new(700.0, 500.0)), Some(body));
    }

    #[test]
    fn attributes_and_classes_replace_in_place() {
        let mut doc = doc();
        let body = doc.body();
        let el = boxed(&mut doc, body, Rect::ZERO);
        doc.set_attribute(el, "aria-expanded", "false");
        doc.set_attribute(el, "aria-expanded", "true");
        assert_eq!(doc.attribute(el, "aria-expanded"), Some("true"));
        doc.remove_attribute(el, "aria-expanded");
        assert_eq!(doc.attribute(el, "aria-expanded"), None);

        doc.add_class(el, "panel");
        doc.add_class(el, "panel");
        assert_eq!(doc.class_names(el).len(), 1);
        doc.remove_class(el, "panel");
        assert!(!doc.has_class(el, "panel"));
    }
}
