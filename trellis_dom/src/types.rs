// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: element identifiers, flags, element data, and style.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use kurbo::{Affine, Rect};

/// Identifier for an element in a [`Document`](crate::Document) (generational).
///
/// A slot freed by [`Document::destroy`](crate::Document::destroy) may be reused,
/// but the reused slot carries a new generation, so stale identifiers never alias
/// a newer element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Element flags controlling focusability and visibility.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element is natively focusable (buttons, inputs, links). Its effective
        /// tab index defaults to `0`.
        const FOCUSABLE   = 0b0000_0001;
        /// Element is disabled; it can neither take focus nor be activated.
        const DISABLED    = 0b0000_0010;
        /// Element carries the `hidden` attribute; it and its subtree are not rendered.
        const HIDDEN      = 0b0000_0100;
        /// Element carries `aria-hidden="true"`; it and its subtree are removed from
        /// the accessibility tree and excluded from focus trapping.
        const ARIA_HIDDEN = 0b0000_1000;
    }
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Whether an element generates a box.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Display {
    /// The element is laid out normally.
    #[default]
    Block,
    /// `display: none`; the element and its subtree are not rendered.
    None,
}

/// Stacking order of a positioned element.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ZIndex {
    /// Paint in document order.
    #[default]
    Auto,
    /// Explicit stacking level. Higher is painted on top.
    Value(i32),
}

impl ZIndex {
    /// Returns the explicit stacking level, if any.
    pub fn value(self) -> Option<i32> {
        match self {
            Self::Auto => None,
            Self::Value(v) => Some(v),
        }
    }
}

impl fmt::Display for ZIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Value(v) => write!(f, "{v}"),
        }
    }
}

/// Error returned when parsing a [`ZIndex`] from its string form.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid z-index {0:?}: expected \"auto\" or an integer")]
pub struct ParseZIndexError(pub String);

impl FromStr for ZIndex {
    type Err = ParseZIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        trimmed
            .parse::<i32>()
            .map(Self::Value)
            .map_err(|_| ParseZIndexError(s.to_string()))
    }
}

/// Presentation state the engine writes to elements.
///
/// This is not a styling system: it holds only the handful of properties the
/// overlay engine needs to place and hide containers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Style {
    /// Box generation.
    pub display: Display,
    /// Fixed left edge in viewport coordinates.
    ///
    /// When both `left` and `top` are set the element is fixed-positioned: its
    /// client geometry ignores its ancestors and the viewport scroll offset.
    pub left: Option<f64>,
    /// Fixed top edge in viewport coordinates.
    pub top: Option<f64>,
    /// Forced width. When `None` the width of the local bounds is used.
    pub width: Option<f64>,
    /// Stacking order.
    pub z_index: ZIndex,
}

impl Style {
    /// Returns `true` if the element is fixed-positioned.
    pub fn is_fixed(&self) -> bool {
        self.left.is_some() && self.top.is_some()
    }
}

/// Per-element data supplied by the host.
#[derive(Clone, Debug)]
pub struct ElementData {
    /// Tag name, for debugging and role checks (`"button"`, `"li"`, ...).
    pub tag: String,
    /// Accessible name. Callers compute this once and pass it as data.
    pub label: String,
    /// Local (untransformed) bounds.
    pub local_bounds: Rect,
    /// Local transform relative to the parent.
    pub local_transform: Affine,
    /// Explicit tab index. `None` falls back to `0` for [`ElementFlags::FOCUSABLE`]
    /// elements and to "not focusable" otherwise.
    pub tab_index: Option<i32>,
    /// Focus and visibility flags.
    pub flags: ElementFlags,
    /// Class names, in insertion order.
    pub class_names: Vec<String>,
    /// String attributes (`id`, `role`, `aria-*`), in insertion order.
    pub attributes: Vec<(String, String)>,
}

impl Default for ElementData {
    fn default() -> Self {
        Self {
            tag: String::from("div"),
            label: String::new(),
            local_bounds: Rect::ZERO,
            local_transform: Affine::IDENTITY,
            tab_index: None,
            flags: ElementFlags::default(),
            class_names: Vec::new(),
            attributes: Vec::new(),
        }
    }
}

impl ElementData {
    /// Create element data with the given tag and defaults for everything else.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    /// Set the accessible name.
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// Set the local bounds.
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.local_bounds = bounds;
        self
    }

    /// Set the local transform.
    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.local_transform = transform;
        self
    }

    /// Set an explicit tab index.
    pub fn with_tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    /// Add flags.
    pub fn with_flags(mut self, flags: ElementFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Mark the element natively focusable.
    pub fn focusable(self) -> Self {
        self.with_flags(ElementFlags::FOCUSABLE)
    }

    /// Mark the element disabled.
    pub fn disabled(self) -> Self {
        self.with_flags(ElementFlags::DISABLED)
    }

    /// Add a class name.
    pub fn with_class(mut self, class: &str) -> Self {
        self.class_names.push(class.to_string());
        self
    }

    /// Set an attribute.
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn z_index_parses_auto_and_integers() {
        assert_eq!("auto".parse::<ZIndex>(), Ok(ZIndex::Auto));
        assert_eq!(" AUTO ".parse::<ZIndex>(), Ok(ZIndex::Auto));
        assert_eq!("1000".parse::<ZIndex>(), Ok(ZIndex::Value(1000)));
        assert_eq!("-3".parse::<ZIndex>(), Ok(ZIndex::Value(-3)));
        assert!("12px".parse::<ZIndex>().is_err());
    }

    #[test]
    fn z_index_display_round_trips_through_from_str() {
        assert_eq!(ZIndex::Auto.to_string(), "auto");
        assert_eq!(ZIndex::Value(7).to_string(), "7");
    }

    #[test]
    fn builder_accumulates_flags() {
        let data = ElementData::new("button").focusable().disabled();
        assert!(data.flags.contains(ElementFlags::FOCUSABLE | ElementFlags::DISABLED));
        assert_eq!(data.tag, "button");
    }
}
