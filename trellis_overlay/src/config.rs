// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use trellis_dom::ZIndex;

use crate::error::OverlayError;

/// Where an overlay container is placed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Top-left corner pinned to the anchor's bottom-left corner.
    #[default]
    BelowAnchor,
    /// Centered in the viewport (dialogs).
    Centered,
    /// Horizontally centered, flush with the bottom of the viewport (bottom sheets).
    BottomCenter,
}

/// Configuration snapshot taken by [`OverlayManager::attach`](crate::OverlayManager::attach).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayConfig {
    /// Close on a pointer-down outside both the container and the anchor.
    pub close_on_outside_pointer_down: bool,
    /// Close on an unmodified `Escape` key press.
    pub close_on_escape: bool,
    /// Force the container width to the anchor width.
    pub match_anchor_width: bool,
    /// Class names added to the container.
    pub panel_class_names: Vec<String>,
    /// Stacking order of the container.
    pub z_index: ZIndex,
    /// Placement strategy.
    pub placement: Placement,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            close_on_outside_pointer_down: true,
            close_on_escape: true,
            match_anchor_width: true,
            panel_class_names: Vec::new(),
            z_index: ZIndex::Auto,
            placement: Placement::BelowAnchor,
        }
    }
}

impl OverlayConfig {
    /// Set [`OverlayConfig::close_on_outside_pointer_down`].
    pub fn with_close_on_outside_pointer_down(mut self, value: bool) -> Self {
        self.close_on_outside_pointer_down = value;
        self
    }

    /// Set [`OverlayConfig::close_on_escape`].
    pub fn with_close_on_escape(mut self, value: bool) -> Self {
        self.close_on_escape = value;
        self
    }

    /// Set [`OverlayConfig::match_anchor_width`].
    pub fn with_match_anchor_width(mut self, value: bool) -> Self {
        self.match_anchor_width = value;
        self
    }

    /// Add a panel class name.
    pub fn with_panel_class(mut self, class: &str) -> Self {
        self.panel_class_names.push(class.to_string());
        self
    }

    /// Set the stacking order.
    pub fn with_z_index(mut self, z_index: ZIndex) -> Self {
        self.z_index = z_index;
        self
    }

    /// Set the stacking order from its string form (`"auto"` or an integer).
    pub fn with_z_index_str(self, z_index: &str) -> Result<Self, OverlayError> {
        Ok(self.with_z_index(z_index.parse()?))
    }

    /// Set the placement strategy.
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }
}
