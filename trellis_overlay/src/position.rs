// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pure position computation.

use kurbo::{Rect, Size};
use trellis_dom::{Display, Document, ElementId};

use crate::config::{OverlayConfig, Placement};

/// Derived placement of an overlay container, in viewport coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum PositionState {
    /// The anchor is not rendered; the container is hidden, not closed.
    #[default]
    Hidden,
    /// The container is shown at `(left, top)`.
    Placed {
        /// Left edge.
        left: f64,
        /// Top edge.
        top: f64,
        /// Forced width, or `None` for intrinsic width.
        width: Option<f64>,
    },
}

/// Compute where a container goes.
///
/// `anchor` is the anchor's client rect, or `None` when it is disconnected or not
/// rendered. `content` is the container's intrinsic size, used by the centered
/// placements.
pub fn compute_position(
    config: &OverlayConfig,
    anchor: Option<Rect>,
    viewport: Size,
    content: Size,
) -> PositionState {
    let Some(anchor) = anchor else {
        return PositionState::Hidden;
    };
    let width = config.match_anchor_width.then(|| anchor.width());
    let content_width = width.unwrap_or(content.width);
    let (left, top) = match config.placement {
        Placement::BelowAnchor => (anchor.x0, anchor.y1),
        Placement::Centered => (
            (viewport.width - content_width) / 2.0,
            (viewport.height - content.height) / 2.0,
        ),
        Placement::BottomCenter => (
            (viewport.width - content_width) / 2.0,
            viewport.height - content.height,
        ),
    };
    PositionState::Placed { left, top, width }
}

/// Write a computed position to the container's style.
pub(crate) fn apply_position(doc: &mut Document, container: ElementId, state: PositionState) {
    let Some(style) = doc.style_mut(container) else {
        return;
    };
    match state {
        PositionState::Hidden => style.display = Display::None,
        PositionState::Placed { left, top, width } => {
            style.display = Display::Block;
            style.left = Some(left);
            style.top = Some(top);
            style.width = width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size::new(800.0, 600.0);

    #[test]
    fn below_anchor_pins_bottom_left_and_matches_width() {
        let config = OverlayConfig::default();
        let anchor = Rect::new(40.0, 100.0, 200.0, 130.0);
        assert_eq!(
            compute_position(&config, Some(anchor), VIEWPORT, Size::new(50.0, 80.0)),
            PositionState::Placed {
                left: 40.0,
                top: 130.0,
                width: Some(160.0)
            }
        );
        let intrinsic = config.with_match_anchor_width(false);
        assert_eq!(
            compute_position(&intrinsic, Some(anchor), VIEWPORT, Size::new(50.0, 80.0)),
            PositionState::Placed {
                left: 40.0,
                top: 130.0,
                width: None
            }
        );
    }

    #[test]
    fn missing_anchor_hides() {
        let config = OverlayConfig::default();
        assert_eq!(
            compute_position(&config, None, VIEWPORT, Size::ZERO),
            PositionState::Hidden
        );
    }

    #[test]
    fn centered_placements_use_content_size() {
        let config = OverlayConfig::default()
            .with_match_anchor_width(false)
            .with_placement(Placement::Centered);
        let anchor = Some(Rect::from_origin_size((0.0, 0.0), VIEWPORT));
        assert_eq!(
            compute_position(&config, anchor, VIEWPORT, Size::new(200.0, 100.0)),
            PositionState::Placed {
                left: 300.0,
                top: 250.0,
                width: None
            }
        );
        let sheet = config.with_placement(Placement::BottomCenter);
        assert_eq!(
            compute_position(&sheet, anchor, VIEWPORT, Size::new(800.0, 240.0)),
            PositionState::Placed {
                left: 0.0,
                top: 360.0,
                width: None
            }
        );
    }
}
