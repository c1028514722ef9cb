// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation vocabulary and linear stepping over sparse-disabled lists.

use trellis_events::{Key, KeyEvent};

/// Direction of a linear step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    /// Towards the end of the list.
    Forward,
    /// Towards the start of the list.
    Backward,
}

/// Wrap mode configuration for linear traversal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Do not wrap; stepping past either end yields no candidate.
    Never,
    /// Wrap around within the list.
    #[default]
    Scope,
}

/// Which arrow keys a composite widget listens to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Up/Down only (menus, listboxes).
    Vertical,
    /// Left/Right only (tab lists, steppers laid out in a row).
    Horizontal,
    /// Both axes: Down/Right step forward, Up/Left step backward.
    #[default]
    Both,
}

/// What a key press means to a composite widget.
///
/// This is the shared keyboard contract: arrows step, `Home`/`End` jump,
/// `Enter`/`Space` activate, `Escape` dismisses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyIntent {
    /// Next enabled item.
    Next,
    /// Previous enabled item.
    Prev,
    /// First enabled item.
    First,
    /// Last enabled item.
    Last,
    /// Activate the current item.
    Activate,
    /// Close the owning overlay and return focus to its trigger.
    Dismiss,
}

impl KeyIntent {
    /// Interpret a key press. Returns `None` for keys outside the contract and for
    /// presses carrying Ctrl, Alt, or Meta.
    pub fn from_key(event: &KeyEvent, orientation: Orientation) -> Option<Self> {
        if event.has_command_modifier() {
            return None;
        }
        let vertical = orientation != Orientation::Horizontal;
        let horizontal = orientation != Orientation::Vertical;
        match event.key {
            Key::ArrowDown if vertical => Some(Self::Next),
            Key::ArrowUp if vertical => Some(Self::Prev),
            Key::ArrowRight if horizontal => Some(Self::Next),
            Key::ArrowLeft if horizontal => Some(Self::Prev),
            Key::Home => Some(Self::First),
            Key::End => Some(Self::Last),
            Key::Enter | Key::Space => Some(Self::Activate),
            Key::Escape => Some(Self::Dismiss),
            _ => None,
        }
    }
}

/// Index of the first item for which `is_enabled` holds.
pub fn first_enabled(len: usize, is_enabled: impl FnMut(usize) -> bool) -> Option<usize> {
    (0..len).find(is_enabled_adapter(is_enabled))
}

/// Index of the last item for which `is_enabled` holds.
pub fn last_enabled(len: usize, is_enabled: impl FnMut(usize) -> bool) -> Option<usize> {
    (0..len).rev().find(is_enabled_adapter(is_enabled))
}

fn is_enabled_adapter(mut f: impl FnMut(usize) -> bool) -> impl FnMut(&usize) -> bool {
    move |i| f(*i)
}

/// Step from `origin` to the nearest enabled item in `step` direction.
///
/// Disabled items are skipped. With [`WrapMode::Scope`] the scan continues
/// circularly; with [`WrapMode::Never`] it stops at the list ends. When there is
/// no origin (or it is out of range) the scan starts at the boundary: forward
/// yields the first enabled item, backward the last.
///
/// Returns `None` when no *other* enabled item is reachable; callers keep the
/// current item in that case.
///
/// ```
/// use trellis_focus::{step_enabled, Step, WrapMode};
///
/// // [A, B(disabled), C]
/// let enabled = [true, false, true];
/// let on = |i: usize| enabled[i];
/// assert_eq!(step_enabled(3, Some(0), Step::Forward, WrapMode::Scope, on), Some(2));
/// assert_eq!(step_enabled(3, Some(2), Step::Forward, WrapMode::Scope, on), Some(0));
/// assert_eq!(step_enabled(3, Some(2), Step::Forward, WrapMode::Never, on), None);
/// ```
pub fn step_enabled(
    len: usize,
    origin: Option<usize>,
    step: Step,
    wrap: WrapMode,
    mut is_enabled: impl FnMut(usize) -> bool,
) -> Option<usize> {
    let Some(origin) = origin.filter(|o| *o < len) else {
        return match step {
            Step::Forward => first_enabled(len, is_enabled),
            Step::Backward => last_enabled(len, is_enabled),
        };
    };
    for distance in 1..len {
        let candidate = match step {
            Step::Forward => {
                let raw = origin + distance;
                if raw < len {
                    raw
                } else if wrap == WrapMode::Scope {
                    raw - len
                } else {
                    return None;
                }
            }
            Step::Backward => {
                if distance <= origin {
                    origin - distance
                } else if wrap == WrapMode::Scope {
                    origin + len - distance
                } else {
                    return None;
                }
            }
        };
        if is_enabled(candidate) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_events::Modifiers;

    #[test]
    fn wraparound_skips_disabled() {
        let enabled = [true, false, true];
        let on = |i: usize| enabled[i];
        assert_eq!(step_enabled(3, Some(0), Step::Forward, WrapMode::Scope, on), Some(2));
        assert_eq!(step_enabled(3, Some(2), Step::Forward, WrapMode::Scope, on), Some(0));
        assert_eq!(step_enabled(3, Some(0), Step::Backward, WrapMode::Scope, on), Some(2));
        assert_eq!(step_enabled(3, Some(2), Step::Backward, WrapMode::Scope, on), Some(0));
    }

    #[test]
    fn never_wrap_stops_at_edges() {
        let on = |_: usize| true;
        assert_eq!(step_enabled(3, Some(2), Step::Forward, WrapMode::Never, on), None);
        assert_eq!(step_enabled(3, Some(0), Step::Backward, WrapMode::Never, on), None);
        assert_eq!(step_enabled(3, Some(1), Step::Forward, WrapMode::Never, on), Some(2));
    }

    #[test]
    fn no_origin_starts_at_boundary() {
        let enabled = [false, true, true, false];
        let on = |i: usize| enabled[i];
        assert_eq!(step_enabled(4, None, Step::Forward, WrapMode::Scope, on), Some(1));
        assert_eq!(step_enabled(4, None, Step::Backward, WrapMode::Scope, on), Some(2));
        assert_eq!(step_enabled(4, Some(9), Step::Forward, WrapMode::Scope, on), Some(1));
    }

    #[test]
    fn nothing_enabled_is_a_no_op() {
        let off = |_: usize| false;
        assert_eq!(step_enabled(3, Some(0), Step::Forward, WrapMode::Scope, off), None);
        assert_eq!(step_enabled(0, None, Step::Forward, WrapMode::Scope, off), None);
        assert_eq!(first_enabled(3, off), None);
        assert_eq!(last_enabled(3, off), None);
    }

    #[test]
    fn single_enabled_item_stays_put() {
        let enabled = [false, true, false];
        let on = |i: usize| enabled[i];
        assert_eq!(step_enabled(3, Some(1), Step::Forward, WrapMode::Scope, on), None);
    }

    #[test]
    fn key_contract() {
        let both = Orientation::Both;
        let intent = |k: Key| KeyIntent::from_key(&KeyEvent::new(k), both);
        assert_eq!(intent(Key::ArrowDown), Some(KeyIntent::Next));
        assert_eq!(intent(Key::ArrowRight), Some(KeyIntent::Next));
        assert_eq!(intent(Key::ArrowUp), Some(KeyIntent::Prev));
        assert_eq!(intent(Key::ArrowLeft), Some(KeyIntent::Prev));
        assert_eq!(intent(Key::Home), Some(KeyIntent::First));
        assert_eq!(intent(Key::End), Some(KeyIntent::Last));
        assert_eq!(intent(Key::Enter), Some(KeyIntent::Activate));
        assert_eq!(intent(Key::Space), Some(KeyIntent::Activate));
        assert_eq!(intent(Key::Escape), Some(KeyIntent::Dismiss));
        assert_eq!(intent(Key::Tab), None);

        let vertical = KeyEvent::new(Key::ArrowRight);
        assert_eq!(KeyIntent::from_key(&vertical, Orientation::Vertical), None);
        let ctrl = KeyEvent::new(Key::ArrowDown).with_modifiers(Modifiers::CTRL);
        assert_eq!(KeyIntent::from_key(&ctrl, both), None);
    }
}
