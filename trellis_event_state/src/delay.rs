// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cancellable show/hide delays (hover intent).
//!
//! A [`DelayedToggle`] turns a noisy stream of "pointer entered" / "pointer left"
//! / "focus" / "blur" signals into at most one visible transition per settled
//! intent. Requests schedule a deadline; the host calls [`DelayedToggle::poll`]
//! with the current time (for example from its timer or frame loop) and applies
//! whatever [`Transition`] comes back.
//!
//! Cancellation is synchronous: a request in the opposite direction before the
//! deadline drops the pending one, so no stale transition can fire later.
//!
//! ```
//! use trellis_event_state::delay::{DelayedToggle, Transition};
//!
//! let mut hover = DelayedToggle::new(300, 100);
//!
//! // Pointer enters, then leaves before the show delay elapses.
//! assert_eq!(hover.request_show(1_000), None);
//! assert_eq!(hover.request_hide(1_200), None);
//! assert_eq!(hover.poll(2_000), None, "cancelled show never fires");
//!
//! // Pointer enters and stays.
//! hover.request_show(3_000);
//! assert_eq!(hover.poll(3_299), None);
//! assert_eq!(hover.poll(3_300), Some(Transition::Show));
//! assert!(hover.is_visible());
//! ```

/// A visibility change the host should apply.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Become visible.
    Show,
    /// Become hidden.
    Hide,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Pending {
    to: Transition,
    deadline: u64,
}

/// Visibility with independent show and hide delays, in milliseconds.
#[derive(Clone, Debug)]
pub struct DelayedToggle {
    /// Delay before a show request takes effect.
    pub show_delay: u64,
    /// Delay before a hide request takes effect.
    pub hide_delay: u64,
    visible: bool,
    pending: Option<Pending>,
}

impl Default for DelayedToggle {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl DelayedToggle {
    /// Create a hidden toggle with the given delays.
    pub fn new(show_delay: u64, hide_delay: u64) -> Self {
        Self {
            show_delay,
            hide_delay,
            visible: false,
            pending: None,
        }
    }

    /// Ask to become visible at `now + show_delay`.
    ///
    /// Cancels a pending hide. Returns the transition immediately when the delay
    /// is zero. A repeated request keeps the original deadline.
    pub fn request_show(&mut self, now: u64) -> Option<Transition> {
        self.request(Transition::Show, now)
    }

    /// Ask to become hidden at `now + hide_delay`.
    ///
    /// Cancels a pending show. Returns the transition immediately when the delay
    /// is zero. A repeated request keeps the original deadline.
    pub fn request_hide(&mut self, now: u64) -> Option<Transition> {
        self.request(Transition::Hide, now)
    }

    /// Apply a pending transition whose deadline has passed.
    pub fn poll(&mut self, now: u64) -> Option<Transition> {
        let pending = self.pending?;
        if now < pending.deadline {
            return None;
        }
        self.pending = None;
        self.apply(pending.to)
    }

    /// Drop any pending transition without changing visibility.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Hide immediately, dropping any pending transition.
    pub fn force_hide(&mut self) -> Option<Transition> {
        self.pending = None;
        self.apply(Transition::Hide)
    }

    /// Show immediately, dropping any pending transition.
    pub fn force_show(&mut self) -> Option<Transition> {
        self.pending = None;
        self.apply(Transition::Show)
    }

    /// Current visibility.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns true if a transition is scheduled.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the scheduled transition, for hosts that arm a single timer.
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.map(|p| p.deadline)
    }

    fn request(&mut self, to: Transition, now: u64) -> Option<Transition> {
        let already = matches!(
            (to, self.visible),
            (Transition::Show, true) | (Transition::Hide, false)
        );
        if already {
            // Staying put cancels a pending move the other way.
            if self.pending.is_some_and(|p| p.to != to) {
                tracing::trace!(?to, "pending transition cancelled");
                self.pending = None;
            }
            return None;
        }
        if self.pending.is_some_and(|p| p.to == to) {
            return None;
        }
        let delay = match to {
            Transition::Show => self.show_delay,
            Transition::Hide => self.hide_delay,
        };
        if delay == 0 {
            self.pending = None;
            return self.apply(to);
        }
        self.pending = Some(Pending {
            to,
            deadline: now.saturating_add(delay),
        });
        None
    }

    fn apply(&mut self, to: Transition) -> Option<Transition> {
        let visible = to == Transition::Show;
        if self.visible == visible {
            return None;
        }
        self.visible = visible;
        Some(to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_delays_apply_immediately() {
        let mut t = DelayedToggle::default();
        assert_eq!(t.request_show(0), Some(Transition::Show));
        assert_eq!(t.request_show(1), None, "already visible");
        assert_eq!(t.request_hide(2), Some(Transition::Hide));
    }

    #[test]
    fn hide_before_deadline_cancels_show() {
        let mut t = DelayedToggle::new(500, 0);
        t.request_show(100);
        assert!(t.is_pending());
        assert_eq!(t.request_hide(200), None);
        assert!(!t.is_pending(), "show must be cancelled synchronously");
        assert_eq!(t.poll(10_000), None);
        assert!(!t.is_visible());
    }

    #[test]
    fn repeated_requests_keep_first_deadline() {
        let mut t = DelayedToggle::new(100, 100);
        t.request_show(0);
        t.request_show(90);
        assert_eq!(t.next_deadline(), Some(100));
        assert_eq!(t.poll(100), Some(Transition::Show));
    }

    #[test]
    fn reentering_during_hide_delay_keeps_visible() {
        let mut t = DelayedToggle::new(0, 200);
        t.request_show(0);
        t.request_hide(10);
        assert!(t.is_pending());
        assert_eq!(t.request_show(50), None);
        assert!(!t.is_pending());
        assert_eq!(t.poll(1_000), None);
        assert!(t.is_visible());
    }

    #[test]
    fn force_hide_drops_pending() {
        let mut t = DelayedToggle::new(0, 200);
        t.request_show(0);
        t.request_hide(10);
        assert_eq!(t.force_hide(), Some(Transition::Hide));
        assert_eq!(t.poll(1_000), None);
        assert_eq!(t.force_hide(), None);
    }
}
