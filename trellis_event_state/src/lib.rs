// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Event State: small, deterministic state machines for interaction timing.
//!
//! Each machine is driven by explicit millisecond timestamps supplied by the
//! host, so nothing here owns a timer or a clock and every transition is
//! reproducible in tests.
//!
//! - [`delay`]: cancellable show/hide delays for hover and focus intent (tooltips).
//! - [`typeahead`]: a timed character buffer for jump-to-item in lists and menus.
//! - [`frame`]: coalesces bursts of scroll/resize work into one unit per frame.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod delay;
pub mod frame;
pub mod typeahead;
