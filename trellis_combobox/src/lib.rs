// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Combobox: the state machine behind select and autocomplete.
//!
//! - [`filter`] is pure: the same options, query, and [`FilterMode`] always give
//!   the same source indices, in source order. Labels and queries are compared
//!   after [`normalize`] (trimmed, case-folded); an empty query matches everything.
//! - [`ComboboxController`] layers the open flag, the active option, and the
//!   committed value on top. Active-option stepping uses the same skip-disabled,
//!   wrapping walk as roving focus ([`trellis_focus::step_enabled`]), but over the
//!   filtered list.
//! - Every mutating call returns the [`ComboboxEvent`]s it produced, so hosts can
//!   mirror query text, ARIA state, and committed values without callbacks.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod controller;
mod error;
mod filter;

pub use controller::{
    ComboboxConfig, ComboboxController, ComboboxEvent, ComboboxEvents, SelectionMode,
};
pub use error::ComboboxError;
pub use filter::{ComboboxOption, FilterMode, filter, normalize};
