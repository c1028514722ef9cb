// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Process-wide ARIA id allocation.

use alloc::format;
use alloc::string::String;
use core::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Allocate a fresh id of the form `trellis-<prefix>-<n>`.
///
/// The counter is shared by every widget in the process, so ids never collide
/// across documents or widget kinds.
pub fn next_id(prefix: &str) -> String {
    let n = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("trellis-{prefix}-{n}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_prefixed() {
        let a = next_id("menu");
        let b = next_id("menu");
        assert_ne!(a, b);
        assert!(a.starts_with("trellis-menu-"));
        assert!(next_id("tab").starts_with("trellis-tab-"));
    }
}
