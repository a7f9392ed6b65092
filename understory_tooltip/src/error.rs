// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Usage errors reported by the controller.

/// Misuse of the single-overlay contract.
///
/// Every other failure mode (stale handles, unknown scroll containers, deactivating
/// a non-owner) is a silent no-op.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TooltipError {
    /// A push reached the controller before any overlay was bound.
    #[error("tooltip overlay has not been mounted yet")]
    NotMounted,
    /// A second overlay tried to bind while one is already bound.
    #[error("tooltip overlay can only be mounted once")]
    AlreadyMounted,
}
