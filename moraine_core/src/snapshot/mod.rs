// Copyright 2026 the Moraine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The snapshot save/restore model.
//!
//! A *snapshot* is one entry in the save/restore stack, bundling:
//!
//! - A transform slot — either a private copy or an alias of the parent's
//!   transform, selected by [`SaveFlags::MATRIX`] at save time.
//! - A clip slot — same ownership rule, selected by [`SaveFlags::CLIP`].
//!   The clip itself is a [`ClipState`]: a fast axis-aligned rectangle
//!   that lazily upgrades to a general region only when a set operation
//!   demands it, and downgrades back when the shape collapses.
//! - Render-target state — [`FboId`], [`Viewport`], surface height, and a
//!   paint-region sink when the node targets an offscreen layer.
//! - Visibility — `invisible` (inherited, set by the caller) and `empty`
//!   (derived, set only when the clip collapses to nothing).
//!
//! Nodes live in a [`SnapshotStack`] arena; the chain of `previous` links
//! is strictly linear and restore order must mirror save order (LIFO).
//! Aliased state is read-only through the child: every clip- or
//! transform-mutating call first detaches the current node onto private
//! storage, so a parent's state is never altered through a child.

mod clip;
mod id;
mod node;
mod stack;

pub use clip::{ClipOp, ClipState};
pub use id::{FboId, LayerId, Viewport};
pub use node::{SaveFlags, Snapshot, SnapshotFlags};
pub use stack::SnapshotStack;
