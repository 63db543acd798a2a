// Copyright 2026 the Moraine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Save/restore snapshot stack for a 2D hardware-accelerated renderer.
//!
//! `moraine_core` tracks *where and how* drawing is constrained: the
//! current coordinate transform, the current clip shape, the active render
//! target, and visibility state, with nested save/restore semantics. It
//! performs no drawing itself.
//!
//! # Architecture
//!
//! A render pass owns one [`SnapshotStack`](snapshot::SnapshotStack). Each
//! save pushes a [snapshot node](snapshot) that either privately copies or
//! aliases its parent's transform and clip (selected per save via
//! [`SaveFlags`](snapshot::SaveFlags)); each restore pops back to the
//! parent. Between save and restore, draw calls mutate the *current* node
//! only and query it for culling decisions:
//!
//! ```text
//!   save(flags) ──► mutate clip / transform ──► is_ignored()? ──► restore()
//!                        │
//!                        ▼
//!          ClipState: rect fast path ⇄ region upgrade/downgrade
//! ```
//!
//! **[`snapshot`]** — The node, the stack, clip algebra, and save modes.
//! Clips stay on a cheap rectangle path until a set operation produces a
//! genuinely non-rectangular result, then upgrade to a
//! [`Region`](moraine_geometry::Region) and downgrade back as soon as the
//! shape collapses to a rectangle again.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types
//! for instrumenting save/restore/clip traffic, with zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `region-clip` (**enabled** by default): Enables the general-region
//!   clip path. When disabled, Difference and Xor clip operations are
//!   no-ops reporting "unchanged" and only rectangle intersect, union, and
//!   replace remain functional.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod snapshot;
pub mod trace;
