// Copyright 2026 the Moraine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry primitives consumed by the moraine snapshot stack.
//!
//! `moraine_geometry` provides the two pieces of geometry the snapshot
//! core treats as opaque capabilities:
//!
//! **[`Transform3d`]** — a column-major 4×4 transform with translation
//! loading, multiplication, inversion, and axis-aligned rectangle mapping
//! (map the four corners, take the bounding box).
//!
//! **[`Region`]** — a general, possibly non-rectangular area supporting
//! boolean set operations against rectangles. Stored as sorted horizontal
//! bands of sorted spans, so rectangularity and emptiness are O(1)
//! queries and bounds extraction is cheap.
//!
//! Axis-aligned rectangles are [`kurbo::Rect`] throughout.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

mod region;
mod transform;

pub use region::Region;
pub use transform::Transform3d;
