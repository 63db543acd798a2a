// Copyright 2026 the Moraine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! General (possibly non-rectangular) area with boolean set operations.
//!
//! A [`Region`] is stored as a sorted list of horizontal *bands*; each band
//! covers a y interval and holds a sorted list of disjoint x spans. Two
//! invariants are maintained by every mutation:
//!
//! 1. Spans within a band are sorted, disjoint, and non-adjacent (touching
//!    spans are merged).
//! 2. Vertically adjacent bands with identical span lists are merged.
//!
//! Together these make rectangularity an O(1) query — a region is a
//! rectangle iff it has exactly one band with exactly one span — which the
//! clip state relies on to downgrade back to the fast rectangle path.

use alloc::vec::Vec;

use kurbo::Rect;

/// One x interval inside a band.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Span {
    x0: f64,
    x1: f64,
}

/// A horizontal slab of the region: a y interval plus its x spans.
#[derive(Clone, Debug, PartialEq)]
struct Band {
    y0: f64,
    y1: f64,
    spans: Vec<Span>,
}

/// How two areas are combined by [`Region::combine_rect`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum CombineOp {
    Union,
    Intersect,
    Subtract,
    Xor,
}

/// A general area supporting boolean set operations against rectangles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Region {
    bands: Vec<Band>,
}

impl Region {
    /// Creates an empty region.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { bands: Vec::new() }
    }

    /// Creates a region covering a single rectangle.
    ///
    /// A degenerate (zero-area or inverted) rectangle produces an empty
    /// region.
    #[must_use]
    pub fn from_rect(r: Rect) -> Self {
        let mut region = Self::new();
        if r.x1 > r.x0 && r.y1 > r.y0 {
            region.bands.push(Band {
                y0: r.y0,
                y1: r.y1,
                spans: alloc::vec![Span { x0: r.x0, x1: r.x1 }],
            });
        }
        region
    }

    /// Returns `true` if the region covers no area.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Returns `true` if the region is exactly one rectangle.
    #[inline]
    #[must_use]
    pub fn is_rect(&self) -> bool {
        self.bands.len() == 1 && self.bands[0].spans.len() == 1
    }

    /// Returns the bounding rectangle, or [`Rect::ZERO`] if empty.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        if self.bands.is_empty() {
            return Rect::ZERO;
        }
        let mut x0 = f64::INFINITY;
        let mut x1 = f64::NEG_INFINITY;
        for band in &self.bands {
            x0 = x0.min(band.spans[0].x0);
            x1 = x1.max(band.spans[band.spans.len() - 1].x1);
        }
        Rect::new(x0, self.bands[0].y0, x1, self.bands[self.bands.len() - 1].y1)
    }

    /// Removes all area from the region.
    #[inline]
    pub fn clear(&mut self) {
        self.bands.clear();
    }

    /// ORs a rectangle into the region.
    pub fn union_rect(&mut self, r: Rect) {
        self.combine_rect(r, CombineOp::Union);
    }

    /// ANDs the region with a rectangle.
    pub fn intersect_rect(&mut self, r: Rect) {
        self.combine_rect(r, CombineOp::Intersect);
    }

    /// Subtracts a rectangle from the region.
    pub fn subtract_rect(&mut self, r: Rect) {
        self.combine_rect(r, CombineOp::Subtract);
    }

    /// XORs a rectangle into the region.
    pub fn xor_rect(&mut self, r: Rect) {
        self.combine_rect(r, CombineOp::Xor);
    }

    /// Rebuilds the band list as `self op rect`.
    fn combine_rect(&mut self, r: Rect, op: CombineOp) {
        let rect_valid = r.x1 > r.x0 && r.y1 > r.y0;
        if !rect_valid {
            // An empty operand only matters for intersection.
            if op == CombineOp::Intersect {
                self.clear();
            }
            return;
        }

        // Slab decomposition: every band edge plus the rectangle's edges.
        let mut cuts: Vec<f64> = Vec::with_capacity(self.bands.len() * 2 + 2);
        for band in &self.bands {
            cuts.push(band.y0);
            cuts.push(band.y1);
        }
        cuts.push(r.y0);
        cuts.push(r.y1);
        cuts.sort_unstable_by(f64::total_cmp);
        cuts.dedup();

        let rect_span = Span { x0: r.x0, x1: r.x1 };
        let mut out: Vec<Band> = Vec::new();
        for w in cuts.windows(2) {
            let (ya, yb) = (w[0], w[1]);
            if yb <= ya {
                continue;
            }
            // Each slab lies entirely inside or outside any band, because
            // all band edges are cut points.
            let spans_a = self
                .bands
                .iter()
                .find(|b| b.y0 <= ya && b.y1 >= yb)
                .map(|b| b.spans.as_slice())
                .unwrap_or(&[]);
            let spans_b: &[Span] = if r.y0 <= ya && r.y1 >= yb {
                core::slice::from_ref(&rect_span)
            } else {
                &[]
            };
            let combined = combine_spans(spans_a, spans_b, op);
            if combined.is_empty() {
                continue;
            }
            // Merge with the previous band when contiguous and identical.
            if let Some(last) = out.last_mut() {
                if last.y1 == ya && last.spans == combined {
                    last.y1 = yb;
                    continue;
                }
            }
            out.push(Band {
                y0: ya,
                y1: yb,
                spans: combined,
            });
        }
        self.bands = out;
    }
}

/// 1-D boolean combination of two sorted, disjoint span lists.
fn combine_spans(a: &[Span], b: &[Span], op: CombineOp) -> Vec<Span> {
    let mut cuts: Vec<f64> = Vec::with_capacity((a.len() + b.len()) * 2);
    for s in a.iter().chain(b) {
        cuts.push(s.x0);
        cuts.push(s.x1);
    }
    cuts.sort_unstable_by(f64::total_cmp);
    cuts.dedup();

    let covered = |spans: &[Span], xa: f64, xb: f64| {
        spans.iter().any(|s| s.x0 <= xa && s.x1 >= xb)
    };

    let mut out: Vec<Span> = Vec::new();
    for w in cuts.windows(2) {
        let (xa, xb) = (w[0], w[1]);
        if xb <= xa {
            continue;
        }
        let in_a = covered(a, xa, xb);
        let in_b = covered(b, xa, xb);
        let keep = match op {
            CombineOp::Union => in_a || in_b,
            CombineOp::Intersect => in_a && in_b,
            CombineOp::Subtract => in_a && !in_b,
            CombineOp::Xor => in_a != in_b,
        };
        if !keep {
            continue;
        }
        if let Some(last) = out.last_mut() {
            if last.x1 == xa {
                last.x1 = xb;
                continue;
            }
        }
        out.push(Span { x0: xa, x1: xb });
    }
    out
}
