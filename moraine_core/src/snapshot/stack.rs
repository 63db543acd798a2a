// Copyright 2026 the Moraine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The snapshot stack: arena storage, save/restore, and the mutation API.
//!
//! Nodes live in a `Vec` arena where the last element is the *current*
//! node and `previous` links walk toward the root at index 0. Save pushes,
//! restore pops; the chain is strictly linear, so LIFO ordering is a
//! caller contract (violating it is caught by the restore assert at the
//! root, not recovered from).
//!
//! All mutation happens on the current node. When the current node aliases
//! parent state (its slot is `Inherited`), a mutating call first *detaches*
//! it — clones the resolved parent state into private storage — so parent
//! state is never written through a child.

use alloc::vec::Vec;

use kurbo::Rect;

use moraine_geometry::{Region, Transform3d};

use crate::trace::{ClipEvent, LayerBeginEvent, RestoreEvent, SaveEvent, Tracer};

use super::clip::{ClipOp, ClipState};
use super::id::{FboId, LayerId, Viewport};
use super::node::{INVALID, SaveFlags, Slot, Snapshot, SnapshotFlags};

/// The ordered chain of snapshot nodes for one render pass.
///
/// Constructed once per pass with the target's dimensions; the root node
/// owns an identity transform and a viewport-sized clip.
pub struct SnapshotStack<'t> {
    nodes: Vec<Snapshot>,
    tracer: Tracer<'t>,
}

impl core::fmt::Debug for SnapshotStack<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SnapshotStack")
            .field("nodes", &self.nodes)
            .finish_non_exhaustive()
    }
}

impl<'t> SnapshotStack<'t> {
    /// Creates the stack for a render pass targeting `viewport`.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self::with_tracer(viewport, Tracer::none())
    }

    /// Like [`new`](Self::new), with trace instrumentation attached.
    #[must_use]
    pub fn with_tracer(viewport: Viewport, tracer: Tracer<'t>) -> Self {
        let mut root = Snapshot::root(viewport);
        let clip = Rect::new(0.0, 0.0, f64::from(viewport.width), f64::from(viewport.height));
        root.clip = Slot::Owned(ClipState::new(clip));
        root.flags |= SnapshotFlags::CLIP_SET;
        Self {
            nodes: alloc::vec![root],
            tracer,
        }
    }

    // -- Save / restore --

    /// Pushes a new snapshot and returns the new depth (root is 0).
    ///
    /// `save` selects which state the new node privately copies; unset
    /// bits alias the parent's storage, read-only until a mutating call
    /// detaches them.
    pub fn save(&mut self, save: SaveFlags) -> usize {
        let parent = self.nodes.len() - 1;
        let transform = if save.contains(SaveFlags::MATRIX) {
            Slot::Owned(*self.resolved_transform(parent))
        } else {
            Slot::Inherited
        };
        let clip = if save.contains(SaveFlags::CLIP) {
            Slot::Owned(self.resolved_clip(parent).clone())
        } else {
            Slot::Inherited
        };
        let child = Snapshot::child(&self.nodes[parent], parent, transform, clip);
        self.nodes.push(child);

        let depth = self.depth();
        self.tracer.save(&SaveEvent { depth, flags: save });
        depth
    }

    /// Pops the current snapshot, resuming its parent, and returns the
    /// discarded node (so a compositor can inspect its layer target and
    /// paint region before dropping it).
    ///
    /// Private state owned by the node dies with it; aliased parent state
    /// is untouched.
    ///
    /// # Panics
    ///
    /// Panics if only the root remains — a restore without a matching
    /// save.
    pub fn restore(&mut self) -> Snapshot {
        assert!(
            self.nodes.len() > 1,
            "cannot restore past the root snapshot"
        );
        let node = self.nodes.pop().unwrap_or_else(|| unreachable!());
        self.tracer.restore(&RestoreEvent {
            depth: self.depth(),
        });
        node
    }

    /// Pops until the stack is back at `depth`.
    ///
    /// # Panics
    ///
    /// Panics if `depth` exceeds the current depth.
    pub fn restore_to(&mut self, depth: usize) {
        assert!(depth <= self.depth(), "cannot restore upward to {depth}");
        while self.depth() > depth {
            let _ = self.restore();
        }
    }

    /// Depth of the current node; the root is 0.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.nodes.len() - 1
    }

    /// The current node.
    #[inline]
    #[must_use]
    pub fn current(&self) -> &Snapshot {
        self.nodes.last().unwrap_or_else(|| unreachable!())
    }

    // -- Clipping --

    /// Applies `op` with a rectangle in caller space: `rect` is mapped
    /// through the current transform first. Returns whether the clip
    /// changed.
    pub fn clip(&mut self, rect: Rect, op: ClipOp) -> bool {
        let mapped = self.transform().map_rect(rect);
        self.clip_transformed(mapped, op)
    }

    /// Applies `op` with a rectangle already in the chain's coordinate
    /// space. Returns whether the clip changed.
    pub fn clip_transformed(&mut self, rect: Rect, op: ClipOp) -> bool {
        // Unsupported paths return before detaching, leaving alias state
        // as well as clip values untouched.
        if op == ClipOp::ReverseDifference {
            self.tracer.clip(&ClipEvent {
                op,
                changed: false,
                region_active: self.clip_region().is_some(),
            });
            return false;
        }
        if !cfg!(feature = "region-clip") && matches!(op, ClipOp::Difference | ClipOp::Xor) {
            self.tracer.clip(&ClipEvent {
                op,
                changed: false,
                region_active: false,
            });
            return false;
        }

        let i = self.nodes.len() - 1;
        self.detach_clip(i);
        let changed = match &mut self.nodes[i].clip {
            Slot::Owned(clip) => clip.apply(rect, op),
            Slot::Inherited => unreachable!("clip detached above"),
        };
        if changed {
            self.mark_clip_changed(i);
        }
        self.tracer.clip(&ClipEvent {
            op,
            changed,
            region_active: self.clip_region().is_some(),
        });
        changed
    }

    /// Sets the clip rectangle directly, bypassing set-operation algebra.
    /// Discards any active region.
    pub fn set_clip(&mut self, rect: Rect) {
        let i = self.nodes.len() - 1;
        self.detach_clip(i);
        match &mut self.nodes[i].clip {
            Slot::Owned(clip) => clip.set(rect),
            Slot::Inherited => unreachable!("clip detached above"),
        }
        self.mark_clip_changed(i);
    }

    /// Re-anchors the current node to its own private clip storage and
    /// sets the new bounds — the explicit detach from parent-shared clip
    /// state.
    pub fn reset_clip(&mut self, rect: Rect) {
        let i = self.nodes.len() - 1;
        self.nodes[i].clip = Slot::Owned(ClipState::new(rect));
        self.mark_clip_changed(i);
    }

    /// The current clip's bounding rectangle, in the chain's coordinate
    /// space.
    #[inline]
    #[must_use]
    pub fn clip_rect(&self) -> Rect {
        self.resolved_clip(self.nodes.len() - 1).rect()
    }

    /// The current clip region, present only while the clip shape is
    /// non-rectangular.
    #[inline]
    #[must_use]
    pub fn clip_region(&self) -> Option<&Region> {
        self.resolved_clip(self.nodes.len() - 1).region()
    }

    /// The current clip mapped back through the inverse of the current
    /// transform: the clip as seen in the coordinate space *before* the
    /// transform was applied. Cached per node until the clip or transform
    /// changes. A non-invertible transform yields a zero-area rectangle.
    pub fn local_clip(&mut self) -> Rect {
        let i = self.nodes.len() - 1;
        if let Some(cached) = self.nodes[i].local_clip {
            return cached;
        }
        let rect = self.clip_rect();
        let local = match self.transform().inverse() {
            Some(inverse) => inverse.map_rect(rect),
            None => Rect::ZERO,
        };
        self.nodes[i].local_clip = Some(local);
        local
    }

    // -- Transforms --

    /// The current transform.
    #[inline]
    #[must_use]
    pub fn transform(&self) -> &Transform3d {
        self.resolved_transform(self.nodes.len() - 1)
    }

    /// Re-anchors the current node to its own private transform storage
    /// and loads a pure translation, discarding any prior
    /// rotation/scale/perspective.
    pub fn reset_transform(&mut self, x: f64, y: f64, z: f64) {
        let i = self.nodes.len() - 1;
        self.nodes[i].transform = Slot::Owned(Transform3d::from_translation(x, y, z));
        self.nodes[i].local_clip = None;
    }

    /// Post-multiplies a translation onto the current transform,
    /// detaching it from the parent first if aliased.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.concat(&Transform3d::from_translation(dx, dy, 0.0));
    }

    /// Post-multiplies `other` onto the current transform, detaching it
    /// from the parent first if aliased.
    pub fn concat(&mut self, other: &Transform3d) {
        let i = self.nodes.len() - 1;
        self.detach_transform(i);
        match &mut self.nodes[i].transform {
            Slot::Owned(t) => *t = *t * *other,
            Slot::Inherited => unreachable!("transform detached above"),
        }
        self.nodes[i].local_clip = None;
    }

    // -- Visibility --

    /// Returns whether all drawing under the current node can be skipped.
    #[inline]
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        self.current().is_ignored()
    }

    /// Marks the current node (and so its descendants) invisible.
    pub fn set_invisible(&mut self, invisible: bool) {
        let i = self.nodes.len() - 1;
        self.nodes[i].invisible = invisible;
    }

    /// Sets the current node's alpha, clamped to `[0, 1]`.
    pub fn set_alpha(&mut self, alpha: f32) {
        let i = self.nodes.len() - 1;
        self.nodes[i].alpha = alpha.clamp(0.0, 1.0);
    }

    // -- Layer targets --

    /// Redirects the current node's drawing to an offscreen layer: sets
    /// the layer-target flag, records the layer and framebuffer, adopts
    /// the layer's dimensions, and installs a fresh paint-region sink that
    /// this node and its descendants accumulate into.
    pub fn begin_layer(&mut self, layer: LayerId, fbo: FboId, viewport: Viewport) {
        let i = self.nodes.len() - 1;
        let node = &mut self.nodes[i];
        node.flags |= SnapshotFlags::FBO_TARGET;
        node.layer = Some(layer);
        node.fbo = fbo;
        node.viewport = viewport;
        node.height = viewport.height;
        node.paint_region = Some(Region::new());
        node.region_sink = i;
        self.tracer.layer_begin(&LayerBeginEvent {
            depth: i,
            layer,
            fbo,
        });
    }

    /// ORs a device-space rectangle into the nearest paint-region sink.
    /// Returns `false` when no layer target is active.
    pub fn mark_painted(&mut self, rect: Rect) -> bool {
        let sink = self.current().region_sink;
        if sink == INVALID {
            return false;
        }
        let Some(region) = self.nodes[sink].paint_region.as_mut() else {
            return false;
        };
        region.union_rect(rect);
        true
    }

    /// The paint region accumulated for the active layer target, if any.
    #[must_use]
    pub fn paint_region(&self) -> Option<&Region> {
        let sink = self.current().region_sink;
        if sink == INVALID {
            return None;
        }
        self.nodes[sink].paint_region.as_ref()
    }

    // -- Internal helpers --

    /// Resolves the transform visible at node `i`, walking `previous`
    /// links past `Inherited` slots. The root owns its storage, so the
    /// walk always terminates.
    fn resolved_transform(&self, i: usize) -> &Transform3d {
        let mut idx = i;
        loop {
            match &self.nodes[idx].transform {
                Slot::Owned(t) => return t,
                Slot::Inherited => idx = self.nodes[idx].previous,
            }
        }
    }

    /// Resolves the clip visible at node `i`.
    fn resolved_clip(&self, i: usize) -> &ClipState {
        let mut idx = i;
        loop {
            match &self.nodes[idx].clip {
                Slot::Owned(c) => return c,
                Slot::Inherited => idx = self.nodes[idx].previous,
            }
        }
    }

    /// Clones the resolved parent clip into private storage if node `i`
    /// currently aliases it.
    fn detach_clip(&mut self, i: usize) {
        if self.nodes[i].clip.is_inherited() {
            let copy = self.resolved_clip(i).clone();
            self.nodes[i].clip = Slot::Owned(copy);
        }
    }

    /// Clones the resolved parent transform into private storage if node
    /// `i` currently aliases it.
    fn detach_transform(&mut self, i: usize) {
        if self.nodes[i].transform.is_inherited() {
            let copy = *self.resolved_transform(i);
            self.nodes[i].transform = Slot::Owned(copy);
        }
    }

    /// Bookkeeping after any clip change on node `i`.
    fn mark_clip_changed(&mut self, i: usize) {
        let empty = match &self.nodes[i].clip {
            Slot::Owned(clip) => clip.is_empty(),
            Slot::Inherited => unreachable!("callers detach before mutating"),
        };
        let node = &mut self.nodes[i];
        node.flags |= SnapshotFlags::CLIP_SET;
        node.empty = empty;
        node.local_clip = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack() -> SnapshotStack<'static> {
        SnapshotStack::new(Viewport::new(200, 200))
    }

    #[test]
    fn root_clip_covers_viewport() {
        let s = stack();
        assert_eq!(s.depth(), 0);
        assert_eq!(s.clip_rect(), Rect::new(0.0, 0.0, 200.0, 200.0));
        assert_eq!(*s.transform(), Transform3d::IDENTITY);
        assert!(!s.is_ignored());
    }

    #[test]
    fn save_and_restore_round_trip() {
        let mut s = stack();
        let depth = s.save(SaveFlags::ALL);
        assert_eq!(depth, 1);
        s.set_clip(Rect::new(10.0, 10.0, 20.0, 20.0));
        let _ = s.restore();
        assert_eq!(s.depth(), 0);
        assert_eq!(s.clip_rect(), Rect::new(0.0, 0.0, 200.0, 200.0));
    }

    #[test]
    fn restore_to_unwinds_multiple_levels() {
        let mut s = stack();
        let d = s.save(SaveFlags::empty());
        let _ = s.save(SaveFlags::empty());
        let _ = s.save(SaveFlags::ALL);
        s.restore_to(d);
        assert_eq!(s.depth(), d);
        s.restore_to(0);
        assert_eq!(s.depth(), 0);
    }

    #[test]
    #[should_panic(expected = "cannot restore past the root snapshot")]
    fn restore_past_root_panics() {
        let mut s = stack();
        let _ = s.restore();
    }

    #[test]
    fn aliased_clip_mutation_does_not_touch_parent() {
        let mut s = stack();
        s.save(SaveFlags::empty());
        // The child aliases the parent's clip until the first mutation.
        assert!(s.clip(Rect::new(50.0, 50.0, 100.0, 100.0), ClipOp::Intersect));
        assert_eq!(s.clip_rect(), Rect::new(50.0, 50.0, 100.0, 100.0));
        let _ = s.restore();
        assert_eq!(s.clip_rect(), Rect::new(0.0, 0.0, 200.0, 200.0));
    }

    #[test]
    fn aliased_transform_mutation_does_not_touch_parent() {
        let mut s = stack();
        s.save(SaveFlags::empty());
        s.translate(30.0, 40.0);
        assert_eq!(s.transform().col(3), [30.0, 40.0, 0.0, 1.0]);
        let _ = s.restore();
        assert_eq!(*s.transform(), Transform3d::IDENTITY);
    }

    #[test]
    fn private_copy_sees_parent_state_at_save_time() {
        let mut s = stack();
        s.reset_transform(5.0, 5.0, 0.0);
        s.save(SaveFlags::MATRIX);
        assert_eq!(s.transform().col(3), [5.0, 5.0, 0.0, 1.0]);
        s.translate(1.0, 0.0);
        let _ = s.restore();
        assert_eq!(s.transform().col(3), [5.0, 5.0, 0.0, 1.0]);
    }

    #[test]
    fn intersect_in_caller_space_maps_through_transform() {
        let mut s = stack();
        s.save(SaveFlags::ALL);
        s.reset_transform(100.0, 0.0, 0.0);
        assert!(s.clip(Rect::new(0.0, 0.0, 50.0, 50.0), ClipOp::Intersect));
        // The caller-space rect lands at x ∈ [100, 150].
        assert_eq!(s.clip_rect(), Rect::new(100.0, 0.0, 150.0, 50.0));
    }

    #[test]
    fn intersect_fast_path_stays_rectangular() {
        let mut s = stack();
        s.set_clip(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(s.clip(Rect::new(50.0, -10.0, 150.0, 50.0), ClipOp::Intersect));
        assert_eq!(s.clip_rect(), Rect::new(50.0, 0.0, 100.0, 50.0));
        assert!(s.clip_region().is_none());
    }

    #[test]
    fn union_fast_path_takes_bounding_box() {
        let mut s = stack();
        s.set_clip(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(s.clip(Rect::new(20.0, 20.0, 30.0, 30.0), ClipOp::Union));
        assert_eq!(s.clip_rect(), Rect::new(0.0, 0.0, 30.0, 30.0));
        assert!(s.clip_region().is_none());
    }

    #[test]
    fn empty_intersection_marks_node_ignored() {
        let mut s = stack();
        s.save(SaveFlags::CLIP);
        assert!(s.clip(Rect::new(300.0, 300.0, 400.0, 400.0), ClipOp::Intersect));
        assert_eq!(s.clip_rect(), Rect::ZERO);
        assert!(s.is_ignored());
        let _ = s.restore();
        assert!(!s.is_ignored());
    }

    #[test]
    fn reverse_difference_changes_nothing() {
        let mut s = stack();
        s.save(SaveFlags::empty());
        let before = s.clip_rect();
        assert!(!s.clip(Rect::new(10.0, 10.0, 20.0, 20.0), ClipOp::ReverseDifference));
        assert_eq!(s.clip_rect(), before);
        assert!(s.clip_region().is_none());
        // It must not set the clip flag or detach the alias either.
        assert!(!s.current().flags().contains(SnapshotFlags::CLIP_SET));
    }

    #[test]
    fn set_clip_sets_flag() {
        let mut s = stack();
        s.save(SaveFlags::empty());
        assert!(!s.current().flags().contains(SnapshotFlags::CLIP_SET));
        s.set_clip(Rect::new(1.0, 1.0, 2.0, 2.0));
        assert!(s.current().flags().contains(SnapshotFlags::CLIP_SET));
    }

    #[test]
    fn reset_clip_detaches_and_sets() {
        let mut s = stack();
        s.save(SaveFlags::empty());
        s.reset_clip(Rect::new(5.0, 5.0, 50.0, 50.0));
        assert_eq!(s.clip_rect(), Rect::new(5.0, 5.0, 50.0, 50.0));
        let _ = s.restore();
        assert_eq!(s.clip_rect(), Rect::new(0.0, 0.0, 200.0, 200.0));
    }

    #[test]
    fn local_clip_inverse_translates() {
        let mut s = stack();
        s.set_clip(Rect::new(10.0, 10.0, 20.0, 20.0));
        s.reset_transform(5.0, 7.0, 0.0);
        assert_eq!(s.local_clip(), Rect::new(5.0, 3.0, 15.0, 13.0));
    }

    #[test]
    fn local_clip_cache_invalidated_by_transform_change() {
        let mut s = stack();
        s.set_clip(Rect::new(10.0, 10.0, 20.0, 20.0));
        assert_eq!(s.local_clip(), Rect::new(10.0, 10.0, 20.0, 20.0));
        s.reset_transform(5.0, 7.0, 0.0);
        assert_eq!(s.local_clip(), Rect::new(5.0, 3.0, 15.0, 13.0));
    }

    #[test]
    fn local_clip_with_singular_transform_is_zero_area() {
        let mut s = stack();
        s.set_clip(Rect::new(10.0, 10.0, 20.0, 20.0));
        s.concat(&Transform3d::from_scale(0.0, 1.0, 1.0));
        assert_eq!(s.local_clip(), Rect::ZERO);
    }

    #[test]
    fn invisible_is_inherited_and_ignored() {
        let mut s = stack();
        s.set_invisible(true);
        s.save(SaveFlags::empty());
        assert!(s.is_ignored());
        let _ = s.restore();
        assert!(s.is_ignored());
        s.set_invisible(false);
        assert!(!s.is_ignored());
    }

    #[test]
    fn alpha_is_copied_and_clamped() {
        let mut s = stack();
        s.set_alpha(2.5);
        assert_eq!(s.current().alpha(), 1.0);
        s.set_alpha(0.25);
        s.save(SaveFlags::empty());
        assert_eq!(s.current().alpha(), 0.25);
    }

    #[test]
    fn begin_layer_installs_sink_and_flag() {
        let mut s = stack();
        s.save(SaveFlags::ALL);
        s.begin_layer(LayerId(7), FboId(2), Viewport::new(64, 64));
        let node = s.current();
        assert!(node.flags().contains(SnapshotFlags::FBO_TARGET));
        assert_eq!(node.layer(), Some(LayerId(7)));
        assert_eq!(node.fbo(), FboId(2));
        assert_eq!(node.viewport(), Viewport::new(64, 64));
        assert_eq!(node.height(), 64);
        assert!(s.paint_region().is_some());
    }

    #[test]
    fn descendants_accumulate_into_layer_sink() {
        let mut s = stack();
        s.save(SaveFlags::ALL);
        s.begin_layer(LayerId(1), FboId(1), Viewport::new(64, 64));
        s.save(SaveFlags::empty());
        s.save(SaveFlags::empty());
        assert!(s.mark_painted(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(s.mark_painted(Rect::new(10.0, 0.0, 20.0, 10.0)));
        let _ = s.restore();
        let _ = s.restore();
        // Back on the layer node: both rects landed in its sink.
        let region = s.paint_region().unwrap();
        assert!(region.is_rect());
        assert_eq!(region.bounds(), Rect::new(0.0, 0.0, 20.0, 10.0));
        // The popped layer node carries the sink out for compositing.
        let layer_node = s.restore();
        assert_eq!(layer_node.layer(), Some(LayerId(1)));
        assert!(layer_node.paint_region().is_some());
        // Below the layer there is no sink.
        assert!(!s.mark_painted(Rect::new(0.0, 0.0, 1.0, 1.0)));
        assert!(s.paint_region().is_none());
    }

    #[cfg(feature = "region-clip")]
    mod region_mode {
        use super::*;

        #[test]
        fn difference_collapses_back_to_rect() {
            let mut s = stack();
            s.set_clip(Rect::new(0.0, 0.0, 100.0, 100.0));
            assert!(s.clip(Rect::new(0.0, 0.0, 100.0, 50.0), ClipOp::Difference));
            assert_eq!(s.clip_rect(), Rect::new(0.0, 50.0, 100.0, 100.0));
            assert!(s.clip_region().is_none());
        }

        #[test]
        fn difference_hole_keeps_region_active() {
            let mut s = stack();
            s.set_clip(Rect::new(0.0, 0.0, 30.0, 30.0));
            assert!(s.clip(Rect::new(10.0, 10.0, 20.0, 20.0), ClipOp::Difference));
            assert!(s.clip_region().is_some());
            assert_eq!(s.clip_rect(), Rect::new(0.0, 0.0, 30.0, 30.0));
        }

        #[test]
        fn region_state_is_private_after_detach() {
            let mut s = stack();
            s.set_clip(Rect::new(0.0, 0.0, 30.0, 30.0));
            s.save(SaveFlags::empty());
            assert!(s.clip(Rect::new(10.0, 10.0, 20.0, 20.0), ClipOp::Difference));
            assert!(s.clip_region().is_some());
            let _ = s.restore();
            // The parent never saw the region upgrade.
            assert!(s.clip_region().is_none());
            assert_eq!(s.clip_rect(), Rect::new(0.0, 0.0, 30.0, 30.0));
        }

        #[test]
        fn saved_clip_copy_includes_active_region() {
            let mut s = stack();
            s.set_clip(Rect::new(0.0, 0.0, 30.0, 30.0));
            assert!(s.clip(Rect::new(10.0, 10.0, 20.0, 20.0), ClipOp::Difference));
            s.save(SaveFlags::CLIP);
            assert!(s.clip_region().is_some());
            // Mutating the private copy leaves the parent's region alone.
            assert!(s.clip(Rect::new(0.0, 0.0, 30.0, 30.0), ClipOp::Replace));
            assert!(s.clip_region().is_none());
            let _ = s.restore();
            assert!(s.clip_region().is_some());
        }
    }

    #[cfg(not(feature = "region-clip"))]
    mod region_disabled {
        use super::*;

        #[test]
        fn difference_is_rejected_without_detaching() {
            let mut s = stack();
            s.save(SaveFlags::empty());
            assert!(!s.clip(Rect::new(0.0, 0.0, 100.0, 50.0), ClipOp::Difference));
            assert_eq!(s.clip_rect(), Rect::new(0.0, 0.0, 200.0, 200.0));
            assert!(!s.current().flags().contains(SnapshotFlags::CLIP_SET));
        }

        #[test]
        fn xor_is_rejected() {
            let mut s = stack();
            let before = s.clip_rect();
            assert!(!s.clip(Rect::new(10.0, 10.0, 20.0, 20.0), ClipOp::Xor));
            assert_eq!(s.clip_rect(), before);
        }
    }

    #[cfg(feature = "trace")]
    mod traced {
        use alloc::vec::Vec;

        use crate::trace::{ClipEvent, RestoreEvent, SaveEvent, TraceSink};

        use super::*;

        #[derive(Default)]
        struct Recorder {
            saves: usize,
            restores: usize,
            clips: Vec<ClipEvent>,
        }

        impl TraceSink for Recorder {
            fn on_save(&mut self, _e: &SaveEvent) {
                self.saves += 1;
            }

            fn on_restore(&mut self, _e: &RestoreEvent) {
                self.restores += 1;
            }

            fn on_clip(&mut self, e: &ClipEvent) {
                self.clips.push(*e);
            }
        }

        #[test]
        fn stack_emits_events() {
            let mut sink = Recorder::default();
            {
                let mut s = SnapshotStack::with_tracer(
                    Viewport::new(100, 100),
                    crate::trace::Tracer::new(&mut sink),
                );
                s.save(SaveFlags::ALL);
                let _ = s.clip(Rect::new(0.0, 0.0, 50.0, 50.0), ClipOp::Intersect);
                let _ = s.restore();
            }
            assert_eq!(sink.saves, 1);
            assert_eq!(sink.restores, 1);
            assert_eq!(sink.clips.len(), 1);
            assert!(sink.clips[0].changed);
        }
    }
}
