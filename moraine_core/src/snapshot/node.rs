// Copyright 2026 the Moraine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The snapshot node: one entry in the save/restore stack.

use bitflags::bitflags;
use kurbo::Rect;

use moraine_geometry::{Region, Transform3d};

use super::clip::ClipState;
use super::id::{FboId, LayerId, Viewport};

/// Sentinel arena index meaning "no node".
pub(crate) const INVALID: usize = usize::MAX;

bitflags! {
    /// Per-node state bits.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SnapshotFlags: u8 {
        /// The clip was modified since this node was pushed.
        const CLIP_SET = 1 << 0;
        /// Drawing under this node targets an offscreen layer; the node
        /// resolves a paint-region sink.
        const FBO_TARGET = 1 << 1;
    }
}

bitflags! {
    /// Save-mode selector: which state a save copies into a private
    /// instance. Unset bits alias the parent's storage instead.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SaveFlags: u8 {
        /// Copy the transform into a private, mutable instance.
        const MATRIX = 1 << 0;
        /// Copy the clip (rectangle and any active region) into a
        /// private, mutable instance.
        const CLIP = 1 << 1;
    }
}

impl SaveFlags {
    /// Copy both transform and clip.
    pub const ALL: Self = Self::MATRIX.union(Self::CLIP);
}

/// Owned-or-aliased storage for per-node transform and clip state.
///
/// `Inherited` resolves by walking `previous` links to the nearest owner;
/// the root always owns its storage, so resolution always terminates.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Slot<T> {
    /// This node's private, mutable copy.
    Owned(T),
    /// Read-only alias of the parent's state.
    Inherited,
}

impl<T> Slot<T> {
    pub(crate) const fn is_inherited(&self) -> bool {
        matches!(self, Self::Inherited)
    }
}

/// One entry in the save/restore stack.
///
/// Constructed by [`SnapshotStack`](super::SnapshotStack); read through
/// the stack's accessors. Render-target fields (`fbo`, `viewport`,
/// `height`, `alpha`, `invisible`) are copied from the parent
/// unconditionally — they are not part of save/restore granularity.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub(crate) flags: SnapshotFlags,
    /// Arena index of the parent node; [`INVALID`] for the root.
    pub(crate) previous: usize,
    pub(crate) layer: Option<LayerId>,
    pub(crate) fbo: FboId,
    pub(crate) invisible: bool,
    pub(crate) empty: bool,
    pub(crate) viewport: Viewport,
    pub(crate) height: u32,
    pub(crate) alpha: f32,
    pub(crate) transform: Slot<Transform3d>,
    pub(crate) clip: Slot<ClipState>,
    /// Arena index of the node owning the paint-region sink, or
    /// [`INVALID`] when this node does not target a layer.
    pub(crate) region_sink: usize,
    /// The sink itself; present only on the node that entered the layer.
    pub(crate) paint_region: Option<Region>,
    /// Scratch for the last local-clip query; `None` when stale.
    pub(crate) local_clip: Option<Rect>,
}

impl Snapshot {
    /// Creates a root node that owns its own (default) storage and
    /// aliases nothing.
    pub(crate) fn root(viewport: Viewport) -> Self {
        Self {
            flags: SnapshotFlags::empty(),
            previous: INVALID,
            layer: None,
            fbo: FboId::default(),
            invisible: false,
            empty: false,
            viewport,
            height: viewport.height,
            alpha: 1.0,
            transform: Slot::Owned(Transform3d::IDENTITY),
            clip: Slot::Owned(ClipState::default()),
            region_sink: INVALID,
            paint_region: None,
            local_clip: None,
        }
    }

    /// Builds a child of `parent` (at arena index `previous`).
    ///
    /// `transform` and `clip` slots are chosen by the caller from the
    /// save-mode selector; everything render-target-level is copied.
    pub(crate) fn child(
        parent: &Self,
        previous: usize,
        transform: Slot<Transform3d>,
        clip: Slot<ClipState>,
    ) -> Self {
        let mut flags = SnapshotFlags::empty();
        let mut region_sink = INVALID;
        if parent.flags.contains(SnapshotFlags::FBO_TARGET) {
            flags |= SnapshotFlags::FBO_TARGET;
            region_sink = parent.region_sink;
        }
        Self {
            flags,
            previous,
            layer: None,
            fbo: parent.fbo,
            invisible: parent.invisible,
            empty: false,
            viewport: parent.viewport,
            height: parent.height,
            alpha: parent.alpha,
            transform,
            clip,
            region_sink,
            paint_region: None,
            local_clip: None,
        }
    }

    /// A node is ignored (all drawing under it can be skipped) iff it is
    /// invisible or its clip is empty.
    #[inline]
    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        self.invisible || self.empty
    }

    /// The node's state bits.
    #[inline]
    #[must_use]
    pub const fn flags(&self) -> SnapshotFlags {
        self.flags
    }

    /// The layer this node redirects drawing to, if any.
    #[inline]
    #[must_use]
    pub const fn layer(&self) -> Option<LayerId> {
        self.layer
    }

    /// The active render target.
    #[inline]
    #[must_use]
    pub const fn fbo(&self) -> FboId {
        self.fbo
    }

    /// The active target's dimensions.
    #[inline]
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The active target's height in pixels.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The node's alpha, inherited by value from its parent.
    #[inline]
    #[must_use]
    pub const fn alpha(&self) -> f32 {
        self.alpha
    }

    /// The paint region accumulated while this node targeted a layer.
    ///
    /// Present only on the node that entered the layer target; a
    /// compositor reads it from the node returned by
    /// [`restore`](super::SnapshotStack::restore).
    #[inline]
    #[must_use]
    pub fn paint_region(&self) -> Option<&Region> {
        self.paint_region.as_ref()
    }
}
