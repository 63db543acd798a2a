// Copyright 2026 the Moraine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for snapshot traffic.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! the snapshot stack calls on save, restore, clip, and layer operations.
//! All method bodies default to no-ops, so implementing only the events
//! you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace`
//! feature is **off**, every `Tracer` method compiles to nothing (zero
//! overhead). When **on**, each method performs a single `Option` branch
//! before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).

use crate::snapshot::{ClipOp, FboId, LayerId, SaveFlags};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a snapshot is pushed.
#[derive(Clone, Copy, Debug)]
pub struct SaveEvent {
    /// Stack depth after the push (root is depth 0).
    pub depth: usize,
    /// Which state the new node privately copied.
    pub flags: SaveFlags,
}

/// Emitted when a snapshot is popped.
#[derive(Clone, Copy, Debug)]
pub struct RestoreEvent {
    /// Stack depth after the pop.
    pub depth: usize,
}

/// Emitted after a clip call on the current node.
#[derive(Clone, Copy, Debug)]
pub struct ClipEvent {
    /// The requested set operation.
    pub op: ClipOp,
    /// Whether the clip changed.
    pub changed: bool,
    /// Whether a general region is active after the call.
    pub region_active: bool,
}

/// Emitted when the current node is redirected to an offscreen layer.
#[derive(Clone, Copy, Debug)]
pub struct LayerBeginEvent {
    /// Stack depth of the redirected node.
    pub depth: usize,
    /// The target layer.
    pub layer: LayerId,
    /// The target framebuffer.
    pub fbo: FboId,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the snapshot stack.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after a save pushes a new snapshot.
    fn on_save(&mut self, e: &SaveEvent) {
        _ = e;
    }

    /// Called after a restore pops the current snapshot.
    fn on_restore(&mut self, e: &RestoreEvent) {
        _ = e;
    }

    /// Called after a clip operation.
    fn on_clip(&mut self, e: &ClipEvent) {
        _ = e;
    }

    /// Called when a node begins targeting an offscreen layer.
    fn on_layer_begin(&mut self, e: &LayerBeginEvent) {
        _ = e;
    }
}

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`SaveEvent`].
    #[inline]
    pub fn save(&mut self, e: &SaveEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_save(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RestoreEvent`].
    #[inline]
    pub fn restore(&mut self, e: &RestoreEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_restore(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ClipEvent`].
    #[inline]
    pub fn clip(&mut self, e: &ClipEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_clip(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LayerBeginEvent`].
    #[inline]
    pub fn layer_begin(&mut self, e: &LayerBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_layer_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}
