// Copyright 2026 the Moraine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render-target identity types.

use core::fmt;

/// An opaque reference to an offscreen layer.
///
/// Layers are allocated and composited externally (by the layer cache and
/// the GPU backend). A snapshot node holds a `LayerId` only to record
/// *which* layer its drawing is redirected to; it never dereferences it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub u32);

impl fmt::Debug for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerId({})", self.0)
    }
}

/// An opaque render-target identifier.
///
/// `FboId(0)` is the main surface; non-zero values name offscreen
/// framebuffer objects assigned by the GPU backend.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FboId(pub u32);

impl fmt::Debug for FboId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FboId({})", self.0)
    }
}

/// Pixel dimensions of the active render target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Creates a viewport from pixel dimensions.
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}
