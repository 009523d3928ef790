// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement oracle.
//!
//! Layout treats text extent as an external question: the renderer backend
//! owns fonts and shaping, and exposes only a measurement call. That call may
//! be expensive, so [`CachingTextMeasurer`] memoizes it per (text, font size).

use alloc::string::{String, ToString as _};
use hashbrown::HashMap;
use kurbo::Size;

/// The measurement oracle a renderer backend supplies to layout.
pub trait TextMeasurer {
    /// Measures the extent of `text` at the given font size.
    fn measure_text(&mut self, text: &str, font_size: f64) -> Size;
}

/// A measurer for UIs with no text-bearing leaves; every extent is zero.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullTextMeasurer;

impl TextMeasurer for NullTextMeasurer {
    fn measure_text(&mut self, _text: &str, _font_size: f64) -> Size {
        Size::ZERO
    }
}

/// A deterministic measurer with fixed per-character metrics.
///
/// Width is `chars * advance * font_size`, height is
/// `line_height * font_size`, with `advance` and `line_height` expressed as
/// fractions of the font size. Useful for tests and headless layout.
#[derive(Copy, Clone, Debug)]
pub struct FixedMetrics {
    /// Horizontal advance per character, as a fraction of the font size.
    pub advance: f64,
    /// Line height as a fraction of the font size.
    pub line_height: f64,
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self {
            advance: 0.5,
            line_height: 1.2,
        }
    }
}

impl TextMeasurer for FixedMetrics {
    fn measure_text(&mut self, text: &str, font_size: f64) -> Size {
        if text.is_empty() {
            return Size::new(0.0, self.line_height * font_size);
        }
        #[expect(clippy::cast_precision_loss, reason = "char counts are small")]
        let chars = text.chars().count() as f64;
        Size::new(chars * self.advance * font_size, self.line_height * font_size)
    }
}

/// Memoizes an inner [`TextMeasurer`] per (text, font size).
///
/// # Example
///
/// ```rust
/// use trellis_layout::{CachingTextMeasurer, FixedMetrics, TextMeasurer};
///
/// let mut measurer = CachingTextMeasurer::new(FixedMetrics::default());
/// let a = measurer.measure_text("hello", 10.0);
/// let b = measurer.measure_text("hello", 10.0);
/// assert_eq!(a, b);
/// assert_eq!(measurer.misses(), 1);
/// assert_eq!(measurer.hits(), 1);
/// ```
#[derive(Debug)]
pub struct CachingTextMeasurer<M> {
    inner: M,
    cache: HashMap<(String, u64), Size>,
    hits: u64,
    misses: u64,
}

impl<M: TextMeasurer> CachingTextMeasurer<M> {
    /// Wraps an inner measurer with an empty cache.
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            cache: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// The number of cache hits so far.
    #[must_use]
    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// The number of cache misses (inner oracle calls) so far.
    #[must_use]
    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// The number of cached extents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Drops every cached extent.
    ///
    /// Call when the backend's font environment changes (DPI, font load).
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

impl<M: TextMeasurer> TextMeasurer for CachingTextMeasurer<M> {
    fn measure_text(&mut self, text: &str, font_size: f64) -> Size {
        let key = (text.to_string(), font_size.to_bits());
        if let Some(size) = self.cache.get(&key) {
            self.hits += 1;
            return *size;
        }
        self.misses += 1;
        let size = self.inner.measure_text(text, font_size);
        self.cache.insert(key, size);
        size
    }
}
