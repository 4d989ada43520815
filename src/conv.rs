// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Type conversion utilities
//!
//! Raster coordinates are `usize` while distances and shifts are signed
//! `i64` pixel counts. Font-unit quantities are `f64`.

use easy_cast::{Cast, CastFloat, Conv};

/// Convert `i64` → `usize`, clamping negative values to zero
#[inline]
pub fn clamp_index(x: i64, len: usize) -> usize {
    if x <= 0 {
        0
    } else {
        usize::conv(x).min(len)
    }
}

/// Convert `usize` → `i64`
#[inline]
pub fn to_i64(x: usize) -> i64 {
    x.cast()
}

/// Truncate toward zero, as a C-style integer cast does
#[inline]
pub fn trunc(x: f64) -> i64 {
    x.cast_trunc()
}

/// Scale factor: pixels per font unit
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Scale(pub f64);

impl Scale {
    /// Convert a font-unit length to (fractional) pixels
    #[inline]
    pub fn to_px(self, units: f64) -> f64 {
        units * self.0
    }

    /// Convert a pixel length back to font units
    #[inline]
    pub fn to_units(self, px: f64) -> f64 {
        px / self.0
    }

    /// Convert a pixel distance to whole font units, truncating toward zero
    #[inline]
    pub fn px_to_units_trunc(self, px: i64) -> i64 {
        trunc(self.to_units(px as f64))
    }

    pub(crate) fn i16_to_px(self, x: i16) -> f64 {
        f64::from(x) * self.0
    }
}
