// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Glyph matrices
//!
//! A [`Raster`] is a grey-scale glyph image with values in `[0, 1]` (ink is
//! `1`). A [`Mask`] is a binary image used for counter-space. Both are stored
//! in row-major order with row `0` at the top (the font's ascender line).
//!
//! All transforms return new matrices; nothing here mutates its input.

use crate::conv::{clamp_index, to_i64};

/// Contour cutoff used to locate ink when measuring ink distances
pub const CONTOUR_CUTOFF: f32 = 30.0 / 255.0;

/// Pixels above this value count as solid ink when extracting counters
const SOLID_INK: f32 = 250.0 / 255.0;

/// Shifted counters are re-binarised at this value
pub const COUNTER_THRESHOLD: f32 = 0.5;

/// A grey-scale glyph image
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Raster {
    /// Construct an empty (all background) raster
    pub fn new(width: usize, height: usize) -> Self {
        Raster {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    /// Construct from row-major data
    ///
    /// Panics if `data.len() != width * height`.
    pub fn from_data(width: usize, height: usize, data: Vec<f32>) -> Self {
        assert_eq!(data.len(), width * height, "raster data has wrong length");
        Raster {
            width,
            height,
            data,
        }
    }

    /// Construct from 8-bit coverage values, normalising to `[0, 1]`
    pub fn from_coverage(width: usize, height: usize, data: &[u8]) -> Self {
        let data = data.iter().map(|v| f32::from(*v) / 255.0).collect();
        Raster::from_data(width, height, data)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read a pixel
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.width + col]
    }

    /// Write a pixel
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row * self.width + col] = value;
    }

    /// Access one row
    #[inline]
    pub fn row(&self, row: usize) -> &[f32] {
        &self.data[row * self.width..(row + 1) * self.width]
    }

    /// Sum of all pixel values
    pub fn sum(&self) -> f64 {
        self.data.iter().map(|v| f64::from(*v)).sum()
    }

    /// Pad left and right with background to exactly `box_width` columns
    ///
    /// Left padding receives the extra column when the difference is odd.
    /// Returns `None` if the raster is wider than the box.
    pub fn padded_to_width(&self, box_width: usize) -> Option<Raster> {
        let extra = box_width.checked_sub(self.width)?;
        let left = extra.div_ceil(2);
        let mut padded = Raster::new(box_width, self.height);
        for row in 0..self.height {
            let start = row * box_width + left;
            padded.data[start..start + self.width].copy_from_slice(self.row(row));
        }
        Some(padded)
    }

    /// Distance from the left edge to the first pixel above `cutoff`, per row
    ///
    /// Rows with no such pixel yield `max_depth`.
    pub fn left_contour(&self, cutoff: f32, max_depth: i64) -> Vec<i64> {
        (0..self.height)
            .map(|r| {
                self.row(r)
                    .iter()
                    .position(|v| *v > cutoff)
                    .map(to_i64)
                    .unwrap_or(max_depth)
            })
            .collect()
    }

    /// Distance from the right edge to the last pixel above `cutoff`, per row
    ///
    /// Rows with no such pixel yield `max_depth`.
    pub fn right_contour(&self, cutoff: f32, max_depth: i64) -> Vec<i64> {
        (0..self.height)
            .map(|r| {
                self.row(r)
                    .iter()
                    .rev()
                    .position(|v| *v > cutoff)
                    .map(to_i64)
                    .unwrap_or(max_depth)
            })
            .collect()
    }

    /// Extract the whitespace contiguous with each side edge
    ///
    /// For each row, the left counter holds `1 - value` for pixels from the
    /// left edge up to (but excluding) the pixel before the first solid ink
    /// pixel; the right counter mirrors this. Interior holes, rows with no
    /// solid ink and everything beyond the first ink pixel are zero.
    pub fn edge_counters(&self) -> EdgeCounters {
        let mut left = Raster::new(self.width, self.height);
        let mut right = Raster::new(self.width, self.height);
        for r in 0..self.height {
            let row = self.row(r);
            if let Some(first) = row.iter().position(|v| *v > SOLID_INK) {
                for c in 0..first.saturating_sub(1) {
                    left.set(r, c, 1.0 - row[c]);
                }
            }
            if let Some(last) = row.iter().rposition(|v| *v > SOLID_INK) {
                for c in (last + 2).min(self.width)..self.width {
                    right.set(r, c, 1.0 - row[c]);
                }
            }
        }
        EdgeCounters { left, right }
    }

    /// Translate horizontally by `shift` columns and binarise
    ///
    /// Columns uncovered by the translation repeat the nearest edge column,
    /// so no new background or ink is introduced at the boundary. Pixels
    /// strictly above `threshold` are set in the result.
    pub fn shifted_mask(&self, shift: i64, threshold: f32) -> Mask {
        let mut mask = Mask::new(self.width, self.height);
        if self.width == 0 {
            return mask;
        }
        let last = to_i64(self.width - 1);
        for r in 0..self.height {
            let row = self.row(r);
            for c in 0..self.width {
                let src = (to_i64(c) - shift).clamp(0, last);
                if row[clamp_index(src, self.width - 1)] > threshold {
                    mask.set(r, c, true);
                }
            }
        }
        mask
    }
}

/// Whitespace at the left and right edges of a padded glyph
///
/// `left` is the space between the left edge of the box and the ink: it
/// faces a glyph set to the *left* of this one. `right` likewise faces a
/// glyph set to the right.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeCounters {
    pub left: Raster,
    pub right: Raster,
}

/// A binary image
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl Mask {
    /// Construct an empty mask
    pub fn new(width: usize, height: usize) -> Self {
        Mask {
            width,
            height,
            bits: vec![false; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.bits[row * self.width + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        self.bits[row * self.width + col] = value;
    }

    /// Number of set pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// Index of the first set pixel in a row
    pub fn first_set(&self, row: usize) -> Option<usize> {
        self.bits[row * self.width..(row + 1) * self.width]
            .iter()
            .position(|b| *b)
    }

    /// Index of the last set pixel in a row
    pub fn last_set(&self, row: usize) -> Option<usize> {
        self.bits[row * self.width..(row + 1) * self.width]
            .iter()
            .rposition(|b| *b)
    }

    /// Clear columns `start..end` (clamped to the row) of one row
    pub fn clear_span(&mut self, row: usize, start: i64, end: i64) {
        let start = clamp_index(start, self.width);
        let end = clamp_index(end, self.width);
        if start < end {
            self.bits[row * self.width + start..row * self.width + end].fill(false);
        }
    }

    /// Clear every row outside `top..bottom`
    pub fn clear_outside_rows(&mut self, top: i64, bottom: i64) {
        let top = clamp_index(top, self.height);
        let bottom = clamp_index(bottom, self.height).max(top);
        self.bits[..top * self.width].fill(false);
        self.bits[bottom * self.width..].fill(false);
    }

    /// Pixel-wise intersection
    ///
    /// Both masks must have the same dimensions.
    pub fn intersection(&self, other: &Mask) -> Mask {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        let bits = self
            .bits
            .iter()
            .zip(&other.bits)
            .map(|(a, b)| *a && *b)
            .collect();
        Mask {
            width: self.width,
            height: self.height,
            bits,
        }
    }

    /// Iterate over `(row, col)` of set pixels in row-major order
    pub fn iter_set(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, b)| **b)
            .map(move |(i, _)| (i / width, i % width))
    }

    /// Centre of mass as `(row, col)`
    ///
    /// Returns `None` for an empty mask, where the centre is undefined.
    pub fn center_of_mass(&self) -> Option<(f64, f64)> {
        let (mut n, mut rows, mut cols) = (0usize, 0.0, 0.0);
        for (r, c) in self.iter_set() {
            n += 1;
            rows += r as f64;
            cols += c as f64;
        }
        if n == 0 {
            return None;
        }
        Some((rows / n as f64, cols / n as f64))
    }
}
