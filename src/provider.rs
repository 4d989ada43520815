// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! The glyph provider contract
//!
//! Spacing needs only a handful of things from a font: per-glyph metrics,
//! a raster of each glyph at a fixed pixel scale, and the font's existing
//! pair distance. [`GlyphProvider`] captures these; [`crate::fonts::FontFace`]
//! implements it over an OpenType file.
//!
//! ### Raster layout
//!
//! Every raster is [`FontMetrics::full_height_px`] rows tall with row `0` at
//! the ascender and the baseline at row [`FontMetrics::ascender_px`]. It is
//! exactly `trunc(ink_width_px)` columns wide with the ink's left edge at
//! column `0`. Values are coverage in `[0, 1]`.

use crate::conv::{trunc, Scale};
use crate::raster::{Raster, CONTOUR_CUTOFF};
use crate::Error;

/// Sentinel added to empty rows when looking for the closest ink
const FAR: i64 = 10000;

/// Font-wide metrics fixed for a spacing session
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontMetrics {
    pub units_per_em: f64,
    /// Pixels per font unit
    pub scale: Scale,
    /// The x-height the scale was chosen for, in pixels
    pub x_height_px: f64,
    /// `trunc(ascender × scale)`
    pub ascender_px: i64,
    /// `trunc(descender × scale)`, usually negative
    pub descender_px: i64,
    /// Italic angle in degrees, positive for a rightward slant
    pub italic_angle: f64,
}

impl FontMetrics {
    /// Height of every glyph raster
    pub fn full_height_px(&self) -> usize {
        usize::try_from(self.ascender_px - self.descender_px).unwrap_or(0)
    }
}

/// Glyph metrics
///
/// All lengths are in font units; `scale` converts to pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
    pub name: String,
    pub ink_width: f64,
    pub ink_height: f64,
    pub advance_width: f64,
    /// Left side bearing
    pub lsb: f64,
    /// Right side bearing
    pub rsb: f64,
    /// Top side bearing: ascender to top of ink
    pub tsb: f64,
    pub scale: Scale,
}

impl Glyph {
    #[inline]
    pub fn ink_width_px(&self) -> f64 {
        self.scale.to_px(self.ink_width)
    }

    #[inline]
    pub fn ink_height_px(&self) -> f64 {
        self.scale.to_px(self.ink_height)
    }

    #[inline]
    pub fn tsb_px(&self) -> f64 {
        self.scale.to_px(self.tsb)
    }
}

/// Source of glyph metrics and rasters
///
/// Missing glyphs must be reported as [`Error::MissingGlyph`]; nothing in
/// this crate retries.
pub trait GlyphProvider {
    /// Font-wide metrics
    fn font_metrics(&self) -> FontMetrics;

    /// Metrics of the named glyph
    fn glyph(&self, name: &str) -> Result<Glyph, Error>;

    /// Raster of the named glyph (see module documentation for layout)
    ///
    /// Composite glyphs are rastered decomposed.
    fn rasterize(&self, name: &str) -> Result<Raster, Error>;

    /// Kerning between two glyphs, in font units
    fn kerning(&self, left: &str, right: &str) -> Result<f64, Error> {
        let _ = (left, right);
        Ok(0.0)
    }

    /// The font's current ink-to-ink distance for a pair, in font units
    ///
    /// This is the right side bearing of `left` plus the left side bearing
    /// of `right` plus any kerning.
    fn natural_distance(&self, left: &str, right: &str) -> Result<f64, Error> {
        let l = self.glyph(left)?;
        let r = self.glyph(right)?;
        Ok(l.rsb + r.lsb + self.kerning(left, right)?)
    }

    /// Closest approach of the two inks in pixels with side bearings discarded
    fn minimum_ink_distance(&self, left: &str, right: &str) -> Result<i64, Error> {
        Ok(minimum_ink_distance(
            &self.rasterize(left)?,
            &self.rasterize(right)?,
        ))
    }

    /// Largest gap between the two inks in pixels with side bearings discarded
    fn maximum_ink_distance(&self, left: &str, right: &str) -> Result<i64, Error> {
        Ok(maximum_ink_distance(
            &self.rasterize(left)?,
            &self.rasterize(right)?,
        ))
    }

    /// Translations placing the pair `distance` pixels apart
    ///
    /// `mid` is the pair's [`GlyphProvider::minimum_ink_distance`]. Returns
    /// `(left_shift, right_shift)` to apply to each glyph's box-centred
    /// matrix.
    fn shift_offsets(&self, left: &Glyph, right: &Glyph, mid: i64, distance: i64) -> (i64, i64) {
        shift_offsets(left.ink_width_px(), right.ink_width_px(), mid, distance)
    }
}

/// Closest approach of `left`'s right contour to `right`'s left contour
///
/// Rows where either glyph has no ink never count as closest.
pub fn minimum_ink_distance(left: &Raster, right: &Raster) -> i64 {
    let rl = left.right_contour(CONTOUR_CUTOFF, FAR);
    let lr = right.left_contour(CONTOUR_CUTOFF, FAR);
    rl.iter().zip(&lr).map(|(a, b)| a + b).min().unwrap_or(2 * FAR)
}

/// Widest gap between `left`'s right contour and `right`'s left contour
///
/// Empty rows contribute `-1` per glyph and so never count as widest while
/// any row has ink in both glyphs.
pub fn maximum_ink_distance(left: &Raster, right: &Raster) -> i64 {
    let rl = left.right_contour(CONTOUR_CUTOFF, -1);
    let lr = right.left_contour(CONTOUR_CUTOFF, -1);
    rl.iter().zip(&lr).map(|(a, b)| a + b).max().unwrap_or(-2)
}

/// Translations for a pair set `distance` pixels apart
///
/// The inputs are the ink widths of both glyphs in pixels and their
/// minimum ink distance. Odd remainders go left on the left glyph and right
/// on the right glyph; results are truncated toward zero.
pub fn shift_offsets(left_width: f64, right_width: f64, mid: i64, distance: i64) -> (i64, i64) {
    let mid = mid as f64;
    let sample = distance as f64 + mid;
    let sample_left = (sample / 2.0).ceil();
    let sample_right = (sample / 2.0).floor();
    let total = left_width + right_width;
    let quarter_left = (total / 4.0).floor();
    let quarter_right = (total / 4.0).ceil();
    let at_minimum = total - mid;
    let left = -((at_minimum / 2.0).ceil() + sample_left) + quarter_left;
    let right = ((at_minimum / 2.0).floor() + sample_right) - quarter_right;
    (trunc(left), trunc(right))
}
