// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Glyph rastering backends

use super::FontFace;
use crate::conv::to_i64;
use crate::raster::Raster;
use easy_cast::*;

/// Raster backend
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Raster with `ab_glyph`
    #[cfg(feature = "ab_glyph")]
    AbGlyph,
    /// Raster with `fontdue`
    #[cfg(feature = "fontdue")]
    Fontdue,
}

impl Default for Backend {
    fn default() -> Self {
        cfg_if::cfg_if! {
            if #[cfg(feature = "ab_glyph")] {
                Backend::AbGlyph
            } else {
                Backend::Fontdue
            }
        }
    }
}

/// Target of a raster: the glyph's ink box in session pixels
pub(crate) struct Target {
    pub id: u16,
    /// Ink width, whole pixels
    pub width: usize,
    /// Full session height
    pub height: usize,
    /// Left edge of the ink, fractional pixels right of the origin
    pub x_min_px: f64,
    /// Row of the baseline
    pub baseline: i64,
}

impl Target {
    // Coverage outside the box is dropped; overlapping writes keep the maximum
    fn put(&self, raster: &mut Raster, row: i64, col: i64, coverage: f32) {
        if row < 0 || col < 0 || row >= to_i64(self.height) || col >= to_i64(self.width) {
            return;
        }
        let (row, col) = (usize::conv(row), usize::conv(col));
        if coverage > raster.get(row, col) {
            raster.set(row, col, coverage.min(1.0));
        }
    }
}

#[cfg(feature = "ab_glyph")]
fn raster_ab(face: &FontFace, target: &Target) -> Raster {
    use ab_glyph::Font;

    let mut raster = Raster::new(target.width, target.height);
    let font = &face.ab_glyph;
    let scale = face.metrics().scale.0;
    // ab_glyph scales by line height rather than by units per Em
    let px_scale = (scale * f64::from(font.height_unscaled())) as f32;
    let glyph = ab_glyph::Glyph {
        id: ab_glyph::GlyphId(target.id),
        scale: px_scale.into(),
        position: ab_glyph::point(-target.x_min_px as f32, target.baseline as f32),
    };
    let Some(outline) = font.outline_glyph(glyph) else {
        return raster;
    };

    let bounds = outline.px_bounds();
    let (x0, y0): (i64, i64) = (bounds.min.x.cast_trunc(), bounds.min.y.cast_trunc());
    outline.draw(|x, y, c| {
        target.put(&mut raster, y0 + i64::from(y), x0 + i64::from(x), c);
    });
    raster
}

#[cfg(feature = "fontdue")]
fn raster_fontdue(face: &FontFace, target: &Target) -> Raster {
    let mut raster = Raster::new(target.width, target.height);
    let metrics = face.metrics();
    let dpem = (metrics.scale.0 * metrics.units_per_em) as f32;
    let (m, data) = face.fontdue.rasterize_indexed(target.id, dpem);

    // fontdue's bitmap is top-down with its bottom row `ymin` above the baseline
    let top = target.baseline - i64::from(m.ymin) - to_i64(m.height);
    let left = i64::from(m.xmin) - crate::conv::trunc(target.x_min_px);
    let bitmap = Raster::from_coverage(m.width, m.height, &data);
    for y in 0..m.height {
        for (x, c) in bitmap.row(y).iter().enumerate() {
            target.put(&mut raster, top + to_i64(y), left + to_i64(x), *c);
        }
    }
    raster
}

/// Raster a glyph into its target box
pub(crate) fn raster(face: &FontFace, backend: Backend, target: &Target) -> Raster {
    if target.width == 0 || target.height == 0 {
        log::warn!("raster: zero-sized glyph {}", target.id);
    }
    match backend {
        #[cfg(feature = "ab_glyph")]
        Backend::AbGlyph => raster_ab(face, target),
        #[cfg(feature = "fontdue")]
        Backend::Fontdue => raster_fontdue(face, target),
    }
}
