// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Font face types

use super::raster::{self, Backend, Target};
use crate::conv::{trunc, Scale};
use crate::error::FontError;
use crate::provider::{FontMetrics, Glyph, GlyphProvider};
use crate::raster::Raster;
use crate::Error;
use ttf_parser::{Face, GlyphId};

/// Slant in degrees, positive to the right, from the `post` table's angle
///
/// OpenType measures the slant counter-clockwise from vertical. Fonts
/// without a `post` table are upright.
fn italic_angle(post: Option<f32>) -> f64 {
    -f64::from(post.unwrap_or(0.0))
}

/// A font face borrowed from loaded file data
///
/// Implements [`GlyphProvider`]. Glyph names of a single character are looked
/// up through the character map; longer names are PostScript glyph names.
pub struct FontFace<'a> {
    face: Face<'a>,
    #[cfg(feature = "ab_glyph")]
    pub(super) ab_glyph: ab_glyph::FontRef<'a>,
    #[cfg(feature = "fontdue")]
    pub(super) fontdue: fontdue::Font,
    backend: Backend,
    metrics: FontMetrics,
}

impl<'a> FontFace<'a> {
    /// Parse face `index` of `data`
    ///
    /// The pixel scale is chosen so that the font's x-height is `x_height_px`
    /// pixels. The x-height is read from the `OS/2` table or, failing that,
    /// measured from the glyph for `x`.
    pub fn new(data: &'a [u8], index: u32, x_height_px: f64) -> Result<Self, Error> {
        let face = Face::parse(data, index).map_err(FontError::from)?;

        let x_height = face
            .x_height()
            .filter(|h| *h > 0)
            .or_else(|| {
                let id = face.glyph_index('x')?;
                face.glyph_bounding_box(id).map(|bb| bb.y_max)
            })
            .filter(|h| *h > 0)
            .ok_or(Error::MissingMetric("x-height"))?;

        let scale = Scale(x_height_px / f64::from(x_height));
        let metrics = FontMetrics {
            units_per_em: f64::from(face.units_per_em()),
            scale,
            x_height_px,
            ascender_px: trunc(scale.i16_to_px(face.ascender())),
            descender_px: trunc(scale.i16_to_px(face.descender())),
            italic_angle: italic_angle(face.italic_angle()),
        };
        log::debug!("FontFace::new: {metrics:?}");

        Ok(FontFace {
            #[cfg(feature = "ab_glyph")]
            ab_glyph: ab_glyph::FontRef::try_from_slice_and_index(data, index)
                .map_err(FontError::from)?,
            #[cfg(feature = "fontdue")]
            fontdue: fontdue::Font::from_bytes(data, fontdue::FontSettings {
                collection_index: index,
                ..Default::default()
            })
            .map_err(FontError::Fontdue)?,
            face,
            backend: Backend::default(),
            metrics,
        })
    }

    /// Select the raster backend
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Access the parsed face
    pub fn face(&self) -> &Face<'a> {
        &self.face
    }

    pub(super) fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    /// Look up a glyph by name
    pub fn glyph_id(&self, name: &str) -> Result<GlyphId, Error> {
        let mut chars = name.chars();
        let id = match (chars.next(), chars.next()) {
            (Some(c), None) => self.face.glyph_index(c),
            _ => self.face.glyph_index_by_name(name),
        };
        id.ok_or_else(|| Error::MissingGlyph(name.to_string()))
    }
}

impl<'a> GlyphProvider for FontFace<'a> {
    fn font_metrics(&self) -> FontMetrics {
        self.metrics
    }

    fn glyph(&self, name: &str) -> Result<Glyph, Error> {
        let id = self.glyph_id(name)?;
        let advance = f64::from(self.face.glyph_hor_advance(id).unwrap_or(0));
        let (x_min, x_max, y_max, height) = match self.face.glyph_bounding_box(id) {
            Some(bb) => (
                f64::from(bb.x_min),
                f64::from(bb.x_max),
                f64::from(bb.y_max),
                f64::from(bb.height()),
            ),
            // blank glyphs: all advance is side bearing
            None => (0.0, 0.0, 0.0, 0.0),
        };
        Ok(Glyph {
            name: name.to_string(),
            ink_width: x_max - x_min,
            ink_height: height,
            advance_width: advance,
            lsb: x_min,
            rsb: advance - x_max,
            tsb: f64::from(self.face.ascender()) - y_max,
            scale: self.metrics.scale,
        })
    }

    fn rasterize(&self, name: &str) -> Result<Raster, Error> {
        let glyph = self.glyph(name)?;
        let target = Target {
            id: self.glyph_id(name)?.0,
            width: usize::try_from(trunc(glyph.ink_width_px())).unwrap_or(0),
            height: self.metrics.full_height_px(),
            x_min_px: self.metrics.scale.to_px(glyph.lsb),
            baseline: self.metrics.ascender_px,
        };
        Ok(raster::raster(self, self.backend, &target))
    }

    fn kerning(&self, left: &str, right: &str) -> Result<f64, Error> {
        let (l, r) = (self.glyph_id(left)?, self.glyph_id(right)?);
        let Some(kern) = self.face.tables().kern else {
            return Ok(0.0);
        };
        let value = kern
            .subtables
            .into_iter()
            .filter(|s| s.horizontal && !s.variable && !s.has_cross_stream && !s.has_state_machine)
            .filter_map(|s| s.glyphs_kerning(l, r))
            .map(i32::from)
            .sum::<i32>();
        Ok(f64::from(value))
    }
}
