// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Spacing session and pair-area evaluation

use crate::config::{GlyphPair, PairConfig, SpacingConfig};
use crate::conv::{trunc, Scale};
use crate::counters::{shifted_counter, Band, SerifKernel, Side};
use crate::light::Illumination;
use crate::provider::{FontMetrics, Glyph, GlyphProvider};
use crate::raster::{EdgeCounters, Mask, Raster};
use crate::Error;
use std::collections::HashMap;
use std::rc::Rc;

/// Fixed raster geometry of a session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoxSize {
    pub width: usize,
    pub height: usize,
}

impl BoxSize {
    /// The box for a font: full ascender-to-descender height and a width of
    /// ten thirds of the x-height, rounded up to an even number of pixels
    pub fn for_font(metrics: &FontMetrics) -> Self {
        let mut width = usize::try_from(trunc(metrics.x_height_px * 10.0 / 3.0)).unwrap_or(0);
        if width % 2 == 1 {
            width += 1;
        }
        BoxSize {
            width,
            height: metrics.full_height_px(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ShiftKey {
    glyph: String,
    side: Side,
    shift: i64,
    band: Band,
}

/// Cached per-glyph provider data
#[derive(Debug)]
pub(crate) struct GlyphEntry {
    pub glyph: Glyph,
    pub raster: Raster,
}

/// A spacing session bound to one font
///
/// The session owns every cache. Caches only grow, except that changing the
/// [`PairConfig`] discards cached areas and changing serif smoothing
/// discards cached counters. A session is not `Sync`; use one per thread.
///
/// A [`PairConfig`] must be established with
/// [`CounterSpace::determine_parameters`] or [`CounterSpace::set_pair_config`]
/// before pair areas can be measured.
pub struct CounterSpace<P: GlyphProvider> {
    provider: P,
    pub(crate) config: SpacingConfig,
    metrics: FontMetrics,
    size: BoxSize,
    illumination: Illumination,
    kernel: Option<SerifKernel>,
    pair_config: Option<PairConfig>,
    glyphs: HashMap<String, Rc<GlyphEntry>>,
    counters: HashMap<String, Rc<EdgeCounters>>,
    smoothed_counters: HashMap<String, Rc<EdgeCounters>>,
    shifted: HashMap<ShiftKey, Rc<Mask>>,
    ink_distances: HashMap<(String, String), i64>,
    areas: HashMap<(String, String, i64), f64>,
}

impl<P: GlyphProvider> CounterSpace<P> {
    /// Start a session
    pub fn new(provider: P, config: SpacingConfig) -> Self {
        let metrics = provider.font_metrics();
        let size = BoxSize::for_font(&metrics);
        let illumination = Illumination::new(size.width, size.height, metrics.italic_angle);
        let kernel = SerifKernel::new(
            config.serif_smoothing,
            illumination.theta(),
            size.width,
            size.height,
        );
        log::debug!(
            "CounterSpace::new: box {}x{}, scale {}",
            size.width,
            size.height,
            metrics.scale.0
        );
        CounterSpace {
            provider,
            config,
            metrics,
            size,
            illumination,
            kernel,
            pair_config: None,
            glyphs: HashMap::new(),
            counters: HashMap::new(),
            smoothed_counters: HashMap::new(),
            shifted: HashMap::new(),
            ink_distances: HashMap::new(),
            areas: HashMap::new(),
        }
    }

    /// Access the glyph provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Access the session configuration
    pub fn config(&self) -> &SpacingConfig {
        &self.config
    }

    /// Font metrics
    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    /// Pixels per font unit
    pub fn scale(&self) -> Scale {
        self.metrics.scale
    }

    /// Raster box shared by all counters of this session
    pub fn box_size(&self) -> BoxSize {
        self.size
    }

    /// The active illumination weights, if any
    pub fn pair_config(&self) -> Option<&PairConfig> {
        self.pair_config.as_ref()
    }

    /// Replace the illumination weights
    ///
    /// Cached pair areas are discarded.
    pub fn set_pair_config(&mut self, config: PairConfig) {
        self.areas.clear();
        self.pair_config = Some(config);
    }

    /// Change the serif smoothing radius (pixels; `0` disables)
    ///
    /// Cached shifted counters and pair areas are discarded.
    pub fn set_serif_smoothing(&mut self, smoothing: u32) {
        self.config.serif_smoothing = smoothing;
        self.kernel = SerifKernel::new(
            smoothing,
            self.illumination.theta(),
            self.size.width,
            self.size.height,
        );
        self.smoothed_counters.clear();
        self.shifted.clear();
        self.areas.clear();
    }

    /// Select the reference pair for `(left, right)`
    pub fn reference_pair(&self, left: &str, right: &str) -> GlyphPair {
        self.config.reference_pair(left, right).clone()
    }

    pub(crate) fn entry(&mut self, name: &str) -> Result<Rc<GlyphEntry>, Error> {
        if let Some(entry) = self.glyphs.get(name) {
            return Ok(entry.clone());
        }
        let entry = Rc::new(GlyphEntry {
            glyph: self.provider.glyph(name)?,
            raster: self.provider.rasterize(name)?,
        });
        self.glyphs.insert(name.to_string(), entry.clone());
        Ok(entry)
    }

    /// Metrics of a glyph
    pub fn glyph(&mut self, name: &str) -> Result<Glyph, Error> {
        Ok(self.entry(name)?.glyph.clone())
    }

    fn pad(&self, name: &str, raster: &Raster) -> Result<Raster, Error> {
        raster
            .padded_to_width(self.size.width)
            .ok_or_else(|| Error::GlyphTooWide {
                glyph: name.to_string(),
                width: raster.width(),
                box_width: self.size.width,
            })
    }

    /// Edge counters of a glyph centred in the session box
    ///
    /// Interior holes (the bowl of "O", "P", ...) are excluded.
    pub fn counters(&mut self, name: &str) -> Result<Rc<EdgeCounters>, Error> {
        if let Some(counters) = self.counters.get(name) {
            return Ok(counters.clone());
        }
        let entry = self.entry(name)?;
        let counters = Rc::new(self.pad(name, &entry.raster)?.edge_counters());
        self.counters.insert(name.to_string(), counters.clone());
        Ok(counters)
    }

    // Counters after serif smoothing, or the plain counters without it
    fn shape_counters(&mut self, name: &str) -> Result<Rc<EdgeCounters>, Error> {
        if self.kernel.is_none() {
            return self.counters(name);
        }
        if let Some(counters) = self.smoothed_counters.get(name) {
            return Ok(counters.clone());
        }
        let entry = self.entry(name)?;
        let smoothed = match &self.kernel {
            Some(kernel) => kernel.apply(&entry.raster),
            None => entry.raster.clone(),
        };
        let counters = Rc::new(self.pad(name, &smoothed)?.edge_counters());
        self.smoothed_counters
            .insert(name.to_string(), counters.clone());
        Ok(counters)
    }

    /// One side's counter mask for a glyph translated by `shift` pixels
    ///
    /// Rows outside `band` are cleared and diagonal steps corrected (in the
    /// order chosen by [`crate::Strategy::band_limit`]).
    pub fn shifted_counter(
        &mut self,
        name: &str,
        side: Side,
        shift: i64,
        band: Band,
    ) -> Result<Rc<Mask>, Error> {
        let key = ShiftKey {
            glyph: name.to_string(),
            side,
            shift,
            band,
        };
        if let Some(mask) = self.shifted.get(&key) {
            return Ok(mask.clone());
        }
        let counters = self.shape_counters(name)?;
        let order = self.config.strategy.band_limit;
        let mask = Rc::new(shifted_counter(&counters, side, shift, band, order));
        self.shifted.insert(key, mask.clone());
        Ok(mask)
    }

    /// Closest approach of two inks, in pixels, side bearings discarded
    ///
    /// Asks the provider once per pair.
    pub fn minimum_ink_distance(&mut self, left: &str, right: &str) -> Result<i64, Error> {
        let key = (left.to_string(), right.to_string());
        if let Some(d) = self.ink_distances.get(&key) {
            return Ok(*d);
        }
        let d = self.provider.minimum_ink_distance(left, right)?;
        self.ink_distances.insert(key, d);
        Ok(d)
    }

    /// Largest gap between two inks, in pixels, side bearings discarded
    pub fn maximum_ink_distance(&self, left: &str, right: &str) -> Result<i64, Error> {
        self.provider.maximum_ink_distance(left, right)
    }

    /// Translations placing a pair `distance` pixels apart
    pub fn shift_offsets(&mut self, left: &str, right: &str, distance: i64) -> Result<(i64, i64), Error> {
        let mid = self.minimum_ink_distance(left, right)?;
        let l = self.entry(left)?;
        let r = self.entry(right)?;
        Ok(self.provider.shift_offsets(&l.glyph, &r.glyph, mid, distance))
    }

    /// The font's current distance for a pair, in font units
    pub fn natural_distance(&self, left: &str, right: &str) -> Result<f64, Error> {
        self.provider.natural_distance(left, right)
    }

    /// The font's current distance for a pair, in whole pixels
    pub fn natural_distance_px(&self, left: &str, right: &str) -> Result<i64, Error> {
        Ok(trunc(self.scale().to_px(self.natural_distance(left, right)?)))
    }

    /// Rows between the tops and bottoms of a reference pair's inks
    ///
    /// The band is narrowed by the serif smoothing radius at each end.
    pub fn reference_band(&mut self, reference: &GlyphPair) -> Result<Band, Error> {
        let l = self.entry(&reference.left)?;
        let r = self.entry(&reference.right)?;
        let (lg, rg) = (&l.glyph, &r.glyph);
        let top = trunc(lg.tsb_px().min(rg.tsb_px()));
        let bottom = trunc(
            (lg.tsb_px() + lg.ink_height_px()).min(rg.tsb_px() + rg.ink_height_px()),
        );
        let smoothing = i64::from(self.config.serif_smoothing);
        Ok(Band {
            top: top + smoothing,
            bottom: bottom - smoothing,
        })
    }

    /// Perceived area between two glyphs set `distance` pixels apart
    ///
    /// With `distance == None` the font's natural distance is used. The
    /// vertical band comes from the pair's reference pair. Results are cached
    /// until the [`PairConfig`] changes.
    pub fn pair_area(&mut self, left: &str, right: &str, distance: Option<i64>) -> Result<f64, Error> {
        let config = self.pair_config.clone().ok_or(Error::NoPairConfig)?;
        let distance = match distance {
            Some(d) => d,
            None => self.natural_distance_px(left, right)?,
        };
        let key = (left.to_string(), right.to_string(), distance);
        if let Some(area) = self.areas.get(&key) {
            return Ok(*area);
        }
        let reference = self.reference_pair(left, right);
        let area = self.area_with(&config, left, right, distance, &reference)?;
        self.areas.insert(key, area);
        Ok(area)
    }

    /// Perceived area under an explicit configuration, bypassing the area
    /// cache
    pub fn area_with(
        &mut self,
        config: &PairConfig,
        left: &str,
        right: &str,
        distance: i64,
        reference: &GlyphPair,
    ) -> Result<f64, Error> {
        let (shift_l, shift_r) = self.shift_offsets(left, right, distance)?;
        let band = self.reference_band(reference)?;
        let l = self.shifted_counter(left, Side::Right, shift_l, band)?;
        let r = self.shifted_counter(right, Side::Left, shift_r, band)?;

        // only space open on both sides lies between the glyphs
        let mut open = l.intersection(&r);
        open.clear_outside_rows(band.top, band.bottom);

        let blend = self.config.strategy.blend;
        Ok(self.illumination.score(&open, config, blend))
    }
}
