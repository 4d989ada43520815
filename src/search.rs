// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Distance search
//!
//! The distance for a pair is the smallest distance at which its perceived
//! area exceeds that of its reference pair at the reference's natural
//! distance. The area is not assumed monotonic in distance, only to cross
//! the target once in the region of interest, so the first crossing wins.

use crate::conv::{trunc, Scale};
use crate::provider::GlyphProvider;
use crate::{CounterSpace, Error};

/// Largest step taken by the adaptive search
const MAX_STEP: i64 = 20;

/// Outcome of a search, in pixels
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Found {
    /// The first distance at which the area exceeded the target
    Crossing(i64),
    /// No crossing below the upper bound: the distance of the largest area
    Peak(i64),
}

impl Found {
    /// The distance found, in pixels
    pub fn px(self) -> i64 {
        match self {
            Found::Crossing(n) | Found::Peak(n) => n,
        }
    }

    /// The distance found, in font units (truncated toward zero)
    pub fn units(self, scale: Scale) -> i64 {
        scale.px_to_units_trunc(self.px())
    }
}

impl<P: GlyphProvider> CounterSpace<P> {
    /// Smallest distance searched for a pair, in pixels
    ///
    /// This places the closest points of the two inks
    /// [`crate::SpacingConfig::bare_minimum`] apart.
    pub fn search_start(&mut self, left: &str, right: &str) -> Result<i64, Error> {
        let mid = self.minimum_ink_distance(left, right)?;
        let bare = trunc(self.scale().to_px(self.config.bare_minimum));
        Ok(-mid + bare)
    }

    /// Search for the distance of a pair
    ///
    /// With [`crate::SpacingConfig::adaptive_step`] the search extrapolates
    /// the local slope of the area curve to skip up to 20 pixels at a time
    /// while far below the target. This is a heuristic: on a curve with
    /// several crossings it may step over the first one.
    pub fn search(&mut self, left: &str, right: &str) -> Result<Found, Error> {
        if self.pair_config().is_none() {
            return Err(Error::NoPairConfig);
        }
        let reference = self.reference_pair(left, right);
        let target = self.pair_area(&reference.left, &reference.right, None)?;
        let start = self.search_start(left, right)?;
        let end = trunc(self.scale().to_px(self.config.absolute_maximum));
        let adaptive = self.config.adaptive_step;

        let (mut peak, mut peak_at) = (-1.0, start);
        let mut n = start;
        let mut prev: Option<f64> = None;
        while n < end {
            let area = self.pair_area(left, right, Some(n))?;
            if area > target {
                log::debug!("search: {left}{right} crosses {target:.3} at {n}px");
                return Ok(Found::Crossing(n));
            }
            if area > peak {
                peak = area;
                peak_at = n;
            }
            let mut step = 1;
            if let (true, Some(prev)) = (adaptive, prev) {
                let slope = area - prev;
                if slope > 0.0 {
                    let steps = ((target - area) / (1.0 + slope)).floor() - 1.0;
                    step = trunc(steps).clamp(1, MAX_STEP);
                }
            }
            n += step;
            prev = Some(area);
        }

        log::warn!("search: {left}{right} never reached {target:.3}; using peak at {peak_at}px");
        Ok(Found::Peak(peak_at))
    }

    /// Distance between the inks of a pair, in pixels
    pub fn space_px(&mut self, left: &str, right: &str) -> Result<i64, Error> {
        Ok(self.search(left, right)?.px())
    }

    /// Distance between the inks of a pair, in font units
    ///
    /// This is the sum of the right side bearing of `left`, the left side
    /// bearing of `right` and their kerning which makes the pair look as
    /// open as its reference pair.
    pub fn space(&mut self, left: &str, right: &str) -> Result<i64, Error> {
        let scale = self.scale();
        Ok(self.search(left, right)?.units(scale))
    }

    /// Side bearings for a glyph, in font units
    ///
    /// Both are measured against `key` (by default the first glyph of the
    /// reference pair for `(glyph, glyph)`), whose own distance is split
    /// evenly between its two sides.
    pub fn derive_sidebearings(&mut self, glyph: &str, key: Option<&str>) -> Result<(i64, i64), Error> {
        let key = match key {
            Some(key) => key.to_string(),
            None => self.reference_pair(glyph, glyph).left,
        };
        let key_space = self.space(&key, &key)?.div_euclid(2);
        let lsb = self.space(&key, glyph)? - key_space;
        let rsb = self.space(glyph, &key)? - key_space;
        log::info!("derive_sidebearings: {glyph}: lsb {lsb}, rsb {rsb}");
        Ok((lsb, rsb))
    }
}
