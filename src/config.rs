// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Session and illumination configuration

use crate::Error;

/// A named parameter of [`PairConfig`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Param {
    WidthTop,
    HeightTop,
    WidthBottom,
    HeightBottom,
    WidthCenter,
    HeightCenter,
    TopStrength,
    BottomStrength,
    CenterStrength,
}

impl Param {
    /// All parameters, in calibration order
    pub const ALL: [Param; 9] = [
        Param::HeightCenter,
        Param::WidthCenter,
        Param::CenterStrength,
        Param::HeightTop,
        Param::WidthTop,
        Param::TopStrength,
        Param::HeightBottom,
        Param::WidthBottom,
        Param::BottomStrength,
    ];

    /// Calibration bounds `(min, max)`
    pub fn bounds(self) -> (f64, f64) {
        match self {
            Param::WidthCenter | Param::WidthTop => (5.0, 25.0),
            Param::WidthBottom => (5.0, 50.0),
            Param::HeightCenter | Param::HeightTop | Param::HeightBottom => (10.0, 50.0),
            Param::CenterStrength => (1.0, 5.0),
            Param::TopStrength | Param::BottomStrength => (0.05, 1.0),
        }
    }
}

/// Illumination weights
///
/// Each light (top, bottom, center) has a width and a height sigma, in
/// pixels, and a strength multiplier.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairConfig {
    pub w_top: f64,
    pub h_top: f64,
    pub w_bottom: f64,
    pub h_bottom: f64,
    pub w_center: f64,
    pub h_center: f64,
    pub top_strength: f64,
    pub bottom_strength: f64,
    pub center_strength: f64,
}

impl PairConfig {
    /// The calibration starting point
    ///
    /// This is *not* a good configuration for any particular font; it is
    /// the seed from which [`crate::CounterSpace::determine_parameters`]
    /// searches.
    pub fn initial_guess() -> Self {
        PairConfig {
            w_top: 15.0,
            h_top: 15.0,
            w_bottom: 15.0,
            h_bottom: 15.0,
            w_center: 30.0,
            h_center: 15.0,
            top_strength: 0.5,
            bottom_strength: 0.8,
            center_strength: 2.0,
        }
    }

    /// Every sigma set to `sigma` and every strength to `strength`
    pub fn uniform(sigma: f64, strength: f64) -> Self {
        PairConfig {
            w_top: sigma,
            h_top: sigma,
            w_bottom: sigma,
            h_bottom: sigma,
            w_center: sigma,
            h_center: sigma,
            top_strength: strength,
            bottom_strength: strength,
            center_strength: strength,
        }
    }

    /// Read a parameter
    pub fn get(&self, param: Param) -> f64 {
        match param {
            Param::WidthTop => self.w_top,
            Param::HeightTop => self.h_top,
            Param::WidthBottom => self.w_bottom,
            Param::HeightBottom => self.h_bottom,
            Param::WidthCenter => self.w_center,
            Param::HeightCenter => self.h_center,
            Param::TopStrength => self.top_strength,
            Param::BottomStrength => self.bottom_strength,
            Param::CenterStrength => self.center_strength,
        }
    }

    /// Write a parameter
    pub fn set(&mut self, param: Param, value: f64) {
        let field = match param {
            Param::WidthTop => &mut self.w_top,
            Param::HeightTop => &mut self.h_top,
            Param::WidthBottom => &mut self.w_bottom,
            Param::HeightBottom => &mut self.h_bottom,
            Param::WidthCenter => &mut self.w_center,
            Param::HeightCenter => &mut self.h_center,
            Param::TopStrength => &mut self.top_strength,
            Param::BottomStrength => &mut self.bottom_strength,
            Param::CenterStrength => &mut self.center_strength,
        };
        *field = value;
    }

    /// Every parameter clamped to its [`Param::bounds`]
    pub fn clamped(&self) -> Self {
        let mut config = self.clone();
        for param in Param::ALL {
            let (lo, hi) = param.bounds();
            config.set(param, self.get(param).clamp(lo, hi));
        }
        config
    }
}

/// When the reference band is applied to a shifted counter
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BandLimit {
    /// Zero rows outside the band, then correct diagonals
    ///
    /// Ink outside the band cannot constrain the diagonal correction.
    #[default]
    BeforeDiagonize,
    /// Correct diagonals over the full glyph, then zero rows outside the band
    AfterDiagonize,
}

/// How light intensities combine into a pixel weight
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LightBlend {
    /// `c·center + b·bottom + t·top`
    #[default]
    Additive,
    /// `1 + c·center + b·bottom + t·top`: every open pixel counts at least once
    OnePlus,
}

/// Engine variant selection
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Strategy {
    pub band_limit: BandLimit,
    pub blend: LightBlend,
}

/// Optimiser settings for [`crate::CounterSpace::determine_parameters`]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationOptions {
    /// Iteration budget
    pub max_iterations: usize,
    /// Convergence tolerance on the simplex, in parameter space normalised
    /// so that each parameter's bounds map to `[0, 1]`
    pub xtol: f64,
    /// Convergence tolerance on the error spread across the simplex
    pub ftol: f64,
}

impl Default for CalibrationOptions {
    fn default() -> Self {
        CalibrationOptions {
            max_iterations: 200,
            xtol: 0.01,
            ftol: 1e-6,
        }
    }
}

/// An ordered pair of glyph names
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphPair {
    pub left: String,
    pub right: String,
}

impl GlyphPair {
    /// Construct from two glyph names
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        GlyphPair {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Parse a two-character string such as `"HO"`
    ///
    /// Each character is taken as a glyph name.
    pub fn parse(pair: &str) -> Result<Self, Error> {
        let mut chars = pair.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(l), Some(r), None) => Ok(GlyphPair::new(l, r)),
            _ => Err(Error::InvalidPair(pair.to_string())),
        }
    }
}

impl TryFrom<&str> for GlyphPair {
    type Error = Error;

    fn try_from(pair: &str) -> Result<Self, Error> {
        GlyphPair::parse(pair)
    }
}

/// Configuration of a [`crate::CounterSpace`] session
///
/// Distances are in font units unless noted.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpacingConfig {
    /// Minimum ink-to-ink distance
    ///
    /// Increase this if "VV" is set too close.
    pub bare_minimum: f64,
    /// Upper bound of the distance search
    pub absolute_maximum: f64,
    /// Serif smoothing radius, in pixels; `0` disables smoothing
    ///
    /// Increase for faces with prominent serifs so that serif fragments are
    /// not counted as separate counters.
    pub serif_smoothing: u32,
    /// Pairs assumed well spaced by the designer; the first is the target
    pub key_pairs: Vec<GlyphPair>,
    /// Reference for pairs involving a lower-case letter
    pub lowercase_reference: GlyphPair,
    /// Reference for all other pairs
    pub uppercase_reference: GlyphPair,
    /// Kerning smaller than this magnitude is not emitted
    pub kerning_threshold: i64,
    /// Use slope extrapolation to take larger search steps
    pub adaptive_step: bool,
    pub strategy: Strategy,
    pub calibration: CalibrationOptions,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        let key_pairs = [("H", "H"), ("O", "O"), ("H", "O"), ("O", "H"), ("E", "E"), ("A", "V")];
        SpacingConfig {
            bare_minimum: 50.0,
            absolute_maximum: 500.0,
            serif_smoothing: 2,
            key_pairs: key_pairs
                .iter()
                .map(|(l, r)| GlyphPair::new(*l, *r))
                .collect(),
            lowercase_reference: GlyphPair::new("n", "n"),
            uppercase_reference: GlyphPair::new("H", "H"),
            kerning_threshold: 5,
            adaptive_step: false,
            strategy: Strategy::default(),
            calibration: CalibrationOptions::default(),
        }
    }
}

impl SpacingConfig {
    /// Replace the key pairs from two-character strings
    pub fn with_key_pairs(mut self, pairs: &[&str]) -> Result<Self, Error> {
        self.key_pairs = pairs
            .iter()
            .map(|p| GlyphPair::parse(p))
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    /// Select the reference pair for `(left, right)`
    ///
    /// Pairs with at least one lower-case letter are matched against the
    /// x-height reference; all others against the cap-height reference.
    pub fn reference_pair(&self, left: &str, right: &str) -> &GlyphPair {
        if is_lowercase(left) || is_lowercase(right) {
            &self.lowercase_reference
        } else {
            &self.uppercase_reference
        }
    }
}

fn is_lowercase(name: &str) -> bool {
    let mut chars = name.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_lowercase())
}
