// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Error types

use thiserror::Error;

/// Font loading errors
#[derive(Error, Debug)]
pub enum FontError {
    #[error("font load error")]
    TtfParser(#[from] ttf_parser::FaceParsingError),
    #[cfg(feature = "ab_glyph")]
    #[error("font load error")]
    AbGlyph(#[from] ab_glyph::InvalidFont),
    #[cfg(feature = "fontdue")]
    #[error("font load error: {0}")]
    Fontdue(&'static str),
}

/// Spacing errors
///
/// Most of these are configuration errors which are reported before any
/// work is done. A degraded search result (no crossing found) is *not* an
/// error; see [`crate::CounterSpace::space`].
#[derive(Error, Debug)]
pub enum Error {
    /// The glyph provider has no glyph of this name
    #[error("no glyph named `{0}`")]
    MissingGlyph(String),
    /// No [`crate::PairConfig`] has been set or calibrated
    #[error("no pair configuration: run `determine_parameters` or call `set_pair_config` first")]
    NoPairConfig,
    /// Calibration requires at least one key pair
    #[error("no key pairs configured")]
    NoKeyPairs,
    /// A pair string must name exactly two glyphs
    #[error("`{0}` is not a glyph pair")]
    InvalidPair(String),
    /// A glyph raster does not fit the session box
    #[error("glyph `{glyph}` is {width}px wide but the box is only {box_width}px")]
    GlyphTooWide {
        glyph: String,
        width: usize,
        box_width: usize,
    },
    /// The font lacks a metric required to fix the pixel scale
    #[error("font has no {0}")]
    MissingMetric(&'static str),
    #[error(transparent)]
    Font(#[from] FontError),
}
