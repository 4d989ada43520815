// Session behaviour over synthetic glyphs

mod common;

use common::{config, pair_config, Blocks};
use counterspace::{
    Band, BoxSize, CounterSpace, Error, FontMetrics, Glyph, GlyphPair, GlyphProvider, PairConfig,
    Raster, Side,
};
use std::cell::Cell;

fn session() -> CounterSpace<Blocks> {
    CounterSpace::new(Blocks::new(), config())
}

#[test]
fn box_geometry() {
    let s = session();
    // trunc(20 × 10 / 3) = 66
    assert_eq!(s.box_size(), BoxSize { width: 66, height: 70 });
}

#[test]
fn missing_glyph() {
    let mut s = session();
    assert!(matches!(s.glyph("Q"), Err(Error::MissingGlyph(name)) if name == "Q"));
    s.set_pair_config(pair_config());
    assert!(matches!(s.pair_area("H", "Q", Some(10)), Err(Error::MissingGlyph(_))));
}

#[test]
fn area_requires_config() {
    let mut s = session();
    assert!(matches!(s.pair_area("H", "H", None), Err(Error::NoPairConfig)));
    assert!(matches!(s.space("H", "H"), Err(Error::NoPairConfig)));
    s.set_pair_config(pair_config());
    assert!(s.pair_area("H", "H", None).unwrap() > 0.0);
}

#[test]
fn natural_distance() {
    let s = session();
    assert_eq!(s.natural_distance("H", "H").unwrap(), 16.0);
    assert_eq!(s.natural_distance("A", "V").unwrap(), -2.0);
    assert_eq!(s.natural_distance_px("H", "O").unwrap(), 13);
}

#[test]
fn reference_band() {
    let mut s = session();
    let hh = GlyphPair::new("H", "H");
    assert_eq!(s.reference_band(&hh).unwrap(), Band { top: 10, bottom: 60 });
    assert_eq!(
        s.reference_band(&GlyphPair::new("n", "n")).unwrap(),
        Band { top: 40, bottom: 60 }
    );
    s.set_serif_smoothing(2);
    assert_eq!(s.reference_band(&hh).unwrap(), Band { top: 12, bottom: 58 });
}

#[test]
fn areas_are_deterministic() {
    let mut s = session();
    s.set_pair_config(pair_config());
    let first = s.pair_area("H", "O", Some(12)).unwrap();
    assert_eq!(s.pair_area("H", "O", Some(12)).unwrap(), first);

    let mut fresh = session();
    fresh.set_pair_config(pair_config());
    assert_eq!(fresh.pair_area("H", "O", Some(12)).unwrap(), first);
}

#[test]
fn wider_pairs_have_more_area() {
    let mut s = session();
    s.set_pair_config(pair_config());
    let near = s.pair_area("H", "H", Some(8)).unwrap();
    let far = s.pair_area("H", "H", Some(24)).unwrap();
    assert!(far > near, "{far} <= {near}");
}

#[test]
fn changing_config_discards_areas() {
    let mut s = session();
    s.set_pair_config(PairConfig::uniform(15.0, 0.5));
    let half = s.pair_area("H", "H", None).unwrap();
    s.set_pair_config(PairConfig::uniform(15.0, 1.0));
    let full = s.pair_area("H", "H", None).unwrap();
    assert!((full - 2.0 * half).abs() < 1e-9 * full);
}

#[test]
fn explicit_config_bypasses_cache() {
    let mut s = session();
    s.set_pair_config(pair_config());
    let hh = GlyphPair::new("H", "H");
    let cached = s.pair_area("H", "H", Some(16)).unwrap();
    let direct = s.area_with(&pair_config(), "H", "H", 16, &hh).unwrap();
    assert_eq!(cached, direct);
    let other = s.area_with(&PairConfig::uniform(15.0, 2.0), "H", "H", 16, &hh).unwrap();
    assert!(other > cached);
    assert_eq!(s.pair_area("H", "H", Some(16)).unwrap(), cached);
}

#[test]
fn counters_exclude_bowls() {
    let mut s = session();
    let o = s.counters("O").unwrap();
    // row 35 crosses the bowl; only the outer whitespace is counter
    let row = o.left.row(35);
    let first_zero = row.iter().position(|v| *v == 0.0).unwrap();
    assert!(row[first_zero..].iter().all(|v| *v == 0.0));
}

#[test]
fn shifted_counters_are_cached() {
    let mut s = session();
    let band = Band { top: 10, bottom: 60 };
    let a = s.shifted_counter("H", Side::Right, -5, band).unwrap();
    let b = s.shifted_counter("H", Side::Right, -5, band).unwrap();
    assert!(std::rc::Rc::ptr_eq(&a, &b));
    s.set_serif_smoothing(1);
    let c = s.shifted_counter("H", Side::Right, -5, band).unwrap();
    assert!(!std::rc::Rc::ptr_eq(&a, &c));
}

/// Blocks with fixed geometry in place of the raster-derived defaults
struct FixedGeometry {
    inner: Blocks,
    ink_distance_calls: Cell<usize>,
}

impl GlyphProvider for FixedGeometry {
    fn font_metrics(&self) -> FontMetrics {
        self.inner.font_metrics()
    }

    fn glyph(&self, name: &str) -> Result<Glyph, Error> {
        self.inner.glyph(name)
    }

    fn rasterize(&self, name: &str) -> Result<Raster, Error> {
        self.inner.rasterize(name)
    }

    fn minimum_ink_distance(&self, _: &str, _: &str) -> Result<i64, Error> {
        self.ink_distance_calls.set(self.ink_distance_calls.get() + 1);
        Ok(7)
    }

    fn maximum_ink_distance(&self, _: &str, _: &str) -> Result<i64, Error> {
        Ok(40)
    }

    fn shift_offsets(&self, _: &Glyph, _: &Glyph, _: i64, _: i64) -> (i64, i64) {
        (-30, 30)
    }
}

#[test]
fn session_uses_provider_geometry() {
    let provider = FixedGeometry {
        inner: Blocks::new(),
        ink_distance_calls: Cell::new(0),
    };
    let mut s = CounterSpace::new(provider, config());
    s.set_pair_config(pair_config());

    assert_eq!(s.minimum_ink_distance("H", "H").unwrap(), 7);
    assert_eq!(s.maximum_ink_distance("H", "H").unwrap(), 40);
    assert_eq!(s.shift_offsets("H", "H", 10).unwrap(), (-30, 30));
    assert_eq!(s.search_start("H", "H").unwrap(), -5);
    // cached after the first request
    assert_eq!(s.provider().ink_distance_calls.get(), 1);

    let mut plain = session();
    plain.set_pair_config(pair_config());
    assert_eq!(plain.shift_offsets("H", "H", 10).unwrap(), (-15, 15));
    assert_ne!(plain.search_start("H", "H").unwrap(), -5);

    // the inks are pushed far apart, so more space lies between them
    let wide = s.pair_area("H", "H", Some(10)).unwrap();
    let near = plain.pair_area("H", "H", Some(10)).unwrap();
    assert!(wide > near, "{wide} <= {near}");
}
