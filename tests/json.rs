// Test serialization using json
#![cfg(feature = "serde")]

use counterspace::{BandLimit, GlyphPair, LightBlend, PairConfig, SpacingConfig, SpacingPlan, Strategy};
use serde::{de::Deserialize, ser::Serialize};
use std::cmp::PartialEq;
use std::fmt::Debug;

fn test<X: Debug + PartialEq + Serialize + for<'a> Deserialize<'a>>(x: X, t: &str) {
    match serde_json::to_string(&x) {
        Ok(text) => assert_eq!(text, t),
        Err(err) => panic!("Ser of '{x:?}' failed: {err}"),
    }

    match serde_json::from_str::<X>(t) {
        Ok(v) => assert_eq!(v, x),
        Err(err) => panic!("Deser of '{t}' failed: {err}"),
    }
}

fn round_trip<X: Debug + PartialEq + Serialize + for<'a> Deserialize<'a>>(x: X) {
    let text = match serde_json::to_string(&x) {
        Ok(text) => text,
        Err(err) => panic!("Ser of '{x:?}' failed: {err}"),
    };
    match serde_json::from_str::<X>(&text) {
        Ok(v) => assert_eq!(v, x),
        Err(err) => panic!("Deser of '{text}' failed: {err}"),
    }
}

#[test]
fn strategy() {
    test(BandLimit::AfterDiagonize, "\"AfterDiagonize\"");
    test(LightBlend::OnePlus, "\"OnePlus\"");
    test(
        Strategy::default(),
        "{\"band_limit\":\"BeforeDiagonize\",\"blend\":\"Additive\"}",
    );
}

#[test]
fn pair() {
    test(GlyphPair::new("A", "V"), "{\"left\":\"A\",\"right\":\"V\"}");
}

#[test]
fn pair_config() {
    test(
        PairConfig::uniform(10.0, 0.5),
        "{\"w_top\":10.0,\"h_top\":10.0,\"w_bottom\":10.0,\"h_bottom\":10.0,\
         \"w_center\":10.0,\"h_center\":10.0,\"top_strength\":0.5,\
         \"bottom_strength\":0.5,\"center_strength\":0.5}",
    );
    round_trip(PairConfig::initial_guess());
}

#[test]
fn spacing_config() {
    round_trip(SpacingConfig::default());
}

#[test]
fn plan() {
    let mut plan = SpacingPlan::default();
    plan.sidebearings.insert("A".to_string(), (3, 4));
    plan.kerning.insert(GlyphPair::new("A", "V"), -12);
    test(
        plan,
        "{\"sidebearings\":{\"A\":[3,4]},\"kerning\":[{\"left\":\"A\",\"right\":\"V\",\"value\":-12}]}",
    );
}
