#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use yoloprep::split::SplitRatios;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Ratios in [0, 1] each; their sum is unconstrained.
pub fn arb_ratios() -> impl Strategy<Value = SplitRatios> {
    (0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0)
        .prop_map(|(train, val, test)| SplitRatios::new(train, val, test))
}

/// Ratios that sum to one, drawn as two cut points in [0, 1].
pub fn arb_unit_ratios() -> impl Strategy<Value = SplitRatios> {
    (0.0f64..=1.0, 0.0f64..=1.0).prop_map(|(a, b)| {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        SplitRatios::new(lo, hi - lo, 1.0 - hi)
    })
}

/// Number of boxes per image; every image has at least one.
pub fn arb_boxes_per_image(max_images: usize, max_boxes: usize) -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1..=max_boxes, 1..=max_images)
}
