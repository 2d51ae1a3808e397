#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

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

/// A normalized coordinate in `[0, 1]`.
pub fn arb_unit() -> impl Strategy<Value = f64> {
    0.0f64..=1.0
}

/// Image sides from a thumbnail up to a large photo.
pub fn arb_image_side() -> impl Strategy<Value = u32> {
    1u32..=8192
}

/// A finite sample set of modest size, possibly with repeats.
pub fn arb_samples(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0e6f64..1.0e6, 1..=max_len)
}
