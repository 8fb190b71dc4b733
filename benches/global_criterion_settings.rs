// Shared criterion settings so individual benchmarks don't each pick their
// own sample sizes and disagree.

use criterion::Criterion;
use std::time::Duration;

pub fn get_criterion() -> Criterion {
    Criterion::default()
        .sample_size(100)
        .warm_up_time(Duration::from_millis(500))
        .measurement_time(Duration::from_secs(2))
}
