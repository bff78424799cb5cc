use life_sweep::{
    sweep, Aggregate, ConfigError, ConfigKey, Density, Evaluate, GridSize, NoopObserver,
    ParameterSweepCache, SweepPlan, SweepScheduler,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Records how often each key is evaluated.
#[derive(Default)]
struct Tally {
    calls: Mutex<HashMap<ConfigKey, usize>>,
    total: AtomicUsize,
}

impl Evaluate for Tally {
    fn evaluate(&self, key: &ConfigKey) -> Aggregate {
        *self.calls.lock().unwrap().entry(*key).or_default() += 1;
        self.total.fetch_add(1, Ordering::SeqCst);
        Aggregate {
            mean: key.size().area() as f64 * key.density().as_f64(),
            std_dev: 0.0,
        }
    }
}

#[test]
fn free_function_sweeps_the_triangular_space() {
    let results = sweep(1, 3, 0.5, 4).unwrap();
    let sizes: Vec<GridSize> = results.sizes().collect();
    assert_eq!(sizes.len(), 6);
    assert!(sizes.iter().all(|s| s.columns() <= s.rows()));
    assert_eq!(results.len(), 6 * 3);

    // Density 0 never produces life.
    for size in sizes {
        assert_eq!(
            results.get(size, Density::ZERO),
            Some(Aggregate { mean: 0.0, std_dev: 0.0 })
        );
    }
}

#[test]
fn free_function_rejects_bad_input_before_work() {
    assert!(matches!(sweep(0, 3, 0.1, 4), Err(ConfigError::InvalidDimensions { .. })));
    assert!(matches!(sweep(1, 3, 0.1, 0), Err(ConfigError::ZeroSteps)));
    assert!(matches!(sweep(1, 3, 2.0, 4), Err(ConfigError::InvalidDensityStep(_))));
}

#[test]
fn overlapping_sweeps_share_one_evaluation_per_key() {
    let cache = Arc::new(ParameterSweepCache::new(Tally::default()));
    let wide = SweepScheduler::with_threads(Arc::clone(&cache), 4).unwrap();
    let narrow = SweepScheduler::new(Arc::clone(&cache));
    let wide_plan = SweepPlan::new(1, 4, 0.25).unwrap();
    let narrow_plan = SweepPlan::new(2, 3, 0.5).unwrap();

    std::thread::scope(|scope| {
        scope.spawn(|| wide.run(&wide_plan, &NoopObserver));
        scope.spawn(|| narrow.run(&narrow_plan, &NoopObserver));
    });

    // Narrow plan keys are a subset of the wide plan keys.
    let expected = wide_plan.configuration_count();
    assert_eq!(cache.evaluator().total.load(Ordering::SeqCst), expected);
    assert!(cache.evaluator().calls.lock().unwrap().values().all(|&n| n == 1));
    assert_eq!(cache.len(), expected);
}

#[test]
fn observer_sees_every_published_result() {
    let cache = Arc::new(ParameterSweepCache::new(Tally::default()));
    let scheduler = SweepScheduler::new(Arc::clone(&cache));
    let plan = SweepPlan::new(2, 3, 0.2).unwrap();
    let published = Mutex::new(HashMap::new());
    let observer = |key: ConfigKey, aggregate: Aggregate| {
        assert!(published.lock().unwrap().insert(key, aggregate).is_none());
    };

    let results = scheduler.run(&plan, &observer);
    let published = published.into_inner().unwrap();

    assert_eq!(published.len(), results.len());
    for (key, aggregate) in published {
        assert_eq!(results.get(key.size(), key.density()), Some(aggregate));
        assert_eq!(cache.peek(&key), Some(aggregate));
    }
}
