use decoder::random::Seed;
use trials::application::run;
use trials::code::CodeFamily;
use trials::settings::{OutputTo, SettingsBuilder};

#[test]
fn sequential_run_covers_every_grid_point_with_no_leftover_discards() {
    let seed = Seed::new([11u8; 32]);
    let settings = SettingsBuilder::default()
        .code_family(CodeFamily::Toric)
        .distances(vec![3, 5])
        .error_rates(vec![0.05, 0.1])
        .trials_per_point(200)
        .output(OutputTo::Void)
        .seed(Some(seed))
        .build()
        .unwrap();

    let data = run(&settings).unwrap();

    assert_eq!(data.points().len(), 4);
    assert_eq!(data.seed(), seed);
    assert!(data.thread_count().is_none());
    for point in data.points() {
        assert_eq!(point.trials(), 200);
        assert!(point.logical_failures() <= point.trials());
        assert!((0.0..=1.0).contains(&point.failure_rate()));
    }
}

#[test]
fn rotated_planar_family_runs_to_completion() {
    let settings = SettingsBuilder::default()
        .code_family(CodeFamily::RotatedPlanar)
        .distances(vec![5])
        .error_rates(vec![0.1])
        .trials_per_point(100)
        .output(OutputTo::Void)
        .build()
        .unwrap();

    let data = run(&settings).unwrap();
    assert_eq!(data.points().len(), 1);
    assert_eq!(data.points()[0].trials(), 100);
}

#[test]
fn same_seed_reproduces_the_same_failure_count() {
    let seed = Seed::new([42u8; 32]);
    let build = || {
        SettingsBuilder::default()
            .code_family(CodeFamily::Toric)
            .distances(vec![3])
            .error_rates(vec![0.08])
            .trials_per_point(300)
            .output(OutputTo::Void)
            .seed(Some(seed))
            .build()
            .unwrap()
    };
    let first = run(&build()).unwrap();
    let second = run(&build()).unwrap();
    assert_eq!(
        first.points()[0].logical_failures(),
        second.points()[0].logical_failures()
    );
}
