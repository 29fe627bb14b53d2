use std::time::Instant;

use anyhow::{Context, Result};
use crossbeam_channel::{unbounded as channel, RecvTimeoutError, Sender};
use decoder::parameters::PROGRESS_INTERVAL;
use decoder::random::{custom_thread_rng, get_or_insert_global_seed, try_insert_global_seed};
use rayon::prelude::*;
use std::time::Duration;

use crate::{
    application::{self, end_message, start_message, TrialOutcome},
    code::Code,
    output,
    record::{DataRecord, TrialTally},
    settings::Settings,
};

/// Runs one trial against `code`, folding the outcome into a tally.
fn trial_iteration(code: &Code, error_rate: f64) -> Result<TrialTally, decoder::uf::InternalInvariantError> {
    match application::run_trial(code, error_rate, &mut custom_thread_rng())? {
        TrialOutcome::Discarded => Ok(TrialTally::new(0, 1, 0).expect("0 <= 0")),
        TrialOutcome::Decoded { logical_failure } => {
            Ok(TrialTally::new(1, 0, u64::from(logical_failure)).expect("failure count <= 1 trial"))
        }
    }
}

/// Runs `trials_per_point` trials at one grid point in batches of
/// `PROGRESS_INTERVAL`, sending a running tally after each batch.
fn trial_loop(
    code: &Code,
    error_rate: f64,
    trials_per_point: u64,
    tx_progress: &Sender<(usize, f64, TrialTally)>,
    distance: usize,
    pool: &rayon::ThreadPool,
) -> Result<()> {
    let mut remaining = trials_per_point;
    while remaining > 0 {
        let batch = u64::try_from(PROGRESS_INTERVAL).unwrap_or(u64::MAX).min(remaining);
        let tally = pool.install(|| {
            (0..batch)
                .into_par_iter()
                .map(|_| trial_iteration(code, error_rate))
                .try_reduce(TrialTally::default, |mut acc, t| {
                    acc += t;
                    Ok(acc)
                })
        })?;
        tx_progress
            .send((distance, error_rate, tally))
            .context("progress receiver should not be closed")?;
        remaining -= batch;
    }
    Ok(())
}

fn drain_progress(
    data: &mut DataRecord,
    settings: &Settings,
    rx_progress: &crossbeam_channel::Receiver<(usize, f64, TrialTally)>,
) -> Result<()> {
    loop {
        match rx_progress.recv_timeout(Duration::from_millis(100)) {
            Ok((distance, error_rate, tally)) => {
                data.point_mut(distance, error_rate).add_results(tally);
                output::write_json(settings.output(), data)?;
            }
            Err(RecvTimeoutError::Timeout) => break,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    Ok(())
}

/// Runs every grid point's trials across a rayon thread pool, reporting
/// progress back to the main thread after every batch of trials.
pub fn run_parallel(settings: &Settings) -> Result<DataRecord> {
    let start_time = Instant::now();
    if settings.verbose() >= 1 {
        eprintln!("{}", start_message(settings));
    }
    output::check_writable(settings.output(), settings.overwrite())?;
    let seed = try_insert_global_seed(settings.seed())
        .context("must be able to set global seed to user-specified seed")?;

    let grid_points = settings.grid_points();
    let mut data = DataRecord::new(settings.code_family(), &grid_points, seed);

    let (tx_progress, rx_progress) = channel();
    let thread_count = if settings.threads() == 0 {
        num_cpus::get()
    } else {
        settings.threads()
    };
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build()
        .context("rayon thread pool should build")?;

    for (distance, error_rate) in &grid_points {
        let code = settings.code_family().build(*distance)?;
        trial_loop(
            &code,
            *error_rate,
            settings.trials_per_point(),
            &tx_progress,
            *distance,
            &pool,
        )?;
        drain_progress(&mut data, settings, &rx_progress)?;
    }
    drop(tx_progress);
    drain_progress(&mut data, settings, &rx_progress)?;

    data.set_runtime(start_time.elapsed());
    data.set_thread_count(Some(thread_count as u32));
    if settings.verbose() >= 1 {
        eprintln!("{}", end_message(&data, data.runtime()));
    }
    output::write_json(settings.output(), &data)?;
    Ok(data)
}
