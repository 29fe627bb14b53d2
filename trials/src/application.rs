use std::time::{Duration, Instant};

use anyhow::Result;
use decoder::random::{get_rng_from_seed, Seed};
use decoder::uf::{self, DecodeError, InternalInvariantError};
use decoder::{BitString, StabilizerType, SurfaceCode};
use rand::Rng;

use crate::{
    code::Code,
    logical,
    output,
    record::{DataRecord, TrialTally},
    settings::Settings,
};

/// The error type sampled for every trial. The driver's syndrome is always
/// computed for the opposite stabilizer type ("the X-syndrome, say" per the
/// reference design); which Pauli type is arbitrary by the code's X/Z symmetry.
const ERROR_TYPE: StabilizerType = StabilizerType::X;

/// Samples an IID bit-flip error: each of `n_data` qubits is flipped
/// independently with probability `error_rate`.
pub fn sample_iid_error<R: Rng + ?Sized>(n_data: usize, error_rate: f64, rng: &mut R) -> BitString {
    BitString::from_indices(n_data, (0..n_data).filter(|_| rng.gen_bool(error_rate)))
}

pub enum TrialOutcome {
    Discarded,
    Decoded { logical_failure: bool },
}

/// Runs one trial at the given code and error rate: sample, compute the
/// syndrome, discard if trivial, otherwise decode and classify the residual.
pub fn run_trial<R: Rng + ?Sized>(
    code: &Code,
    error_rate: f64,
    rng: &mut R,
) -> Result<TrialOutcome, InternalInvariantError> {
    let surface = code.as_surface_code();
    let error = sample_iid_error(surface.num_data_qubits(), error_rate, rng);
    let syndrome = surface.generate_syndrome(&error, ERROR_TYPE, false);
    if syndrome.is_empty() {
        return Ok(TrialOutcome::Discarded);
    }

    match uf::decode(surface, &error, ERROR_TYPE) {
        Ok(outcome) => {
            let residual = error.xor(&outcome.correction);
            let residual_syndrome = surface.generate_syndrome(&residual, ERROR_TYPE, false);
            let logical_failure = !residual_syndrome.is_empty()
                || logical::is_logical_error(code, &residual, ERROR_TYPE);
            Ok(TrialOutcome::Decoded { logical_failure })
        }
        Err(DecodeError::IllFormedSyndrome(_)) => Ok(TrialOutcome::Discarded),
        Err(DecodeError::InternalInvariant(err)) => Err(err),
    }
}

pub(crate) fn start_message(settings: &Settings) -> String {
    let thread_message = if settings.parallel() {
        let thread_count = if settings.threads() == 0 {
            num_cpus::get()
        } else {
            settings.threads()
        };
        format!("[running with {} threads]\n", thread_count)
    } else {
        String::new()
    };
    format!(
        "Starting threshold estimation ({} family) over {} grid points, {} trials each:\n{}",
        settings.code_family().name(),
        settings.grid_points().len(),
        settings.trials_per_point(),
        thread_message
    )
}

pub(crate) fn end_message(data: &DataRecord, runtime: Duration) -> String {
    let mut lines = vec![format!("Runtime: {:.3} s", runtime.as_secs_f64())];
    for point in data.points() {
        lines.push(format!(
            "  d={:<3} p={:<7} failures={}/{} (discarded {}) rate={:.3e}",
            point.distance(),
            point.error_rate(),
            point.logical_failures(),
            point.trials(),
            point.discarded(),
            point.failure_rate()
        ));
    }
    lines.join("\n")
}

/// Runs every grid point's trials on the current thread, writing progress to
/// `settings.output()` after each point.
pub fn run(settings: &Settings) -> Result<DataRecord> {
    let start_time = Instant::now();
    if settings.verbose() >= 1 {
        eprintln!("{}", start_message(settings));
    }
    output::check_writable(settings.output(), settings.overwrite())?;

    let seed = settings.seed().unwrap_or_else(Seed::from_entropy);
    let grid_points = settings.grid_points();
    let mut data = DataRecord::new(settings.code_family(), &grid_points, seed);
    let mut rng = get_rng_from_seed(seed, 0);

    for (distance, error_rate) in grid_points {
        let code = settings.code_family().build(distance)?;
        let mut tally = TrialTally::default();
        let mut trials_run = 0u64;
        while trials_run < settings.trials_per_point() {
            match run_trial(&code, error_rate, &mut rng)? {
                TrialOutcome::Discarded => {
                    tally = add_discarded(tally);
                }
                TrialOutcome::Decoded { logical_failure } => {
                    trials_run += 1;
                    tally = add_trial(tally, logical_failure);
                }
            }
        }
        data.point_mut(distance, error_rate).add_results(tally);
        if settings.verbose() >= 2 {
            eprintln!(
                "  d={} p={} done ({} trials, {} discarded)",
                distance,
                error_rate,
                tally.trials(),
                tally.discarded()
            );
        }
        output::write_json(settings.output(), &data)?;
    }

    data.set_runtime(start_time.elapsed());
    if settings.verbose() >= 1 {
        eprintln!("{}", end_message(&data, data.runtime()));
    }
    output::write_json(settings.output(), &data)?;
    Ok(data)
}

fn add_discarded(mut tally: TrialTally) -> TrialTally {
    tally += TrialTally::new(0, 1, 0).expect("0 <= 0");
    tally
}

fn add_trial(mut tally: TrialTally, logical_failure: bool) -> TrialTally {
    tally += TrialTally::new(1, 0, u64::from(logical_failure)).expect("failure count <= 1 trial");
    tally
}
