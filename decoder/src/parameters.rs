//! Default Monte-Carlo grid. Can be overridden at compile-time via environment
//! variables, following the same pattern as the rest of the crate's tunables.

/// Code distances swept by default when no `--distances` override is given.
pub const DEFAULT_DISTANCES: &[usize] = &[3, 5, 7, 9];

/// Physical bit-flip rates swept by default when no `--error-rates` override is given.
pub const DEFAULT_ERROR_RATES: &[f64] = &[0.01, 0.03, 0.05, 0.07, 0.09, 0.11, 0.13, 0.15];

/// Trials run per `(distance, error_rate)` grid point, absent an override.
pub const DEFAULT_TRIALS_PER_POINT: usize = env_or_usize!("UF_TRIALS_PER_POINT", 10_000);

/// Trials reported between progress updates and intermediate JSON flushes.
pub const PROGRESS_INTERVAL: usize = env_or_usize!("UF_PROGRESS_INTERVAL", 1_000);

#[allow(dead_code, clippy::all)]
const fn compile_time_assertions() {
    const _: () = assert!(DEFAULT_TRIALS_PER_POINT > 0, "trials per point must be positive");
    const _: () = assert!(PROGRESS_INTERVAL > 0, "progress interval must be positive");
}

/// Parses environment variable as `usize` if defined, otherwise yields the
/// given `usize` value. Fails to compile if the environment variable is
/// defined but cannot be parsed.
macro_rules! env_or_usize {
    ( $name:expr, $default:expr $(,)? ) => {{
        ::konst::result::unwrap_ctx!(::konst::option::unwrap_or!(
            ::konst::option::map!(::core::option_env!($name), ::konst::primitive::parse_usize),
            ::core::result::Result::Ok::<::core::primitive::usize, _>($default)
        ))
    }};
}

use env_or_usize;
