use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use decoder::parameters::{DEFAULT_DISTANCES, DEFAULT_ERROR_RATES, DEFAULT_TRIALS_PER_POINT};
use decoder::random::Seed;
use derive_builder::Builder;
use getset::{CopyGetters, Getters};

use crate::code::CodeFamily;

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum FamilyArg {
    Toric,
    RotatedPlanar,
}

impl From<FamilyArg> for CodeFamily {
    fn from(arg: FamilyArg) -> Self {
        match arg {
            FamilyArg::Toric => CodeFamily::Toric,
            FamilyArg::RotatedPlanar => CodeFamily::RotatedPlanar,
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[arg(short, long, value_enum, default_value_t = FamilyArg::Toric, help = "Surface code family")]
    family: FamilyArg,
    #[arg(short, long, value_delimiter = ',', help = "Code distances to sweep (comma-separated)")]
    distances: Option<Vec<usize>>,
    #[arg(
        short = 'p',
        long,
        value_delimiter = ',',
        help = "Physical bit-flip rates to sweep (comma-separated)"
    )]
    error_rates: Option<Vec<f64>>,
    #[arg(short = 'N', long, help = "Trials run at each grid point")]
    trials_per_point: Option<f64>, // parsed as scientific notation to u64
    #[arg(short, long, help = "Output file [default: stdout]")]
    output: Option<String>,
    #[arg(
        long,
        help = "If output file already exists, overwrite without creating a backup"
    )]
    overwrite: bool,
    #[arg(long, help = "Run in parallel with an automatically chosen number of threads")]
    parallel: bool,
    #[arg(
        short,
        long,
        default_value_t = 1000.0,
        help = "Max number of logical failures recorded in full per grid point"
    )]
    recordmax: f64, // parsed as scientific notation to usize
    #[arg(long, help = "Specify PRNG seed as a 256-bit hex string [default: random]")]
    seed: Option<String>,
    #[arg(long, help = "Set number of threads (ignores --parallel)")]
    threads: Option<usize>,
    #[arg(short, long, action = clap::ArgAction::Count,
        help = "Print progress and/or logical failures (repeat for more verbose, max 3)")]
    verbose: u8,
}

#[derive(Builder, Clone, CopyGetters, Debug, Getters)]
pub struct Settings {
    #[getset(get_copy = "pub")]
    code_family: CodeFamily,
    #[getset(get = "pub")]
    distances: Vec<usize>,
    #[getset(get = "pub")]
    error_rates: Vec<f64>,
    #[getset(get_copy = "pub")]
    trials_per_point: u64,
    #[builder(default = "1000")]
    #[getset(get_copy = "pub")]
    record_max: usize,
    #[builder(default)]
    #[getset(get_copy = "pub")]
    verbose: u8,
    #[builder(default)]
    #[getset(get_copy = "pub")]
    seed: Option<Seed>,
    #[builder(default = "1")]
    #[getset(get_copy = "pub")]
    threads: usize,
    #[builder(default)]
    #[getset(get = "pub")]
    output: OutputTo,
    #[builder(default)]
    #[getset(get_copy = "pub")]
    overwrite: bool,
}

impl Settings {
    const MAX_THREAD_COUNT: usize = 1024;

    pub fn from_args(args: Args) -> Result<Self> {
        Ok(Self {
            code_family: args.family.into(),
            distances: args.distances.unwrap_or_else(|| DEFAULT_DISTANCES.to_vec()),
            error_rates: args
                .error_rates
                .unwrap_or_else(|| DEFAULT_ERROR_RATES.to_vec()),
            trials_per_point: args
                .trials_per_point
                .map(|n| n as u64)
                .unwrap_or(DEFAULT_TRIALS_PER_POINT as u64),
            record_max: args.recordmax as usize,
            verbose: args.verbose,
            seed: args
                .seed
                .as_deref()
                .map(Seed::try_from)
                .transpose()
                .context("--seed should be a 256-bit hex string")?,
            threads: args.threads.map_or_else(
                || usize::from(!args.parallel),
                |threads| threads.clamp(1, Self::MAX_THREAD_COUNT),
            ),
            output: args
                .output
                .map_or(OutputTo::Stdout, |path| OutputTo::File(path.into())),
            overwrite: args.overwrite,
        })
    }

    #[inline]
    pub fn parallel(&self) -> bool {
        self.threads != 1
    }

    /// Every `(distance, error_rate)` combination in the sweep, in grid order.
    pub fn grid_points(&self) -> Vec<(usize, f64)> {
        self.distances
            .iter()
            .copied()
            .flat_map(|d| self.error_rates.iter().copied().map(move |p| (d, p)))
            .collect()
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum OutputTo {
    #[default]
    Stdout,
    File(PathBuf),
    Void,
}
