use std::{fmt, ops::AddAssign, time::Duration};

use decoder::random::Seed;
use getset::{CopyGetters, Getters, Setters};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::code::CodeFamily;

/// Running tally of one grid point's trials: how many ran, how many were
/// discarded for landing on an empty syndrome, and how many ended in logical
/// failure.
#[derive(Clone, Copy, Debug, Default, CopyGetters, Serialize, Deserialize)]
#[getset(get_copy = "pub")]
pub struct TrialTally {
    trials: u64,
    discarded: u64,
    logical_failures: u64,
}

impl TrialTally {
    #[inline]
    pub fn new(trials: u64, discarded: u64, logical_failures: u64) -> Result<Self, InvalidTallyError> {
        if logical_failures <= trials {
            Ok(Self {
                trials,
                discarded,
                logical_failures,
            })
        } else {
            Err(InvalidTallyError)
        }
    }

    #[inline]
    pub fn failure_rate(&self) -> f64 {
        self.logical_failures as f64 / self.trials as f64
    }
}

impl AddAssign for TrialTally {
    fn add_assign(&mut self, other: Self) {
        self.trials += other.trials;
        self.discarded += other.discarded;
        self.logical_failures += other.logical_failures;
    }
}

#[derive(Clone, Copy, Debug, Error)]
#[error("invalid trial tally: number of logical failures must be <= number of trials")]
pub struct InvalidTallyError;

/// One `(distance, error_rate)` grid point's accumulated results.
#[derive(Clone, Copy, Debug, CopyGetters, Serialize, Deserialize)]
#[getset(get_copy = "pub")]
pub struct GridPointRecord {
    distance: usize,
    error_rate: f64,
    #[serde(flatten)]
    tally: TrialTally,
}

impl GridPointRecord {
    pub fn new(distance: usize, error_rate: f64) -> Self {
        Self {
            distance,
            error_rate,
            tally: TrialTally::default(),
        }
    }

    #[inline]
    pub fn add_results(&mut self, tally: TrialTally) {
        self.tally += tally;
    }

    #[inline]
    pub fn trials(&self) -> u64 {
        self.tally.trials()
    }

    #[inline]
    pub fn discarded(&self) -> u64 {
        self.tally.discarded()
    }

    #[inline]
    pub fn logical_failures(&self) -> u64 {
        self.tally.logical_failures()
    }

    #[inline]
    pub fn failure_rate(&self) -> f64 {
        self.tally.failure_rate()
    }
}

/// The full threshold-estimation report: every swept grid point, plus the
/// bookkeeping needed to reproduce the run.
#[derive(Clone, Debug, Getters, CopyGetters, Serialize, Deserialize, Setters)]
pub struct DataRecord {
    #[getset(get_copy = "pub")]
    code_family: CodeFamily,
    #[getset(get = "pub")]
    points: Vec<GridPointRecord>,
    #[getset(get_copy = "pub")]
    seed: Seed,
    #[getset(get_copy = "pub", set = "pub")]
    #[serde(
        serialize_with = "serialize_duration",
        deserialize_with = "deserialize_duration"
    )]
    runtime: Duration,
    #[getset(get_copy = "pub", set = "pub")]
    thread_count: Option<u32>,
}

impl DataRecord {
    pub fn new(code_family: CodeFamily, grid_points: &[(usize, f64)], seed: Seed) -> Self {
        Self {
            code_family,
            points: grid_points
                .iter()
                .map(|&(d, p)| GridPointRecord::new(d, p))
                .collect(),
            seed,
            runtime: Duration::new(0, 0),
            thread_count: None,
        }
    }

    /// Finds the grid point's record to accumulate results into. Panics if
    /// `distance`/`error_rate` was not part of the original grid — a programmer
    /// error, not a runtime condition callers should need to handle.
    pub fn point_mut(&mut self, distance: usize, error_rate: f64) -> &mut GridPointRecord {
        self.points
            .iter_mut()
            .find(|p| p.distance() == distance && p.error_rate() == error_rate)
            .expect("grid point should have been present in the original sweep")
    }
}

impl fmt::Display for DataRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", serde_json::to_string(self).or(Err(fmt::Error))?)
    }
}

fn serialize_duration<S>(duration: &Duration, ser: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let secs_str = format!("{}.{:09}", duration.as_secs(), duration.subsec_nanos());
    ser.serialize_str(&secs_str)
}

struct DurationVisitor;

impl<'de> de::Visitor<'de> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a duration in seconds (as string or floating-point)")
    }

    fn visit_f64<E>(self, secs: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Duration::try_from_secs_f64(secs).map_err(E::custom)
    }

    fn visit_str<E>(self, secs_str: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let secs = secs_str.parse::<f64>().map_err(|_| {
            E::invalid_type(
                de::Unexpected::Str(secs_str),
                &"a string containing a valid float literal",
            )
        })?;
        self.visit_f64(secs)
    }

    fn visit_u64<E>(self, secs: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Duration::from_secs(secs))
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(DurationVisitor)
}
