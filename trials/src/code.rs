//! A code instance for one grid point: which family, and the concrete code plus
//! the logical-operator representatives that family exposes.

use decoder::codes::{ConfigurationError, RotatedPlanarCode, ToricCode};
use decoder::{BitString, StabilizerType, SurfaceCode};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum CodeFamily {
    Toric,
    RotatedPlanar,
}

impl CodeFamily {
    /// Builds the square instance of this family at code distance `distance`.
    /// A toric code at distance `D` is the `D x D` torus.
    pub fn build(self, distance: usize) -> Result<Code, ConfigurationError> {
        match self {
            CodeFamily::Toric => Ok(Code::Toric(ToricCode::new(distance, distance)?)),
            CodeFamily::RotatedPlanar => Ok(Code::RotatedPlanar(RotatedPlanarCode::new(distance)?)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CodeFamily::Toric => "toric",
            CodeFamily::RotatedPlanar => "rotated planar",
        }
    }
}

/// The concrete surface code backing one grid point's trials, along with the
/// logical-operator representatives its family defines.
#[derive(Clone, Debug)]
pub enum Code {
    Toric(ToricCode),
    RotatedPlanar(RotatedPlanarCode),
}

impl Code {
    pub fn as_surface_code(&self) -> &dyn SurfaceCode {
        match self {
            Code::Toric(c) => c,
            Code::RotatedPlanar(c) => c,
        }
    }

    pub fn num_data_qubits(&self) -> usize {
        self.as_surface_code().num_data_qubits()
    }

    pub fn logical_x_representative(&self) -> BitString {
        match self {
            Code::Toric(c) => c.logical_x_representative(),
            Code::RotatedPlanar(c) => c.logical_x_representative(),
        }
    }

    pub fn logical_z_representative(&self) -> BitString {
        match self {
            Code::Toric(c) => c.logical_z_representative(),
            Code::RotatedPlanar(c) => c.logical_z_representative(),
        }
    }

    /// The representative whose overlap with an error of `error_type` detects a
    /// logical flip: the opposite-type representative.
    pub fn logical_representative(&self, error_type: StabilizerType) -> BitString {
        match error_type {
            StabilizerType::X => self.logical_z_representative(),
            StabilizerType::Z => self.logical_x_representative(),
        }
    }
}
