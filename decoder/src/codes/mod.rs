//! The abstract surface-code contract: stabilizer tables as bit-masks over data
//! qubits, and syndrome generation from a data-qubit error mask.

pub mod rotated_planar;
pub mod toric;

pub use rotated_planar::RotatedPlanarCode;
pub use toric::ToricCode;

use crate::bitset::BitString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The two families of stabilizer (and, symmetrically, of data-qubit error).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum StabilizerType {
    X,
    Z,
}

impl StabilizerType {
    /// The syndrome type produced by an error of this type (and vice versa).
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Self::X => Self::Z,
            Self::Z => Self::X,
        }
    }
}

/// Capability set a Union-Find decoder invocation needs from a code: ordered
/// stabilizer tables per type, and syndrome generation from a data mask.
pub trait SurfaceCode {
    fn num_data_qubits(&self) -> usize;
    fn num_stabilizers(&self, ty: StabilizerType) -> usize;
    fn stabilizers(&self, ty: StabilizerType) -> &[BitString];
    fn name(&self) -> &str;

    /// The bit-mask of data qubits in the support of stabilizer `i` of type `ty`.
    fn stabilizer(&self, i: usize, ty: StabilizerType) -> Result<&BitString, InvalidArgumentError> {
        self.stabilizers(ty)
            .get(i)
            .ok_or(InvalidArgumentError::StabilizerIndexOutOfRange {
                index: i,
                len: self.num_stabilizers(ty),
            })
    }

    /// Computes the syndrome induced by `data_mask`, an error of type `error_type`.
    ///
    /// `syndrome_type` is the opposite of `error_type`. Bit `i` of the result is set
    /// iff `popcount(stabilizer(i, syndrome_type) & data_mask)` is odd, unless
    /// `show_all_adjacent` is set, in which case bit `i` is set iff the two masks
    /// intersect at all (used only during cluster growth to enumerate adjacency).
    fn generate_syndrome(
        &self,
        data_mask: &BitString,
        error_type: StabilizerType,
        show_all_adjacent: bool,
    ) -> BitString {
        let syndrome_type = error_type.opposite();
        let stabilizers = self.stabilizers(syndrome_type);
        let mut syndrome = BitString::zeros(stabilizers.len());
        for (i, stabilizer) in stabilizers.iter().enumerate() {
            let set = if show_all_adjacent {
                stabilizer.intersects(data_mask)
            } else {
                stabilizer.and(data_mask).popcount() % 2 == 1
            };
            if set {
                syndrome.set_bit(i);
            }
        }
        syndrome
    }
}

#[derive(Clone, Copy, Debug, Error)]
pub enum ConfigurationError {
    #[error("toric code dimensions must each be greater than 1 (got width={width}, length={length})")]
    ToricDimensionTooSmall { width: usize, length: usize },
    #[error("rotated planar code dimension must be odd and at least 3 (got {dimension})")]
    InvalidRotatedPlanarDimension { dimension: usize },
}

#[derive(Clone, Copy, Debug, Error)]
pub enum InvalidArgumentError {
    #[error("stabilizer index {index} out of range (there are {len})")]
    StabilizerIndexOutOfRange { index: usize, len: usize },
}
