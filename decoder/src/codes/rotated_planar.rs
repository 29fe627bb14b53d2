//! Rotated planar surface code: open (non-periodic) boundary, "Surface-17" style
//! layout (arXiv:1612.08208). `dimension` data qubits per row/column, odd and at
//! least 3.
//!
//! Stabilizer supports are generated by walking the same weight-2/weight-4
//! template-shift construction as the source docstrings: a weight-2 template and a
//! weight-4 template are emitted in turn and slid along the data-qubit index space
//! by fixed offsets, with no wraparound (the boundary is where a weight-4 template
//! would otherwise need one, which is exactly where the construction drops to
//! weight-2 instead).

use getset::CopyGetters;

use super::{ConfigurationError, StabilizerType, SurfaceCode};
use crate::bitset::BitString;

#[derive(Clone, Debug, CopyGetters)]
pub struct RotatedPlanarCode {
    #[getset(get_copy = "pub")]
    dimension: usize,
    name: String,
    x_stabilizers: Vec<BitString>,
    z_stabilizers: Vec<BitString>,
}

impl RotatedPlanarCode {
    pub fn new(dimension: usize) -> Result<Self, ConfigurationError> {
        if dimension < 3 || dimension % 2 == 0 {
            return Err(ConfigurationError::InvalidRotatedPlanarDimension { dimension });
        }
        let num_data = dimension * dimension;
        let num_parity_check_qubits = (num_data - 1) / 2;

        Ok(Self {
            dimension,
            name: format!("Rotated Planar Code (d={dimension})"),
            x_stabilizers: Self::build_x(dimension, num_data, num_parity_check_qubits),
            z_stabilizers: Self::build_z(dimension, num_data, num_parity_check_qubits),
        })
    }

    fn build_z(dimension: usize, num_data: usize, num_parity_check_qubits: usize) -> Vec<BitString> {
        let mut stabilizers = Vec::with_capacity(num_parity_check_qubits);
        let mut weight_2 = BitString::from_indices(num_data, [0, dimension]);
        let mut weight_4 =
            BitString::from_indices(num_data, [1, 2, dimension + 1, dimension + 2]);
        let mut p_temp = 0usize;

        for _ in 0..num_parity_check_qubits {
            if p_temp % dimension == 0 {
                stabilizers.push(weight_2.clone());
                if p_temp == 0 {
                    weight_2 = weight_2.shifted_left(2 * dimension - 1);
                    p_temp += 1;
                } else if p_temp == dimension {
                    weight_2 = weight_2.shifted_left(1);
                    weight_4 = weight_4.shifted_left(2);
                    p_temp = 0;
                }
            } else {
                stabilizers.push(weight_4.clone());
                weight_4 = weight_4.shifted_left(2);
                p_temp += 1;
            }
        }
        stabilizers
    }

    fn build_x(dimension: usize, num_data: usize, num_parity_check_qubits: usize) -> Vec<BitString> {
        let mut stabilizers = Vec::with_capacity(num_parity_check_qubits);
        let mut weight_2 = BitString::from_indices(num_data, [1, 2]);
        let mut weight_4 = BitString::from_indices(num_data, [0, 1, dimension, dimension + 1]);
        let half = (dimension - 1) / 2;
        let mut p_temp = 0usize;

        for p in 0..num_parity_check_qubits {
            if p >= half && p < dimension * (dimension - 1) / 2 {
                stabilizers.push(weight_4.clone());
                weight_4 = weight_4.shifted_left(2);
                p_temp += 1;
                if p_temp == half {
                    weight_4 = weight_4.shifted_left(2);
                } else if p_temp == dimension - 1 {
                    p_temp = 0;
                }
            } else {
                stabilizers.push(weight_2.clone());
                if half >= 1 && p == half - 1 {
                    weight_2 = weight_2.shifted_left((dimension - 1) * (dimension - 1) + 1);
                } else {
                    weight_2 = weight_2.shifted_left(2);
                }
            }
        }
        stabilizers
    }

    /// Representative of the logical X operator: the top row of data qubits.
    pub fn logical_x_representative(&self) -> BitString {
        BitString::from_indices(self.num_data_qubits(), 0..self.dimension)
    }

    /// Representative of the logical Z operator: the left column of data qubits.
    pub fn logical_z_representative(&self) -> BitString {
        BitString::from_indices(
            self.num_data_qubits(),
            (0..self.dimension).map(|r| r * self.dimension),
        )
    }
}

impl SurfaceCode for RotatedPlanarCode {
    #[inline]
    fn num_data_qubits(&self) -> usize {
        self.dimension * self.dimension
    }

    #[inline]
    fn num_stabilizers(&self, _ty: StabilizerType) -> usize {
        (self.dimension * self.dimension - 1) / 2
    }

    fn stabilizers(&self, ty: StabilizerType) -> &[BitString] {
        match ty {
            StabilizerType::X => &self.x_stabilizers,
            StabilizerType::Z => &self.z_stabilizers,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_even_or_undersized_dimension() {
        assert!(RotatedPlanarCode::new(2).is_err());
        assert!(RotatedPlanarCode::new(1).is_err());
        assert!(RotatedPlanarCode::new(4).is_err());
    }

    #[test]
    fn accepts_smallest_valid_dimension() {
        assert!(RotatedPlanarCode::new(3).is_ok());
    }

    #[test]
    fn surface_17_z_stabilizer_supports() {
        let code = RotatedPlanarCode::new(3).unwrap();
        let z = code.stabilizers(StabilizerType::Z);
        assert_eq!(z.len(), 4);
        assert_eq!(z[0].to_indices(), vec![0, 3]);
        assert_eq!(z[1].to_indices(), vec![1, 2, 4, 5]);
        assert_eq!(z[2].to_indices(), vec![3, 4, 6, 7]);
        assert_eq!(z[3].to_indices(), vec![5, 8]);
    }

    #[test]
    fn surface_17_x_stabilizer_supports() {
        let code = RotatedPlanarCode::new(3).unwrap();
        let x = code.stabilizers(StabilizerType::X);
        assert_eq!(x.len(), 4);
        assert_eq!(x[0].to_indices(), vec![1, 2]);
        assert_eq!(x[1].to_indices(), vec![0, 1, 3, 4]);
        assert_eq!(x[2].to_indices(), vec![4, 5, 7, 8]);
        assert_eq!(x[3].to_indices(), vec![6, 7]);
    }

    #[test]
    fn logical_representatives_span_one_row_and_one_column() {
        let code = RotatedPlanarCode::new(5).unwrap();
        assert_eq!(code.logical_x_representative().to_indices(), vec![0, 1, 2, 3, 4]);
        assert_eq!(
            code.logical_z_representative().to_indices(),
            vec![0, 5, 10, 15, 20]
        );
    }

    #[test]
    fn scenario_matches_known_decode() {
        // D0..D8 error on D4 (X-type) induces Z-syndrome {1, 2}: Z1 = {1,2,4,5}
        // contains D4, Z2 = {3,4,6,7} contains D4, both others don't.
        let code = RotatedPlanarCode::new(3).unwrap();
        let error = BitString::from_indices(9, [4]);
        let syndrome = code.generate_syndrome(&error, StabilizerType::X, false);
        assert_eq!(syndrome.to_indices(), vec![1, 2]);
    }

    #[test]
    fn every_data_qubit_touches_at_least_one_stabilizer_per_type() {
        let code = RotatedPlanarCode::new(5).unwrap();
        for ty in [StabilizerType::X, StabilizerType::Z] {
            let mut counts = vec![0usize; code.num_data_qubits()];
            for s in code.stabilizers(ty) {
                for i in s.to_indices() {
                    counts[i] += 1;
                }
            }
            assert!(counts.iter().all(|&c| c >= 1));
        }
    }
}
