//! Toric surface code: rectangular lattice, periodic in both axes.
//!
//! Data qubit layout follows the source docstring exactly: data qubits sit in
//! `2*length` rows of `width` qubits each, rows alternating orientation. Even row
//! `2r` holds the qubits also touched by X-stabilizer row `r`; odd row `2r+1` holds
//! the qubits also touched by Z-stabilizer row `r`. A Z-stabilizer at `(r, c)`
//! touches the even rows above and below it and the two odd-row qubits flanking it;
//! an X-stabilizer at `(r, c)` touches the odd rows above and below it and the two
//! even-row qubits flanking it, both wrapping around the torus.

use getset::CopyGetters;

use super::{ConfigurationError, StabilizerType, SurfaceCode};
use crate::bitset::BitString;

#[derive(Clone, Debug, CopyGetters)]
pub struct ToricCode {
    #[getset(get_copy = "pub")]
    width: usize,
    #[getset(get_copy = "pub")]
    length: usize,
    name: String,
    x_stabilizers: Vec<BitString>,
    z_stabilizers: Vec<BitString>,
}

impl ToricCode {
    pub fn new(width: usize, length: usize) -> Result<Self, ConfigurationError> {
        if width <= 1 || length <= 1 {
            return Err(ConfigurationError::ToricDimensionTooSmall { width, length });
        }
        let num_data = 2 * width * length;
        let num_rows = 2 * length;
        // Data qubit at logical row `k` (mod num_rows), column `c` (mod width).
        let data_index = |k: isize, c: isize| -> usize {
            let row = k.rem_euclid(num_rows as isize) as usize;
            let col = c.rem_euclid(width as isize) as usize;
            row * width + col
        };

        let mut z_stabilizers = Vec::with_capacity(width * length);
        let mut x_stabilizers = Vec::with_capacity(width * length);
        for r in 0..length {
            for c in 0..width {
                let (r, c) = (r as isize, c as isize);
                let z = BitString::from_indices(
                    num_data,
                    [
                        data_index(2 * r, c),
                        data_index(2 * r + 2, c),
                        data_index(2 * r + 1, c),
                        data_index(2 * r + 1, c + 1),
                    ],
                );
                z_stabilizers.push(z);
                let x = BitString::from_indices(
                    num_data,
                    [
                        data_index(2 * r, c),
                        data_index(2 * r, c - 1),
                        data_index(2 * r - 1, c),
                        data_index(2 * r + 1, c),
                    ],
                );
                x_stabilizers.push(x);
            }
        }

        Ok(Self {
            width,
            length,
            name: format!("{width}x{length} Toric Code"),
            x_stabilizers,
            z_stabilizers,
        })
    }

    /// Representative of the non-contractible loop used to detect a logical X
    /// flip: the top row (`row = 0`) of horizontal data qubits, spanning every
    /// column.
    pub fn logical_x_representative(&self) -> BitString {
        BitString::from_indices(self.num_data_qubits(), 0..self.width)
    }

    /// Representative of the non-contractible loop used to detect a logical Z
    /// flip: the left column (`col = 0`) of vertical data qubits, spanning every
    /// row.
    pub fn logical_z_representative(&self) -> BitString {
        BitString::from_indices(
            self.num_data_qubits(),
            (0..self.length).map(|r| (2 * r + 1) * self.width),
        )
    }
}

impl SurfaceCode for ToricCode {
    #[inline]
    fn num_data_qubits(&self) -> usize {
        2 * self.width * self.length
    }

    #[inline]
    fn num_stabilizers(&self, _ty: StabilizerType) -> usize {
        self.width * self.length
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
    fn rejects_degenerate_dimensions() {
        assert!(ToricCode::new(1, 5).is_err());
        assert!(ToricCode::new(5, 1).is_err());
        assert!(ToricCode::new(1, 1).is_err());
    }

    #[test]
    fn three_by_three_stabilizer_weights() {
        let code = ToricCode::new(3, 3).unwrap();
        assert_eq!(code.num_data_qubits(), 18);
        assert_eq!(code.num_stabilizers(StabilizerType::Z), 9);
        for s in code.stabilizers(StabilizerType::Z) {
            assert_eq!(s.popcount(), 4);
        }
        for s in code.stabilizers(StabilizerType::X) {
            assert_eq!(s.popcount(), 4);
        }
    }

    #[test]
    fn three_by_three_z_stabilizer_supports() {
        let code = ToricCode::new(3, 3).unwrap();
        let z = code.stabilizers(StabilizerType::Z);
        assert_eq!(z[0].to_indices(), vec![0, 3, 4, 6]);
        assert_eq!(z[1].to_indices(), vec![1, 4, 5, 7]);
        assert_eq!(z[2].to_indices(), vec![2, 3, 5, 8]);
        assert_eq!(z[3].to_indices(), vec![6, 9, 10, 12]);
        assert_eq!(z[6].to_indices(), vec![0, 12, 15, 16]);
    }

    #[test]
    fn three_by_three_x_stabilizer_supports() {
        let code = ToricCode::new(3, 3).unwrap();
        let x = code.stabilizers(StabilizerType::X);
        assert_eq!(x[0].to_indices(), vec![0, 2, 3, 15]);
        assert_eq!(x[1].to_indices(), vec![0, 1, 4, 16]);
        assert_eq!(x[2].to_indices(), vec![1, 2, 5, 17]);
        assert_eq!(x[3].to_indices(), vec![3, 6, 8, 9]);
    }

    #[test]
    fn logical_representatives_span_one_row_and_one_column() {
        let code = ToricCode::new(3, 4).unwrap();
        assert_eq!(code.logical_x_representative().popcount(), code.width());
        assert_eq!(code.logical_z_representative().popcount(), code.length());
        assert_eq!(code.logical_x_representative().to_indices(), vec![0, 1, 2]);
        assert_eq!(
            code.logical_z_representative().to_indices(),
            vec![3, 9, 15, 21]
        );
    }

    #[test]
    fn every_data_qubit_touches_exactly_two_stabilizers_per_type() {
        let code = ToricCode::new(3, 4).unwrap();
        for ty in [StabilizerType::X, StabilizerType::Z] {
            let mut counts = vec![0usize; code.num_data_qubits()];
            for s in code.stabilizers(ty) {
                for i in s.to_indices() {
                    counts[i] += 1;
                }
            }
            assert!(counts.iter().all(|&c| c == 2));
        }
    }
}
