//! The logical-operator oracle. The threshold driver's reference left
//! `is_logical_error` unimplemented; this fills it in per the resolved open
//! question: a residual error commutes with every stabilizer once its syndrome is
//! empty, so it is either trivial or a logical operator, distinguished by its
//! overlap (mod 2) with the opposite-type logical representative.

use decoder::{BitString, StabilizerType};

use crate::code::Code;

/// True iff `residual` (an error of `error_type` whose syndrome is already
/// empty) is equivalent to a nontrivial logical operator.
pub fn is_logical_error(code: &Code, residual: &BitString, error_type: StabilizerType) -> bool {
    let representative = code.logical_representative(error_type);
    representative.and(residual).popcount() % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::CodeFamily;
    use decoder::BitString;

    #[test]
    fn trivial_residual_is_not_a_logical_error() {
        let code = CodeFamily::Toric.build(4).unwrap();
        let residual = BitString::zeros(code.num_data_qubits());
        assert!(!is_logical_error(&code, &residual, StabilizerType::X));
    }

    #[test]
    fn full_logical_representative_is_a_logical_error() {
        let code = CodeFamily::Toric.build(4).unwrap();
        let residual = code.logical_z_representative();
        assert!(is_logical_error(&code, &residual, StabilizerType::X));
    }

    #[test]
    fn even_overlap_with_representative_is_not_a_logical_error() {
        let code = CodeFamily::RotatedPlanar.build(5).unwrap();
        // Two qubits of the logical Z representative column: even overlap.
        let representative = code.logical_z_representative().to_indices();
        let residual = BitString::from_indices(
            code.num_data_qubits(),
            representative.iter().take(2).copied(),
        );
        assert!(!is_logical_error(&code, &residual, StabilizerType::X));
    }
}
