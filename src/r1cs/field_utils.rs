//! Field helpers shared by gadgets and the instance digest.

use crate::r1cs::errors::{R1csError, R1csResult};
use ark_ff::Field;
use ark_serialize::CanonicalSerialize;

/// Convert u64 to a field element
pub fn u64_to_field<F: Field>(value: u64) -> F {
    F::from(value)
}

/// Convert a slice of u64 to field elements
pub fn u64_slice_to_field<F: Field>(values: &[u64]) -> Vec<F> {
    values.iter().map(|&v| u64_to_field(v)).collect()
}

/// Multiplicative inverse of two; fails in characteristic two.
pub fn two_inverse<F: Field>(gadget: &str) -> R1csResult<F> {
    F::from(2u64)
        .inverse()
        .ok_or_else(|| R1csError::configuration(gadget, "2 is not invertible in this field"))
}

/// Inverse of `value`, reported as an arithmetic failure of `gadget`.
pub fn checked_inverse<F: Field>(value: F, gadget: &str) -> R1csResult<F> {
    value
        .inverse()
        .ok_or_else(|| R1csError::arithmetic(gadget, "division by the zero element"))
}

/// Canonical compressed encoding of a field element
pub fn field_to_bytes<F: CanonicalSerialize>(value: &F) -> R1csResult<Vec<u8>> {
    let mut bytes = Vec::with_capacity(value.compressed_size());
    value
        .serialize_compressed(&mut bytes)
        .map_err(|e| R1csError::serialization(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_std::{One, Zero};

    #[test]
    fn two_inverse_halves() {
        let half: Fr = two_inverse("test").unwrap();
        assert_eq!(half * Fr::from(2u64), Fr::one());
    }

    #[test]
    fn zero_has_no_inverse() {
        let err = checked_inverse(Fr::zero(), "lincomb").unwrap_err();
        assert!(matches!(err, R1csError::Arithmetic { .. }));
        assert_eq!(
            checked_inverse(Fr::from(4u64), "lincomb").unwrap() * Fr::from(4u64),
            Fr::one()
        );
    }

    #[test]
    fn slice_conversion() {
        let values: Vec<Fr> = u64_slice_to_field(&[1, 2, 3]);
        assert_eq!(values[2], Fr::from(3u64));
        assert_eq!(field_to_bytes(&values[0]).unwrap().len(), 32);
    }
}
