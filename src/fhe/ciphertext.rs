use crate::r1cs::errors::{R1csError, R1csResult};
use crate::r1cs::lc::VariableArray;
use crate::r1cs::protoboard::Protoboard;
use ark_ff::Field;
use rand::Rng;
use std::ops::Index;

/// Tuple of equal-length coefficient vectors: `(c0, c1)` after relinearization,
/// `(c0, c1, c2)` straight after a multiplication.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ciphertext {
    components: Vec<VariableArray>,
}

impl Ciphertext {
    pub fn new(components: Vec<VariableArray>) -> Self {
        Self { components }
    }

    pub fn allocate<F: Field>(pb: &mut Protoboard<F>, arity: usize, el_length: usize) -> Self {
        Self {
            components: (0..arity).map(|_| pb.allocate(el_length)).collect(),
        }
    }

    /// Number of components.
    pub fn arity(&self) -> usize {
        self.components.len()
    }

    /// Length of the first component, 0 for an empty ciphertext.
    pub fn el_length(&self) -> usize {
        self.components.first().map_or(0, VariableArray::len)
    }

    pub fn components(&self) -> &[VariableArray] {
        &self.components
    }

    pub fn assign<F: Field>(&self, pb: &mut Protoboard<F>, values: &[Vec<F>]) -> R1csResult<()> {
        if values.len() != self.arity() {
            return Err(R1csError::configuration(
                "ciphertext",
                format!("{} value rows for arity {}", values.len(), self.arity()),
            ));
        }
        for (component, row) in self.components.iter().zip(values) {
            pb.assign_array(component, row)?;
        }
        Ok(())
    }

    pub fn assign_random<F: Field, R: Rng + ?Sized>(
        &self,
        pb: &mut Protoboard<F>,
        rng: &mut R,
    ) -> R1csResult<()> {
        for component in &self.components {
            let row: Vec<F> = (0..component.len()).map(|_| F::rand(rng)).collect();
            pb.assign_array(component, &row)?;
        }
        Ok(())
    }

    pub fn values<F: Field>(&self, pb: &Protoboard<F>) -> R1csResult<Vec<Vec<F>>> {
        self.components.iter().map(|c| pb.values_of(c)).collect()
    }
}

impl Index<usize> for Ciphertext {
    type Output = VariableArray;

    fn index(&self, index: usize) -> &VariableArray {
        &self.components[index]
    }
}

/// Relinearization key pair: row `k` of each half pairs with decomposition digit `k`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelinKey {
    pub key0: Vec<VariableArray>,
    pub key1: Vec<VariableArray>,
}

impl RelinKey {
    pub fn new(key0: Vec<VariableArray>, key1: Vec<VariableArray>) -> Self {
        Self { key0, key1 }
    }

    pub fn allocate<F: Field>(pb: &mut Protoboard<F>, digits: usize, el_length: usize) -> Self {
        Self {
            key0: (0..digits).map(|_| pb.allocate(el_length)).collect(),
            key1: (0..digits).map(|_| pb.allocate(el_length)).collect(),
        }
    }

    pub fn num_digits(&self) -> usize {
        self.key0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_std::test_rng;

    #[test]
    fn allocate_and_assign() {
        let mut pb = Protoboard::<Fr>::new();
        let ct = Ciphertext::allocate(&mut pb, 2, 3);
        assert_eq!(ct.arity(), 2);
        assert_eq!(ct.el_length(), 3);
        assert_eq!(pb.num_variables(), 7);

        let rows = vec![
            vec![Fr::from(1u64), Fr::from(2u64), Fr::from(3u64)],
            vec![Fr::from(4u64), Fr::from(5u64), Fr::from(6u64)],
        ];
        assert!(ct.assign(&mut pb, &rows[..1]).is_err());
        ct.assign(&mut pb, &rows).unwrap();
        assert_eq!(ct.values(&pb).unwrap(), rows);
    }

    #[test]
    fn random_assignment_fills_every_slot() {
        let mut pb = Protoboard::<Fr>::new();
        let ct = Ciphertext::allocate(&mut pb, 3, 4);
        ct.assign_random(&mut pb, &mut test_rng()).unwrap();
        assert!(ct.components().iter().flatten().all(|v| pb.is_assigned(*v)));
    }

    #[test]
    fn relin_key_shape() {
        let mut pb = Protoboard::<Fr>::new();
        let key = RelinKey::allocate(&mut pb, 3, 2);
        assert_eq!(key.num_digits(), 3);
        assert_eq!(key.key1.len(), 3);
        assert_eq!(key.key0[2].len(), 2);
    }
}
