use crate::r1cs::errors::{R1csError, R1csResult};
use crate::r1cs::field_utils::field_to_bytes;
use crate::r1cs::lc::LinearCombination;
use ark_ff::Field;
use sha2::{Digest, Sha256};

/// Describes a single R1CS constraint `<a, z> * <b, z> = <c, z>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct R1csConstraint<F: Field> {
    pub a: LinearCombination<F>,
    pub b: LinearCombination<F>,
    pub c: LinearCombination<F>,
}

impl<F: Field> R1csConstraint<F> {
    pub fn new(a: LinearCombination<F>, b: LinearCombination<F>, c: LinearCombination<F>) -> Self {
        Self { a, b, c }
    }

    pub fn evaluate(&self, assignment: &[F]) -> R1csResult<(F, F, F)> {
        Ok((
            self.a.evaluate(assignment)?,
            self.b.evaluate(assignment)?,
            self.c.evaluate(assignment)?,
        ))
    }

    pub fn is_satisfied(&self, assignment: &[F]) -> R1csResult<bool> {
        let (a, b, c) = self.evaluate(assignment)?;
        Ok(a * b == c)
    }

    fn max_index(&self) -> Option<usize> {
        [self.a.max_index(), self.b.max_index(), self.c.max_index()]
            .into_iter()
            .flatten()
            .max()
    }
}

/// Public statement consisting of constraint system metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct R1csInstance<F: Field> {
    pub num_variables: usize,
    pub constraints: Vec<R1csConstraint<F>>,
}

impl<F: Field> R1csInstance<F> {
    pub fn new(num_variables: usize, constraints: Vec<R1csConstraint<F>>) -> R1csResult<Self> {
        let instance = Self {
            num_variables,
            constraints,
        };
        instance.validate()?;
        Ok(instance)
    }

    /// Shape checks of `new`, for instances assembled field by field.
    pub fn validate(&self) -> R1csResult<()> {
        if self.num_variables == 0 {
            return Err(R1csError::configuration(
                "r1cs_instance",
                "R1CS instances require at least one variable (the constant 1)",
            ));
        }
        for (idx, constraint) in self.constraints.iter().enumerate() {
            if let Some(max) = constraint.max_index() {
                if max >= self.num_variables {
                    return Err(R1csError::configuration(
                        "r1cs_instance",
                        format!(
                            "constraint {idx} references variable {max} but only {} exist",
                            self.num_variables
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Binds the constraint shape; witnesses do not enter the digest.
    pub fn digest(&self) -> R1csResult<[u8; 32]> {
        let mut hasher = Sha256::new();
        hasher.update((self.num_variables as u64).to_le_bytes());
        for constraint in &self.constraints {
            absorb_lc(&mut hasher, &constraint.a)?;
            absorb_lc(&mut hasher, &constraint.b)?;
            absorb_lc(&mut hasher, &constraint.c)?;
        }
        Ok(hasher.finalize().into())
    }

    pub fn is_satisfied(&self, witness: &R1csWitness<F>) -> R1csResult<bool> {
        witness.validate(self)?;
        let assignment = witness.full_assignment();
        for constraint in &self.constraints {
            if !constraint.is_satisfied(&assignment)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Private assignment (without the constant 1 slot).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct R1csWitness<F: Field> {
    pub assignment: Vec<F>,
}

impl<F: Field> R1csWitness<F> {
    pub fn new(assignment: Vec<F>) -> Self {
        Self { assignment }
    }

    pub fn validate(&self, instance: &R1csInstance<F>) -> R1csResult<()> {
        if instance.num_variables != self.assignment.len() + 1 {
            return Err(R1csError::configuration(
                "r1cs_witness",
                format!(
                    "witness has {} entries, instance expects {}",
                    self.assignment.len(),
                    instance.num_variables - 1
                ),
            ));
        }
        Ok(())
    }

    pub fn full_assignment(&self) -> Vec<F> {
        let mut assignment = Vec::with_capacity(self.assignment.len() + 1);
        assignment.push(F::one());
        assignment.extend_from_slice(&self.assignment);
        assignment
    }
}

fn absorb_lc<F: Field>(hasher: &mut Sha256, lc: &LinearCombination<F>) -> R1csResult<()> {
    hasher.update((lc.len() as u64).to_le_bytes());
    for (var, coeff) in &lc.terms {
        hasher.update((var.index() as u64).to_le_bytes());
        hasher.update(field_to_bytes(coeff)?);
    }
    Ok(())
}
