use crate::r1cs::errors::{R1csError, R1csResult};
use ark_ff::Field;
use std::ops::Index;
use std::slice;

/// Handle into a protoboard. Index 0 is always the constant wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(pub(crate) usize);

impl Variable {
    pub(crate) const ONE: Variable = Variable(0);

    pub fn index(self) -> usize {
        self.0
    }

    pub fn is_constant(self) -> bool {
        self.0 == 0
    }
}

/// Fixed-length vector of variables, one ring element in some domain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct VariableArray(Vec<Variable>);

impl VariableArray {
    pub fn new(vars: Vec<Variable>) -> Self {
        Self(vars)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Variable> {
        self.0.iter()
    }
}

impl Index<usize> for VariableArray {
    type Output = Variable;

    fn index(&self, index: usize) -> &Variable {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a VariableArray {
    type Item = &'a Variable;
    type IntoIter = slice::Iter<'a, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Sparse affine combination `Σ coeff·var`; constants live on the constant wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearCombination<F: Field> {
    pub terms: Vec<(Variable, F)>,
}

impl<F: Field> LinearCombination<F> {
    pub fn zero() -> Self {
        Self { terms: Vec::new() }
    }

    pub fn from_variable(var: Variable) -> Self {
        Self {
            terms: vec![(var, F::one())],
        }
    }

    pub fn scaled(var: Variable, coeff: F) -> Self {
        Self {
            terms: vec![(var, coeff)],
        }
    }

    pub fn add_term(&mut self, var: Variable, coeff: F) {
        self.terms.push((var, coeff));
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn max_index(&self) -> Option<usize> {
        self.terms.iter().map(|(var, _)| var.index()).max()
    }

    /// Evaluates against a full assignment whose slot 0 holds the constant one.
    pub fn evaluate(&self, assignment: &[F]) -> R1csResult<F> {
        let mut acc = F::zero();
        for (var, coeff) in &self.terms {
            let value = assignment.get(var.index()).ok_or_else(|| {
                R1csError::consistency(var.index(), "variable outside of the assignment")
            })?;
            acc += *coeff * value;
        }
        Ok(acc)
    }
}

impl<F: Field> From<Variable> for LinearCombination<F> {
    fn from(var: Variable) -> Self {
        Self::from_variable(var)
    }
}
