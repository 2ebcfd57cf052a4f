use crate::r1cs::errors::{R1csError, R1csResult};
use crate::r1cs::instance::{R1csConstraint, R1csInstance, R1csWitness};
use crate::r1cs::lc::{LinearCombination, Variable, VariableArray};
use ark_ff::Field;
use tracing::warn;

/// Shared constraint system that every gadget writes into.
///
/// Slot 0 is the constant wire and is assigned at construction. Every other
/// variable starts unassigned and may be written once; writing the same value
/// again is accepted so that a witness pass can be replayed, but writing a
/// different value is reported as a wiring defect.
#[derive(Debug, Clone)]
pub struct Protoboard<F: Field> {
    values: Vec<Option<F>>,
    constraints: Vec<R1csConstraint<F>>,
    annotations: Vec<String>,
    assignment_trace: Vec<Variable>,
}

impl<F: Field> Default for Protoboard<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Field> Protoboard<F> {
    pub fn new() -> Self {
        Self {
            values: vec![Some(F::one())],
            constraints: Vec::new(),
            annotations: Vec::new(),
            assignment_trace: Vec::new(),
        }
    }

    /// The constant wire, always equal to one.
    pub fn one(&self) -> Variable {
        Variable::ONE
    }

    pub fn allocate_variable(&mut self) -> Variable {
        self.values.push(None);
        Variable(self.values.len() - 1)
    }

    pub fn allocate(&mut self, count: usize) -> VariableArray {
        VariableArray::new((0..count).map(|_| self.allocate_variable()).collect())
    }

    /// Number of variables including the constant wire.
    pub fn num_variables(&self) -> usize {
        self.values.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn add_r1cs_constraint(
        &mut self,
        a: LinearCombination<F>,
        b: LinearCombination<F>,
        c: LinearCombination<F>,
        annotation: impl Into<String>,
    ) {
        self.constraints.push(R1csConstraint::new(a, b, c));
        self.annotations.push(annotation.into());
    }

    /// Registers `lc · 1 = target`.
    pub fn enforce_equal(
        &mut self,
        lc: LinearCombination<F>,
        target: LinearCombination<F>,
        annotation: impl Into<String>,
    ) {
        let one = LinearCombination::from_variable(self.one());
        self.add_r1cs_constraint(lc, one, target, annotation);
    }

    pub fn is_assigned(&self, var: Variable) -> bool {
        matches!(self.values.get(var.index()), Some(Some(_)))
    }

    pub fn val(&self, var: Variable) -> R1csResult<F> {
        match self.values.get(var.index()) {
            Some(Some(value)) => Ok(*value),
            Some(None) => Err(R1csError::consistency(
                var.index(),
                "read before its producer assigned it",
            )),
            None => Err(R1csError::consistency(var.index(), "unknown variable")),
        }
    }

    pub fn set_val(&mut self, var: Variable, value: F) -> R1csResult<()> {
        if var.is_constant() {
            return Err(R1csError::consistency(0, "the constant wire cannot be reassigned"));
        }
        let slot = self
            .values
            .get_mut(var.index())
            .ok_or_else(|| R1csError::consistency(var.index(), "unknown variable"))?;
        match *slot {
            Some(existing) if existing == value => Ok(()),
            Some(_) => {
                warn!(index = var.index(), "conflicting witness assignment");
                Err(R1csError::consistency(
                    var.index(),
                    "already assigned a different value",
                ))
            }
            None => {
                *slot = Some(value);
                self.assignment_trace.push(var);
                Ok(())
            }
        }
    }

    pub fn lc_val(&self, lc: &LinearCombination<F>) -> R1csResult<F> {
        let mut acc = F::zero();
        for (var, coeff) in &lc.terms {
            acc += *coeff * self.val(*var)?;
        }
        Ok(acc)
    }

    pub fn values_of(&self, array: &VariableArray) -> R1csResult<Vec<F>> {
        array.iter().map(|var| self.val(*var)).collect()
    }

    pub fn assign_array(&mut self, array: &VariableArray, values: &[F]) -> R1csResult<()> {
        if array.len() != values.len() {
            return Err(R1csError::configuration(
                "protoboard",
                format!("{} values for an array of length {}", values.len(), array.len()),
            ));
        }
        for (var, value) in array.iter().zip(values) {
            self.set_val(*var, *value)?;
        }
        Ok(())
    }

    /// Variables in the order their values were first written.
    pub fn assignment_trace(&self) -> &[Variable] {
        &self.assignment_trace
    }

    pub fn is_satisfied(&self) -> R1csResult<bool> {
        Ok(self.first_unsatisfied()?.is_none())
    }

    /// Annotation of the first constraint whose sides disagree.
    pub fn first_unsatisfied(&self) -> R1csResult<Option<&str>> {
        for (constraint, annotation) in self.constraints.iter().zip(&self.annotations) {
            let a = self.lc_val(&constraint.a)?;
            let b = self.lc_val(&constraint.b)?;
            let c = self.lc_val(&constraint.c)?;
            if a * b != c {
                return Ok(Some(annotation.as_str()));
            }
        }
        Ok(None)
    }

    pub fn to_instance(&self) -> R1csResult<R1csInstance<F>> {
        R1csInstance::new(self.num_variables(), self.constraints.clone())
    }

    /// Fails on the first unassigned variable.
    pub fn to_witness(&self) -> R1csResult<R1csWitness<F>> {
        let assignment = (1..self.values.len())
            .map(|idx| self.val(Variable(idx)))
            .collect::<R1csResult<Vec<F>>>()?;
        Ok(R1csWitness::new(assignment))
    }
}
