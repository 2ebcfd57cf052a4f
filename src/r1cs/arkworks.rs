//! Bridge from an exported protoboard to arkworks' constraint synthesizer, so an
//! assembled layer circuit can be handed to any arkworks proving backend.

use crate::r1cs::errors::R1csResult;
use crate::r1cs::instance::{R1csInstance, R1csWitness};
use crate::r1cs::lc::LinearCombination;
use crate::r1cs::protoboard::Protoboard;
use ark_ff::Field;
use ark_relations::r1cs::{
    ConstraintSynthesizer, ConstraintSystemRef, LinearCombination as ArkLinearCombination,
    SynthesisError, Variable as ArkVariable,
};

/// Replays an R1CS instance (and optionally its witness) into arkworks.
///
/// Every protoboard variable other than the constant wire becomes an arkworks
/// witness variable; the circuit has no public inputs of its own.
#[derive(Debug, Clone)]
pub struct ProtoboardCircuit<F: Field> {
    instance: R1csInstance<F>,
    witness: Option<R1csWitness<F>>,
}

impl<F: Field> ProtoboardCircuit<F> {
    /// Shape only, for setup.
    pub fn from_instance(instance: R1csInstance<F>) -> R1csResult<Self> {
        instance.validate()?;
        Ok(Self {
            instance,
            witness: None,
        })
    }

    pub fn with_witness(instance: R1csInstance<F>, witness: R1csWitness<F>) -> R1csResult<Self> {
        instance.validate()?;
        witness.validate(&instance)?;
        Ok(Self {
            instance,
            witness: Some(witness),
        })
    }

    /// Exports constraints and the full assignment of `pb`.
    pub fn from_protoboard(pb: &Protoboard<F>) -> R1csResult<Self> {
        Self::with_witness(pb.to_instance()?, pb.to_witness()?)
    }
}

impl<F: Field> ConstraintSynthesizer<F> for ProtoboardCircuit<F> {
    fn generate_constraints(self, cs: ConstraintSystemRef<F>) -> Result<(), SynthesisError> {
        let num_witnesses = self
            .instance
            .num_variables
            .checked_sub(1)
            .ok_or(SynthesisError::Unsatisfiable)?;
        let mut variables = Vec::with_capacity(self.instance.num_variables);
        variables.push(ArkVariable::One);
        for idx in 0..num_witnesses {
            let value = self
                .witness
                .as_ref()
                .and_then(|w| w.assignment.get(idx).copied());
            variables.push(
                cs.new_witness_variable(|| value.ok_or(SynthesisError::AssignmentMissing))?,
            );
        }
        for constraint in &self.instance.constraints {
            cs.enforce_constraint(
                to_ark_lc(&constraint.a, &variables)?,
                to_ark_lc(&constraint.b, &variables)?,
                to_ark_lc(&constraint.c, &variables)?,
            )?;
        }
        Ok(())
    }
}

fn to_ark_lc<F: Field>(
    lc: &LinearCombination<F>,
    variables: &[ArkVariable],
) -> Result<ArkLinearCombination<F>, SynthesisError> {
    let terms = lc
        .terms
        .iter()
        .map(|(var, coeff)| {
            variables
                .get(var.index())
                .map(|ark_var| (*coeff, *ark_var))
                .ok_or(SynthesisError::Unsatisfiable)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ArkLinearCombination(terms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r1cs::instance::R1csConstraint;
    use crate::r1cs::lc::Variable;
    use ark_bn254::Fr;
    use ark_relations::r1cs::{ConstraintSystem, SynthesisMode};

    fn multiply_board(product: u64) -> Protoboard<Fr> {
        let mut pb = Protoboard::<Fr>::new();
        let vars = pb.allocate(3);
        pb.add_r1cs_constraint(vars[0].into(), vars[1].into(), vars[2].into(), "mul");
        pb.assign_array(&vars, &[Fr::from(3u64), Fr::from(5u64), Fr::from(product)])
            .unwrap();
        pb
    }

    #[test]
    fn satisfied_board_is_satisfied_in_arkworks() {
        let circuit = ProtoboardCircuit::from_protoboard(&multiply_board(15)).unwrap();
        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        assert_eq!(cs.num_constraints(), 1);
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn wrong_product_is_rejected_in_arkworks() {
        let circuit = ProtoboardCircuit::from_protoboard(&multiply_board(16)).unwrap();
        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn hand_built_instances_are_checked_before_synthesis() {
        let empty = R1csInstance::<Fr> {
            num_variables: 0,
            constraints: Vec::new(),
        };
        assert!(ProtoboardCircuit::from_instance(empty).unwrap_err().is_configuration());

        let dangling = R1csInstance::<Fr> {
            num_variables: 2,
            constraints: vec![R1csConstraint::new(
                Variable(1).into(),
                Variable(1).into(),
                Variable(5).into(),
            )],
        };
        assert!(ProtoboardCircuit::from_instance(dangling.clone()).is_err());
        let witness = R1csWitness::new(vec![Fr::from(1u64)]);
        assert!(ProtoboardCircuit::with_witness(dangling, witness).is_err());
    }

    #[test]
    fn malformed_shape_is_a_synthesis_error() {
        let empty = ProtoboardCircuit::<Fr> {
            instance: R1csInstance {
                num_variables: 0,
                constraints: Vec::new(),
            },
            witness: None,
        };
        let cs = ConstraintSystem::<Fr>::new_ref();
        assert!(matches!(
            empty.generate_constraints(cs),
            Err(SynthesisError::Unsatisfiable)
        ));

        let dangling = ProtoboardCircuit::<Fr> {
            instance: R1csInstance {
                num_variables: 2,
                constraints: vec![R1csConstraint::new(
                    Variable(1).into(),
                    Variable(1).into(),
                    Variable(5).into(),
                )],
            },
            witness: Some(R1csWitness::new(vec![Fr::from(1u64)])),
        };
        let cs = ConstraintSystem::<Fr>::new_ref();
        assert!(matches!(
            dangling.generate_constraints(cs),
            Err(SynthesisError::Unsatisfiable)
        ));
    }

    #[test]
    fn shape_only_circuit_synthesizes_in_setup_mode() {
        let instance = multiply_board(15).to_instance().unwrap();
        let circuit = ProtoboardCircuit::from_instance(instance).unwrap();
        let cs = ConstraintSystem::<Fr>::new_ref();
        cs.set_mode(SynthesisMode::Setup);
        circuit.generate_constraints(cs.clone()).unwrap();
        assert_eq!(cs.num_constraints(), 1);
    }
}
