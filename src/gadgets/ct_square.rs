use crate::fhe::Ciphertext;
use crate::gadgets::lincomb::VectorLincombProductGadget;
use crate::gadgets::{ensure_arity, ensure_non_empty, Gadget};
use crate::r1cs::errors::R1csResult;
use crate::r1cs::field_utils::two_inverse;
use crate::r1cs::lc::VariableArray;
use crate::r1cs::protoboard::Protoboard;
use ark_ff::Field;

/// Squares `A = Σ_j s_j·ct_j (+ k)` for degree-2 ciphertexts `ct_j = (c0_j, c1_j)`.
///
/// Writing `A = (A0, A1)`, the output is `(A0², 2·A0·A1, A1²)`. The cross term is
/// encoded with output scalar `1/2`, so the constraint reads
/// `A0 · A1 = ½ · output[1]` and the witness back-solves the doubled value.
/// The constant term only enters `A0`.
#[derive(Clone, Debug)]
pub struct CtLincombSquareGadget<F: Field> {
    inner_gadgets: Vec<VectorLincombProductGadget<F>>,
}

impl<F: Field> CtLincombSquareGadget<F> {
    pub fn new(
        pb: &mut Protoboard<F>,
        inputs: &[Ciphertext],
        input_scalars: &[Vec<F>],
        constant_term: &[F],
        output: &Ciphertext,
        annotation: &str,
    ) -> R1csResult<Self> {
        ensure_non_empty(annotation, "inputs", inputs.len())?;
        ensure_arity(annotation, "output", output, 3)?;
        for input in inputs {
            ensure_arity(annotation, "input", input, 2)?;
        }
        let half = two_inverse::<F>(annotation)?;

        let c0_inputs: Vec<VariableArray> = inputs.iter().map(|ct| ct[0].clone()).collect();
        let c1_inputs: Vec<VariableArray> = inputs.iter().map(|ct| ct[1].clone()).collect();

        let c0_squared = VectorLincombProductGadget::builder(&c0_inputs, &c0_inputs, &output[0])
            .left_scalars(input_scalars)
            .right_scalars(input_scalars)
            .left_constant(constant_term)
            .right_constant(constant_term)
            .build(pb, &format!("{annotation}.c0c0"))?;
        let cross = VectorLincombProductGadget::builder(&c0_inputs, &c1_inputs, &output[1])
            .left_scalars(input_scalars)
            .right_scalars(input_scalars)
            .left_constant(constant_term)
            .output_scalar(half)
            .build(pb, &format!("{annotation}.c0c1"))?;
        let c1_squared = VectorLincombProductGadget::builder(&c1_inputs, &c1_inputs, &output[2])
            .left_scalars(input_scalars)
            .right_scalars(input_scalars)
            .build(pb, &format!("{annotation}.c1c1"))?;

        Ok(Self {
            inner_gadgets: vec![c0_squared, cross, c1_squared],
        })
    }
}

impl<F: Field> Gadget<F> for CtLincombSquareGadget<F> {
    fn generate_r1cs_constraints(&self, pb: &mut Protoboard<F>) -> R1csResult<()> {
        for gadget in &self.inner_gadgets {
            gadget.generate_r1cs_constraints(pb)?;
        }
        Ok(())
    }

    fn generate_r1cs_witness(&self, pb: &mut Protoboard<F>) -> R1csResult<()> {
        for gadget in &self.inner_gadgets {
            gadget.generate_r1cs_witness(pb)?;
        }
        Ok(())
    }
}
