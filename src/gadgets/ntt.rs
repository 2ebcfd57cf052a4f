use crate::fhe::fft::{domain_root, fft_in_place, ifft_in_place};
use crate::gadgets::{ensure_count, ensure_non_empty, Gadget, TransformGadget};
use crate::r1cs::errors::R1csResult;
use crate::r1cs::field_utils::checked_inverse;
use crate::r1cs::lc::{LinearCombination, VariableArray};
use crate::r1cs::protoboard::Protoboard;
use ark_ff::FftField;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NttDirection {
    /// Coefficients to evaluations: `out[i] = Σ_j ω^{ij}·in[j]`.
    Forward,
    /// Evaluations to coefficients: `out[i] = n⁻¹·Σ_j ω^{-ij}·in[j]`.
    Inverse,
}

/// Number-theoretic transform of one coefficient vector.
///
/// Each output is a fixed linear function of the input, so every position costs
/// one constraint of the form `(Σ_j M[i][j]·in[j]) · 1 = out[i]`.
#[derive(Clone, Debug)]
pub struct NttGadget<F: FftField> {
    input: VariableArray,
    output: VariableArray,
    direction: NttDirection,
    root: F,
    annotation: String,
}

impl<F: FftField> NttGadget<F> {
    pub fn new(
        input: &VariableArray,
        output: &VariableArray,
        direction: NttDirection,
        annotation: &str,
    ) -> R1csResult<Self> {
        ensure_non_empty(annotation, "transform input", input.len())?;
        ensure_count(annotation, "output positions", output.len(), input.len())?;
        let root = domain_root::<F>(input.len())?;
        vfhe_debug!(
            "[gadget] {} ntt len={} direction={:?}",
            annotation,
            input.len(),
            direction
        );
        Ok(Self {
            input: input.clone(),
            output: output.clone(),
            direction,
            root,
            annotation: annotation.to_string(),
        })
    }

    fn row(&self, i: usize) -> R1csResult<LinearCombination<F>> {
        let n = self.input.len();
        let (base, scale) = match self.direction {
            NttDirection::Forward => (self.root, F::one()),
            NttDirection::Inverse => (
                checked_inverse(self.root, &self.annotation)?,
                checked_inverse(F::from(n as u64), &self.annotation)?,
            ),
        };
        let step = base.pow([i as u64]);
        let mut coeff = scale;
        let mut lc = LinearCombination::zero();
        for var in &self.input {
            lc.add_term(*var, coeff);
            coeff *= step;
        }
        Ok(lc)
    }
}

impl<F: FftField> Gadget<F> for NttGadget<F> {
    fn generate_r1cs_constraints(&self, pb: &mut Protoboard<F>) -> R1csResult<()> {
        for i in 0..self.output.len() {
            let row = self.row(i)?;
            pb.enforce_equal(
                row,
                LinearCombination::from_variable(self.output[i]),
                format!("{}.ntt[{}]", self.annotation, i),
            );
        }
        Ok(())
    }

    fn generate_r1cs_witness(&self, pb: &mut Protoboard<F>) -> R1csResult<()> {
        let mut values = pb.values_of(&self.input)?;
        match self.direction {
            NttDirection::Forward => fft_in_place(&mut values, self.root)?,
            NttDirection::Inverse => ifft_in_place(&mut values, self.root)?,
        }
        pb.assign_array(&self.output, &values)
    }
}

impl<F: FftField> TransformGadget<F> for NttGadget<F> {
    type Params = NttDirection;

    fn build(
        _pb: &mut Protoboard<F>,
        params: &NttDirection,
        input: &VariableArray,
        output: &VariableArray,
        annotation: &str,
    ) -> R1csResult<Self> {
        Self::new(input, output, *params, annotation)
    }
}
