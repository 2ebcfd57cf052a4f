use crate::gadgets::{ensure_lengths, ensure_non_empty, Gadget};
use crate::r1cs::errors::{R1csError, R1csResult};
use crate::r1cs::field_utils::checked_inverse;
use crate::r1cs::lc::{LinearCombination, Variable, VariableArray};
use crate::r1cs::protoboard::Protoboard;
use ark_ff::Field;

/// Right-hand side of one product constraint.
#[derive(Clone, Debug, PartialEq, Eq)]
enum OutputSide<F: Field> {
    Raw(Variable),
    Scaled { variable: Variable, scalar: F },
}

impl<F: Field> OutputSide<F> {
    fn to_lc(&self) -> LinearCombination<F> {
        match self {
            OutputSide::Raw(var) => LinearCombination::from_variable(*var),
            OutputSide::Scaled { variable, scalar } => {
                LinearCombination::scaled(*variable, *scalar)
            }
        }
    }
}

/// Elementwise product of two affine combinations of vectors:
///
/// `(Σ_j wL[j][i]·L[j][i] + cL[i]) · (Σ_j wR[j][i]·R[j][i] + cR[i]) = s·O[i]`
///
/// One constraint per position. Elementwise multiplication, scaled dot
/// products and Karatsuba-style cross terms are all instances of this gadget.
/// With an output scalar the witness back-solves `O[i] = product · s⁻¹`.
#[derive(Clone, Debug)]
pub struct VectorLincombProductGadget<F: Field> {
    a: Vec<LinearCombination<F>>,
    b: Vec<LinearCombination<F>>,
    c: Vec<OutputSide<F>>,
    annotation: String,
}

/// Collects the optional parts of a [`VectorLincombProductGadget`].
///
/// Empty scalar tables mean weight one everywhere, empty constant terms mean no
/// constant on that side, no output scalar means the output is the product itself.
#[derive(Clone, Debug)]
pub struct LincombProductBuilder<'a, F: Field> {
    left_inputs: &'a [VariableArray],
    right_inputs: &'a [VariableArray],
    output: &'a VariableArray,
    left_input_scalars: &'a [Vec<F>],
    right_input_scalars: &'a [Vec<F>],
    left_constant_term: &'a [F],
    right_constant_term: &'a [F],
    output_scalar: Option<F>,
}

impl<'a, F: Field> LincombProductBuilder<'a, F> {
    pub fn left_scalars(mut self, scalars: &'a [Vec<F>]) -> Self {
        self.left_input_scalars = scalars;
        self
    }

    pub fn right_scalars(mut self, scalars: &'a [Vec<F>]) -> Self {
        self.right_input_scalars = scalars;
        self
    }

    pub fn left_constant(mut self, constant: &'a [F]) -> Self {
        self.left_constant_term = constant;
        self
    }

    pub fn right_constant(mut self, constant: &'a [F]) -> Self {
        self.right_constant_term = constant;
        self
    }

    pub fn output_scalar(mut self, scalar: F) -> Self {
        self.output_scalar = Some(scalar);
        self
    }

    fn validate(&self, gadget: &str) -> R1csResult<usize> {
        ensure_non_empty(gadget, "left inputs", self.left_inputs.len())?;
        ensure_non_empty(gadget, "right inputs", self.right_inputs.len())?;
        let veclen = self.output.len();
        ensure_non_empty(gadget, "output", veclen)?;
        ensure_lengths(gadget, "left input", self.left_inputs, veclen)?;
        ensure_lengths(gadget, "right input", self.right_inputs, veclen)?;
        validate_side(
            gadget,
            "left",
            self.left_inputs.len(),
            self.left_input_scalars,
            self.left_constant_term,
            veclen,
        )?;
        validate_side(
            gadget,
            "right",
            self.right_inputs.len(),
            self.right_input_scalars,
            self.right_constant_term,
            veclen,
        )?;
        if matches!(self.output_scalar, Some(s) if s.is_zero()) {
            return Err(R1csError::configuration(gadget, "output scalar must be non-zero"));
        }
        Ok(veclen)
    }

    pub fn build(
        self,
        pb: &Protoboard<F>,
        annotation: &str,
    ) -> R1csResult<VectorLincombProductGadget<F>> {
        let veclen = self.validate(annotation)?;
        vfhe_debug!(
            "[gadget] {} lincomb_product veclen={} left={} right={} scaled={}",
            annotation,
            veclen,
            self.left_inputs.len(),
            self.right_inputs.len(),
            self.output_scalar.is_some()
        );

        let one = pb.one();
        let mut a = Vec::with_capacity(veclen);
        let mut b = Vec::with_capacity(veclen);
        let mut c = Vec::with_capacity(veclen);
        for i in 0..veclen {
            a.push(side_lc(
                self.left_inputs,
                self.left_input_scalars,
                self.left_constant_term,
                one,
                i,
            ));
            b.push(side_lc(
                self.right_inputs,
                self.right_input_scalars,
                self.right_constant_term,
                one,
                i,
            ));
            c.push(match self.output_scalar {
                None => OutputSide::Raw(self.output[i]),
                Some(scalar) => OutputSide::Scaled {
                    variable: self.output[i],
                    scalar,
                },
            });
        }
        Ok(VectorLincombProductGadget {
            a,
            b,
            c,
            annotation: annotation.to_string(),
        })
    }
}

fn validate_side<F: Field>(
    gadget: &str,
    side: &str,
    num_inputs: usize,
    scalars: &[Vec<F>],
    constant: &[F],
    veclen: usize,
) -> R1csResult<()> {
    if !scalars.is_empty() && scalars.len() != num_inputs {
        return Err(R1csError::configuration(
            gadget,
            format!("{} {side} scalar rows for {num_inputs} {side} inputs", scalars.len()),
        ));
    }
    if let Some(row) = scalars.iter().find(|row| row.len() != veclen) {
        return Err(R1csError::configuration(
            gadget,
            format!("{side} scalar row of length {}, expected {veclen}", row.len()),
        ));
    }
    if !constant.is_empty() && constant.len() != veclen {
        return Err(R1csError::configuration(
            gadget,
            format!("{side} constant term of length {}, expected {veclen}", constant.len()),
        ));
    }
    Ok(())
}

fn side_lc<F: Field>(
    inputs: &[VariableArray],
    scalars: &[Vec<F>],
    constant: &[F],
    one: Variable,
    i: usize,
) -> LinearCombination<F> {
    let mut lc = LinearCombination::zero();
    for (j, input) in inputs.iter().enumerate() {
        let weight = scalars.get(j).map_or(F::one(), |row| row[i]);
        lc.add_term(input[i], weight);
    }
    if let Some(term) = constant.get(i) {
        lc.add_term(one, *term);
    }
    lc
}

impl<F: Field> VectorLincombProductGadget<F> {
    /// Starts a product of `left_inputs` and `right_inputs` written into `output`.
    pub fn builder<'a>(
        left_inputs: &'a [VariableArray],
        right_inputs: &'a [VariableArray],
        output: &'a VariableArray,
    ) -> LincombProductBuilder<'a, F> {
        LincombProductBuilder {
            left_inputs,
            right_inputs,
            output,
            left_input_scalars: &[],
            right_input_scalars: &[],
            left_constant_term: &[],
            right_constant_term: &[],
            output_scalar: None,
        }
    }
}

impl<F: Field> Gadget<F> for VectorLincombProductGadget<F> {
    fn generate_r1cs_constraints(&self, pb: &mut Protoboard<F>) -> R1csResult<()> {
        for (i, ((a, b), c)) in self.a.iter().zip(&self.b).zip(&self.c).enumerate() {
            pb.add_r1cs_constraint(
                a.clone(),
                b.clone(),
                c.to_lc(),
                format!("{}.c[{}]", self.annotation, i),
            );
        }
        Ok(())
    }

    fn generate_r1cs_witness(&self, pb: &mut Protoboard<F>) -> R1csResult<()> {
        for ((a, b), c) in self.a.iter().zip(&self.b).zip(&self.c) {
            let product = pb.lc_val(a)? * pb.lc_val(b)?;
            match c {
                OutputSide::Raw(var) => pb.set_val(*var, product)?,
                OutputSide::Scaled { variable, scalar } => {
                    let inv = checked_inverse(*scalar, &self.annotation)?;
                    pb.set_val(*variable, product * inv)?;
                }
            }
        }
        Ok(())
    }
}
