//! One multiplicative round of the leveled pipeline, as three layer shapes.
//!
//! - `Layer1Gadget`: square combinations of fresh ciphertexts, then transform the
//!   `c1²` tail into the domain the caller expects.
//! - `LayerMidRelinGadget`: relinearize every input, nothing else.
//! - `LayerMidGadget`: relinearize and switch modulus every input, then square
//!   combinations of the switched intermediates.

use crate::fhe::{Ciphertext, LayerConfig, OutputCombination, RelinKey};
use crate::gadgets::ct_square::CtLincombSquareGadget;
use crate::gadgets::relinearize::ModSwitchParams;
use crate::gadgets::{
    ensure_arity, ensure_count, ensure_non_empty, Gadget, RelinWiring, RelinearizeGadget,
    RelinearizeModSwitchGadget, TransformGadget,
};
use crate::r1cs::errors::{R1csError, R1csResult};
use crate::r1cs::lc::VariableArray;
use crate::r1cs::protoboard::Protoboard;
use ark_ff::Field;

/// Relinearization inputs shared by the mid layers.
#[derive(Clone, Copy, Debug)]
pub struct RelinLayerParams<'a, F: Field> {
    /// One digit decomposition per layer input.
    pub decompositions: &'a [Vec<VariableArray>],
    pub key: &'a RelinKey,
    pub pt_mod: F,
}

/// Width of every ciphertext component in a layer, read from its first output.
fn layer_el_length(annotation: &str, outputs: &[Ciphertext]) -> R1csResult<usize> {
    ensure_non_empty(annotation, "outputs", outputs.len())?;
    ensure_non_empty(annotation, "outputs[0] components", outputs[0].arity())?;
    Ok(outputs[0].el_length())
}

fn check_config<F: Field>(
    annotation: &str,
    config: &LayerConfig<F>,
    in_size: usize,
    outputs: &[Ciphertext],
) -> R1csResult<()> {
    config.validate(in_size)?;
    ensure_count(annotation, "configured outputs", config.out_size(), outputs.len())?;
    let el_length = layer_el_length(annotation, outputs)?;
    if config.el_length != el_length {
        return Err(R1csError::configuration(
            annotation,
            format!(
                "configured el_length {} but outputs have length {}",
                config.el_length, el_length
            ),
        ));
    }
    Ok(())
}

/// First layer: `out_size` independent square-then-transform pipelines.
///
/// Output `i` receives `(A0², 2·A0·A1, T(A1²))` where `A` is the combination of
/// all inputs described by `combinations[i]` and `T` the transform.
#[derive(Clone, Debug)]
pub struct Layer1Gadget<F: Field, T: TransformGadget<F>> {
    square_gadgets: Vec<CtLincombSquareGadget<F>>,
    transform_gadgets: Vec<T>,
    annotation: String,
}

impl<F: Field, T: TransformGadget<F>> Layer1Gadget<F, T> {
    pub fn new(
        pb: &mut Protoboard<F>,
        inputs: &[Ciphertext],
        combinations: &[OutputCombination<F>],
        outputs: &[Ciphertext],
        transform_params: &T::Params,
        annotation: &str,
    ) -> R1csResult<Self> {
        let el_length = layer_el_length(annotation, outputs)?;
        ensure_count(annotation, "output combinations", combinations.len(), outputs.len())?;
        for output in outputs {
            ensure_arity(annotation, "output", output, 3)?;
        }
        vfhe_debug!(
            "[layer] {} layer1 inputs={} outputs={} el_length={}",
            annotation,
            inputs.len(),
            outputs.len(),
            el_length
        );

        let mut square_gadgets = Vec::with_capacity(outputs.len());
        let mut transform_gadgets = Vec::with_capacity(outputs.len());
        for (i, (output, combination)) in outputs.iter().zip(combinations).enumerate() {
            let tail = pb.allocate(el_length);
            let squared = Ciphertext::new(vec![output[0].clone(), output[1].clone(), tail.clone()]);
            square_gadgets.push(CtLincombSquareGadget::new(
                pb,
                inputs,
                &combination.input_scalars,
                &combination.constant_term,
                &squared,
                &format!("{annotation}.square[{i}]"),
            )?);
            transform_gadgets.push(T::build(
                pb,
                transform_params,
                &tail,
                &output[2],
                &format!("{annotation}.transform[{i}]"),
            )?);
        }
        Ok(Self {
            square_gadgets,
            transform_gadgets,
            annotation: annotation.to_string(),
        })
    }

    /// Validates `config` against the layer shape before building.
    pub fn from_config(
        pb: &mut Protoboard<F>,
        inputs: &[Ciphertext],
        config: &LayerConfig<F>,
        outputs: &[Ciphertext],
        transform_params: &T::Params,
        annotation: &str,
    ) -> R1csResult<Self> {
        check_config(annotation, config, inputs.len(), outputs)?;
        Self::new(pb, inputs, &config.outputs, outputs, transform_params, annotation)
    }
}

impl<F: Field, T: TransformGadget<F>> Gadget<F> for Layer1Gadget<F, T> {
    fn generate_r1cs_constraints(&self, pb: &mut Protoboard<F>) -> R1csResult<()> {
        for gadget in &self.square_gadgets {
            gadget.generate_r1cs_constraints(pb)?;
        }
        for gadget in &self.transform_gadgets {
            gadget.generate_r1cs_constraints(pb)?;
        }
        vfhe_debug!("[layer] {} constraints={}", self.annotation, pb.num_constraints());
        Ok(())
    }

    fn generate_r1cs_witness(&self, pb: &mut Protoboard<F>) -> R1csResult<()> {
        for gadget in &self.square_gadgets {
            gadget.generate_r1cs_witness(pb)?;
        }
        for gadget in &self.transform_gadgets {
            gadget.generate_r1cs_witness(pb)?;
        }
        Ok(())
    }
}

/// Mid layer that only relinearizes: `outputs[i] = relin(inputs[i])`.
#[derive(Clone, Debug)]
pub struct LayerMidRelinGadget<F: Field, R: RelinearizeGadget<F>> {
    relin_gadgets: Vec<R>,
    _field: std::marker::PhantomData<F>,
}

impl<F: Field, R: RelinearizeGadget<F>> LayerMidRelinGadget<F, R> {
    pub fn new(
        pb: &mut Protoboard<F>,
        inputs: &[Ciphertext],
        relin: RelinLayerParams<'_, F>,
        outputs: &[Ciphertext],
        annotation: &str,
    ) -> R1csResult<Self> {
        ensure_non_empty(annotation, "inputs", inputs.len())?;
        ensure_count(annotation, "decompositions", relin.decompositions.len(), inputs.len())?;
        ensure_count(annotation, "outputs", outputs.len(), inputs.len())?;
        vfhe_debug!("[layer] {} mid_relin inputs={}", annotation, inputs.len());

        let mut relin_gadgets = Vec::with_capacity(inputs.len());
        for (i, ((input, decomposition), output)) in inputs
            .iter()
            .zip(relin.decompositions)
            .zip(outputs)
            .enumerate()
        {
            let wiring = RelinWiring {
                input,
                decomposition,
                key: relin.key,
                output,
            };
            relin_gadgets.push(R::build(
                pb,
                wiring,
                relin.pt_mod,
                &format!("{annotation}.relin[{i}]"),
            )?);
        }
        Ok(Self {
            relin_gadgets,
            _field: std::marker::PhantomData,
        })
    }
}

impl<F: Field, R: RelinearizeGadget<F>> Gadget<F> for LayerMidRelinGadget<F, R> {
    fn generate_r1cs_constraints(&self, pb: &mut Protoboard<F>) -> R1csResult<()> {
        for gadget in &self.relin_gadgets {
            gadget.generate_r1cs_constraints(pb)?;
        }
        Ok(())
    }

    fn generate_r1cs_witness(&self, pb: &mut Protoboard<F>) -> R1csResult<()> {
        for gadget in &self.relin_gadgets {
            gadget.generate_r1cs_witness(pb)?;
        }
        Ok(())
    }
}

/// Per-input values removed by the modulus switch, and the removed modulus.
#[derive(Clone, Copy, Debug)]
pub struct ModSwitchLayerParams<'a, F: Field> {
    pub to_removes: &'a [Ciphertext],
    pub q_to_remove: F,
}

/// Full mid layer: relinearize and switch modulus every input into a fresh
/// degree-2 intermediate, then square combinations of the intermediates.
///
/// The squares read only intermediates, never the original inputs, and their
/// outputs are left in the domain the square gadget produces.
#[derive(Clone, Debug)]
pub struct LayerMidGadget<F: Field, M: RelinearizeModSwitchGadget<F>> {
    relin_ms_gadgets: Vec<M>,
    square_gadgets: Vec<CtLincombSquareGadget<F>>,
    intermediates: Vec<Ciphertext>,
}

impl<F: Field, M: RelinearizeModSwitchGadget<F>> LayerMidGadget<F, M> {
    pub fn new(
        pb: &mut Protoboard<F>,
        inputs: &[Ciphertext],
        combinations: &[OutputCombination<F>],
        relin: RelinLayerParams<'_, F>,
        modswitch: ModSwitchLayerParams<'_, F>,
        outputs: &[Ciphertext],
        annotation: &str,
    ) -> R1csResult<Self> {
        ensure_non_empty(annotation, "inputs", inputs.len())?;
        ensure_count(annotation, "decompositions", relin.decompositions.len(), inputs.len())?;
        ensure_count(annotation, "values to remove", modswitch.to_removes.len(), inputs.len())?;
        let el_length = layer_el_length(annotation, outputs)?;
        ensure_count(annotation, "output combinations", combinations.len(), outputs.len())?;
        vfhe_debug!(
            "[layer] {} mid inputs={} outputs={} el_length={}",
            annotation,
            inputs.len(),
            outputs.len(),
            el_length
        );

        let params = ModSwitchParams {
            pt_mod: relin.pt_mod,
            q_to_remove: modswitch.q_to_remove,
        };
        let mut relin_ms_gadgets = Vec::with_capacity(inputs.len());
        let mut intermediates = Vec::with_capacity(inputs.len());
        for (i, ((input, decomposition), to_remove)) in inputs
            .iter()
            .zip(relin.decompositions)
            .zip(modswitch.to_removes)
            .enumerate()
        {
            let intermediate = Ciphertext::allocate(pb, 2, el_length);
            let wiring = RelinWiring {
                input,
                decomposition,
                key: relin.key,
                output: &intermediate,
            };
            relin_ms_gadgets.push(M::build(
                pb,
                wiring,
                to_remove,
                params,
                &format!("{annotation}.relin_ms[{i}]"),
            )?);
            intermediates.push(intermediate);
        }

        let mut square_gadgets = Vec::with_capacity(outputs.len());
        for (i, (output, combination)) in outputs.iter().zip(combinations).enumerate() {
            square_gadgets.push(CtLincombSquareGadget::new(
                pb,
                &intermediates,
                &combination.input_scalars,
                &combination.constant_term,
                output,
                &format!("{annotation}.square[{i}]"),
            )?);
        }
        Ok(Self {
            relin_ms_gadgets,
            square_gadgets,
            intermediates,
        })
    }

    /// Validates `config` against the layer shape before building.
    pub fn from_config(
        pb: &mut Protoboard<F>,
        inputs: &[Ciphertext],
        config: &LayerConfig<F>,
        relin: RelinLayerParams<'_, F>,
        modswitch: ModSwitchLayerParams<'_, F>,
        outputs: &[Ciphertext],
        annotation: &str,
    ) -> R1csResult<Self> {
        check_config(annotation, config, inputs.len(), outputs)?;
        Self::new(pb, inputs, &config.outputs, relin, modswitch, outputs, annotation)
    }

    /// Degree-2 ciphertexts produced by the relinearize/modswitch step.
    pub fn intermediates(&self) -> &[Ciphertext] {
        &self.intermediates
    }
}

impl<F: Field, M: RelinearizeModSwitchGadget<F>> Gadget<F> for LayerMidGadget<F, M> {
    fn generate_r1cs_constraints(&self, pb: &mut Protoboard<F>) -> R1csResult<()> {
        for gadget in &self.relin_ms_gadgets {
            gadget.generate_r1cs_constraints(pb)?;
        }
        for gadget in &self.square_gadgets {
            gadget.generate_r1cs_constraints(pb)?;
        }
        Ok(())
    }

    fn generate_r1cs_witness(&self, pb: &mut Protoboard<F>) -> R1csResult<()> {
        for gadget in &self.relin_ms_gadgets {
            gadget.generate_r1cs_witness(pb)?;
        }
        for gadget in &self.square_gadgets {
            gadget.generate_r1cs_witness(pb)?;
        }
        Ok(())
    }
}
