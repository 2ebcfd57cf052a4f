//! Per-layer coefficient tables: which linear combination of the layer inputs
//! each output squares.

use crate::r1cs::errors::{R1csError, R1csResult};
use ark_ff::Field;
use serde::{Deserialize, Serialize};

/// Scalars and constant applied to the layer inputs before squaring, for one output.
///
/// Either table may be empty: no scalars means every input has weight one, no
/// constant means nothing is added on the constant wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct OutputCombination<F: Field> {
    #[serde(with = "crate::r1cs::ark_serde::vec_vec")]
    pub input_scalars: Vec<Vec<F>>,
    #[serde(with = "crate::r1cs::ark_serde::vec")]
    pub constant_term: Vec<F>,
}

impl<F: Field> OutputCombination<F> {
    pub fn new(input_scalars: Vec<Vec<F>>, constant_term: Vec<F>) -> Self {
        Self {
            input_scalars,
            constant_term,
        }
    }

    /// Plain sum of the inputs.
    pub fn unweighted() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn validate(&self, in_size: usize, el_length: usize) -> R1csResult<()> {
        if !self.input_scalars.is_empty() && self.input_scalars.len() != in_size {
            return Err(R1csError::configuration(
                "output_combination",
                format!(
                    "{} scalar rows for {} inputs",
                    self.input_scalars.len(),
                    in_size
                ),
            ));
        }
        if let Some(row) = self.input_scalars.iter().find(|row| row.len() != el_length) {
            return Err(R1csError::configuration(
                "output_combination",
                format!("scalar row of length {}, expected {}", row.len(), el_length),
            ));
        }
        if !self.constant_term.is_empty() && self.constant_term.len() != el_length {
            return Err(R1csError::configuration(
                "output_combination",
                format!(
                    "constant term of length {}, expected {}",
                    self.constant_term.len(),
                    el_length
                ),
            ));
        }
        Ok(())
    }
}

/// Coefficient tables for every output of one layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct LayerConfig<F: Field> {
    pub el_length: usize,
    pub outputs: Vec<OutputCombination<F>>,
}

impl<F: Field> LayerConfig<F> {
    pub fn new(el_length: usize, outputs: Vec<OutputCombination<F>>) -> Self {
        Self { el_length, outputs }
    }

    pub fn out_size(&self) -> usize {
        self.outputs.len()
    }

    pub fn validate(&self, in_size: usize) -> R1csResult<()> {
        if self.el_length == 0 {
            return Err(R1csError::configuration("layer_config", "el_length must be > 0"));
        }
        if self.outputs.is_empty() {
            return Err(R1csError::configuration("layer_config", "no outputs configured"));
        }
        for combination in &self.outputs {
            combination.validate(in_size, self.el_length)?;
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> R1csResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> R1csResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
