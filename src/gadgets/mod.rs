//! Gadgets: composable units that declare constraints and compute witnesses.
//!
//! Every gadget validates its wiring in its constructor, so a misconfigured gadget
//! never registers a constraint. After construction the caller runs
//! `generate_r1cs_constraints` for the whole gadget tree, assigns the inputs, then
//! runs `generate_r1cs_witness`. Composite gadgets forward both phases to the
//! sub-gadgets they own in a fixed order, producers before consumers.
//!
//! The transform and relinearization steps are consumed through the
//! `TransformGadget`, `RelinearizeGadget` and `RelinearizeModSwitchGadget` traits;
//! `NttGadget`, `KeySwitchRelinearizer` and `ModSwitchRelinearizer` are the
//! implementations shipped with the crate.

pub mod ct_square;
pub mod layers;
pub mod lincomb;
pub mod ntt;
pub mod relinearize;

pub use ct_square::CtLincombSquareGadget;
pub use layers::{
    Layer1Gadget, LayerMidGadget, LayerMidRelinGadget, ModSwitchLayerParams, RelinLayerParams,
};
pub use lincomb::VectorLincombProductGadget;
pub use ntt::{NttDirection, NttGadget};
pub use relinearize::{KeySwitchRelinearizer, ModSwitchParams, ModSwitchRelinearizer};

use crate::fhe::{Ciphertext, RelinKey};
use crate::r1cs::errors::{R1csError, R1csResult};
use crate::r1cs::lc::VariableArray;
use crate::r1cs::protoboard::Protoboard;
use ark_ff::Field;

pub trait Gadget<F: Field> {
    /// Structural phase: registers this gadget's constraints.
    fn generate_r1cs_constraints(&self, pb: &mut Protoboard<F>) -> R1csResult<()>;

    /// Numeric phase: fills this gadget's outputs from already assigned inputs.
    fn generate_r1cs_witness(&self, pb: &mut Protoboard<F>) -> R1csResult<()>;
}

/// Domain conversion of one coefficient vector into an equal-length output.
pub trait TransformGadget<F: Field>: Gadget<F> + Sized {
    type Params;

    fn build(
        pb: &mut Protoboard<F>,
        params: &Self::Params,
        input: &VariableArray,
        output: &VariableArray,
        annotation: &str,
    ) -> R1csResult<Self>;
}

/// Wiring shared by both relinearization contracts.
#[derive(Clone, Copy, Debug)]
pub struct RelinWiring<'a> {
    pub input: &'a Ciphertext,
    pub decomposition: &'a [VariableArray],
    pub key: &'a RelinKey,
    pub output: &'a Ciphertext,
}

/// Reduces a degree-3 ciphertext to degree 2.
pub trait RelinearizeGadget<F: Field>: Gadget<F> + Sized {
    fn build(
        pb: &mut Protoboard<F>,
        wiring: RelinWiring<'_>,
        pt_mod: F,
        annotation: &str,
    ) -> R1csResult<Self>;
}

/// Reduces a degree-3 ciphertext to degree 2 and drops one modulus.
pub trait RelinearizeModSwitchGadget<F: Field>: Gadget<F> + Sized {
    fn build(
        pb: &mut Protoboard<F>,
        wiring: RelinWiring<'_>,
        to_remove: &Ciphertext,
        params: ModSwitchParams<F>,
        annotation: &str,
    ) -> R1csResult<Self>;
}

pub(crate) fn ensure_arity(
    gadget: &str,
    what: &str,
    ct: &Ciphertext,
    expected: usize,
) -> R1csResult<()> {
    if ct.arity() != expected {
        return Err(R1csError::configuration(
            gadget,
            format!("{what} has {} components, expected {expected}", ct.arity()),
        ));
    }
    Ok(())
}

pub(crate) fn ensure_count(
    gadget: &str,
    what: &str,
    actual: usize,
    expected: usize,
) -> R1csResult<()> {
    if actual != expected {
        return Err(R1csError::configuration(
            gadget,
            format!("{actual} {what}, expected {expected}"),
        ));
    }
    Ok(())
}

pub(crate) fn ensure_lengths<'a>(
    gadget: &str,
    what: &str,
    arrays: impl IntoIterator<Item = &'a VariableArray>,
    veclen: usize,
) -> R1csResult<()> {
    for (idx, array) in arrays.into_iter().enumerate() {
        if array.len() != veclen {
            return Err(R1csError::configuration(
                gadget,
                format!("{what}[{idx}] has length {}, expected {veclen}", array.len()),
            ));
        }
    }
    Ok(())
}

pub(crate) fn ensure_non_empty(gadget: &str, what: &str, len: usize) -> R1csResult<()> {
    if len == 0 {
        return Err(R1csError::configuration(gadget, format!("{what} must not be empty")));
    }
    Ok(())
}
