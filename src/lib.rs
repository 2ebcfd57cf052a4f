//! VFHE-R1CS: arithmetization of leveled homomorphic evaluation
//!
//! This library expresses one multiplicative round of a leveled HE pipeline as a
//! rank-1 constraint system so that a proof system can certify the ciphertext
//! transition without learning the encrypted values.
//!
//! The crate is organised in three layers:
//!
//! 1. **`r1cs`**: the protoboard (variables, constant wire, constraints, witness
//!    values), exportable R1CS instances and an arkworks bridge.
//! 2. **`fhe`**: ciphertext shapes, relinearization keys, per-layer coefficient
//!    configuration and the radix-2 FFT used by transform witnesses.
//! 3. **`gadgets`**: the linear-combination product gadget, ciphertext squaring,
//!    reference NTT / relinearization gadgets and the layer compositions.
//!
//! ```rust,ignore
//! use vfhe_r1cs::{Ciphertext, CtLincombSquareGadget, Gadget, Protoboard};
//!
//! let mut pb = Protoboard::<Fr>::new();
//! let input = Ciphertext::allocate(&mut pb, 2, 8);
//! let output = Ciphertext::allocate(&mut pb, 3, 8);
//! let square = CtLincombSquareGadget::new(&mut pb, &[input.clone()], &[], &[], &output, "sq")?;
//! square.generate_r1cs_constraints(&mut pb)?;
//! input.assign(&mut pb, &[c0_values, c1_values])?;
//! square.generate_r1cs_witness(&mut pb)?;
//! assert!(pb.is_satisfied()?);
//! ```

macro_rules! vfhe_debug {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*);
    };
}

pub mod fhe;
pub mod gadgets;
pub mod r1cs;

// Re-export commonly used types for convenience
pub use fhe::{Ciphertext, LayerConfig, OutputCombination, RelinKey};
pub use gadgets::{
    CtLincombSquareGadget, Gadget, KeySwitchRelinearizer, Layer1Gadget, LayerMidGadget,
    LayerMidRelinGadget, ModSwitchLayerParams, ModSwitchParams, ModSwitchRelinearizer,
    NttDirection, NttGadget, RelinLayerParams, RelinWiring, RelinearizeGadget,
    RelinearizeModSwitchGadget, TransformGadget, VectorLincombProductGadget,
};
pub use r1cs::{
    LinearCombination, Protoboard, ProtoboardCircuit, R1csConstraint, R1csError,
    R1csInstance, R1csResult, R1csWitness, Variable, VariableArray,
};
