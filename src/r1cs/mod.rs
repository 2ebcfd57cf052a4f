//! Rank-1 constraint system plumbing shared by every gadget.
//!
//! - `Protoboard`: variable allocation, the constant wire, constraint registration
//!   and write-once witness storage.
//! - `R1csInstance` / `R1csWitness`: exported statement and assignment, with a
//!   digest that binds the constraint shape.
//! - `ProtoboardCircuit`: hands an exported instance to an arkworks backend.

pub mod ark_serde;
pub mod arkworks;
pub mod errors;
pub mod field_utils;
pub mod instance;
pub mod lc;
pub mod protoboard;

pub use arkworks::ProtoboardCircuit;
pub use errors::{R1csError, R1csResult};
pub use instance::{R1csConstraint, R1csInstance, R1csWitness};
pub use lc::{LinearCombination, Variable, VariableArray};
pub use protoboard::Protoboard;
