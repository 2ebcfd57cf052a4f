//! Homomorphic-encryption side of the arithmetization: ciphertext shapes,
//! relinearization keys, layer coefficient tables and the FFT behind the
//! transform gadget's witness.

pub mod ciphertext;
pub mod config;
pub mod fft;

pub use ciphertext::{Ciphertext, RelinKey};
pub use config::{LayerConfig, OutputCombination};
