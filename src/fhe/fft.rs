//! Radix-2 FFT over an `FftField`, used to fill transform-gadget witnesses.

use crate::r1cs::errors::{R1csError, R1csResult};
use ark_ff::FftField;

fn ensure_power_of_two(len: usize) -> R1csResult<()> {
    if len == 0 {
        return Err(R1csError::configuration("fft", "FFT length must be > 0"));
    }
    if !len.is_power_of_two() {
        return Err(R1csError::configuration(
            "fft",
            "FFT length must be a power of two",
        ));
    }
    Ok(())
}

fn validate_generator<F: FftField>(root: F, domain_size: usize) -> R1csResult<()> {
    let n = domain_size as u64;
    if root.pow([n]) != F::one() {
        return Err(R1csError::configuration("fft", "root^n != 1 in FFT domain"));
    }
    if domain_size > 1 && root.pow([n / 2]) == F::one() {
        return Err(R1csError::configuration(
            "fft",
            "root does not have full order for FFT domain",
        ));
    }
    Ok(())
}

/// Primitive `len`-th root of unity of `F`.
pub fn domain_root<F: FftField>(len: usize) -> R1csResult<F> {
    ensure_power_of_two(len)?;
    F::get_root_of_unity(len as u64).ok_or_else(|| {
        R1csError::configuration("fft", format!("no root of unity of order {len}"))
    })
}

fn bit_reverse_permutation<F>(values: &mut [F]) {
    let n = values.len();
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            values.swap(i, j);
        }
    }
}

/// In place `X_k = Σ_j x_j · root^{jk}`.
pub fn fft_in_place<F: FftField>(values: &mut [F], root: F) -> R1csResult<()> {
    ensure_power_of_two(values.len())?;
    validate_generator(root, values.len())?;

    bit_reverse_permutation(values);

    let n = values.len();
    let mut len = 2;
    while len <= n {
        let w_len = root.pow([(n / len) as u64]);
        for i in (0..n).step_by(len) {
            let mut w = F::one();
            let half = len / 2;
            for j in 0..half {
                let u = values[i + j];
                let t = values[i + j + half] * w;
                values[i + j] = u + t;
                values[i + j + half] = u - t;
                w *= w_len;
            }
        }
        len <<= 1;
    }
    Ok(())
}

pub fn ifft_in_place<F: FftField>(values: &mut [F], root: F) -> R1csResult<()> {
    ensure_power_of_two(values.len())?;
    let inv_root = root
        .inverse()
        .ok_or_else(|| R1csError::configuration("fft", "FFT root has no inverse"))?;
    fft_in_place(values, inv_root)?;

    let inv_n = F::from(values.len() as u64)
        .inverse()
        .ok_or_else(|| R1csError::configuration("fft", "invalid FFT scale factor"))?;
    for value in values.iter_mut() {
        *value *= inv_n;
    }
    Ok(())
}
