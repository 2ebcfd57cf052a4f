use crate::fhe::Ciphertext;
use crate::gadgets::lincomb::VectorLincombProductGadget;
use crate::gadgets::{
    ensure_arity, ensure_count, ensure_lengths, ensure_non_empty, Gadget, RelinWiring,
    RelinearizeGadget, RelinearizeModSwitchGadget,
};
use crate::r1cs::errors::{R1csError, R1csResult};
use crate::r1cs::field_utils::checked_inverse;
use crate::r1cs::lc::{LinearCombination, Variable};
use crate::r1cs::protoboard::Protoboard;
use ark_ff::Field;

/// Scalars of the modulus-switching step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModSwitchParams<F: Field> {
    /// Plaintext modulus `t`; the removed value is `t·e`.
    pub pt_mod: F,
    /// Modulus `q` dropped from the ciphertext modulus chain.
    pub q_to_remove: F,
}

/// Key switching of the degree-3 tail over already decomposed digits.
///
/// With digits `d_k` of `c2` and key rows `rlk0[k]`, `rlk1[k]` (all in evaluation
/// form), the output is
/// `out_j = c_j + Σ_k d_k ∘ rlk_j[k]` for `j = 0, 1`.
/// Each digit/key product goes through a product gadget into an internal
/// vector; the sum costs one linear constraint per position. Digit range and
/// recomposition checks belong to whoever produces the decomposition.
#[derive(Clone, Debug)]
pub struct KeySwitchRelinearizer<F: Field> {
    products: Vec<VectorLincombProductGadget<F>>,
    sums: Vec<(LinearCombination<F>, Variable)>,
    annotation: String,
}

impl<F: Field> KeySwitchRelinearizer<F> {
    pub fn new(
        pb: &mut Protoboard<F>,
        wiring: RelinWiring<'_>,
        annotation: &str,
    ) -> R1csResult<Self> {
        let RelinWiring {
            input,
            decomposition,
            key,
            output,
        } = wiring;
        ensure_arity(annotation, "input", input, 3)?;
        ensure_arity(annotation, "output", output, 2)?;
        let veclen = input.el_length();
        ensure_non_empty(annotation, "input components", veclen)?;
        ensure_non_empty(annotation, "decomposition", decomposition.len())?;
        ensure_count(annotation, "rlk0 rows", key.key0.len(), decomposition.len())?;
        ensure_count(annotation, "rlk1 rows", key.key1.len(), decomposition.len())?;
        ensure_lengths(annotation, "input component", input.components(), veclen)?;
        ensure_lengths(annotation, "output component", output.components(), veclen)?;
        ensure_lengths(annotation, "digit", decomposition, veclen)?;
        ensure_lengths(annotation, "rlk0 row", &key.key0, veclen)?;
        ensure_lengths(annotation, "rlk1 row", &key.key1, veclen)?;
        vfhe_debug!(
            "[gadget] {} relinearize veclen={} digits={}",
            annotation,
            veclen,
            decomposition.len()
        );

        let mut products = Vec::with_capacity(2 * decomposition.len());
        let mut sums = Vec::with_capacity(2 * veclen);
        for (j, key_rows) in [&key.key0, &key.key1].into_iter().enumerate() {
            let mut acc: Vec<LinearCombination<F>> = (0..veclen)
                .map(|i| LinearCombination::from_variable(input[j][i]))
                .collect();
            for (k, (digit, key_row)) in decomposition.iter().zip(key_rows.iter()).enumerate() {
                let product = pb.allocate(veclen);
                products.push(
                    VectorLincombProductGadget::builder(
                        std::slice::from_ref(digit),
                        std::slice::from_ref(key_row),
                        &product,
                    )
                    .build(pb, &format!("{annotation}.rlk{j}[{k}]"))?,
                );
                for (lc, var) in acc.iter_mut().zip(&product) {
                    lc.add_term(*var, F::one());
                }
            }
            sums.extend(acc.into_iter().zip(output[j].iter().copied()));
        }

        Ok(Self {
            products,
            sums,
            annotation: annotation.to_string(),
        })
    }
}

impl<F: Field> Gadget<F> for KeySwitchRelinearizer<F> {
    fn generate_r1cs_constraints(&self, pb: &mut Protoboard<F>) -> R1csResult<()> {
        for gadget in &self.products {
            gadget.generate_r1cs_constraints(pb)?;
        }
        for (idx, (lc, out)) in self.sums.iter().enumerate() {
            pb.enforce_equal(
                lc.clone(),
                LinearCombination::from_variable(*out),
                format!("{}.sum[{}]", self.annotation, idx),
            );
        }
        Ok(())
    }

    fn generate_r1cs_witness(&self, pb: &mut Protoboard<F>) -> R1csResult<()> {
        for gadget in &self.products {
            gadget.generate_r1cs_witness(pb)?;
        }
        for (lc, out) in &self.sums {
            let value = pb.lc_val(lc)?;
            pb.set_val(*out, value)?;
        }
        Ok(())
    }
}

impl<F: Field> RelinearizeGadget<F> for KeySwitchRelinearizer<F> {
    /// Key switching does not depend on `t`; it only shapes the keys.
    fn build(
        pb: &mut Protoboard<F>,
        wiring: RelinWiring<'_>,
        _pt_mod: F,
        annotation: &str,
    ) -> R1csResult<Self> {
        Self::new(pb, wiring, annotation)
    }
}

/// Key switching followed by dropping the modulus `q`:
///
/// `q · out_j[i] = r_j[i] − t·e_j[i]`
///
/// where `r` is the key-switched ciphertext and `e` the per-input value to
/// remove, so that the removed quantity stays a multiple of `t`.
#[derive(Clone, Debug)]
pub struct ModSwitchRelinearizer<F: Field> {
    relin: KeySwitchRelinearizer<F>,
    switches: Vec<(LinearCombination<F>, Variable)>,
    q_to_remove: F,
    annotation: String,
}

impl<F: Field> ModSwitchRelinearizer<F> {
    pub fn new(
        pb: &mut Protoboard<F>,
        wiring: RelinWiring<'_>,
        to_remove: &Ciphertext,
        params: ModSwitchParams<F>,
        annotation: &str,
    ) -> R1csResult<Self> {
        ensure_arity(annotation, "output", wiring.output, 2)?;
        ensure_arity(annotation, "value to remove", to_remove, 2)?;
        let veclen = wiring.input.el_length();
        ensure_lengths(annotation, "value to remove component", to_remove.components(), veclen)?;
        ensure_lengths(annotation, "output component", wiring.output.components(), veclen)?;
        if params.q_to_remove.is_zero() {
            return Err(R1csError::configuration(annotation, "removed modulus must be non-zero"));
        }

        let relinearized = Ciphertext::allocate(pb, 2, veclen);
        let relin = KeySwitchRelinearizer::new(
            pb,
            RelinWiring {
                output: &relinearized,
                ..wiring
            },
            &format!("{annotation}.relin"),
        )?;

        let mut switches = Vec::with_capacity(2 * veclen);
        for j in 0..2 {
            for i in 0..veclen {
                let mut lc = LinearCombination::from_variable(relinearized[j][i]);
                lc.add_term(to_remove[j][i], -params.pt_mod);
                switches.push((lc, wiring.output[j][i]));
            }
        }
        Ok(Self {
            relin,
            switches,
            q_to_remove: params.q_to_remove,
            annotation: annotation.to_string(),
        })
    }
}

impl<F: Field> Gadget<F> for ModSwitchRelinearizer<F> {
    fn generate_r1cs_constraints(&self, pb: &mut Protoboard<F>) -> R1csResult<()> {
        self.relin.generate_r1cs_constraints(pb)?;
        for (idx, (lc, out)) in self.switches.iter().enumerate() {
            pb.enforce_equal(
                lc.clone(),
                LinearCombination::scaled(*out, self.q_to_remove),
                format!("{}.modswitch[{}]", self.annotation, idx),
            );
        }
        Ok(())
    }

    fn generate_r1cs_witness(&self, pb: &mut Protoboard<F>) -> R1csResult<()> {
        self.relin.generate_r1cs_witness(pb)?;
        let q_inv = checked_inverse(self.q_to_remove, &self.annotation)?;
        for (lc, out) in &self.switches {
            let value = pb.lc_val(lc)? * q_inv;
            pb.set_val(*out, value)?;
        }
        Ok(())
    }
}

impl<F: Field> RelinearizeModSwitchGadget<F> for ModSwitchRelinearizer<F> {
    fn build(
        pb: &mut Protoboard<F>,
        wiring: RelinWiring<'_>,
        to_remove: &Ciphertext,
        params: ModSwitchParams<F>,
        annotation: &str,
    ) -> R1csResult<Self> {
        Self::new(pb, wiring, to_remove, params, annotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fhe::RelinKey;
    use crate::r1cs::field_utils::u64_slice_to_field;
    use crate::r1cs::lc::VariableArray;
    use ark_bn254::Fr;
    use ark_std::{test_rng, UniformRand};

    fn fr(values: &[u64]) -> Vec<Fr> {
        u64_slice_to_field(values)
    }

    struct Fixture {
        pb: Protoboard<Fr>,
        input: Ciphertext,
        digits: Vec<VariableArray>,
        key: RelinKey,
    }

    /// c = ([1], [2], [·]), digits [3], [4], keys rlk0 = [5], [6], rlk1 = [7], [8]
    fn fixture() -> Fixture {
        let mut pb = Protoboard::<Fr>::new();
        let input = Ciphertext::allocate(&mut pb, 3, 1);
        let digits: Vec<VariableArray> = (0..2).map(|_| pb.allocate(1)).collect();
        let key = RelinKey::allocate(&mut pb, 2, 1);
        input.assign(&mut pb, &[fr(&[1]), fr(&[2]), fr(&[11])]).unwrap();
        pb.assign_array(&digits[0], &fr(&[3])).unwrap();
        pb.assign_array(&digits[1], &fr(&[4])).unwrap();
        pb.assign_array(&key.key0[0], &fr(&[5])).unwrap();
        pb.assign_array(&key.key0[1], &fr(&[6])).unwrap();
        pb.assign_array(&key.key1[0], &fr(&[7])).unwrap();
        pb.assign_array(&key.key1[1], &fr(&[8])).unwrap();
        Fixture {
            pb,
            input,
            digits,
            key,
        }
    }

    #[test]
    fn key_switch_adds_digit_key_products() {
        let Fixture {
            mut pb,
            input,
            digits,
            key,
        } = fixture();
        let output = Ciphertext::allocate(&mut pb, 2, 1);
        let wiring = RelinWiring {
            input: &input,
            decomposition: &digits,
            key: &key,
            output: &output,
        };
        let gadget =
            KeySwitchRelinearizer::build(&mut pb, wiring, Fr::from(17u64), "relin").unwrap();
        gadget.generate_r1cs_constraints(&mut pb).unwrap();
        gadget.generate_r1cs_witness(&mut pb).unwrap();
        // 1 + 3·5 + 4·6 = 40, 2 + 3·7 + 4·8 = 55
        assert_eq!(output.values(&pb).unwrap(), vec![fr(&[40]), fr(&[55])]);
        assert!(pb.is_satisfied().unwrap());
    }

    #[test]
    fn mod_switch_divides_out_removed_modulus() {
        let Fixture {
            mut pb,
            input,
            digits,
            key,
        } = fixture();
        let to_remove = Ciphertext::allocate(&mut pb, 2, 1);
        to_remove.assign(&mut pb, &[fr(&[2]), fr(&[1])]).unwrap();
        let output = Ciphertext::allocate(&mut pb, 2, 1);
        let wiring = RelinWiring {
            input: &input,
            decomposition: &digits,
            key: &key,
            output: &output,
        };
        let params = ModSwitchParams {
            pt_mod: Fr::from(5u64),
            q_to_remove: Fr::from(3u64),
        };
        let gadget =
            ModSwitchRelinearizer::build(&mut pb, wiring, &to_remove, params, "ms").unwrap();
        gadget.generate_r1cs_constraints(&mut pb).unwrap();
        gadget.generate_r1cs_witness(&mut pb).unwrap();
        // (40 − 5·2) / 3 = 10, (55 − 5·1) / 3 = 50 / 3
        let out = output.values(&pb).unwrap();
        assert_eq!(out[0], fr(&[10]));
        assert_eq!(out[1][0] * Fr::from(3u64), Fr::from(50u64));
        assert!(pb.is_satisfied().unwrap());
    }

    #[test]
    fn random_multi_position_relinearization() {
        let mut rng = test_rng();
        let mut pb = Protoboard::<Fr>::new();
        let veclen = 4;
        let input = Ciphertext::allocate(&mut pb, 3, veclen);
        let digits: Vec<VariableArray> = (0..3).map(|_| pb.allocate(veclen)).collect();
        let key = RelinKey::allocate(&mut pb, 3, veclen);
        let output = Ciphertext::allocate(&mut pb, 2, veclen);
        let gadget = KeySwitchRelinearizer::new(
            &mut pb,
            RelinWiring {
                input: &input,
                decomposition: &digits,
                key: &key,
                output: &output,
            },
            "relin",
        )
        .unwrap();
        gadget.generate_r1cs_constraints(&mut pb).unwrap();
        input.assign_random(&mut pb, &mut rng).unwrap();
        for row in digits.iter().chain(&key.key0).chain(&key.key1) {
            let values: Vec<Fr> = (0..veclen).map(|_| Fr::rand(&mut rng)).collect();
            pb.assign_array(row, &values).unwrap();
        }
        gadget.generate_r1cs_witness(&mut pb).unwrap();
        assert!(pb.is_satisfied().unwrap());
        // 2 components × 3 digits × 4 products, plus 2 × 4 sums
        assert_eq!(pb.num_constraints(), 32);
    }

    #[test]
    fn shape_errors() {
        let Fixture {
            mut pb,
            input,
            digits,
            key,
        } = fixture();
        let output = Ciphertext::allocate(&mut pb, 2, 1);
        let short_key = RelinKey::new(key.key0.clone(), key.key1[..1].to_vec());
        let err = KeySwitchRelinearizer::new(
            &mut pb,
            RelinWiring {
                input: &input,
                decomposition: &digits,
                key: &short_key,
                output: &output,
            },
            "relin",
        )
        .unwrap_err();
        assert!(err.is_configuration());

        let degree_two = Ciphertext::allocate(&mut pb, 2, 1);
        assert!(KeySwitchRelinearizer::new(
            &mut pb,
            RelinWiring {
                input: &degree_two,
                decomposition: &digits,
                key: &key,
                output: &output,
            },
            "relin",
        )
        .is_err());

        let to_remove = Ciphertext::allocate(&mut pb, 2, 1);
        let zero_q = ModSwitchParams {
            pt_mod: Fr::from(5u64),
            q_to_remove: Fr::from(0u64),
        };
        assert!(ModSwitchRelinearizer::new(
            &mut pb,
            RelinWiring {
                input: &input,
                decomposition: &digits,
                key: &key,
                output: &output,
            },
            &to_remove,
            zero_q,
            "ms",
        )
        .is_err());
        assert_eq!(pb.num_constraints(), 0);
    }
}
