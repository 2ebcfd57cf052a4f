use ark_bn254::Fr;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem};
use ark_std::{test_rng, UniformRand};
use vfhe_r1cs::{
    Ciphertext, Gadget, KeySwitchRelinearizer, Layer1Gadget, LayerConfig, LayerMidGadget,
    LayerMidRelinGadget, ModSwitchLayerParams, ModSwitchRelinearizer, NttDirection, NttGadget,
    OutputCombination, Protoboard, ProtoboardCircuit, RelinKey, RelinLayerParams, VariableArray,
};

const EL_LENGTH: usize = 4;
const DIGITS: usize = 2;

struct Round {
    pb: Protoboard<Fr>,
    gadgets: Vec<Box<dyn Gadget<Fr>>>,
    fresh: Vec<Ciphertext>,
    decompositions: Vec<Vec<VariableArray>>,
    key: RelinKey,
    to_removes: Vec<Ciphertext>,
    result: Vec<Ciphertext>,
}

fn weighted_config(in_size: usize, seed: u64) -> LayerConfig<Fr> {
    let row = |offset: u64| {
        (0..EL_LENGTH as u64)
            .map(|i| Fr::from(seed + offset + i))
            .collect::<Vec<_>>()
    };
    LayerConfig::new(
        EL_LENGTH,
        vec![
            OutputCombination::new((0..in_size as u64).map(row).collect(), row(100)),
            OutputCombination::unweighted(),
        ],
    )
}

/// Fresh ciphertexts, then layer 1, a full mid layer and a relinearize-only layer.
fn build_round() -> Round {
    let mut pb = Protoboard::<Fr>::new();
    let fresh: Vec<Ciphertext> =
        (0..3).map(|_| Ciphertext::allocate(&mut pb, 2, EL_LENGTH)).collect();
    let layer1_out: Vec<Ciphertext> =
        (0..2).map(|_| Ciphertext::allocate(&mut pb, 3, EL_LENGTH)).collect();
    let mid_out: Vec<Ciphertext> =
        (0..2).map(|_| Ciphertext::allocate(&mut pb, 3, EL_LENGTH)).collect();
    let result: Vec<Ciphertext> =
        (0..2).map(|_| Ciphertext::allocate(&mut pb, 2, EL_LENGTH)).collect();
    let decompositions: Vec<Vec<VariableArray>> = (0..4)
        .map(|_| (0..DIGITS).map(|_| pb.allocate(EL_LENGTH)).collect())
        .collect();
    let key = RelinKey::allocate(&mut pb, DIGITS, EL_LENGTH);
    let to_removes: Vec<Ciphertext> =
        (0..2).map(|_| Ciphertext::allocate(&mut pb, 2, EL_LENGTH)).collect();

    // bincode round trip, as a prover would load it from disk
    let config = LayerConfig::<Fr>::from_bytes(&weighted_config(3, 1).to_bytes().unwrap()).unwrap();
    let layer1 = Layer1Gadget::<Fr, NttGadget<Fr>>::from_config(
        &mut pb,
        &fresh,
        &config,
        &layer1_out,
        &NttDirection::Inverse,
        "round.layer1",
    )
    .unwrap();
    let mid = LayerMidGadget::<Fr, ModSwitchRelinearizer<Fr>>::from_config(
        &mut pb,
        &layer1_out,
        &weighted_config(2, 7),
        RelinLayerParams {
            decompositions: &decompositions[..2],
            key: &key,
            pt_mod: Fr::from(65537u64),
        },
        ModSwitchLayerParams {
            to_removes: &to_removes,
            q_to_remove: Fr::from(1_099_511_627_791u64),
        },
        &mid_out,
        "round.mid",
    )
    .unwrap();
    let relin = LayerMidRelinGadget::<Fr, KeySwitchRelinearizer<Fr>>::new(
        &mut pb,
        &mid_out,
        RelinLayerParams {
            decompositions: &decompositions[2..],
            key: &key,
            pt_mod: Fr::from(65537u64),
        },
        &result,
        "round.relin",
    )
    .unwrap();

    Round {
        pb,
        gadgets: vec![Box::new(layer1), Box::new(mid), Box::new(relin)],
        fresh,
        decompositions,
        key,
        to_removes,
        result,
    }
}

fn run_round(round: &mut Round) {
    for gadget in &round.gadgets {
        gadget.generate_r1cs_constraints(&mut round.pb).unwrap();
    }
    let mut rng = test_rng();
    for ct in round.fresh.iter().chain(&round.to_removes) {
        ct.assign_random(&mut round.pb, &mut rng).unwrap();
    }
    let rows = round
        .decompositions
        .iter()
        .flatten()
        .chain(&round.key.key0)
        .chain(&round.key.key1);
    for row in rows {
        let values: Vec<Fr> = (0..row.len()).map(|_| Fr::rand(&mut rng)).collect();
        round.pb.assign_array(row, &values).unwrap();
    }
    for gadget in &round.gadgets {
        gadget.generate_r1cs_witness(&mut round.pb).unwrap();
    }
}

#[test]
fn full_round_is_satisfied() {
    let mut round = build_round();
    run_round(&mut round);
    assert!(round.pb.is_satisfied().unwrap());
    assert_eq!(round.pb.first_unsatisfied().unwrap(), None);
    for ct in &round.result {
        assert_eq!(ct.values(&round.pb).unwrap().len(), 2);
    }
}

#[test]
fn full_round_replays_into_arkworks() {
    let mut round = build_round();
    run_round(&mut round);
    let circuit = ProtoboardCircuit::from_protoboard(&round.pb).unwrap();
    let cs = ConstraintSystem::<Fr>::new_ref();
    circuit.generate_constraints(cs.clone()).unwrap();
    assert_eq!(cs.num_constraints(), round.pb.num_constraints());
    assert!(cs.is_satisfied().unwrap());
}

#[test]
fn tampered_output_is_caught() {
    let mut round = build_round();
    run_round(&mut round);
    let mut witness = round.pb.to_witness().unwrap();
    let instance = round.pb.to_instance().unwrap();
    let target = round.result[0][1][2].index();
    witness.assignment[target - 1] += Fr::from(1u64);
    assert!(!instance.is_satisfied(&witness).unwrap());
}

#[test]
fn constraint_system_shape_is_deterministic() {
    let mut first = build_round();
    let mut second = build_round();
    run_round(&mut first);
    run_round(&mut second);
    assert_eq!(
        first.pb.to_instance().unwrap().digest().unwrap(),
        second.pb.to_instance().unwrap().digest().unwrap()
    );
    assert_eq!(first.pb.to_witness().unwrap(), second.pb.to_witness().unwrap());
}
