use rand::rngs::StdRng;
use rand::SeedableRng;

use simple_mlp::{train_stochastic, Gate, Network, NetworkConfig};

fn train_gate(gate: Gate, steps: usize, seed: u64) -> Network {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut network = Network::with_rng(NetworkConfig::new(2, 3, 1), &mut rng).unwrap();
    train_stochastic(&mut network, &gate.samples(), steps, &mut rng).unwrap();
    network
}

fn solves(network: &Network, gate: Gate) -> bool {
    gate.samples().iter().all(|s| {
        let out = network.predict(&s.input).unwrap()[0];
        out.round() == s.target[0]
    })
}

#[test]
fn xor_is_learned_by_most_seeds() {
    // A 2-3-1 network occasionally settles in a local minimum on XOR.
    let solved = [7u64, 21, 42]
        .into_iter()
        .filter(|&seed| solves(&train_gate(Gate::Xor, 50_000, seed), Gate::Xor))
        .count();
    assert!(solved >= 2, "only {solved} of 3 seeds learned xor");
}

#[test]
fn and_gate_extremes() {
    let network = train_gate(Gate::And, 20_000, 3);

    assert_eq!(network.predict(&[1.0, 1.0]).unwrap()[0].round(), 1.0);
    assert_eq!(network.predict(&[0.0, 0.0]).unwrap()[0].round(), 0.0);
    assert_eq!(network.metrics().total_samples(), 20_000);
}
