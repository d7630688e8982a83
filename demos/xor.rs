use std::sync::mpsc;
use std::thread;

use simple_mlp::{train_loop, Gate, Network, NetworkConfig, TrainConfig};

fn main() -> simple_mlp::Result<()> {
    let samples = Gate::Xor.samples();
    let mut network = Network::new(NetworkConfig::new(2, 3, 1))?;

    let (tx, rx) = mpsc::channel();
    let mut config = TrainConfig::new(12_500).shuffled();
    config.progress_tx = Some(tx);

    let worker = {
        let samples = samples.clone();
        thread::spawn(move || {
            let outcome = train_loop(&mut network, &samples, &config, &mut rand::thread_rng());
            outcome.map(|_| network)
        })
    };

    for record in rx {
        if record.epoch % 1000 == 0 {
            println!("Epoch {}: loss = {:.6}", record.epoch, record.loss);
        }
    }

    let network = match worker.join() {
        Ok(result) => result?,
        Err(_) => panic!("training thread panicked"),
    };

    for sample in &samples {
        let out = network.predict(&sample.input)?[0];
        println!("Input: {:?} -> Output: {:.4}", sample.input, out);
    }
    Ok(())
}
