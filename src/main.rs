use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

use simple_mlp::data::{load_csv, Gate, LabelMode};
use simple_mlp::network::DEFAULT_LEARNING_RATE;
use simple_mlp::persist::DEFAULT_MODEL_PATH;
use simple_mlp::train::{argmax, evaluate, train_loop, train_stochastic, TrainConfig};
use simple_mlp::{ModelStore, Network, NetworkConfig, Perceptron};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train a 2-H-1 network on a logic gate with randomly drawn samples
    Gate {
        /// and, or or xor
        gate: Gate,
        #[arg(long, default_value_t = 3)]
        hidden: usize,
        #[arg(long, default_value_t = 50_000)]
        steps: usize,
        #[arg(long, default_value_t = DEFAULT_LEARNING_RATE)]
        learning_rate: f64,
        /// Seed for weight initialization and sample draws
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Train a single sigmoid neuron on a logic gate
    Perceptron {
        gate: Gate,
        #[arg(long, default_value_t = 20_000)]
        steps: usize,
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Train on a CSV dataset, or restore the saved model if there is one
    Train {
        #[arg(long)]
        data: PathBuf,
        /// Last column is a class index with this many classes
        #[arg(long, conflicts_with = "label_cols", required_unless_present = "label_cols")]
        classes: Option<usize>,
        /// Last N columns are the target vector
        #[arg(long)]
        label_cols: Option<usize>,
        #[arg(long)]
        hidden: usize,
        #[arg(long, default_value_t = 5)]
        epochs: usize,
        #[arg(long, default_value_t = DEFAULT_LEARNING_RATE)]
        learning_rate: f64,
        #[arg(long, default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,
        /// Ignore any saved model and train from scratch
        #[arg(long)]
        fresh: bool,
        /// Visit samples in a new random order every epoch
        #[arg(long)]
        shuffle: bool,
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run a saved model on one input vector
    Predict {
        #[arg(long, default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,
        /// Comma-separated input values
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        input: Vec<f64>,
    },
}

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    )
    .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
    .target(env_logger::Target::Stderr)
    .init();

    if let Err(e) = run(args.command) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Gate { gate, hidden, steps, learning_rate, seed } => {
            run_gate(gate, hidden, steps, learning_rate, seed)
        }
        Command::Perceptron { gate, steps, seed } => run_perceptron(gate, steps, seed),
        Command::Train {
            data,
            classes,
            label_cols,
            hidden,
            epochs,
            learning_rate,
            model,
            fresh,
            shuffle,
            seed,
        } => {
            let label_mode = match (classes, label_cols) {
                (Some(n_classes), _) => LabelMode::ClassIndex { n_classes },
                (None, Some(n_label_cols)) => LabelMode::Columns { n_label_cols },
                (None, None) => bail!("one of --classes or --label-cols is required"),
            };
            let samples = load_csv(&data, label_mode)
                .with_context(|| format!("loading dataset {}", data.display()))?;

            let first = &samples[0];
            let config = NetworkConfig::new(first.input.len(), hidden, first.target.len())
                .with_learning_rate(learning_rate);
            let mut rng = rng_from(seed);
            let mut network = Network::with_rng(config, &mut rng)?;
            let store = ModelStore::new(model);

            let restored = !fresh && network.restore(&store)?;
            if !restored {
                let mut train_config = TrainConfig::new(epochs);
                if shuffle {
                    train_config = train_config.shuffled();
                }
                train_loop(&mut network, &samples, &train_config, &mut rng)?;
                network.save(&store)?;
            }

            let evaluation = evaluate(&network, &samples)?;
            let report = json!({
                "restored": restored,
                "evaluation": evaluation,
                "metrics": network.metrics().snapshot(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Command::Predict { model, input } => {
            let store = ModelStore::new(model);
            let network = Network::from_store(&store)?;
            let output = network.predict(&input)?;
            let class = argmax(&output);
            println!("{}", json!({ "output": output, "class": class }));
            Ok(())
        }
    }
}

fn run_gate(gate: Gate, hidden: usize, steps: usize, learning_rate: f64, seed: Option<u64>) -> Result<()> {
    let mut rng = rng_from(seed);
    let config = NetworkConfig::new(2, hidden, 1).with_learning_rate(learning_rate);
    let mut network = Network::with_rng(config, &mut rng)?;
    let samples = gate.samples();

    train_stochastic(&mut network, &samples, steps, &mut rng)?;

    for sample in &samples {
        let out = network.predict(&sample.input)?[0];
        println!(
            "{gate} {:?} -> {out:.4} (rounded {}, expected {})",
            sample.input,
            out.round(),
            sample.target[0]
        );
    }

    let snapshot = network.metrics().snapshot();
    println!(
        "steps: {}, running accuracy: {:.4}, average loss: {:.6}, final loss: {:.6}, {} ms",
        snapshot.total_samples,
        snapshot.current_accuracy,
        snapshot.average_loss,
        snapshot.final_loss.unwrap_or(0.0),
        snapshot.training_duration_ms
    );
    Ok(())
}

fn run_perceptron(gate: Gate, steps: usize, seed: Option<u64>) -> Result<()> {
    if !gate.is_linearly_separable() {
        log::warn!("{gate} is not linearly separable; a single neuron cannot learn it");
    }

    let mut rng = rng_from(seed);
    let mut perceptron = Perceptron::with_rng(2, &mut rng);
    let samples = gate.samples();

    for _ in 0..steps {
        let sample = &samples[rng.gen_range(0..samples.len())];
        perceptron.train(&sample.input, sample.target[0])?;
    }

    for sample in &samples {
        let out = perceptron.predict(&sample.input)?;
        println!("{gate} {:?} -> {out:.4} (expected {})", sample.input, sample.target[0]);
    }
    Ok(())
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
