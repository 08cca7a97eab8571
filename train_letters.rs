use clap::Parser;
use letter_perceptron::config::{load_config, TrainingConfig};
use letter_perceptron::loader::load_dir;
use letter_perceptron::Network;
use std::path::PathBuf;
use std::process;
use std::time::Instant;
use tracing::{error, info};

// Train the letter classifier on a directory of bitmaps.
#[derive(Parser, Debug)]
#[command(name = "train_letters")]
#[command(about = "Train a multilayer perceptron on letter bitmaps")]
struct Args {
    /// Training configuration (JSON); built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of training bitmaps named like `<anything>_<letter>.<ext>`
    #[arg(short, long)]
    train_dir: PathBuf,

    /// Directory of evaluation bitmaps; the training set is reused when omitted
    #[arg(short, long)]
    eval_dir: Option<PathBuf>,

    /// Seed overriding the configuration
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, default_value = "info")]
    log_level: tracing::Level,
}

fn run(args: Args) -> letter_perceptron::Result<()> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => TrainingConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let load_start = Instant::now();
    let mut training = load_dir(&args.train_dir)?;
    let evaluation = args.eval_dir.as_ref().map(load_dir).transpose()?;
    info!(
        "Loaded {} training and {} evaluation samples in {:.2}s",
        training.len(),
        evaluation.as_ref().map_or(training.len(), |e| e.len()),
        load_start.elapsed().as_secs_f64()
    );

    let mut network = Network::from_config(&config)?;
    info!(
        "Network {:?}, {} epochs, batch {}, learning rate {}, {:?} exponential",
        config.sizes, config.epochs, config.batch_size, config.learning_rate, config.exponential
    );

    let train_start = Instant::now();
    let reports = network.train(&mut training, evaluation.as_ref())?;
    let train_time = train_start.elapsed().as_secs_f64();

    if let Some(last) = reports.last() {
        info!(
            "Final accuracy {}/{} ({:.2}%) after {:.2}s",
            last.correct,
            last.total,
            last.accuracy * 100.0,
            train_time
        );
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    tracing_subscriber::fmt().with_max_level(args.log_level).init();

    if let Err(err) = run(args) {
        error!("{}", err);
        process::exit(1);
    }
}
