use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use solace::dataset::{self, TrainingExample};
use solace::pipeline::{validate_input, DEFAULT_RESPONSE_COUNT, EMPTY_INPUT_MESSAGE};
use solace::{ArtifactStore, Classifier, ResponseCatalog, SupportPipeline, TrainingConfig, Weighting};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the trained vectorizer and model
    #[arg(long, global = true)]
    artifacts_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum WeightingArg {
    Count,
    Tfidf,
}

impl From<WeightingArg> for Weighting {
    fn from(arg: WeightingArg) -> Self {
        match arg {
            WeightingArg::Count => Weighting::Count,
            WeightingArg::Tfidf => Weighting::TfIdf,
        }
    }
}

#[derive(clap::Args)]
struct ServeArgs {
    /// Number of supportive messages to show
    #[arg(short = 'k', long, default_value_t = DEFAULT_RESPONSE_COUNT)]
    count: usize,
    /// Seed for message selection (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// JSON file with a custom response catalog
    #[arg(long)]
    responses: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Clean a raw `text,emotion` CSV into `text,cleaned_text,emotion`
    Preprocess {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Train the vectorizer and classifier and save them
    Train {
        #[arg(short, long)]
        input: PathBuf,
        /// Also write the processed corpus to this CSV
        #[arg(long)]
        processed_output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = WeightingArg::Count)]
        weighting: WeightingArg,
        #[arg(long, default_value_t = solace::classifier::DEFAULT_ALPHA)]
        alpha: f64,
        #[arg(long)]
        max_features: Option<usize>,
        /// Fraction of each class held out for evaluation
        #[arg(long, default_value_t = 0.1)]
        test_fraction: f64,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Classify one text and print supportive messages
    Predict {
        text: String,
        #[command(flatten)]
        serve: ServeArgs,
    },
    /// Prompt for check-ins until EOF or `quit`
    Interactive {
        #[command(flatten)]
        serve: ServeArgs,
    },
}

fn open_store(dir: Option<PathBuf>) -> ArtifactStore {
    match dir {
        Some(dir) => ArtifactStore::new(dir),
        None => ArtifactStore::new_default(),
    }
}

fn preprocess(input: &Path, output: &Path) -> Result<()> {
    let examples = dataset::load_examples(input)
        .with_context(|| format!("Failed to load dataset {:?}", input))?;
    dataset::save_examples(output, &examples)
        .with_context(|| format!("Failed to write {:?}", output))?;
    println!("Wrote {} cleaned examples to {}", examples.len(), output.display());
    Ok(())
}

fn train(store: &ArtifactStore, input: &Path, processed_output: Option<&Path>, config: TrainingConfig) -> Result<()> {
    config.validate()?;
    let start_time = Instant::now();

    let examples: Vec<TrainingExample> = dataset::load_examples(input)
        .with_context(|| format!("Failed to load dataset {:?}", input))?;
    if let Some(path) = processed_output {
        dataset::save_examples(path, &examples)
            .with_context(|| format!("Failed to write {:?}", path))?;
    }

    let (train_set, test_set) = dataset::stratified_split(&examples, config.test_fraction, config.seed);
    info!("Train: {} | Test: {}", train_set.len(), test_set.len());

    let classifier = Classifier::builder()
        .with_config(config)
        .add_examples(&train_set)?
        .build()?;

    if test_set.is_empty() {
        info!("No held-out examples; skipping evaluation");
    } else {
        let accuracy = dataset::evaluate(&classifier, &test_set)?;
        println!("Model accuracy: {:.2}% on {} held-out examples", accuracy * 100.0, test_set.len());
    }

    store.save(&classifier).context("Failed to save trained artifacts")?;
    let info = classifier.info();
    println!(
        "Saved {} classes / {} features to {} (took {:.2?})",
        info.num_classes,
        info.vocabulary_size,
        store.artifacts_dir().display(),
        start_time.elapsed()
    );
    Ok(())
}

fn load_pipeline(store: &ArtifactStore, serve: &ServeArgs) -> Result<SupportPipeline> {
    let catalog = match &serve.responses {
        Some(path) => ResponseCatalog::from_json_file(path)
            .with_context(|| format!("Failed to load response catalog {:?}", path))?,
        None => ResponseCatalog::builtin(),
    };
    let pipeline = SupportPipeline::from_store(store, catalog).map_err(|e| {
        error!("Cannot start: {}", e);
        e
    });
    Ok(pipeline
        .context("Trained artifacts are missing or corrupt; run `train` first")?
        .with_response_count(serve.count))
}

fn make_rng(seed: Option<u64>) -> Box<dyn RngCore> {
    match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::rng()),
    }
}

fn interactive(pipeline: &SupportPipeline, rng: &mut dyn RngCore) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("How do you feel today? ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if matches!(line.trim(), "quit" | "exit") {
            break;
        }
        if validate_input(line).is_err() {
            println!("⚠ {}", EMPTY_INPUT_MESSAGE);
            continue;
        }

        match pipeline.respond(line, rng) {
            Ok(response) => println!("\n{}", response),
            Err(e) => eprintln!("Error processing text: {}", e),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    solace::init_logger();
    let args = Args::parse();
    let artifacts_dir = args.artifacts_dir;

    match args.command {
        Command::Preprocess { input, output } => preprocess(&input, &output),
        Command::Train {
            input,
            processed_output,
            weighting,
            alpha,
            max_features,
            test_fraction,
            seed,
        } => {
            let config = TrainingConfig {
                weighting: weighting.into(),
                alpha,
                max_features,
                test_fraction,
                seed,
            };
            train(&open_store(artifacts_dir), &input, processed_output.as_deref(), config)
        }
        Command::Predict { text, serve } => {
            if validate_input(&text).is_err() {
                println!("⚠ {}", EMPTY_INPUT_MESSAGE);
                return Ok(());
            }
            let pipeline = load_pipeline(&open_store(artifacts_dir), &serve)?;
            let mut rng = make_rng(serve.seed);
            let response = pipeline.respond(&text, rng.as_mut())?;
            println!("{}", response);
            Ok(())
        }
        Command::Interactive { serve } => {
            let pipeline = load_pipeline(&open_store(artifacts_dir), &serve)?;
            let mut rng = make_rng(serve.seed);
            interactive(&pipeline, rng.as_mut())
        }
    }
}
