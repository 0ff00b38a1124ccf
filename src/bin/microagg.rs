//! microagg command-line tool.
//!
//! Usage:
//!   microagg microaggregate --input data.tsv --output out.tsv --method hybrid -k 5 \
//!       --qi age,zip --confidential income [--predictors age] [--seed 42] [--config run.toml]
//!   microagg noise --input data.tsv --output out.tsv --mean 0 --variance 1
//!   microagg resolution --res 0.5 1.3 2.7
//!   microagg approx --decimals 2 3.14159
//!   microagg info-loss --original data.tsv --protected out.tsv

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use microagg::config::{Method, MicroaggregationConfig};
use microagg::{distortion, io, metrics, Microaggregator, Result};

#[derive(Parser, Debug)]
#[command(name = "microagg")]
#[command(about = "Statistical disclosure control for numeric microdata")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Partition with MDAV and protect the records.
    Microaggregate {
        /// Tab-separated input with a header row.
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        output: PathBuf,

        /// TOML run configuration; flags below override it.
        #[arg(long)]
        config: Option<PathBuf>,

        /// centroid | swap | confidential-swap | hybrid
        #[arg(long)]
        method: Option<Method>,

        /// Minimum group size.
        #[arg(short, long)]
        k: Option<usize>,

        #[arg(long)]
        seed: Option<u64>,

        /// Quasi-identifier attribute names.
        #[arg(long, value_delimiter = ',')]
        qi: Vec<String>,

        /// Confidential attribute names.
        #[arg(long, value_delimiter = ',')]
        confidential: Vec<String>,

        /// Predictor attribute names (left untouched by hybrid synthesis).
        #[arg(long, value_delimiter = ',')]
        predictors: Vec<String>,
    },

    /// Add Gaussian noise to every non-identifier attribute.
    Noise {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        output: PathBuf,

        #[arg(long, default_value_t = 0.0)]
        mean: f64,

        #[arg(long)]
        variance: f64,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Snap values to a multiple of the resolution.
    Resolution {
        #[arg(long)]
        res: f64,

        #[arg(allow_negative_numbers = true)]
        values: Vec<f64>,
    },

    /// Round values to a number of decimal digits.
    Approx {
        #[arg(long)]
        decimals: u32,

        #[arg(allow_negative_numbers = true)]
        values: Vec<f64>,
    },

    /// Compare moments of an original and a protected dataset.
    InfoLoss {
        #[arg(long)]
        original: PathBuf,

        #[arg(long)]
        protected: PathBuf,
    },
}

fn rng_from(seed: Option<u64>) -> StdRng {
    StdRng::seed_from_u64(seed.unwrap_or_else(|| rand::rng().random()))
}

fn join(values: impl IntoIterator<Item = f64>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("\t")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("microagg=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Microaggregate {
            input,
            output,
            config,
            method,
            k,
            seed,
            qi,
            confidential,
            predictors,
        } => {
            let mut cfg = match config {
                Some(path) => MicroaggregationConfig::from_path(path)?,
                None => MicroaggregationConfig::default(),
            };
            if let Some(method) = method {
                cfg.method = method;
            }
            if let Some(k) = k {
                cfg.k = k;
            }
            if seed.is_some() {
                cfg.seed = seed;
            }
            if !qi.is_empty() {
                cfg.quasi_identifiers = qi;
            }
            if !confidential.is_empty() {
                cfg.confidential = confidential;
            }
            if !predictors.is_empty() {
                cfg.predictors = predictors;
            }

            let mut load_rng = rng_from(cfg.seed);
            let mut dataset = io::load(&input, &mut load_rng)?;
            cfg.designate(&mut dataset)?;

            let protected = Microaggregator::new(cfg)?.run(&dataset)?;
            io::save(&output, &protected)?;
        }
        Command::Noise {
            input,
            output,
            mean,
            variance,
            seed,
        } => {
            let mut rng = rng_from(seed);
            let dataset = io::load(&input, &mut rng)?;
            let mut all = dataset.clone();
            let names: Vec<String> = dataset
                .attributes()
                .iter()
                .map(|a| a.name().to_string())
                .collect();
            all.set_confidential(names.as_slice())?;
            let noisy = distortion::add_gaussian_noise(&all, mean, variance, &mut rng)?;
            io::save(&output, &noisy)?;
            info!(mean, variance, "noise added");
        }
        Command::Resolution { res, values } => {
            println!("{}", join(values.into_iter().map(|v| distortion::resolution(res, v))));
        }
        Command::Approx { decimals, values } => {
            println!(
                "{}",
                join(
                    values
                        .into_iter()
                        .map(|v| distortion::round_to_decimals(decimals, v))
                )
            );
        }
        Command::InfoLoss {
            original,
            protected,
        } => {
            let mut rng = rng_from(Some(0));
            let original = io::load(&original, &mut rng)?;
            let protected = io::load(&protected, &mut rng)?;
            let attrs: Vec<usize> = (0..original.num_attributes()).collect();
            let loss = metrics::information_loss(&original, &protected, &attrs)?;

            for (pos, &a) in loss.attributes.iter().enumerate() {
                let name = original.attribute(a).name();
                let m = &loss.means[pos];
                let v = &loss.variances[pos];
                println!(
                    "MEAN {name}\t{:.5}\t{:.5}\t{:.5}",
                    m.original, m.protected, m.relative
                );
                println!(
                    "VARIANCE {name}\t{:.5}\t{:.5}\t{:.5}",
                    v.original, v.protected, v.relative
                );
            }
            println!("COVARIANCE");
            for i in 0..loss.attributes.len() {
                let row: Vec<String> = (0..loss.attributes.len())
                    .map(|j| {
                        let c = loss.covariance(i, j);
                        format!("{:.5}/{:.5}/{:.5}", c.original, c.protected, c.relative)
                    })
                    .collect();
                println!("{}", row.join("\t"));
            }
            let sse = metrics::sse_per_attribute(&original, &protected)?;
            for (a, s) in sse.iter().enumerate() {
                println!("SSE {}\t{s:.5}", original.attribute(a).name());
            }
            println!("AVERAGE RELATIVE\t{:.5}", loss.average_relative());
        }
    }
    Ok(())
}
