use std::path::PathBuf;

use clap::{Parser, Subcommand};
use desc_cli::opponent::write_opponent_channels;
use desc_cli::{Pipeline, PrecomputedSource, RunConfig, RunResult};
use log::{error, info};

#[derive(Parser)]
#[command(author, version, about = "Descriptor matching evaluation", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match and verify descriptors for every image pair listed in a run config
    Evaluate {
        /// Run configuration TOML
        #[arg(short, long)]
        config: PathBuf,

        /// Draw high-confidence correct matches, overriding the config
        #[arg(long)]
        draw: bool,

        /// Persist the computed descriptor sets, overriding the config
        #[arg(long)]
        save_descriptors: bool,

        /// Worker threads, overriding the config
        #[arg(short, long)]
        threads: Option<usize>,
    },
    /// Split an image into its three opponent color channels
    Opponent {
        /// Input image
        input: PathBuf,

        /// Output prefix; writes <prefix>_o1.png, <prefix>_o2.png, <prefix>_o3.png
        output_prefix: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let result = match args.command {
        Commands::Evaluate { config, draw, save_descriptors, threads } => {
            evaluate(config, draw, save_descriptors, threads)
        }
        Commands::Opponent { input, output_prefix } => write_opponent_channels(&input, &output_prefix).map(|_| ()),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn evaluate(path: PathBuf, draw: bool, save_descriptors: bool, threads: Option<usize>) -> RunResult<()> {
    let mut config = RunConfig::load_toml(&path)?;
    config.draw_matches |= draw;
    config.save_descriptors |= save_descriptors;
    if threads.is_some() {
        config.threads = threads;
    }
    config.validate()?;

    desc_core::init_thread_pool(config.threads())?;
    info!("using {} threads", config.threads());

    let source = PrecomputedSource::load(&config.store_paths()?)?;
    let summary = Pipeline::new(config, &source)?.run()?;
    let total = summary.units.len();
    summary.into_result()?;

    info!("completed {} evaluations", total);
    Ok(())
}
