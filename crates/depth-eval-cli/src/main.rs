//! depth-eval CLI - Depth prediction evaluation tool

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use depth_eval::ResampleFilter;

mod commands;

/// Depth prediction evaluation and comparison tool.
#[derive(Parser)]
#[command(name = "depth-eval")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate predicted depth maps against ground truth
    Evaluate {
        /// Directory of predicted depth images
        #[arg(short, long)]
        predictions: PathBuf,

        /// Directory of ground-truth depth images
        #[arg(short, long)]
        ground_truths: PathBuf,

        /// Directory for report output (summary/detailed CSV and JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Ratio tolerance for the accuracy value metric
        #[arg(long, default_value_t = depth_eval::DEFAULT_ACCURACY_RATIO)]
        accuracy_ratio: f64,

        /// Resampling filter for pairs with mismatched dimensions
        #[arg(long, value_enum, default_value_t = FilterArg::Bilinear)]
        filter: FilterArg,

        /// Emit a progress line every N pairs
        #[arg(long, default_value_t = 10)]
        progress_interval: usize,
    },

    /// Render a depth heatmap and overlay for one image/depth pair
    View {
        /// Camera image path
        #[arg(short, long)]
        image: PathBuf,

        /// Depth image path
        #[arg(short, long)]
        depth: PathBuf,

        /// Output directory for heatmap.png and overlay.png
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Heatmap weight in the overlay blend
        #[arg(long, default_value_t = 0.3)]
        alpha: f32,

        /// Map far depths to bright colors instead of near ones
        #[arg(long)]
        no_invert: bool,

        /// Lower depth bound override for normalization
        #[arg(long)]
        min_depth: Option<f32>,

        /// Upper depth bound override for normalization
        #[arg(long)]
        max_depth: Option<f32>,
    },
}

/// Resampling filter choice.
#[derive(Clone, Copy, ValueEnum)]
enum FilterArg {
    /// Nearest-neighbor sampling
    Nearest,
    /// Bilinear interpolation
    Bilinear,
}

impl From<FilterArg> for ResampleFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Nearest => ResampleFilter::Nearest,
            FilterArg::Bilinear => ResampleFilter::Bilinear,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            predictions,
            ground_truths,
            output,
            accuracy_ratio,
            filter,
            progress_interval,
        } => commands::evaluate::run(
            predictions,
            ground_truths,
            output,
            accuracy_ratio,
            filter.into(),
            progress_interval,
            cli.verbose,
        ),
        Commands::View {
            image,
            depth,
            output,
            alpha,
            no_invert,
            min_depth,
            max_depth,
        } => commands::view::run(
            image,
            depth,
            output,
            alpha,
            !no_invert,
            min_depth,
            max_depth,
            cli.verbose,
        ),
    }
}
