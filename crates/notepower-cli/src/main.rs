mod collect;
mod prepare;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "notepower")]
#[command(about = "Collect high-efficiency note.com titles and prepare training data")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Discover creators by keyword and collect their high-scoring articles
    Collect {
        /// Discard the progress checkpoint and start discovery over
        #[arg(long)]
        fresh: bool,

        /// Only search keywords in this category
        #[arg(long)]
        category: Option<String>,

        /// Only search this keyword
        #[arg(long)]
        keyword: Option<String>,

        /// Override the global creator cap
        #[arg(long)]
        max_creators: Option<usize>,

        /// Override the number of search result pages per keyword
        #[arg(long)]
        max_pages: Option<u32>,

        /// Show what would be searched and collected without any requests
        #[arg(long)]
        dry_run: bool,
    },
    /// Show the progress checkpoint and record store counts
    Status,
    /// Clean the raw store and write training files plus a quality report
    Prepare {
        /// Raw record store to read (defaults to the data directory's store)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Directory for the prepared files
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Override the cleaning like floor
        #[arg(long)]
        min_likes: Option<u64>,

        /// Override the power score that labels a record as a success
        #[arg(long)]
        success_threshold: Option<f64>,

        /// Override the power score above which records are flagged as outliers
        #[arg(long)]
        outlier_threshold: Option<f64>,
    },
    /// Generate synthetic titles and evolved instructions from prepared files
    Augment {
        /// Directory holding the prepared files
        #[arg(long)]
        input_dir: Option<PathBuf>,

        /// Directory for the augmented files
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Export the raw record store as CSV
    Export {
        /// Raw record store to read (defaults to the data directory's store)
        #[arg(long)]
        input: Option<PathBuf>,

        /// CSV file to write
        #[arg(long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("notepower: no command given; run with --help for usage");
        return Ok(());
    };

    let config = notepower_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::Collect {
            fresh,
            category,
            keyword,
            max_creators,
            max_pages,
            dry_run,
        } => {
            let options = collect::CollectOptions {
                fresh,
                category,
                keyword,
                max_creators,
                max_pages,
                dry_run,
            };
            collect::run_collect(&config, &options).await?;
        }
        Commands::Status => status::run_status(&config)?,
        Commands::Prepare {
            input,
            output_dir,
            min_likes,
            success_threshold,
            outlier_threshold,
        } => {
            let options = prepare::PrepareOptions {
                input,
                output_dir,
                min_likes,
                success_threshold,
                outlier_threshold,
            };
            prepare::run_prepare(&config, &options)?;
        }
        Commands::Augment {
            input_dir,
            output_dir,
            seed,
        } => prepare::run_augment(&config, input_dir, output_dir, seed)?,
        Commands::Export { input, output } => {
            prepare::run_export(&config, input, &output)?;
        }
    }

    Ok(())
}
