mod animate;
mod brands;
mod explore;
mod render;
mod report;

use adscope_client::AdsClient;
use brands::SortArg;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "adscope")]
#[command(about = "Brand Meta ads leaderboard and report client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the brand leaderboard
    Brands {
        /// Filter by name, description or category
        #[arg(long)]
        search: Option<String>,
        /// Sort order
        #[arg(long, value_enum, default_value_t = SortArg::FollowersDesc)]
        sort: SortArg,
        /// Number of pages of rows to show
        #[arg(long, default_value = "1")]
        pages: u32,
        /// Print the rows as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the featured brands carousel
    Featured {
        /// Carousel start position
        #[arg(long, default_value = "0")]
        position: usize,
    },
    /// Show the report for one brand
    Report {
        /// Brand id as listed by `brands`
        brand: String,
        /// Unlock the presentation by email verification
        #[arg(long)]
        unlock: bool,
        /// Email to verify with; asked for when omitted
        #[arg(long, requires = "unlock")]
        email: Option<String>,
    },
    /// Interactive leaderboard and report session (default)
    Explore,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = adscope_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let client = AdsClient::new(&config)?;
    match cli.command {
        Some(Commands::Brands {
            search,
            sort,
            pages,
            json,
        }) => brands::run_brands(&client, &config, search.as_deref(), sort, pages, json).await?,
        Some(Commands::Featured { position }) => {
            brands::run_featured(&client, &config, position).await?;
        }
        Some(Commands::Report {
            brand,
            unlock,
            email,
        }) => report::run_report(&client, &config, &brand, unlock, email.as_deref()).await?,
        Some(Commands::Explore) | None => explore::run_explore(&client, &config).await?,
    }

    Ok(())
}
