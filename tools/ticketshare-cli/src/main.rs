//! TicketShare CLI: compose and share "I'm attending" banners.
//!
//! Usage:
//!   ticketshare compose [OPTIONS]   Render a banner and save it to downloads
//!   ticketshare share [OPTIONS]     Render a banner and share it
//!   ticketshare validate <FILE>     Check a photo against the upload rules
//!   ticketshare check               Check export and share capabilities
//!   ticketshare config              Show or write the configuration file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::BannerArgs;

#[derive(Parser)]
#[command(
    name = "ticketshare",
    about = "Shareable attendee banners for ticketed events",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a banner and save it to the downloads directory
    Compose {
        #[command(flatten)]
        banner: BannerArgs,

        /// Directory to save the banner in (overrides config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Render a banner and hand it to the share surface
    Share {
        #[command(flatten)]
        banner: BannerArgs,

        /// Event page URL copied when no share sheet is available
        #[arg(long)]
        page_url: Option<String>,
    },

    /// Check a photo against the upload rules
    Validate {
        /// Path to the image file
        file: PathBuf,
    },

    /// Check export and share capabilities
    Check,

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ticketshare_common::config::AppConfig::load();

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    ticketshare_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Compose { banner, output_dir } => {
            commands::compose::run(config, banner, output_dir).await
        }
        Commands::Share { banner, page_url } => {
            commands::share::run(config, banner, page_url).await
        }
        Commands::Validate { file } => commands::validate::run(file),
        Commands::Check => commands::check::run(&config),
        Commands::Config { write } => commands::config::run(&config, write),
    }
}
