use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;

#[derive(Parser)]
#[command(name = "mandiprice")]
#[command(about = "Mandi price resolution server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 4000)]
        port: u16,

        /// CSV archive root (defaults to MANDI_DATA_DIR or ./data)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
    /// Show catalog and archive status
    Status {
        /// CSV archive root (defaults to MANDI_DATA_DIR or ./data)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
}

pub async fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, data_dir } => {
            commands::serve::run(port, data_dir).await;
        }
        Commands::Status { data_dir } => {
            commands::status::run(data_dir);
        }
    }
}
