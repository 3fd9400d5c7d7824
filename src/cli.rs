use clap::{Parser, Subcommand};

use crate::commands;
use crate::models::RangeHint;

#[derive(Parser)]
#[command(name = "market-dashboard-proxy")]
#[command(about = "Market dashboard data proxy", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the server
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Resolve market breadth once and print it
    Breadth,
    /// Print the cleaned daily series for one symbol
    Series {
        /// Symbol, `^` or `__` prefix for indices
        symbol: String,

        /// 5d, 1mo, 3mo, 6mo, 1y, 2y
        #[arg(short, long, default_value = "1y", value_parser = RangeHint::from_str)]
        range: RangeHint,
    },
}

pub async fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            commands::serve::run(port).await;
        }
        Commands::Breadth => {
            commands::breadth::run().await;
        }
        Commands::Series { symbol, range } => {
            commands::series::run(symbol, range).await;
        }
    }
}
