//! Root CLI structure for alphamap-rs

use clap::{Parser, Subcommand};

use crate::commands::extract::ExtractArgs;

#[derive(Parser)]
#[command(name = "alphamap-rs")]
#[command(about = "Extract terrain texture alpha maps from WoW ADT files", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode alpha maps of ADT tiles and write one PNG per texture
    ///
    /// WDT files among the inputs set each map's alpha format and are read
    /// before any tile.
    Extract(ExtractArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
