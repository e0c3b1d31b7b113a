use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use turmas::{Strategy, StrategyChoice};

/// Convert school enrollment reports (PDF or CSV) into per-class student JSON.
#[derive(Debug, Parser)]
#[command(name = "turmas", about, version)]
pub struct Cli {
    /// TOML settings file (default: ./turmas.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log pipeline decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Students grouped by class, as JSON
    Json {
        #[command(flatten)]
        source: SourceArgs,

        /// Output document shape
        #[arg(long, value_enum, default_value_t = Schema::Grouped)]
        schema: Schema,

        /// School name, overriding the report header
        #[arg(long)]
        school: Option<String>,

        /// Also write the JSON to stdout
        #[arg(long)]
        print: bool,
    },

    /// Login accounts for every student, plus per-class counts
    Users {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Raw extracted rows labeled with their class, as CSV
    Csv {
        #[command(flatten)]
        source: SourceArgs,
    },
}

/// Input and output options shared by every subcommand.
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Report to read (.pdf or .csv)
    #[arg(value_name = "FILE", env = "PDF_FILE_PATH")]
    pub file: Option<PathBuf>,

    /// Output path (default: source name with the new extension)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Table detection strategy
    #[arg(long, value_enum, default_value_t = StrategyArg::Auto)]
    pub strategy: StrategyArg,
}

/// JSON document shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Schema {
    /// Metadata plus one key per class
    Grouped,
    /// Metadata plus a `classes` object; students need a birth date
    Nested,
}

/// Table detection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Lattice, falling back to stream once
    Auto,
    /// Ruling lines only
    Lattice,
    /// Text alignment only
    Stream,
}

impl From<StrategyArg> for StrategyChoice {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Auto => StrategyChoice::Auto,
            StrategyArg::Lattice => StrategyChoice::Only(Strategy::Lattice),
            StrategyArg::Stream => StrategyChoice::Only(Strategy::Stream),
        }
    }
}
