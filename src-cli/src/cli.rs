use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "report-designer")]
#[command(version, about = "Inspect, normalize and plan report canvas layouts")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        value_name = "DIR",
        help = "Directory holding settings.json; built-in defaults when omitted"
    )]
    pub settings_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a layout file and print its page and element counts
    Inspect {
        /// Layout file (canonical, alternate schema, or quote-wrapped)
        file: PathBuf,
    },

    /// Rewrite a layout file in the canonical format
    Normalize {
        file: PathBuf,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        out: Option<PathBuf>,

        #[arg(long, help = "Write compact JSON instead of indented")]
        compact: bool,
    },

    /// Print the page render plan for a layout filled with a dataset
    Plan {
        layout: PathBuf,

        /// Dataset JSON: an array of rows, or an object with `rows` and `columns`
        data: PathBuf,

        #[arg(long, help = "Preferred language tag for column labels")]
        language: Option<String>,

        #[arg(long, help = "Table rows per printed page")]
        rows_per_page: Option<usize>,

        #[arg(long = "heading", value_name = "TEXT", help = "Heading line for the first page; repeatable")]
        headings: Vec<String>,

        #[arg(long, value_name = "TEXT", help = "Footer text for the last page")]
        footer: Option<String>,

        #[arg(long, value_name = "PATH", help = "Column label catalog JSON ({column: {lang: text}})")]
        labels: Option<PathBuf>,

        #[arg(long, value_name = "PATH", help = "JSON object supplying placeholder values")]
        context: Option<PathBuf>,
    },
}
