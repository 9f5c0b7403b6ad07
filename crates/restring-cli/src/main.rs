use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "restring")]
#[command(about = "Firmware string translation patcher")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply a translation table to a firmware image
    Patch {
        /// Input firmware image
        image: PathBuf,

        /// Output file; image bytes go to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Strings file; read from stdin when omitted
        #[arg(short, long)]
        strings: Option<PathBuf>,

        /// Overwrite in place even when the tail check fails
        #[arg(short, long)]
        force: bool,

        /// Free range for relocated strings as START:END (0x hex, 0o
        /// octal or decimal); may be repeated
        #[arg(short = 'r', long = "range", value_name = "START:END")]
        ranges: Vec<String>,

        /// Encoding for translated strings, e.g. windows-1251
        #[arg(short, long)]
        encoding: Option<String>,

        /// Config file with defaults and free ranges
        #[arg(short, long, default_value = "restring.toml")]
        config: PathBuf,

        /// Write a JSON report of the run here
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// List every referenced string in a firmware image
    Scan {
        /// Input firmware image
        image: PathBuf,

        /// Print one escaped string per line, ready for a strings file
        #[arg(short, long)]
        plain: bool,

        /// Write the scan result as JSON here
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Show raw image bytes around an offset
    Hexdump {
        /// Input firmware image
        image: PathBuf,

        /// Start offset (0x hex, 0o octal or decimal)
        offset: String,

        /// Number of bytes to show
        #[arg(short = 'n', long, default_value_t = 256)]
        size: usize,

        /// Include an ASCII column
        #[arg(long)]
        ascii: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("restring=info".parse()?)
                .add_directive("restring_core=warn".parse()?),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Command::Patch {
            image,
            output,
            strings,
            force,
            ranges,
            encoding,
            config,
            report,
        } => commands::patch::run(
            &image,
            output.as_deref(),
            strings.as_deref(),
            force,
            &ranges,
            encoding.as_deref(),
            &config,
            report.as_deref(),
        ),
        Command::Scan { image, plain, json } => commands::scan::run(&image, plain, json.as_deref()),
        Command::Hexdump {
            image,
            offset,
            size,
            ascii,
        } => commands::hexdump::run(&image, &offset, size, ascii),
    }
}
