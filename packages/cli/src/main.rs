mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    convert, extract, init, inspect, normalize, ConvertArgs, ExtractArgs, InitArgs, InspectArgs,
    NormalizeArgs,
};

/// Seedport CLI - turn hard-coded seed data into SQL and JSON
#[derive(Parser, Debug)]
#[command(name = "seedport")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default seedport.config.json
    Init(InitArgs),

    /// Convert seed lists to SQL or JSON
    Convert(ConvertArgs),

    /// List the declarations in a seed file and their shapes
    Inspect(InspectArgs),

    /// Run text through the regex normalizer
    Normalize(NormalizeArgs),

    /// Pull a list declaration out of a file as raw text
    Extract(ExtractArgs),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Convert(args) => convert(args, &cwd),
        Command::Inspect(args) => inspect(args, &cwd),
        Command::Normalize(args) => normalize(args, &cwd),
        Command::Extract(args) => extract(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
