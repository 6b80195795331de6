use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Seed file or directory to read
    #[arg(short, long, default_value = "prisma/seed.ts")]
    pub seed_file: String,

    /// Output directory for generated files
    #[arg(short, long, default_value = "dist")]
    pub out_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        bail!(
            "{} already exists. Use --force to overwrite",
            DEFAULT_CONFIG_NAME
        );
    }

    println!("{}", "📝 Initializing seedport...".bright_blue().bold());

    let config = Config {
        seed_file: args.seed_file.clone(),
        out_dir: args.out_dir,
        ..Config::default()
    };

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    if !PathBuf::from(cwd).join(&args.seed_file).exists() {
        println!(
            "  {} {} does not exist yet",
            "⚠️".yellow(),
            args.seed_file.bright_white()
        );
    }

    println!();
    println!("Next steps:");
    println!("  1. List the declarations to convert in {}", DEFAULT_CONFIG_NAME);
    println!("  2. Run: seedport convert");
    println!("  3. Check output in {}/", config.out_dir);

    Ok(())
}
