use anyhow::Result;
use clap::Args;
use seedport_scrape::{extract_list, normalize_literal};
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Seed file to search
    pub input: PathBuf,

    /// Name of the `const` list declaration
    pub name: String,

    /// Run the extracted text through the normalizer
    #[arg(long)]
    pub normalize: bool,
}

/// Print a list declaration the way the text-based pipeline sees it
pub fn extract(args: ExtractArgs, cwd: &str) -> Result<()> {
    let content = std::fs::read_to_string(PathBuf::from(cwd).join(&args.input))?;
    let output = extract_text(&content, &args.name, args.normalize);
    println!("{}", output);
    Ok(())
}

fn extract_text(content: &str, name: &str, normalize: bool) -> String {
    let list = extract_list(content, name);

    if serde_json::from_str::<serde_json::Value>(&normalize_literal(&list)).is_err() {
        warn!(list = name, "extracted text is not valid JSON after normalizing; use `convert` instead");
    }

    if normalize {
        normalize_literal(&list)
    } else {
        list
    }
}
