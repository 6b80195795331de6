use anyhow::Result;
use clap::Args;
use seedport_scrape::{clean_object, normalize_literal};
use std::io::Read;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// File holding the literal text (reads stdin when omitted)
    pub file: Option<PathBuf>,

    /// Only strip comments and quote keys
    #[arg(long)]
    pub clean: bool,
}

pub fn normalize(args: NormalizeArgs, cwd: &str) -> Result<()> {
    let text = match &args.file {
        Some(file) => std::fs::read_to_string(PathBuf::from(cwd).join(file))?,
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        }
    };

    let output = if args.clean {
        clean_object(&text)
    } else {
        normalize_literal(&text)
    };

    print!("{}", output);
    Ok(())
}
