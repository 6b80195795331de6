use crate::config::{Config, ListConfig, OutputFormat};
use anyhow::{anyhow, bail, Result};
use clap::Args;
use colored::Colorize;
use seedport_common::{load_seed_sources, CommonError, FileSystem, RealFileSystem, SeedSource};
use seedport_compiler_json::{compile_to_json, JsonOptions};
use seedport_compiler_sql::{compile_to_sql, Dialect, SqlOptions};
use seedport_parser::{parse_declaration, UnresolvedPolicy, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Seed file or directory (defaults to seedFile from the config)
    pub input: Option<PathBuf>,

    /// Declarations to convert (defaults to the configured lists)
    #[arg(short = 'l', long = "list")]
    pub lists: Vec<String>,

    /// Output format (overrides config)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Target table, when converting a single list
    #[arg(short, long)]
    pub table: Option<String>,

    /// SQL dialect: postgres, mysql or sqlite (overrides config)
    #[arg(long)]
    pub dialect: Option<Dialect>,

    /// Emit one multi-row INSERT per list
    #[arg(long)]
    pub batch: bool,

    /// Wrap the INSERT statements in a transaction
    #[arg(long)]
    pub transaction: bool,

    /// Fail on values that are not plain data instead of writing NULL
    #[arg(long)]
    pub strict: bool,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,

    /// Single-line JSON
    #[arg(long)]
    pub compact: bool,
}

/// Everything the driver needs once config and flags are merged
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub lists: Vec<ListConfig>,
    pub format: OutputFormat,
    pub dialect: Dialect,
    pub batch: bool,
    pub transaction: bool,
    pub unresolved: UnresolvedPolicy,
    pub pretty: bool,
}

impl GenerateOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            lists: config.lists.clone(),
            format: config.format,
            dialect: config.dialect,
            batch: false,
            transaction: false,
            unresolved: config.unresolved,
            pretty: true,
        }
    }

    /// Apply command-line overrides on top of the config
    pub fn merge_args(mut self, config: &Config, args: &ConvertArgs) -> Result<Self> {
        if !args.lists.is_empty() {
            self.lists = args.lists.iter().map(|name| config.list(name)).collect();
        }

        if let Some(table) = &args.table {
            if self.lists.len() != 1 {
                bail!("--table needs exactly one list, got {}", self.lists.len());
            }
            self.lists[0].table = Some(table.clone());
        }

        if let Some(format) = args.format {
            self.format = format;
        }
        if let Some(dialect) = args.dialect {
            self.dialect = dialect;
        }
        if args.strict {
            self.unresolved = UnresolvedPolicy::Error;
        }

        self.batch |= args.batch;
        self.transaction |= args.transaction;
        self.pretty = !args.compact;

        Ok(self)
    }
}

/// Compiled output for one list
#[derive(Debug, Clone)]
pub struct Generated {
    pub list: String,
    /// File the declaration was found in
    pub source: PathBuf,
    pub records: usize,
    pub output: String,
}

impl Generated {
    pub fn file_name(&self, format: OutputFormat) -> String {
        format!("{}.{}", self.list, format.extension())
    }
}

pub fn convert(args: ConvertArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let options = GenerateOptions::from_config(&config).merge_args(&config, &args)?;

    let input = match &args.input {
        Some(path) => PathBuf::from(cwd).join(path),
        None => config.get_seed_path(cwd),
    };

    if !args.stdout {
        println!("{}", "🌱 Converting seed data...".bright_blue().bold());
    }

    let generated = generate(&RealFileSystem, &input, &options)?;

    if args.stdout {
        for item in &generated {
            println!("{}", item.output);
        }
        return Ok(());
    }

    let out_dir = match &args.out_dir {
        Some(out) => PathBuf::from(cwd).join(out),
        None => config.get_out_dir(cwd),
    };
    fs::create_dir_all(&out_dir)?;

    for item in &generated {
        let output_file = out_dir.join(item.file_name(options.format));
        fs::write(&output_file, &item.output)?;

        let relative_source = item.source.strip_prefix(cwd).unwrap_or(&item.source);
        println!(
            "  {} {} ({} records, {}) → {}",
            "✓".green(),
            item.list,
            item.records,
            relative_source.display(),
            output_file.display()
        );
    }

    println!();
    println!(
        "{} Converted {} list(s)",
        "✅".green(),
        generated.len()
    );

    Ok(())
}

/// Find every requested list under `input` and compile it.
///
/// `input` is a seed file or a directory of seed files. A list that is found
/// nowhere is an error; within a directory, files that do not declare a list
/// are skipped.
pub fn generate(
    fs: &dyn FileSystem,
    input: &Path,
    options: &GenerateOptions,
) -> Result<Vec<Generated>> {
    let sources = load_seed_sources(fs, input)?;

    info!(input = %input.display(), files = sources.len(), "scanning seed sources");

    let mut found: Vec<Option<(PathBuf, Value)>> = vec![None; options.lists.len()];

    for SeedSource { path: file, content: source } in &sources {
        for (list, slot) in options.lists.iter().zip(found.iter_mut()) {
            let declaration = parse_declaration(source, &list.name)
                .map_err(|e| pretty_parse_error(&e, file, source))?;

            let Some(declaration) = declaration else {
                debug!(list = %list.name, file = %file.display(), "list not declared in file");
                continue;
            };

            if let Some((first, _)) = slot.as_ref() {
                warn!(
                    list = %list.name,
                    file = %file.display(),
                    first = %first.display(),
                    "list declared more than once; keeping the first"
                );
                continue;
            }

            *slot = Some((file.clone(), declaration.value));
        }
    }

    options
        .lists
        .iter()
        .zip(found)
        .map(|(list, slot)| -> Result<Generated> {
            let (source, value) = slot.ok_or_else(|| CommonError::ListNotFound {
                list: list.name.clone(),
                path: input.to_path_buf(),
            })?;

            let output = compile_list(&value, list, options)
                .map_err(|e| anyhow!("{} ({}): {}", list.name, source.display(), e))?;

            Ok(Generated {
                list: list.name.clone(),
                records: value.as_list().map(|items| items.len()).unwrap_or(1),
                source,
                output,
            })
        })
        .collect()
}

fn compile_list(value: &Value, list: &ListConfig, options: &GenerateOptions) -> Result<String> {
    let output = match options.format {
        OutputFormat::Sql => {
            let sql_options = SqlOptions {
                table: list.table_name().to_string(),
                dialect: options.dialect,
                columns: list.columns.clone(),
                rename: list.rename.clone(),
                exclude: list.exclude.clone(),
                batch: options.batch,
                transaction: options.transaction,
                unresolved: options.unresolved,
            };
            compile_to_sql(value, &sql_options)?
        }
        OutputFormat::Json => {
            let json_options = JsonOptions {
                pretty: options.pretty,
                unresolved: options.unresolved,
            };
            compile_to_json(value, &json_options)?
        }
    };

    Ok(output)
}

fn pretty_parse_error(
    error: &seedport_parser::ParseError,
    file: &Path,
    source: &str,
) -> anyhow::Error {
    use seedport_parser::error::pretty;
    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");
    anyhow!("\n{}", pretty::format_error(error, file_name, source))
}
