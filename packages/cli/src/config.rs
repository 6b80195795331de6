use clap::ValueEnum;
use seedport_compiler_sql::Dialect;
use seedport_parser::UnresolvedPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "seedport.config.json";

/// Seedport configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Seed file or directory to read
    #[serde(default = "default_seed_file")]
    pub seed_file: String,

    /// Directory generated files are written to
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default)]
    pub dialect: Dialect,

    /// What to do with values that are not plain data
    #[serde(default)]
    pub unresolved: UnresolvedPolicy,

    /// Declarations to convert
    #[serde(default = "default_lists")]
    pub lists: Vec<ListConfig>,
}

fn default_seed_file() -> String {
    "prisma/seed.ts".to_string()
}

fn default_out_dir() -> String {
    "dist".to_string()
}

fn default_lists() -> Vec<ListConfig> {
    vec![ListConfig::named("memberDataList")]
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Sql,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Sql => "sql",
            OutputFormat::Json => "json",
        }
    }
}

/// One declaration to convert and how its records map onto a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListConfig {
    pub name: String,

    /// Target table; defaults to the list name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub rename: HashMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

impl ListConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
            columns: None,
            rename: HashMap::new(),
            exclude: Vec::new(),
        }
    }

    pub fn table_name(&self) -> &str {
        self.table.as_deref().unwrap_or(&self.name)
    }
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the seed input
    pub fn get_seed_path(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.seed_file)
    }

    pub fn get_out_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.out_dir)
    }

    /// Configured settings for `name`, or a bare entry when it is not configured
    pub fn list(&self, name: &str) -> ListConfig {
        self.lists
            .iter()
            .find(|list| list.name == name)
            .cloned()
            .unwrap_or_else(|| ListConfig::named(name))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_file: default_seed_file(),
            out_dir: default_out_dir(),
            format: OutputFormat::default(),
            dialect: Dialect::default(),
            unresolved: UnresolvedPolicy::default(),
            lists: default_lists(),
        }
    }
}
