use seedport_parser::UnresolvedPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// SQL dialect, which decides identifier quoting and literal spelling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Postgres,
    Mysql,
    Sqlite,
}

impl Dialect {
    /// Quote a possibly schema-qualified table name such as `public.User`
    pub fn quote_ident(&self, name: &str) -> String {
        name.split('.')
            .map(|part| self.quote_column(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Quote a single column name; dots are part of the name
    pub fn quote_column(&self, name: &str) -> String {
        match self {
            Dialect::Mysql => format!("`{}`", name.replace('`', "``")),
            Dialect::Postgres | Dialect::Sqlite => format!("\"{}\"", name.replace('"', "\"\"")),
        }
    }

    pub fn quote_string(&self, value: &str) -> String {
        let escaped = match self {
            // MySQL treats backslash as an escape character by default
            Dialect::Mysql => value.replace('\\', "\\\\").replace('\'', "''"),
            Dialect::Postgres | Dialect::Sqlite => value.replace('\'', "''"),
        };
        format!("'{}'", escaped)
    }

    pub fn bool_literal(&self, value: bool) -> &'static str {
        match (self, value) {
            (Dialect::Sqlite, true) => "1",
            (Dialect::Sqlite, false) => "0",
            (_, true) => "TRUE",
            (_, false) => "FALSE",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dialect::Postgres => "postgres",
            Dialect::Mysql => "mysql",
            Dialect::Sqlite => "sqlite",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "mysql" | "mariadb" => Ok(Dialect::Mysql),
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            other => Err(format!(
                "Unknown dialect: {}. Use: postgres, mysql, or sqlite",
                other
            )),
        }
    }
}

/// Options for SQL compilation
#[derive(Debug, Clone)]
pub struct SqlOptions {
    /// Target table, optionally schema-qualified
    pub table: String,
    pub dialect: Dialect,
    /// Source keys in column order; defaults to every key in first-seen order
    pub columns: Option<Vec<String>>,
    /// Source key -> column name
    pub rename: HashMap<String, String>,
    /// Source keys to leave out
    pub exclude: Vec<String>,
    /// One multi-row INSERT instead of one statement per record
    pub batch: bool,
    /// Wrap the statements in BEGIN/COMMIT
    pub transaction: bool,
    pub unresolved: UnresolvedPolicy,
}

impl SqlOptions {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            dialect: Dialect::default(),
            columns: None,
            rename: HashMap::new(),
            exclude: Vec::new(),
            batch: false,
            transaction: false,
            unresolved: UnresolvedPolicy::Null,
        }
    }
}

/// Output buffer for generated SQL
pub(crate) struct Context {
    pub options: SqlOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    pub fn new(options: SqlOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    pub fn add_line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.buffer.push_str("  ");
        }
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    pub fn get_output(self) -> String {
        self.buffer
    }
}
