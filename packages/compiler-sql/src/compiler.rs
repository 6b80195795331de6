use crate::context::{Context, SqlOptions};
use seedport_parser::{Object, UnresolvedPolicy, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur during SQL compilation
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Expected a list of records or a single object, found {0}")]
    InvalidRoot(&'static str),

    #[error("Record {index} is a {kind}, expected an object")]
    InvalidRecord { index: usize, kind: &'static str },

    #[error("Unresolved expression at {path}: {expr}")]
    Unresolved { path: String, expr: String },

    #[error("No columns left to insert into {0}")]
    NoColumns(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

struct Column<'a> {
    key: &'a str,
    name: String,
}

/// Compile records to INSERT statements
pub fn compile_to_sql(value: &Value, options: &SqlOptions) -> Result<String, CompileError> {
    let records = collect_records(value)?;
    let columns = resolve_columns(&records, options);
    let table = options.dialect.quote_ident(&options.table);

    debug!(
        table = %options.table,
        records = records.len(),
        columns = columns.len(),
        dialect = %options.dialect,
        "compiling records"
    );

    let mut ctx = Context::new(options.clone());
    ctx.add_line(&format!(
        "-- {} record(s) for {}",
        records.len(),
        comment_text(&table)
    ));

    if records.is_empty() {
        return Ok(ctx.get_output());
    }
    if columns.is_empty() {
        return Err(CompileError::NoColumns(options.table.clone()));
    }

    let rows = records
        .iter()
        .enumerate()
        .map(|(index, record)| compile_row(index, record, &columns, &ctx))
        .collect::<Result<Vec<_>, _>>()?;

    let head = format!(
        "INSERT INTO {} ({}) VALUES",
        table,
        columns
            .iter()
            .map(|column| ctx.options.dialect.quote_column(&column.name))
            .collect::<Vec<_>>()
            .join(", ")
    );

    if ctx.options.transaction {
        ctx.add_line("BEGIN;");
    }

    if ctx.options.batch {
        ctx.add_line(&head);
        ctx.indent();
        let last = rows.len() - 1;
        for (i, row) in rows.iter().enumerate() {
            let terminator = if i == last { ";" } else { "," };
            ctx.add_line(&format!("({}){}", row, terminator));
        }
        ctx.dedent();
    } else {
        for row in &rows {
            ctx.add_line(&format!("{} ({});", head, row));
        }
    }

    if ctx.options.transaction {
        ctx.add_line("COMMIT;");
    }

    Ok(ctx.get_output())
}

/// A list is a list of records; a lone object is one record
fn collect_records(value: &Value) -> Result<Vec<&Object>, CompileError> {
    match value {
        Value::List(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.as_object().ok_or(CompileError::InvalidRecord {
                    index,
                    kind: item.kind(),
                })
            })
            .collect(),
        Value::Object(object) => Ok(vec![object]),
        other => Err(CompileError::InvalidRoot(other.kind())),
    }
}

fn resolve_columns<'a>(records: &[&'a Object], options: &'a SqlOptions) -> Vec<Column<'a>> {
    let keys: Vec<&str> = match &options.columns {
        Some(columns) => columns.iter().map(String::as_str).collect(),
        None => {
            let mut keys: Vec<&str> = Vec::new();
            for record in records.iter().copied() {
                for key in record.keys() {
                    if !keys.contains(&key) {
                        keys.push(key);
                    }
                }
            }
            keys
        }
    };

    keys.into_iter()
        .filter(|key| !options.exclude.iter().any(|excluded| excluded.as_str() == *key))
        .map(|key| Column {
            key,
            name: options
                .rename
                .get(key)
                .cloned()
                .unwrap_or_else(|| key.to_string()),
        })
        .collect()
}

fn compile_row(
    index: usize,
    record: &Object,
    columns: &[Column],
    ctx: &Context,
) -> Result<String, CompileError> {
    let values = columns
        .iter()
        .map(|column| match record.get(column.key) {
            None => Ok("NULL".to_string()),
            Some(value) => compile_value(value, &format!("$[{}].{}", index, column.key), ctx),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(values.join(", "))
}

fn compile_value(value: &Value, path: &str, ctx: &Context) -> Result<String, CompileError> {
    let dialect = ctx.options.dialect;

    match value {
        Value::Null => Ok("NULL".to_string()),
        Value::Bool(b) => Ok(dialect.bool_literal(*b).to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(dialect.quote_string(s)),
        Value::Expr(expr) => {
            check_unresolved(path, expr, ctx.options.unresolved)?;
            Ok(format!("NULL /* {} */", comment_text(expr)))
        }
        // Nested data is stored as JSON text
        Value::List(_) | Value::Object(_) => {
            for (inner_path, expr) in value.unresolved() {
                let inner_path = format!("{}{}", path, inner_path.trim_start_matches('$'));
                check_unresolved(&inner_path, expr, ctx.options.unresolved)?;
            }
            let json = serde_json::to_string(&value.to_json())?;
            Ok(dialect.quote_string(&json))
        }
    }
}

fn check_unresolved(path: &str, expr: &str, policy: UnresolvedPolicy) -> Result<(), CompileError> {
    match policy {
        UnresolvedPolicy::Error => Err(CompileError::Unresolved {
            path: path.to_string(),
            expr: expr.to_string(),
        }),
        UnresolvedPolicy::Null => {
            warn!(path, expr, "unresolved expression replaced with NULL");
            Ok(())
        }
    }
}

/// Collapse text onto one line that cannot close a comment early
fn comment_text(expr: &str) -> String {
    expr.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("*/", "* /")
}
