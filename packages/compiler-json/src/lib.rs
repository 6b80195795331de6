use seedport_parser::{UnresolvedPolicy, Value};
use thiserror::Error;
use tracing::warn;

/// Errors that can occur during JSON compilation
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Unresolved expression at {path}: {expr}")]
    Unresolved { path: String, expr: String },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Options for JSON compilation
#[derive(Debug, Clone)]
pub struct JsonOptions {
    /// Pretty print with two-space indentation
    pub pretty: bool,
    pub unresolved: UnresolvedPolicy,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            unresolved: UnresolvedPolicy::Null,
        }
    }
}

/// Compile a parsed value to JSON text
pub fn compile_to_json(value: &Value, options: &JsonOptions) -> Result<String, CompileError> {
    let json = to_json_value(value, options.unresolved)?;

    let output = if options.pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };

    Ok(output)
}

/// Convert to a `serde_json::Value`, applying the unresolved-expression policy
pub fn to_json_value(
    value: &Value,
    unresolved: UnresolvedPolicy,
) -> Result<serde_json::Value, CompileError> {
    for (path, expr) in value.unresolved() {
        match unresolved {
            UnresolvedPolicy::Error => {
                return Err(CompileError::Unresolved {
                    path,
                    expr: expr.to_string(),
                });
            }
            UnresolvedPolicy::Null => {
                warn!(%path, expr, "unresolved expression replaced with null");
            }
        }
    }

    Ok(value.to_json())
}
