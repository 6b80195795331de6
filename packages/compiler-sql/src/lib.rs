mod compiler;
mod context;

pub use compiler::{compile_to_sql, CompileError};
pub use context::{Dialect, SqlOptions};

#[cfg(test)]
mod tests;
