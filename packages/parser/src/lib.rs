pub mod ast;
pub mod error;
pub mod parser;
pub mod tokenizer;

pub use ast::{
    Declaration, DeclarationKind, Number, Object, Property, Span, UnresolvedPolicy, Value,
};
pub use error::{ParseError, ParseResult};
pub use parser::{parse_declaration, parse_declarations, parse_literal, Parser};
pub use tokenizer::{tokenize, Token};
