use serde::{Deserialize, Serialize};

/// Byte range in the source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Numeric literal. Always finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Number::Int(i) => serde_json::Value::from(*i),
            Number::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        }
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(v) => write!(f, "{}", v),
        }
    }
}

/// A parsed literal value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<Value>),
    Object(Object),
    /// Source text of an expression that is not a literal, e.g. `admin.id`
    Expr(String),
}

/// Object literal with properties in source order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: Value,
    pub span: Span,
}

impl Object {
    /// Look up a property. Later duplicates win, as in JS.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties
            .iter()
            .rev()
            .find(|p| p.key == key)
            .map(|p| &p.value)
    }

    /// Keys in first-seen order, without duplicates
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::with_capacity(self.properties.len());
        for property in &self.properties {
            if !keys.contains(&property.key.as_str()) {
                keys.push(&property.key);
            }
        }
        keys
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl Value {
    /// Short description of the value's shape for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Object(_) => "object",
            Value::Expr(_) => "expression",
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// True when no unresolved expression occurs anywhere in the value
    pub fn is_resolved(&self) -> bool {
        self.first_unresolved().is_none()
    }

    /// Path and source text of the first unresolved expression, depth first.
    ///
    /// Paths use JSONPath-like notation rooted at `$`, e.g. `$[2].authorId`.
    pub fn first_unresolved(&self) -> Option<(String, &str)> {
        let mut found = None;
        self.walk_unresolved("$".to_string(), &mut |path, expr| {
            if found.is_none() {
                found = Some((path, expr));
            }
        });
        found
    }

    /// Every unresolved expression with its path
    pub fn unresolved(&self) -> Vec<(String, &str)> {
        let mut found = Vec::new();
        self.walk_unresolved("$".to_string(), &mut |path, expr| found.push((path, expr)));
        found
    }

    fn walk_unresolved<'a>(&'a self, path: String, f: &mut dyn FnMut(String, &'a str)) {
        match self {
            Value::Expr(expr) => f(path, expr),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    item.walk_unresolved(format!("{}[{}]", path, i), f);
                }
            }
            Value::Object(object) => {
                for property in &object.properties {
                    property
                        .value
                        .walk_unresolved(format!("{}.{}", path, property.key), f);
                }
            }
            _ => {}
        }
    }

    /// Convert to a JSON value. Unresolved expressions become `null`;
    /// callers that care check [`Value::first_unresolved`] first.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null | Value::Expr(_) => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => n.to_json(),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(object) => {
                let mut map = serde_json::Map::new();
                for property in &object.properties {
                    // A duplicate key keeps its first position with the last value
                    map.insert(property.key.clone(), property.value.to_json());
                }
                serde_json::Value::Object(map)
            }
        }
    }
}

/// What compilers do with an unresolved expression
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedPolicy {
    /// Emit a null in its place and log a warning
    #[default]
    Null,
    /// Fail the compilation
    Error,
}

/// Declaration keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclarationKind {
    Const,
    Let,
    Var,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Const => "const",
            DeclarationKind::Let => "let",
            DeclarationKind::Var => "var",
        }
    }
}

/// Location of a `const|let|var <name> =` before its value is parsed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclarationHeader {
    pub kind: DeclarationKind,
    pub name: String,
    pub exported: bool,
    /// Token index of the first token of the initializer
    pub value_token: usize,
    pub span: Span,
}

/// A declaration whose initializer parsed as a value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub name: String,
    pub exported: bool,
    pub value: Value,
    pub span: Span,
}
