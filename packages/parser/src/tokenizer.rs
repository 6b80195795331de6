use logos::Logos;
use std::fmt;
use std::ops::Range;

/// Token types for JavaScript/TypeScript literal syntax
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f\u{feff}]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum Token<'src> {
    // Keywords
    #[token("const")]
    Const,

    #[token("let")]
    Let,

    #[token("var")]
    Var,

    #[token("export")]
    Export,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[token("null")]
    Null,

    #[token("undefined")]
    Undefined,

    #[token("new")]
    New,

    #[token("as")]
    As,

    // Identifiers
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*", |lex| lex.slice())]
    Ident(&'src str),

    // String literals, quotes included
    #[regex(r#""([^"\\\n]|\\.|\\\n|\\\r\n)*""#, |lex| lex.slice())]
    #[regex(r#"'([^'\\\n]|\\.|\\\n|\\\r\n)*'"#, |lex| lex.slice())]
    String(&'src str),

    #[regex(r"`([^`\\]|\\.|\\\n)*`", |lex| lex.slice())]
    Template(&'src str),

    // Numbers (sign is a separate token)
    #[regex(r"[0-9][0-9_]*(\.([0-9][0-9_]*)?)?([eE][+-]?[0-9]+)?", |lex| lex.slice())]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?", |lex| lex.slice())]
    #[regex(r"0[xX][0-9a-fA-F_]+", |lex| lex.slice())]
    Number(&'src str),

    // Symbols
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token("...")]
    Spread,

    #[token("=")]
    Equals,

    #[token("=>")]
    Arrow,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("<")]
    LAngle,

    #[token(">")]
    RAngle,

    // Every other JS operator; the parser only needs to step over these
    #[regex(r"===|!==|==|!=|<=|>=|&&|\|\||\?\?|\?\.|\+\+|--|\*\*|[*/%!&|^~?@#]", |lex| lex.slice())]
    Operator(&'src str),
}

impl<'src> Token<'src> {
    /// Source text of keyword tokens, used where JS accepts keywords as names
    pub fn keyword_text(&self) -> Option<&'static str> {
        match self {
            Token::Const => Some("const"),
            Token::Let => Some("let"),
            Token::Var => Some("var"),
            Token::Export => Some("export"),
            Token::True => Some("true"),
            Token::False => Some("false"),
            Token::Null => Some("null"),
            Token::Undefined => Some("undefined"),
            Token::New => Some("new"),
            Token::As => Some("as"),
            _ => None,
        }
    }
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(keyword) = self.keyword_text() {
            return write!(f, "keyword '{}'", keyword);
        }
        match self {
            Token::Ident(s) => write!(f, "identifier '{}'", s),
            Token::String(s) => write!(f, "string {}", s),
            Token::Template(s) => write!(f, "template {}", s),
            Token::Number(n) => write!(f, "number {}", n),
            Token::Operator(op) => write!(f, "'{}'", op),
            Token::LBrace => write!(f, "'{{'"),
            Token::RBrace => write!(f, "'}}'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::Colon => write!(f, "':'"),
            Token::Semicolon => write!(f, "';'"),
            Token::Comma => write!(f, "','"),
            Token::Dot => write!(f, "'.'"),
            Token::Spread => write!(f, "'...'"),
            Token::Equals => write!(f, "'='"),
            Token::Arrow => write!(f, "'=>'"),
            Token::Plus => write!(f, "'+'"),
            Token::Minus => write!(f, "'-'"),
            Token::LAngle => write!(f, "'<'"),
            Token::RAngle => write!(f, "'>'"),
            _ => write!(f, "{:?}", self),
        }
    }
}

/// Tokenize a source string, dropping anything the lexer does not recognise
pub fn tokenize(source: &str) -> Vec<(Token, Range<usize>)> {
    tokenize_with_errors(source).0
}

/// Tokenize a source string, also returning the byte ranges the lexer rejected
pub fn tokenize_with_errors(source: &str) -> (Vec<(Token, Range<usize>)>, Vec<Range<usize>>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    for (result, span) in Token::lexer(source).spanned() {
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => errors.push(span),
        }
    }

    (tokens, errors)
}

/// Decode a quoted string or template token into its value.
///
/// The slice must include the surrounding quotes. Returns a message
/// describing the first bad escape sequence.
pub fn unescape(quoted: &str) -> Result<String, String> {
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some(escaped) = chars.next() else {
            return Err("unterminated escape sequence".to_string());
        };

        match escaped {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !chars.peek().is_some_and(|c| c.is_ascii_digit()) => out.push('\0'),
            // Line continuation
            '\n' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            'x' => {
                let code = read_hex(&mut chars, 2)?;
                out.push(char::from_u32(code).ok_or("invalid \\x escape")?);
            }
            'u' => {
                let code = read_unicode_escape(&mut chars)?;
                if (0xD800..0xDC00).contains(&code) {
                    // High surrogate, must be followed by a low one
                    let low = match (chars.next(), chars.next()) {
                        (Some('\\'), Some('u')) => read_unicode_escape(&mut chars)?,
                        _ => return Err("unpaired surrogate in \\u escape".to_string()),
                    };
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err("unpaired surrogate in \\u escape".to_string());
                    }
                    let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                    out.push(char::from_u32(combined).ok_or("invalid surrogate pair")?);
                } else {
                    out.push(
                        char::from_u32(code).ok_or_else(|| "unpaired surrogate in \\u escape".to_string())?,
                    );
                }
            }
            c if c.is_ascii_digit() => {
                return Err(format!("octal escape '\\{}' is not allowed", c));
            }
            // \' \" \\ \` and identity escapes
            other => out.push(other),
        }
    }

    Ok(out)
}

fn read_unicode_escape(chars: &mut std::iter::Peekable<std::str::Chars>) -> Result<u32, String> {
    if chars.peek() == Some(&'{') {
        chars.next();
        let mut code: u32 = 0;
        let mut digits = 0;
        loop {
            match chars.next() {
                Some('}') if digits > 0 => break,
                Some(c) if c.is_ascii_hexdigit() => {
                    code = code
                        .checked_mul(16)
                        .and_then(|v| v.checked_add(c.to_digit(16).unwrap_or(0)))
                        .filter(|v| *v <= 0x10FFFF)
                        .ok_or("\\u{...} escape out of range")?;
                    digits += 1;
                }
                _ => return Err("malformed \\u{...} escape".to_string()),
            }
        }
        Ok(code)
    } else {
        read_hex(chars, 4)
    }
}

fn read_hex(chars: &mut std::iter::Peekable<std::str::Chars>, len: usize) -> Result<u32, String> {
    let mut code = 0;
    for _ in 0..len {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or_else(|| format!("expected {} hex digits in escape", len))?;
        code = code * 16 + digit;
    }
    Ok(code)
}
