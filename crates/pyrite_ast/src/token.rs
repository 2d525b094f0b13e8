//! Token definitions.

/// The kind of a lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Integer literal.
    Int(i64),
    /// Float literal.
    Float(f64),
    /// String literal with escapes resolved.
    Str(String),
    /// Identifier.
    Name(String),
    /// `True`
    True,
    /// `False`
    False,
    /// `None`
    NoneKw,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `//`
    DoubleSlash,
    /// `%`
    Percent,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `=`
    Equals,
    /// End of statement: a newline or `;`.
    Newline,
    /// End of input.
    Eof,
}

/// A token with its 1-indexed start position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token kind.
    pub kind: TokenKind,
    /// Line of the first character.
    pub line: u32,
    /// Column of the first character.
    pub column: u32,
}

/// Maps reserved words to their token kinds.
pub fn lookup_keyword(word: &str) -> Option<TokenKind> {
    match word {
        "True" => Some(TokenKind::True),
        "False" => Some(TokenKind::False),
        "None" => Some(TokenKind::NoneKw),
        _ => None,
    }
}

/// Human-readable description of a token for error messages.
pub fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Int(v) => format!("integer {v}"),
        TokenKind::Float(v) => format!("float {v:?}"),
        TokenKind::Str(_) => "string literal".to_string(),
        TokenKind::Name(n) => format!("name '{n}'"),
        TokenKind::True => "'True'".to_string(),
        TokenKind::False => "'False'".to_string(),
        TokenKind::NoneKw => "'None'".to_string(),
        TokenKind::Plus => "'+'".to_string(),
        TokenKind::Minus => "'-'".to_string(),
        TokenKind::Star => "'*'".to_string(),
        TokenKind::Slash => "'/'".to_string(),
        TokenKind::DoubleSlash => "'//'".to_string(),
        TokenKind::Percent => "'%'".to_string(),
        TokenKind::LParen => "'('".to_string(),
        TokenKind::RParen => "')'".to_string(),
        TokenKind::Comma => "','".to_string(),
        TokenKind::Equals => "'='".to_string(),
        TokenKind::Newline => "end of line".to_string(),
        TokenKind::Eof => "end of input".to_string(),
    }
}
