use thiserror::Error;

/// Zone file parsing errors
///
/// Every variant carries the 1-based line number the problem was found on.
/// Unterminated constructs report the line they were opened on instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZoneError {
    /// TTL value is not a valid number/unit sequence or exceeds 2^32-1
    #[error("line {line}: malformed TTL '{value}'")]
    MalformedTtl { line: usize, value: String },
    /// CLASS<n> with an out-of-range or non-numeric code
    #[error("line {line}: unknown class '{class}'")]
    UnknownClass { line: usize, class: String },
    /// Record type mnemonic is neither registered nor TYPE<n>
    #[error("line {line}: unknown record type '{rtype}'")]
    UnknownRecordType { line: usize, rtype: String },
    /// Unexpected content on a line
    #[error("line {line}: syntax error: {message}")]
    SyntaxError { line: usize, message: String },
    #[error("unterminated quoted string opened on line {line}")]
    UnterminatedQuote { line: usize },
    #[error("unterminated parenthesis opened on line {line}")]
    UnterminatedParenthesis { line: usize },
    #[error("line {line}: Nested parentheses not allowed")]
    NestedParenthesis { line: usize },
    #[error("line {line}: closing parenthesis without matching open")]
    UnmatchedCloseParenthesis { line: usize },
    /// Owner name omitted before any owner was established
    #[error("line {line}: record has no owner name and none was given before")]
    MissingOwner { line: usize },
    #[error("line {line}: no TTL given and no default TTL in effect")]
    MissingTtl { line: usize },
    #[error("line {line}: no class given and no default class in effect")]
    MissingClass { line: usize },
    /// $INCLUDE is recognized but file inclusion is not performed
    #[error("line {line}: $INCLUDE {path} is not supported")]
    IncludeUnsupported { line: usize, path: String },
    #[error("line {line}: read error: {message}")]
    Io { line: usize, message: String },
}

impl ZoneError {
    /// Line number the error refers to
    pub fn line(&self) -> usize {
        match self {
            Self::MalformedTtl { line, .. }
            | Self::UnknownClass { line, .. }
            | Self::UnknownRecordType { line, .. }
            | Self::SyntaxError { line, .. }
            | Self::UnterminatedQuote { line }
            | Self::UnterminatedParenthesis { line }
            | Self::NestedParenthesis { line }
            | Self::UnmatchedCloseParenthesis { line }
            | Self::MissingOwner { line }
            | Self::MissingTtl { line }
            | Self::MissingClass { line }
            | Self::IncludeUnsupported { line, .. }
            | Self::Io { line, .. } => *line,
        }
    }

    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::SyntaxError {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ZoneError>;
