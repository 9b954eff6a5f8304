use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeqError {
    /// Checked integer arithmetic left the `i64` range.
    Overflow(&'static str),
    /// A transform divided by a zero term.
    DivisionByZero,
    /// A comma-separated field that is not an integer.
    InvalidTerm(String),
    /// Fewer terms than a prediction needs.
    TooShort { len: usize, min: usize },
}

impl fmt::Display for SeqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeqError::Overflow(op) => write!(f, "integer overflow in {op}"),
            SeqError::DivisionByZero => write!(f, "division by zero"),
            SeqError::InvalidTerm(term) => write!(f, "invalid term: {term:?}"),
            SeqError::TooShort { len, min } => {
                write!(f, "sequence has {len} terms, need at least {min}")
            }
        }
    }
}

impl std::error::Error for SeqError {}

pub type Result<T> = std::result::Result<T, SeqError>;
