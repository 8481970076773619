use crate::line::LineError;
use thiserror::Error;

/// Failure of a whole parse call. No partial results accompany it.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed benchmark at line {line}: {source}: {text:?}")]
    Line {
        line: usize,
        text: String,
        #[source]
        source: LineError,
    },
}

impl ParseError {
    /// Line number of the offending input, if the error came from a line.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Line { line, .. } => Some(*line),
            ParseError::Io(_) => None,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
