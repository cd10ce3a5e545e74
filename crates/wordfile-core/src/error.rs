use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at character {offset}")]
/// A directive-grammar violation at a character offset in the source.
///
/// In strict parsing the first `ParseError` is fatal; in lenient parsing it is
/// logged and parsing resumes at the next line boundary unless no forward
/// progress can be made.
pub struct ParseError {
    /// Human-readable description naming the expected follow tokens.
    pub message: String,
    /// Character offset into the wordfile source where the error occurred.
    pub offset: usize,
}

impl ParseError {
    /// Create a parse error from a message and a character offset.
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

#[derive(Debug, Error)]
/// Errors produced while loading and parsing wordfiles.
pub enum WordfileError {
    #[error(transparent)]
    /// The wordfile source violated the directive grammar.
    Parse(#[from] ParseError),

    #[error("I/O error: {0}")]
    /// The wordfile source could not be read.
    Io(#[from] std::io::Error),
}
