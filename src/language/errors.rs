macro_rules! parse_error {
    ($position:expr, $($arg:tt)*) => (
        Err($crate::language::errors::ParseError::new($position, format!($($arg)*)))
    )
}

/// A syntax error, carrying the byte offset in the source where it was found.
#[derive(PartialEq, Debug, Clone, thiserror::Error)]
#[error("Syntax Error: {description} at location {position}")]
pub struct ParseError {
    pub description: String,
    pub position: usize,
}

impl ParseError {
    pub fn new(position: usize, msg: String) -> ParseError {
        ParseError {
            description: msg,
            position: position,
        }
    }
}
