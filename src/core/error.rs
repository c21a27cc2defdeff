use std::fmt;

/// The closed set of failure categories the pipeline can produce.
///
/// `LookupMiss` and `Empty` are recovered locally by callers; every other
/// kind is fatal to the operation that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    Io,
    Encoding,
    LookupMiss,
    Empty,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: impl Into<String>) -> Self {
        Error {
            kind,
            context: context.into(),
        }
    }

    /// A fatal parse/format error, stamped with the byte offset it was found at.
    pub fn format_at(offset: u64, context: impl Into<String>) -> Self {
        Error::new(
            ErrorKind::Format,
            format!("at byte offset {offset}: {}", context.into()),
        )
    }

    pub fn empty_query() -> Self {
        Error::new(ErrorKind::Empty, "query has no resolvable terms")
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.context)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::new(ErrorKind::Io, err.to_string())
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::new(ErrorKind::Encoding, err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::new(ErrorKind::Encoding, err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_kind_and_context() {
        let err = Error::new(ErrorKind::Format, "bad tag");
        assert_eq!(format!("{err}"), "Format: bad tag");
    }

    #[test]
    fn format_at_embeds_offset() {
        let err = Error::format_at(42, "missing </DOC>");
        assert!(err.context.contains("42"));
        assert_eq!(err.kind, ErrorKind::Format);
    }
}
