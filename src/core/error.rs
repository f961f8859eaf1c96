//! Purpose: Define the single error type shared by the serializer seam and the CLI.
//! Exports: `Error`, `ErrorKind`, `Position`, `to_exit_code`.
//! Role: Carry failure kind plus optional decode context (type, fragment, position).
//! Invariants: Kinds map 1:1 onto stable exit codes.
//! Invariants: Errors never hold partial decode results, only diagnostics.
use std::error::Error as StdError;
use std::fmt;

const FRAGMENT_MAX_CHARS: usize = 32;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    InvalidArgument,
    Encoding,
    Decoding,
    TypeMismatch,
    Usage,
    Io,
}

/// One-based line/column reported by an engine.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    hint: Option<String>,
    type_name: Option<&'static str>,
    fragment: Option<String>,
    position: Option<Position>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            hint: None,
            type_name: None,
            fragment: None,
            position: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn type_name(&self) -> Option<&'static str> {
        self.type_name
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_type_name(mut self, type_name: &'static str) -> Self {
        self.type_name = Some(type_name);
        self
    }

    /// Attach the offending slice of input, clipped to a short window.
    pub fn with_fragment(mut self, fragment: impl AsRef<str>) -> Self {
        self.fragment = Some(clip(fragment.as_ref()));
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

fn clip(text: &str) -> String {
    let mut chars = text.chars();
    let clipped: String = chars.by_ref().take(FRAGMENT_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{clipped}…")
    } else {
        clipped
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(type_name) = self.type_name {
            write!(f, " (type: {type_name})")?;
        }
        if let Some(position) = self.position {
            write!(f, " (line: {}, column: {})", position.line, position.column)?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, " (near: {fragment:?})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Usage => 2,
        ErrorKind::InvalidArgument => 3,
        ErrorKind::Encoding => 4,
        ErrorKind::Decoding => 5,
        ErrorKind::TypeMismatch => 6,
        ErrorKind::Io => 7,
    }
}
