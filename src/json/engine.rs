//! Purpose: Outbound contract the serializer adapter needs from a JSON library.
//! Exports: `JsonEngine`, `EngineError`.
//! Role: Narrow waist between adapter-owned buffers and third-party parsers/printers.
//! Invariants: Engines read and write through caller-provided scoped streams only.
//! Invariants: Engines keep configuration immutable after construction.
use std::error::Error as StdError;
use std::fmt;
use std::io::{self, Read, Write};
use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::{DeserializeOwned, DeserializeSeed};

use crate::core::error::Position;

pub trait JsonEngine: Send + Sync {
    /// Short label used in diagnostics.
    fn name(&self) -> &'static str;

    fn serialize<W, T>(&self, writer: &mut W, value: &T) -> Result<(), EngineError>
    where
        W: Write,
        T: Serialize + ?Sized;

    /// Parse one complete document from `reader`, driving `seed` directly.
    ///
    /// Grammar failures and failures raised by `seed` both surface here; the
    /// engine does not build an intermediate tree.
    fn deserialize_seed<R, S, V>(&self, reader: R, seed: S) -> Result<V, EngineError>
    where
        R: Read,
        S: for<'de> DeserializeSeed<'de, Value = V>;

    fn deserialize<R, T>(&self, reader: R) -> Result<T, EngineError>
    where
        R: Read,
        T: DeserializeOwned,
    {
        self.deserialize_seed(reader, PhantomData::<T>)
    }
}

impl<E> JsonEngine for Arc<E>
where
    E: JsonEngine,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn serialize<W, T>(&self, writer: &mut W, value: &T) -> Result<(), EngineError>
    where
        W: Write,
        T: Serialize + ?Sized,
    {
        (**self).serialize(writer, value)
    }

    fn deserialize_seed<R, S, V>(&self, reader: R, seed: S) -> Result<V, EngineError>
    where
        R: Read,
        S: for<'de> DeserializeSeed<'de, Value = V>,
    {
        (**self).deserialize_seed(reader, seed)
    }
}

/// Failure reported by an engine, with a position when the engine knows one.
#[derive(Debug)]
pub struct EngineError {
    message: String,
    position: Option<Position>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
            source: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn position(&self) -> Option<Position> {
        self.position
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

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for EngineError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        let mut out = EngineError::new(err.to_string());
        // serde_json reports 0/0 when no input position applies (e.g. serializer errors).
        if err.line() > 0 {
            out = out.with_position(Position {
                line: err.line(),
                column: err.column(),
            });
        }
        out.with_source(err)
    }
}

impl From<simd_json::Error> for EngineError {
    fn from(err: simd_json::Error) -> Self {
        EngineError::new(err.to_string()).with_source(err)
    }
}

impl From<io::Error> for EngineError {
    fn from(err: io::Error) -> Self {
        EngineError::new(format!("stream error: {err}")).with_source(err)
    }
}
