//! Purpose: The serializer contract every JSON backend adapter fulfils.
//! Exports: `JsonSerializer`.
//! Role: Decouples callers from the JSON library doing the grammar work.
//! Invariants: `encode` never mutates its input; `decode` never returns partial values.
//! Invariants: Implementations are stateless per call and safe to share across threads.
use serde::Serialize;

use crate::core::error::Error;
use crate::core::target::{Decoded, TargetType};

pub trait JsonSerializer: Send + Sync {
    /// Encode `value` as JSON text.
    ///
    /// Fails with `ErrorKind::Encoding` when the backend cannot represent the value.
    fn encode<T>(&self, value: &T) -> Result<String, Error>
    where
        T: Serialize + ?Sized;

    /// Decode `text` into the type described by `target`.
    ///
    /// Fails with `ErrorKind::Decoding` for malformed text and
    /// `ErrorKind::TypeMismatch` when well-formed text does not fit `target`.
    fn decode(&self, text: &str, target: TargetType) -> Result<Decoded, Error>;
}

impl<S> JsonSerializer for &S
where
    S: JsonSerializer,
{
    fn encode<T>(&self, value: &T) -> Result<String, Error>
    where
        T: Serialize + ?Sized,
    {
        (**self).encode(value)
    }

    fn decode(&self, text: &str, target: TargetType) -> Result<Decoded, Error> {
        (**self).decode(text, target)
    }
}
