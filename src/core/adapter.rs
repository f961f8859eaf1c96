//! Purpose: Default `JsonSerializer` that delegates grammar work to an injected engine.
//! Exports: `EngineSerializer`.
//! Role: Owns per-call buffers and maps engine failures onto the seam's error kinds.
//! Invariants: Writers are flushed and dropped before their buffer is read back.
//! Invariants: Buffers, writers, and readers never outlive a single call.
//! Invariants: The engine decodes straight into the target; no intermediate tree.
//! Invariants: A failed decode is `Decoding` only when the text itself is malformed.
//! Invariants: Failures are returned as-is; nothing here logs, retries, or caches.
use std::io::{BufReader, BufWriter, Cursor, Write};

use serde::Serialize;
use serde::de::IgnoredAny;

use crate::core::contract::JsonSerializer;
use crate::core::error::{Error, ErrorKind, Position};
use crate::core::target::{Decoded, TargetType};
use crate::json::engine::{EngineError, JsonEngine};

#[derive(Clone, Debug, Default)]
pub struct EngineSerializer<E> {
    engine: E,
}

impl<E: JsonEngine> EngineSerializer<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }
}

impl<E: JsonEngine> JsonSerializer for EngineSerializer<E> {
    fn encode<T>(&self, value: &T) -> Result<String, Error>
    where
        T: Serialize + ?Sized,
    {
        let mut buffer = Vec::new();
        {
            let mut writer = BufWriter::new(&mut buffer);
            self.engine
                .serialize(&mut writer, value)
                .map_err(|err| encoding_error(self.engine.name(), err))?;
            writer.flush().map_err(|err| {
                Error::new(ErrorKind::Encoding)
                    .with_message("failed to flush encoded output")
                    .with_source(err)
            })?;
        }

        let text = String::from_utf8(buffer).map_err(|err| {
            Error::new(ErrorKind::Encoding)
                .with_message(format!("{} produced non-UTF-8 output", self.engine.name()))
                .with_source(err)
        })?;
        tracing::trace!(engine = self.engine.name(), bytes = text.len(), "encoded value");
        Ok(text)
    }

    fn decode(&self, text: &str, target: TargetType) -> Result<Decoded, Error> {
        let decoded = self
            .engine
            .deserialize_seed(scoped_reader(text), target)
            .map_err(|err| self.decode_failure(text, target, err))?;
        tracing::trace!(
            engine = self.engine.name(),
            bytes = text.len(),
            target = target.name(),
            "decoded value"
        );
        Ok(decoded)
    }
}

impl<E: JsonEngine> EngineSerializer<E> {
    /// Split a failed decode into malformed text versus a well-formed document of the wrong shape.
    fn decode_failure(&self, text: &str, target: TargetType, err: EngineError) -> Error {
        match self.engine.deserialize::<_, IgnoredAny>(scoped_reader(text)) {
            Ok(_) => Error::new(ErrorKind::TypeMismatch)
                .with_message(format!("{}: {}", self.engine.name(), err.message()))
                .with_type_name(target.name())
                .with_fragment(text)
                .with_source(err),
            Err(grammar) => decoding_error(self.engine.name(), text, grammar),
        }
    }
}

fn scoped_reader(text: &str) -> BufReader<Cursor<&[u8]>> {
    BufReader::new(Cursor::new(text.as_bytes()))
}

fn encoding_error(engine: &str, err: EngineError) -> Error {
    Error::new(ErrorKind::Encoding)
        .with_message(format!("{engine}: {}", err.message()))
        .with_source(err)
}

fn decoding_error(engine: &str, text: &str, err: EngineError) -> Error {
    let mut out = Error::new(ErrorKind::Decoding)
        .with_message(format!("{engine}: {}", err.message()))
        .with_fragment(fragment_at(text, err.position()));
    if let Some(position) = err.position() {
        out = out.with_position(position);
    }
    out.with_source(err)
}

/// Slice of `text` starting a few characters before `position` (or at the start).
fn fragment_at(text: &str, position: Option<Position>) -> &str {
    const LEAD: usize = 8;
    let Some(position) = position else {
        return text;
    };
    let Some(line) = text.split('\n').nth(position.line.saturating_sub(1)) else {
        return text;
    };
    let start = position.column.saturating_sub(1 + LEAD);
    match line.char_indices().nth(start) {
        Some((offset, _)) => &line[offset..],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::{EngineSerializer, fragment_at};
    use crate::core::contract::JsonSerializer;
    use crate::core::error::{ErrorKind, Position};
    use crate::core::target::TargetType;
    use crate::json::engine::{EngineError, JsonEngine};
    use crate::json::serde_engine::SerdeJsonEngine;
    use serde::Deserialize;
    use serde::Serialize;
    use serde::de::DeserializeSeed;
    use std::io::{Read, Write};

    // Writes half its payload then fails, to prove partial output is discarded.
    struct Truncating;

    impl JsonEngine for Truncating {
        fn name(&self) -> &'static str {
            "truncating"
        }

        fn serialize<W, T>(&self, writer: &mut W, _value: &T) -> Result<(), EngineError>
        where
            W: Write,
            T: Serialize + ?Sized,
        {
            writer.write_all(b"{\"partial\":")?;
            Err(EngineError::new("gave up"))
        }

        fn deserialize_seed<R, S, V>(&self, _reader: R, _seed: S) -> Result<V, EngineError>
        where
            R: Read,
            S: for<'de> DeserializeSeed<'de, Value = V>,
        {
            Err(EngineError::new("unsupported"))
        }
    }

    #[test]
    fn engine_failure_is_encoding_error_without_partial_text() {
        let serializer = EngineSerializer::new(Truncating);
        let err = serializer.encode(&1u8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
        assert_eq!(err.message(), Some("truncating: gave up"));
    }

    #[test]
    fn engine_read_failure_is_decoding_error() {
        let serializer = EngineSerializer::new(Truncating);
        let err = serializer
            .decode("{}", TargetType::of::<serde_json::Value>())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decoding);
        assert_eq!(err.fragment(), Some("{}"));
    }

    #[test]
    fn decode_reports_position_and_fragment() {
        let serializer = EngineSerializer::new(SerdeJsonEngine::default());
        let err = serializer
            .decode("[1, 2,\n  oops]", TargetType::of::<Vec<u8>>())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decoding);
        assert_eq!(err.position().map(|p| p.line), Some(2));
        assert!(err.fragment().unwrap_or_default().contains("oops"));
    }

    #[test]
    fn type_mismatch_names_target() {
        let serializer = EngineSerializer::new(SerdeJsonEngine::default());
        let err = serializer
            .decode(r#"{"x":1}"#, TargetType::of::<String>())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.type_name(), Some(std::any::type_name::<String>()));
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn wide_integers_decode_without_precision_loss() {
        let serializer = EngineSerializer::new(SerdeJsonEngine::default());
        let text = serializer.encode(&u128::MAX).expect("encode");
        let decoded = serializer
            .decode(&text, TargetType::of::<u128>())
            .expect("decode");
        assert_eq!(*decoded.downcast::<u128>().expect("u128"), u128::MAX);
    }

    #[test]
    fn duplicate_fields_are_type_mismatch() {
        let serializer = EngineSerializer::new(SerdeJsonEngine::default());
        let err = serializer
            .decode(r#"{"name":"a","name":"b"}"#, TargetType::of::<Named>())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert!(err.message().unwrap_or_default().contains("duplicate field"));
    }

    #[test]
    fn malformed_text_inside_typed_decode_is_decoding() {
        let serializer = EngineSerializer::new(SerdeJsonEngine::default());
        let err = serializer
            .decode(r#"{"name": oops}"#, TargetType::of::<Named>())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decoding);
        assert!(err.position().is_some());
    }

    #[test]
    fn fragment_starts_near_column() {
        let text = "{\"a\": 1, \"b\": nope}";
        let fragment = fragment_at(text, Some(Position { line: 1, column: 16 }));
        assert!(fragment.contains("nope"));
        assert!(fragment.len() < text.len());
        assert_eq!(fragment_at(text, None), text);
    }
}
