//! Purpose: `serde_json`-backed engine.
//! Exports: `SerdeJsonEngine`.
//! Role: Default backend; streams straight to and from the adapter's buffers.
//! Invariants: Compact output unless `pretty`; pretty output honours `indent`.
use std::io::{Read, Write};

use serde::Serialize;
use serde::de::DeserializeSeed;
use serde_json::ser::PrettyFormatter;

use crate::json::config::EngineConfig;
use crate::json::engine::{EngineError, JsonEngine};
use crate::json::without_nulls;

#[derive(Clone, Debug, Default)]
pub struct SerdeJsonEngine {
    config: EngineConfig,
}

impl SerdeJsonEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), EngineError>
    where
        W: Write,
        T: Serialize + ?Sized,
    {
        if self.config.pretty {
            let indent = vec![b' '; self.config.indent];
            let formatter = PrettyFormatter::with_indent(&indent);
            let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
            value.serialize(&mut serializer)?;
        } else {
            serde_json::to_writer(writer, value)?;
        }
        Ok(())
    }
}

impl JsonEngine for SerdeJsonEngine {
    fn name(&self) -> &'static str {
        "serde_json"
    }

    fn serialize<W, T>(&self, writer: &mut W, value: &T) -> Result<(), EngineError>
    where
        W: Write,
        T: Serialize + ?Sized,
    {
        if self.config.omit_nulls {
            let document = without_nulls(value)?;
            return self.write(writer, &document);
        }
        self.write(writer, value)
    }

    fn deserialize_seed<R, S, V>(&self, reader: R, seed: S) -> Result<V, EngineError>
    where
        R: Read,
        S: for<'de> DeserializeSeed<'de, Value = V>,
    {
        let mut deserializer = serde_json::Deserializer::from_reader(reader);
        let value = seed.deserialize(&mut deserializer)?;
        deserializer.end()?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::SerdeJsonEngine;
    use crate::json::config::EngineConfig;
    use crate::json::engine::JsonEngine;
    use serde_json::{Value, json};

    fn render(engine: &SerdeJsonEngine, value: &Value) -> String {
        let mut out = Vec::new();
        engine.serialize(&mut out, value).expect("serialize");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn compact_by_default() {
        let engine = SerdeJsonEngine::default();
        assert_eq!(render(&engine, &json!({"a": [1, 2]})), r#"{"a":[1,2]}"#);
    }

    #[test]
    fn pretty_uses_configured_indent() {
        let engine = SerdeJsonEngine::new(EngineConfig::new().with_pretty(true).with_indent(4));
        assert_eq!(render(&engine, &json!({"a": 1})), "{\n    \"a\": 1\n}");
    }

    #[test]
    fn wide_integers_decode_without_precision_loss() {
        let engine = SerdeJsonEngine::default();
        let text = u128::MAX.to_string();
        let value: u128 = engine.deserialize(text.as_bytes()).expect("u128");
        assert_eq!(value, u128::MAX);
    }

    #[test]
    fn reader_rejects_trailing_garbage() {
        let engine = SerdeJsonEngine::default();
        let result = engine.deserialize::<_, Value>("{} x".as_bytes());
        assert!(result.is_err());
    }
}
