//! Purpose: `simd-json`-backed engine.
//! Exports: `SimdJsonEngine`.
//! Role: Alternate backend for large payloads; same contract as the serde engine.
//! Invariants: Input is copied once into an owned buffer (simd-json parses in place).
//! Notes: simd-json fixes its own pretty indent; `EngineConfig::indent` is ignored here.
use std::io::{Read, Write};

use serde::Serialize;
use serde::de::DeserializeSeed;

use crate::json::config::EngineConfig;
use crate::json::engine::{EngineError, JsonEngine};
use crate::json::without_nulls;

#[derive(Clone, Debug, Default)]
pub struct SimdJsonEngine {
    config: EngineConfig,
}

impl SimdJsonEngine {
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
            simd_json::serde::to_writer_pretty(writer, value)?;
        } else {
            simd_json::serde::to_writer(writer, value)?;
        }
        Ok(())
    }
}

impl JsonEngine for SimdJsonEngine {
    fn name(&self) -> &'static str {
        "simd-json"
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

    fn deserialize_seed<R, S, V>(&self, mut reader: R, seed: S) -> Result<V, EngineError>
    where
        R: Read,
        S: for<'de> DeserializeSeed<'de, Value = V>,
    {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let mut deserializer = simd_json::Deserializer::from_slice(&mut bytes)?;
        Ok(seed.deserialize(&mut deserializer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::SimdJsonEngine;
    use crate::json::engine::JsonEngine;
    use serde_json::{Value, json};

    #[test]
    fn parses_into_serde_json_values() {
        let engine = SimdJsonEngine::default();
        let value: Value = engine
            .deserialize(r#"{"a":[1,2,{"b":null}]}"#.as_bytes())
            .expect("parse");
        assert_eq!(value, json!({"a": [1, 2, {"b": null}]}));
    }

    #[test]
    fn rejects_malformed_input() {
        let engine = SimdJsonEngine::default();
        assert!(engine.deserialize::<_, Value>("{not json".as_bytes()).is_err());
        assert!(engine.deserialize::<_, Value>("".as_bytes()).is_err());
    }

    #[test]
    fn compact_output_matches_serde_json() {
        let engine = SimdJsonEngine::default();
        let value = json!({"name": "A", "tags": ["x", "y"], "n": 3});
        let mut out = Vec::new();
        engine.serialize(&mut out, &value).expect("serialize");
        let reparsed: Value = serde_json::from_slice(&out).expect("reparse");
        assert_eq!(reparsed, value);
    }
}
