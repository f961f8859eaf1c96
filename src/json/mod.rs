//! Purpose: JSON backend boundary: engine contract, shipped engines, engine config.
//! Exports: `JsonEngine`, `EngineError`, `Engine`, `SerdeJsonEngine`, `SimdJsonEngine`, config types.
//! Role: Single seam for JSON library usage so adapters never touch a parser directly.
//! Invariants: Engines are stateless per call; config is fixed at construction.
//! Invariants: Null omission removes object members only, never array elements.

pub mod config;
pub mod engine;
pub mod serde_engine;
pub mod simd_engine;

use std::io::{Read, Write};

use serde::Serialize;
use serde::de::DeserializeSeed;
use serde_json::Value;

use config::{EngineConfig, EngineKind};
use engine::{EngineError, JsonEngine};
use serde_engine::SerdeJsonEngine;
use simd_engine::SimdJsonEngine;

/// Engine selected at runtime from an `EngineConfig`.
#[derive(Clone, Debug)]
pub enum Engine {
    Serde(SerdeJsonEngine),
    Simd(SimdJsonEngine),
}

impl Engine {
    pub fn from_config(config: EngineConfig) -> Self {
        match config.kind {
            EngineKind::Serde => Engine::Serde(SerdeJsonEngine::new(config)),
            EngineKind::Simd => Engine::Simd(SimdJsonEngine::new(config)),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        match self {
            Engine::Serde(engine) => engine.config(),
            Engine::Simd(engine) => engine.config(),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::from_config(EngineConfig::default())
    }
}

impl JsonEngine for Engine {
    fn name(&self) -> &'static str {
        match self {
            Engine::Serde(engine) => engine.name(),
            Engine::Simd(engine) => engine.name(),
        }
    }

    fn serialize<W, T>(&self, writer: &mut W, value: &T) -> Result<(), EngineError>
    where
        W: Write,
        T: Serialize + ?Sized,
    {
        match self {
            Engine::Serde(engine) => engine.serialize(writer, value),
            Engine::Simd(engine) => engine.serialize(writer, value),
        }
    }

    fn deserialize_seed<R, S, V>(&self, reader: R, seed: S) -> Result<V, EngineError>
    where
        R: Read,
        S: for<'de> DeserializeSeed<'de, Value = V>,
    {
        match self {
            Engine::Serde(engine) => engine.deserialize_seed(reader, seed),
            Engine::Simd(engine) => engine.deserialize_seed(reader, seed),
        }
    }
}

/// Lift `value` into a document tree with `null` object members removed.
pub(crate) fn without_nulls<T>(value: &T) -> Result<Value, serde_json::Error>
where
    T: Serialize + ?Sized,
{
    let mut document = serde_json::to_value(value)?;
    strip_nulls(&mut document);
    Ok(document)
}

fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, member| !member.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}
