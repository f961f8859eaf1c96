//! Purpose: Define the stable public Rust API boundary for jsonseam.
//! Exports: Serializer contract, decode helper, default adapter, engines, errors.
//! Role: Public, additive-only surface; callers should not reach into `core`/`json` paths.
//! Invariants: Everything an application needs to encode/decode is re-exported here.
//! Invariants: Engine internals (null stripping, stream layering) stay private.

pub use crate::core::adapter::EngineSerializer;
pub use crate::core::contract::JsonSerializer;
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind, Position};
pub use crate::core::helper::{JsonSerializerExt, decode_as};
pub use crate::core::target::{Decoded, TargetType};
pub use crate::json::Engine;
pub use crate::json::config::{EngineConfig, EngineKind, MAX_INDENT};
pub use crate::json::engine::{EngineError, JsonEngine};
pub use crate::json::serde_engine::SerdeJsonEngine;
pub use crate::json::simd_engine::SimdJsonEngine;

/// Adapter over the runtime-selected engine.
pub type DefaultSerializer = EngineSerializer<Engine>;

/// Build the default adapter for `config`.
pub fn serializer(config: EngineConfig) -> DefaultSerializer {
    EngineSerializer::new(Engine::from_config(config))
}
