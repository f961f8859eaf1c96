//! Purpose: Runtime type handle used to pick a decode target without generics.
//! Exports: `TargetType`, `Decoded`.
//! Role: Seed handed to an engine so it decodes straight into the described type.
//! Invariants: Identity is the `TypeId`; the name is diagnostic only.
//! Invariants: Decoding never coerces; shape mismatch is an error from the type itself.
use std::any::{Any, TypeId};
use std::fmt;

use serde::de::{Deserialize, DeserializeOwned, DeserializeSeed, Deserializer};

/// Type-erased result of a runtime-typed decode.
pub type Decoded = Box<dyn Any + Send>;

type DecodeFn =
    fn(deserializer: &mut dyn erased_serde::Deserializer) -> Result<Decoded, erased_serde::Error>;

#[derive(Clone, Copy)]
pub struct TargetType {
    name: &'static str,
    id: TypeId,
    decode: DecodeFn,
}

impl TargetType {
    pub fn of<T>() -> Self
    where
        T: DeserializeOwned + Send + 'static,
    {
        Self {
            name: std::any::type_name::<T>(),
            id: TypeId::of::<T>(),
            decode: decode_erased::<T>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

fn decode_erased<T>(
    deserializer: &mut dyn erased_serde::Deserializer,
) -> Result<Decoded, erased_serde::Error>
where
    T: DeserializeOwned + Send + 'static,
{
    let value: Decoded = Box::new(T::deserialize(deserializer)?);
    Ok(value)
}

impl<'de> DeserializeSeed<'de> for TargetType {
    type Value = Decoded;

    fn deserialize<D>(self, deserializer: D) -> Result<Decoded, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut erased = <dyn erased_serde::Deserializer>::erase(deserializer);
        (self.decode)(&mut erased).map_err(<D::Error as serde::de::Error>::custom)
    }
}

impl PartialEq for TargetType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TargetType {}

impl fmt::Debug for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetType").field("name", &self.name).finish()
    }
}
