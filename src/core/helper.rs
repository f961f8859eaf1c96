//! Purpose: Statically typed decoding on top of the runtime-typed contract.
//! Exports: `decode_as`, `JsonSerializerExt`.
//! Role: Saves callers from building a `TargetType` at every call site.
//! Invariants: A missing serializer fails before any decode attempt.
//! Invariants: A decoded value of the wrong type is reported as `TypeMismatch`.
use serde::de::DeserializeOwned;

use crate::core::contract::JsonSerializer;
use crate::core::error::{Error, ErrorKind};
use crate::core::target::TargetType;

/// Decode `text` as `T` through `serializer`.
///
/// `None` stands in for an absent serializer and yields `InvalidArgument`.
pub fn decode_as<T, S>(serializer: Option<&S>, text: &str) -> Result<T, Error>
where
    T: DeserializeOwned + Send + 'static,
    S: JsonSerializer,
{
    let Some(serializer) = serializer else {
        return Err(Error::new(ErrorKind::InvalidArgument)
            .with_message("serializer is required")
            .with_type_name(std::any::type_name::<T>()));
    };

    let target = TargetType::of::<T>();
    let decoded = serializer.decode(text, target)?;
    decoded.downcast::<T>().map(|value| *value).map_err(|_| {
        Error::new(ErrorKind::TypeMismatch)
            .with_message("decoded value is not of the requested type")
            .with_type_name(target.name())
    })
}

pub trait JsonSerializerExt: JsonSerializer {
    fn decode_as<T>(&self, text: &str) -> Result<T, Error>
    where
        T: DeserializeOwned + Send + 'static,
        Self: Sized,
    {
        decode_as(Some(self), text)
    }
}

impl<S: JsonSerializer> JsonSerializerExt for S {}
