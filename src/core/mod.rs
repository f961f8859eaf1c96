// Serializer contract, runtime type handles, the default adapter, and errors.
pub mod adapter;
pub mod contract;
pub mod error;
pub mod helper;
pub mod target;
