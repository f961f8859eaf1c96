//! Purpose: Pluggable JSON serialization seam used by the `jsonseam` CLI and applications.
//! Exports: `api` (contract, decode helper, default adapter, engines, errors).
//! Role: Keeps application code independent of the JSON library doing the work.
//! Invariants: Every encode/decode is synchronous and owns its buffers for one call only.
//! Invariants: The library never installs a tracing subscriber; binaries do.
pub mod api;
pub mod core;
pub mod json;
