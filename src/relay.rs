//! Purpose: Forward line-delimited message bodies to a sink without parsing them.
//! Exports: `RelayConfig`, `RelayOutcome`, `relay`.
//! Role: Stand-in for a queue trigger: one line in, one logged body out.
//! Invariants: Bodies are passed through as text; no JSON decoding happens here.
//! Invariants: Per-body output is capped at `max_body_bytes` on a char boundary.
//! Invariants: At most `max_body_bytes + 1` bytes of a line are buffered; the rest is skipped.
use std::io::{self, BufRead, Read};

use bstr::ByteSlice;
use jsonseam::api::{Error, ErrorKind};

pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Copy, Clone, Debug)]
pub struct RelayConfig {
    pub max_body_bytes: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RelayOutcome {
    pub relayed: u64,
    pub truncated: u64,
}

fn io_error(err: io::Error) -> Error {
    Error::new(ErrorKind::Io)
        .with_message("failed to read message stream")
        .with_source(err)
}

pub fn relay<R, F>(mut reader: R, config: RelayConfig, mut on_body: F) -> Result<RelayOutcome, Error>
where
    R: BufRead,
    F: FnMut(&str),
{
    let mut outcome = RelayOutcome::default();
    let mut line = Vec::new();
    let cap = u64::try_from(config.max_body_bytes)
        .unwrap_or(u64::MAX)
        .saturating_add(1);
    loop {
        line.clear();
        let read = (&mut reader)
            .take(cap)
            .read_until(b'\n', &mut line)
            .map_err(io_error)?;
        if read == 0 {
            break;
        }
        if line.last() != Some(&b'\n') {
            reader.skip_until(b'\n').map_err(io_error)?;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let body = trimmed.to_str_lossy();
        let (body, clipped) = clip(&body, config.max_body_bytes);
        if clipped {
            outcome.truncated += 1;
        }
        on_body(body);
        outcome.relayed += 1;
    }
    Ok(outcome)
}

fn clip(body: &str, max_bytes: usize) -> (&str, bool) {
    if body.len() <= max_bytes {
        return (body, false);
    }
    let mut end = max_bytes;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    (&body[..end], true)
}
