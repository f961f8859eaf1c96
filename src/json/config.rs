//! Purpose: Engine configuration shared by every JSON backend.
//! Exports: `EngineConfig`, `EngineKind`, env variable names.
//! Role: One place for output formatting and null handling knobs.
//! Invariants: Defaults produce compact, deterministic output from the serde backend.
//! Invariants: Environment parsing rejects unknown values instead of guessing.
use crate::core::error::{Error, ErrorKind};

pub const ENV_ENGINE: &str = "JSONSEAM_ENGINE";
pub const ENV_PRETTY: &str = "JSONSEAM_PRETTY";
pub const ENV_INDENT: &str = "JSONSEAM_INDENT";
pub const ENV_OMIT_NULLS: &str = "JSONSEAM_OMIT_NULLS";

pub const DEFAULT_INDENT: usize = 2;
pub const MAX_INDENT: usize = 16;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum EngineKind {
    #[default]
    Serde,
    Simd,
}

impl EngineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EngineKind::Serde => "serde",
            EngineKind::Simd => "simd",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "serde" | "serde_json" => Some(EngineKind::Serde),
            "simd" | "simd-json" | "simd_json" => Some(EngineKind::Simd),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EngineConfig {
    pub kind: EngineKind,
    pub pretty: bool,
    pub indent: usize,
    pub omit_nulls: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: EngineKind::Serde,
            pretty: false,
            indent: DEFAULT_INDENT,
            omit_nulls: false,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with `JSONSEAM_*` environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_ENGINE) {
            config.kind = EngineKind::parse(&value).ok_or_else(|| {
                env_error(ENV_ENGINE, &value).with_hint("Use `serde` or `simd`.")
            })?;
        }
        if let Some(value) = lookup(ENV_PRETTY) {
            config.pretty = parse_flag(ENV_PRETTY, &value)?;
        }
        if let Some(value) = lookup(ENV_OMIT_NULLS) {
            config.omit_nulls = parse_flag(ENV_OMIT_NULLS, &value)?;
        }
        if let Some(value) = lookup(ENV_INDENT) {
            config.indent = parse_indent(&value)?;
        }
        Ok(config)
    }

    pub fn with_kind(mut self, kind: EngineKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent.min(MAX_INDENT);
        self
    }

    pub fn with_omit_nulls(mut self, omit_nulls: bool) -> Self {
        self.omit_nulls = omit_nulls;
        self
    }
}

fn env_error(name: &str, value: &str) -> Error {
    Error::new(ErrorKind::Usage).with_message(format!("invalid value {value:?} for {name}"))
}

fn parse_flag(name: &str, value: &str) -> Result<bool, Error> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(env_error(name, value).with_hint("Use 1/0, true/false, yes/no, or on/off.")),
    }
}

fn parse_indent(value: &str) -> Result<usize, Error> {
    match value.trim().parse::<usize>() {
        Ok(indent) if indent <= MAX_INDENT => Ok(indent),
        _ => Err(env_error(ENV_INDENT, value)
            .with_hint(format!("Use an integer between 0 and {MAX_INDENT}."))),
    }
}
