//! Purpose: `jsonseam` CLI entry point and command dispatch.
//! Role: Binary crate root; parses args, builds the serializer, runs commands.
//! Invariants: stdout carries only command output (JSON); logs and errors go to stderr.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
//! Invariants: All JSON work goes through `api::JsonSerializer`, never a parser directly.
#![allow(clippy::result_large_err)]
use std::error::Error as StdError;
use std::fs::File;
use std::io::{self, BufReader, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::{
    CommandFactory, Parser, Subcommand, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind,
};
use clap_complete::aot::Shell;
use jsonseam::api::{
    DefaultSerializer, EngineConfig, EngineKind, Error, ErrorKind, JsonSerializer,
    JsonSerializerExt, MAX_INDENT, serializer, to_exit_code,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value, json};
use tracing_subscriber::EnvFilter;

mod relay;

use relay::{DEFAULT_MAX_BODY_BYTES, RelayConfig, relay};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(clap_error_summary(&err))
                        .with_hint("Try `jsonseam --help`."),
                    ColorMode::Auto,
                ));
            }
        },
    };

    init_tracing();
    let color_mode = cli.color;
    let config = engine_config(&cli).map_err(|err| (err, color_mode))?;
    dispatch_command(cli.command, config).map_err(|err| (err, color_mode))
}

#[derive(Parser)]
#[command(
    name = "jsonseam",
    version,
    about = "Encode, decode, and relay JSON through a pluggable engine",
    after_help = r#"ENVIRONMENT
  JSONSEAM_ENGINE       serde | simd
  JSONSEAM_PRETTY       1/0
  JSONSEAM_INDENT       0..16
  JSONSEAM_OMIT_NULLS   1/0
  RUST_LOG              log filter (default: info)

Flags override environment values."#
)]
struct Cli {
    #[arg(long, value_enum, help = "JSON engine: serde|simd")]
    engine: Option<EngineArg>,
    #[arg(long, help = "Pretty-print encoded output")]
    pretty: bool,
    #[arg(
        long,
        value_parser = clap::value_parser!(u8).range(0..=MAX_INDENT as i64),
        help = "Indent width for pretty output, 0..16 (serde engine)"
    )]
    indent: Option<u8>,
    #[arg(long, help = "Drop null object members when encoding")]
    omit_nulls: bool,
    #[arg(
        long,
        default_value = "auto",
        value_enum,
        help = "Colorize stderr diagnostics: auto|always|never"
    )]
    color: ColorMode,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum EngineArg {
    Serde,
    Simd,
}

impl From<EngineArg> for EngineKind {
    fn from(value: EngineArg) -> Self {
        match value {
            EngineArg::Serde => EngineKind::Serde,
            EngineArg::Simd => EngineKind::Simd,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Shape {
    Any,
    Object,
    Array,
    String,
    Number,
    Integer,
    Bool,
    Null,
}

#[derive(Subcommand)]
enum Command {
    #[command(
        about = "Re-encode JSON with the configured engine",
        after_help = r#"EXAMPLES
  $ echo '{"b": 1, "a": null}' | jsonseam encode
  $ jsonseam --pretty --indent 4 encode data.json
  $ jsonseam --omit-nulls encode data.json"#
    )]
    Encode {
        #[arg(help = "Input file (default: stdin, `-` for stdin)", value_hint = ValueHint::FilePath)]
        input: Option<PathBuf>,
    },
    #[command(
        about = "Decode JSON as a required shape and re-encode it",
        after_help = r#"EXAMPLES
  $ echo '[1,2]' | jsonseam decode --as array
  $ echo '{"x":1}' | jsonseam decode --as string   # exits 6 (type mismatch)"#
    )]
    Decode {
        #[arg(long = "as", value_enum, default_value = "any", help = "Required top-level shape")]
        shape: Shape,
        #[arg(help = "Input file (default: stdin, `-` for stdin)", value_hint = ValueHint::FilePath)]
        input: Option<PathBuf>,
    },
    #[command(
        about = "Log each input line as a queue message body",
        long_about = r#"Treat each non-empty input line as a queue message body and log it.

Bodies are not parsed. A summary is printed on stdout when input ends."#
    )]
    Relay {
        #[arg(help = "Input file (default: stdin, `-` for stdin)", value_hint = ValueHint::FilePath)]
        input: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_MAX_BODY_BYTES, help = "Truncate logged bodies beyond this size")]
        max_body_bytes: usize,
    },
    #[command(about = "Print version info")]
    Version,
    #[command(about = "Generate shell completions")]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

fn engine_config(cli: &Cli) -> Result<EngineConfig, Error> {
    let mut config = EngineConfig::from_env()?;
    if let Some(engine) = cli.engine {
        config = config.with_kind(engine.into());
    }
    if cli.pretty {
        config = config.with_pretty(true);
    }
    if let Some(indent) = cli.indent {
        config = config.with_indent(usize::from(indent));
    }
    if cli.omit_nulls {
        config = config.with_omit_nulls(true);
    }
    Ok(config)
}

fn dispatch_command(command: Command, config: EngineConfig) -> Result<RunOutcome, Error> {
    match command {
        Command::Encode { input } => {
            let serializer = serializer(config);
            let text = read_input(input.as_deref())?;
            println!("{}", reencode::<Value>(&serializer, &text)?);
            Ok(RunOutcome::ok())
        }
        Command::Decode { shape, input } => {
            let serializer = serializer(config);
            let text = read_input(input.as_deref())?;
            println!("{}", decode_shape(&serializer, shape, &text)?);
            Ok(RunOutcome::ok())
        }
        Command::Relay {
            input,
            max_body_bytes,
        } => {
            let reader = open_input(input.as_deref())?;
            let outcome = relay(reader, RelayConfig { max_body_bytes }, |body| {
                tracing::info!(body = %body, "queue message received");
            })?;
            let serializer = serializer(config);
            let summary = json!({
                "relayed": outcome.relayed,
                "truncated": outcome.truncated,
            });
            println!("{}", serializer.encode(&summary)?);
            Ok(RunOutcome::ok())
        }
        Command::Version => {
            emit_version_output(&serializer(config))?;
            Ok(RunOutcome::ok())
        }
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "jsonseam", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
    }
}

fn decode_shape(serializer: &DefaultSerializer, shape: Shape, text: &str) -> Result<String, Error> {
    match shape {
        Shape::Any => reencode::<Value>(serializer, text),
        Shape::Object => reencode::<Map<String, Value>>(serializer, text),
        Shape::Array => reencode::<Vec<Value>>(serializer, text),
        Shape::String => reencode::<String>(serializer, text),
        Shape::Number => reencode::<Number>(serializer, text),
        Shape::Integer => reencode::<i128>(serializer, text),
        Shape::Bool => reencode::<bool>(serializer, text),
        Shape::Null => reencode::<()>(serializer, text),
    }
}

fn reencode<T>(serializer: &DefaultSerializer, text: &str) -> Result<String, Error>
where
    T: DeserializeOwned + Serialize + Send + 'static,
{
    let value: T = serializer.decode_as(text)?;
    serializer.encode(&value)
}

fn file_input(path: Option<&Path>) -> Option<&Path> {
    path.filter(|path| *path != Path::new("-"))
}

fn open_input(path: Option<&Path>) -> Result<Box<dyn io::BufRead>, Error> {
    let Some(path) = file_input(path) else {
        return Ok(Box::new(io::stdin().lock()));
    };
    let file = File::open(path).map_err(|err| input_error(path, err))?;
    Ok(Box::new(BufReader::new(file)))
}

fn read_input(path: Option<&Path>) -> Result<String, Error> {
    let mut text = String::new();
    let Some(path) = file_input(path) else {
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|err| input_error(Path::new("-"), err))?;
        return Ok(text);
    };
    File::open(path)
        .and_then(|mut file| file.read_to_string(&mut text))
        .map_err(|err| input_error(path, err))?;
    Ok(text)
}

fn input_error(path: &Path, err: io::Error) -> Error {
    let label = if path == Path::new("-") {
        "stdin".to_string()
    } else {
        path.display().to_string()
    };
    let mut out = Error::new(ErrorKind::Io).with_message(format!("failed to read {label}"));
    if err.kind() == io::ErrorKind::NotFound {
        out = out.with_hint("Check the input path, or omit it to read stdin.");
    }
    out.with_source(err)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .try_init();
}

fn emit_version_output(serializer: &DefaultSerializer) -> Result<(), Error> {
    if io::stdout().is_terminal() {
        println!("jsonseam {}", env!("CARGO_PKG_VERSION"));
    } else {
        let value = json!({
            "name": "jsonseam",
            "version": env!("CARGO_PKG_VERSION"),
        });
        println!("{}", serializer.encode(&value)?);
    }
    Ok(())
}

#[derive(Copy, Clone, Debug)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, color_mode.use_color(is_tty)));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Encoding\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::InvalidArgument => "invalid argument".to_string(),
        ErrorKind::Encoding => "encoding failed".to_string(),
        ErrorKind::Decoding => "malformed json".to_string(),
        ErrorKind::TypeMismatch => "type mismatch".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = StdError::source(err);
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(type_name) = err.type_name() {
        inner.insert("type".to_string(), json!(type_name));
    }
    if let Some(fragment) = err.fragment() {
        inner.insert("fragment".to_string(), json!(fragment));
    }
    if let Some(position) = err.position() {
        inner.insert("line".to_string(), json!(position.line));
        inner.insert("column".to_string(), json!(position.column));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    ));

    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(type_name) = err.type_name() {
        lines.push(format!(
            "{} {type_name}",
            colorize_label("type:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(position) = err.position() {
        lines.push(format!(
            "{} line {}, column {}",
            colorize_label("at:", use_color, AnsiColor::Yellow),
            position.line,
            position.column
        ));
    }
    if let Some(fragment) = err.fragment() {
        lines.push(format!(
            "{} {fragment}",
            colorize_label("near:", use_color, AnsiColor::Yellow)
        ));
    }

    let causes = error_causes(err);
    if let Some(cause) = causes.first() {
        lines.push(format!(
            "{} {cause}",
            colorize_label("caused by:", use_color, AnsiColor::Yellow)
        ));
    }

    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}
