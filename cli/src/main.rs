//! fcp - Fan-out Copy
//!
//! Replicate items from one source to many destinations, powered by fancopy.

use clap::{ArgAction, Parser, ValueEnum};
use fancopy::{
    CancelScope, CopyBuilder, Error as FancopyError, ErrorCode, LOCAL_SCHEME, Registry,
    create_progress_bar,
};
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// fcp - Replicate items to many destinations at once
///
/// Each ITEM is read once from the source and written to every destination
/// in parallel. An item fails as soon as any destination fails.
///
/// Usage:
///   fcp --from local:///data --to local:///mirror-a --to /mnt/mirror-b ITEM...
#[derive(Parser, Debug)]
#[command(name = "fcp", version, about, long_about = None)]
struct Args {
    /// Source URI (or directory path)
    #[arg(short = 'f', long = "from", value_name = "URI")]
    source: String,

    /// Destination URI (or directory path); repeat for each destination
    #[arg(short = 't', long = "to", value_name = "URI", required = true)]
    destinations: Vec<String>,

    /// Item paths, relative to the source and destination roots
    #[arg(required = true, value_name = "ITEM")]
    items: Vec<String>,

    /// Permission bits for written files, in octal (local destinations)
    #[arg(long, value_name = "MODE")]
    file_mode: Option<String>,

    /// Permission bits for created directories, in octal (local destinations)
    #[arg(long, value_name = "MODE")]
    dir_mode: Option<String>,

    /// Do not call fsync before renaming into place (faster but less safe)
    #[arg(long)]
    no_sync: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    output: OutputMode,

    /// Disable progress bar and logging
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
enum CliError {
    #[error("Invalid location '{location}': {reason}")]
    InvalidLocation { location: String, reason: String },

    #[error("Failed to set up copier: {source}")]
    Setup { source: FancopyError },

    #[error("Failed to copy {uri}: {source}")]
    Copy { uri: String, source: FancopyError },

    #[error("Failed to serialize JSON output: {source}")]
    JsonSerialize { source: serde_json::Error },
}

impl CliError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidLocation { .. } => ErrorCode::InvalidInput,
            Self::Setup { source } | Self::Copy { source, .. } => source.code(),
            Self::JsonSerialize { .. } => ErrorCode::Internal,
        }
    }
}

/// Outcome of one item, for JSON output.
#[derive(Debug, Clone)]
struct ItemReport {
    uri: String,
    outcome: &'static str,
    error_code: Option<ErrorCode>,
    error_message: Option<String>,
}

impl ItemReport {
    fn to_json_value(&self) -> Value {
        let mut obj = serde_json::Map::new();
        obj.insert("uri".to_owned(), Value::String(self.uri.clone()));
        obj.insert("outcome".to_owned(), Value::String(self.outcome.to_owned()));
        if let Some(code) = self.error_code {
            obj.insert("error_code".to_owned(), Value::String(code.as_str().to_owned()));
        }
        if let Some(ref message) = self.error_message {
            obj.insert("error_message".to_owned(), Value::String(message.clone()));
        }
        Value::Object(obj)
    }
}

fn exit_code_for(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::InvalidInput => 2,
        ErrorCode::Cancelled => 130,
        _ => 1,
    }
}

fn main() {
    let args = Args::parse();
    init_logging(&args);

    if let Err(error) = run(&args) {
        let code = error.code();
        if code == ErrorCode::Cancelled {
            eprintln!("Cancelled.");
        } else {
            eprintln!("error[{}]: {}", code, error);
        }
        std::process::exit(exit_code_for(code));
    }
}

fn init_logging(args: &Args) {
    let level = match (args.quiet, args.verbose) {
        (true, _) => "off",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(args: &Args) -> CliResult<()> {
    let source = to_uri(&args.source)?;
    let destinations = args
        .destinations
        .iter()
        .map(|d| to_uri(d).and_then(|uri| with_local_params(&uri, args)))
        .collect::<CliResult<Vec<String>>>()?;

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel_clone = cancel.clone();
        ctrlc::set_handler(move || {
            if cancel_clone.load(Ordering::Relaxed) {
                eprintln!("\nForce quit.");
                std::process::exit(130);
            }
            cancel_clone.store(true, Ordering::Relaxed);
            eprintln!(
                "\nCancelling... finishing in-flight writes. Press Ctrl+C again to abort immediately."
            );
        })
        .ok();
    }
    let scope = CancelScope::from_flag(cancel);

    let copier = CopyBuilder::new(source.clone())
        .destinations(destinations.iter().cloned())
        .registry(Registry::with_defaults())
        .build(&scope)
        .map_err(|source| CliError::Setup { source })?;

    let pb = if args.output == OutputMode::Human && !args.quiet {
        let pb = create_progress_bar((args.items.len() * copier.destination_count()) as u64);
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };
    let copier = match pb {
        Some(ref pb) => {
            let pb = pb.clone();
            copier.with_progress(Box::new(move |_, _| pb.inc(1)))
        }
        None => copier,
    };

    tracing::debug!(source = %source, destinations = destinations.len(), items = args.items.len(), "starting");

    let start_time = Instant::now();
    let mut reports = Vec::with_capacity(args.items.len());
    let mut failure = None;

    for uri in &args.items {
        if let Some(ref pb) = pb {
            pb.set_message(uri.clone());
        }
        match copier.copy(&scope, uri) {
            Ok(()) => reports.push(ItemReport {
                uri: uri.clone(),
                outcome: "copied",
                error_code: None,
                error_message: None,
            }),
            Err(source) => {
                reports.push(ItemReport {
                    uri: uri.clone(),
                    outcome: "failed",
                    error_code: Some(source.code()),
                    error_message: Some(source.to_string()),
                });
                failure = Some(CliError::Copy {
                    uri: uri.clone(),
                    source,
                });
                break;
            }
        }
    }
    let duration = start_time.elapsed();

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    match args.output {
        OutputMode::Human => {
            if failure.is_none() && !args.quiet {
                print_summary(reports.len(), destinations.len(), duration);
            }
        }
        OutputMode::Json => {
            let payload = json!({
                "schema_version": "1.0",
                "source": source,
                "destinations": destinations,
                "ok": failure.is_none(),
                "duration_ms": duration.as_millis() as u64,
                "items": reports.iter().map(ItemReport::to_json_value).collect::<Vec<Value>>(),
            });
            print_json_value(&payload)?;
        }
    }

    match failure {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Accept either a URI or a plain directory path (mapped to `local://`).
fn to_uri(location: &str) -> CliResult<String> {
    match url::Url::parse(location) {
        Ok(_) => Ok(location.to_owned()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let path = std::path::absolute(Path::new(location)).map_err(|e| {
                CliError::InvalidLocation {
                    location: location.to_owned(),
                    reason: e.to_string(),
                }
            })?;
            local_uri(&path).ok_or_else(|| CliError::InvalidLocation {
                location: location.to_owned(),
                reason: "cannot be expressed as a URI".to_owned(),
            })
        }
        Err(e) => Err(CliError::InvalidLocation {
            location: location.to_owned(),
            reason: e.to_string(),
        }),
    }
}

/// Percent-encoded `local://` URI for an absolute directory path.
fn local_uri(path: &Path) -> Option<String> {
    let file_url = url::Url::from_directory_path(path).ok()?;
    let rest = file_url.as_str().strip_prefix("file:")?;
    Some(format!("{LOCAL_SCHEME}:{rest}"))
}

/// Add `--file-mode`/`--dir-mode`/`--no-sync` to local destination URIs
/// that do not set them already.
fn with_local_params(uri: &str, args: &Args) -> CliResult<String> {
    let mut url = url::Url::parse(uri).map_err(|e| CliError::InvalidLocation {
        location: uri.to_owned(),
        reason: e.to_string(),
    })?;
    if url.scheme() != LOCAL_SCHEME {
        return Ok(uri.to_owned());
    }

    let present: Vec<String> = url.query_pairs().map(|(k, _)| k.into_owned()).collect();
    let mut extra = Vec::new();
    if let Some(ref mode) = args.file_mode {
        extra.push(("file_mode", mode.as_str()));
    }
    if let Some(ref mode) = args.dir_mode {
        extra.push(("dir_mode", mode.as_str()));
    }
    if args.no_sync {
        extra.push(("fsync", "false"));
    }
    extra.retain(|(key, _)| !present.iter().any(|p| p == key));
    if extra.is_empty() {
        return Ok(uri.to_owned());
    }

    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in extra {
            pairs.append_pair(key, value);
        }
    }
    Ok(url.to_string())
}

fn print_summary(items: usize, destinations: usize, duration: Duration) {
    println!(
        "Replicated {} item{} to {} destination{} in {:.2?}",
        items,
        if items == 1 { "" } else { "s" },
        destinations,
        if destinations == 1 { "" } else { "s" },
        duration
    );
}

fn print_json_value(value: &Value) -> CliResult<()> {
    let serialized =
        serde_json::to_string(value).map_err(|source| CliError::JsonSerialize { source })?;
    println!("{serialized}");
    Ok(())
}
