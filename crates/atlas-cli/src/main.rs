mod config;

use atlas_layout::{GroupKey, GroupNames, LayoutOptions, Record, RecordId, Tokenizer};
use config::{OptionsDoc, OverrideError};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Json(serde_json::Error),
    Layout(atlas_layout::Error),
    Config(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Layout(err) => write!(f, "{err}"),
            CliError::Config(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<OverrideError> for CliError {
    fn from(value: OverrideError) -> Self {
        Self::Config(value.to_string())
    }
}

impl From<atlas_layout::Error> for CliError {
    fn from(value: atlas_layout::Error) -> Self {
        Self::Layout(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum Command {
    #[default]
    Layout,
    Similarity,
    Tokens,
    Config,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    verbose: bool,
    config: Option<String>,
    overrides: Vec<String>,
    out: Option<String>,
}

/// Accepted input shapes: a bare record array, or records plus a key-to-name lookup.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Input {
    Records(Vec<Record>),
    Document(InputDoc),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InputDoc {
    records: Vec<Record>,
    #[serde(default)]
    group_names: GroupNames,
}

impl Input {
    fn into_parts(self) -> (Vec<Record>, GroupNames) {
        match self {
            Input::Records(records) => (records, GroupNames::new()),
            Input::Document(doc) => (doc.records, doc.group_names),
        }
    }
}

#[derive(Serialize)]
struct SimilarityOut {
    key: Option<GroupKey>,
    ids: Vec<RecordId>,
    matrix: Vec<Vec<f64>>,
}

#[derive(Serialize)]
struct TokensOut<'a> {
    id: &'a RecordId,
    tokens: Vec<String>,
}

fn usage() -> &'static str {
    "atlas-cli\n\
\n\
USAGE:\n\
  atlas-cli [layout] [--pretty] [--config <path>] [--set <path>=<json>]... [--out <path>] [<path>|-]\n\
  atlas-cli similarity [--pretty] [--config <path>] [--set <path>=<json>]... [<path>|-]\n\
  atlas-cli tokens [--pretty] [<path>|-]\n\
  atlas-cli config [--pretty] [--config <path>] [--set <path>=<json>]...\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is a JSON array of records ({\"id\", \"texts\", \"group\"}) or an object\n\
    {\"records\": [...], \"groupNames\": {\"<key>\": \"<name>\"}}.\n\
  - --set paths use the camelCase option names, e.g. --set solver.iterations=120.\n\
  - Logging goes to stderr; set ATLAS_LOG (e.g. ATLAS_LOG=debug) or pass --verbose.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "similarity" => args.command = Command::Similarity,
            "tokens" => args.command = Command::Tokens,
            "config" => args.command = Command::Config,
            "--pretty" => args.pretty = true,
            "--verbose" | "-v" => args.verbose = true,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--set" => {
                let Some(assignment) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if !assignment.contains('=') {
                    return Err(CliError::Usage(usage()));
                }
                args.overrides.push(assignment.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("ATLAS_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn load_options(args: &Args) -> Result<LayoutOptions, CliError> {
    let mut doc = OptionsDoc::default();
    if let Some(path) = args.config.as_deref() {
        let text = std::fs::read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&text)?;
        doc.merge(&value)?;
    }
    for assignment in &args.overrides {
        doc.apply_assignment(assignment)?;
    }
    let opts = doc
        .to_options()
        .map_err(|err| CliError::Config(err.to_string()))?;
    opts.validate()?;
    tracing::debug!(
        iterations = opts.solver.iterations,
        node_cap = opts.compose.node_cap,
        "options loaded"
    );
    Ok(opts)
}

fn write_json(value: &impl Serialize, pretty: bool, out: Option<&str>) -> Result<(), CliError> {
    let mut writer: Box<dyn Write> = match out {
        None => Box::new(std::io::stdout().lock()),
        Some(path) => Box::new(std::io::BufWriter::new(std::fs::File::create(path)?)),
    };
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn read_records(input: Option<&str>) -> Result<(Vec<Record>, GroupNames), CliError> {
    let text = read_input(input)?;
    let input: Input = serde_json::from_str(&text)?;
    let (records, names) = input.into_parts();
    tracing::debug!(records = records.len(), names = names.len(), "input parsed");
    Ok((records, names))
}

fn run(args: Args) -> Result<(), CliError> {
    let out = args.out.as_deref();
    match args.command {
        Command::Config => {
            let opts = load_options(&args)?;
            write_json(&opts, args.pretty, out)
        }
        Command::Layout => {
            let opts = load_options(&args)?;
            let (records, names) = read_records(args.input.as_deref())?;
            let layout = atlas_layout::layout(&records, &names, &opts)?;
            write_json(&layout, args.pretty, out)
        }
        Command::Similarity => {
            let opts = load_options(&args)?;
            let (records, _) = read_records(args.input.as_deref())?;
            let sims: Vec<SimilarityOut> = atlas_layout::cluster_similarities(&records, &opts)
                .into_iter()
                .map(|c| SimilarityOut {
                    matrix: c.matrix.rows(),
                    key: c.key,
                    ids: c.ids,
                })
                .collect();
            write_json(&sims, args.pretty, out)
        }
        Command::Tokens => {
            let (records, _) = read_records(args.input.as_deref())?;
            let tokenizer = Tokenizer::default();
            let tokens: Vec<TokensOut<'_>> = records
                .iter()
                .map(|r| TokensOut {
                    id: &r.id,
                    tokens: tokenizer.tokenize(&r.document()),
                })
                .collect();
            write_json(&tokens, args.pretty, out)
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    init_logging(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
