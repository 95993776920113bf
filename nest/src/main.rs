//! Nest CLI - group a JSON array of flat records by nesting levels
//!
//! ```bash
//! # interactive: paste one line of JSON
//! nest currency
//! [{"currency": "GBP", "amount": 100}, {"currency": "EUR", "amount": 90}]
//! {"GBP":[{"amount":100}],"EUR":[{"amount":90}]}
//!
//! # from a pipe
//! cat input.json | nest currency country
//! {"GBP":{"UK":[{"amount":100}]},"EUR":{"ES":[{"amount":90}]}}
//! ```

use clap::Parser;
use nest::{logs, read_flat_records, transform, CliError, Nested, Strategy, MAX_SERIALIZE_DEPTH};
use std::io::{self, BufRead, IsTerminal, Write};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;

const AFTER_HELP: &str = "\
Examples:
  1. input from console
     $ nest currency
     [{\"currency\": \"GBP\", \"amount\": 100}, {\"currency\": \"EUR\", \"amount\": 90}]
     {\"GBP\":[{\"amount\":100}],\"EUR\":[{\"amount\":90}]}

  2. input from pipeline
     $ cat input.json | nest currency country
     {\"GBP\":{\"UK\":[{\"amount\":100}]},\"EUR\":{\"ES\":[{\"amount\":90}]}}

  3. nesting levels starting with '-' go after '--'
     $ cat input.json | nest --pretty -- -code";

#[derive(Parser)]
#[command(name = "nest")]
#[command(
    about = "Parse a JSON array from stdin and print a nested dictionary of dictionaries of arrays, keyed by the given nesting levels",
    after_help = AFTER_HELP
)]
struct Cli {
    /// Record keys giving the levels of nesting, outermost first
    nesting_levels: Vec<String>,

    /// Pretty print the nested result with sorted keys
    #[arg(long)]
    pretty: bool,

    /// Use the recursive realization of the transformation
    #[arg(long)]
    recursive: bool,

    /// Log debug information to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    logs::init_cli_logger(cli.verbose);

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let status = execute(cli, stdin.lock(), interactive, &mut io::stdout(), &mut io::stderr());
    std::process::exit(status);
}

/// Run one invocation: the result on `out`, or `nest: <detail>: <reason>`
/// on `err`. Returns the exit status.
fn execute<R, O, E>(cli: Cli, input: R, interactive: bool, out: &mut O, err: &mut E) -> i32
where
    R: BufRead,
    O: Write,
    E: Write,
{
    let output = match run(cli, input, interactive) {
        Ok(output) => output,
        Err(e) => {
            tracing::debug!(error = %e, "nest failed");
            // Nothing left to report to if stderr is gone.
            let _ = writeln!(err, "nest: {}: {}", e.detail(), e.reason());
            return EXIT_FAILURE;
        }
    };

    match writeln!(out, "{}", output).and_then(|()| out.flush()) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            tracing::debug!(error = %e, "failed to write result");
            EXIT_FAILURE
        }
    }
}

fn run<R: BufRead>(cli: Cli, input: R, interactive: bool) -> Result<String, CliError> {
    let records = read_flat_records(input, interactive)?;

    let strategy = Strategy::select(cli.recursive);
    let nested = transform(strategy, cli.nesting_levels, records)?;
    nested.check_depth(MAX_SERIALIZE_DEPTH)?;

    render(&nested, cli.pretty)
}

fn render(nested: &Nested, pretty: bool) -> Result<String, CliError> {
    let output = if pretty {
        serde_json::to_string_pretty(&nested.sorted())
    } else {
        serde_json::to_string(nested)
    };
    output.map_err(CliError::Encode)
}
