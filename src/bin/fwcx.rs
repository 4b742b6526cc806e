use std::process;

use anyhow::Context;
use clap::Parser;

use wcx_rs::common::{io_error_msg, reset_sigpipe};
use wcx_rs::wc;

#[derive(Parser)]
#[command(
    name = "wcx",
    version,
    about = "Print newline, word, and byte counts for each FILE"
)]
struct Cli {
    /// Print the byte counts
    #[arg(short = 'c', long = "bytes")]
    bytes: bool,

    /// Print the character counts
    #[arg(short = 'm', long = "chars")]
    chars: bool,

    /// Print the newline counts
    #[arg(short = 'l', long = "lines")]
    lines: bool,

    /// Print the maximum display width
    #[arg(short = 'L', long = "max-line-length")]
    max_line_length: bool,

    /// Print the word counts
    #[arg(short = 'w', long = "words")]
    words: bool,

    /// Read input from the files specified by NUL-terminated names in file F
    #[arg(long = "files0-from", value_name = "F")]
    files0_from: Option<String>,

    /// When to print a line with total counts; WHEN can be: auto, always, only, never
    #[arg(long = "total", value_name = "WHEN", default_value = "auto")]
    total: String,

    /// Output counts as JSON
    #[arg(long = "json")]
    json: bool,

    /// Files to process (reads stdin if none given)
    files: Vec<String>,
}

fn main() {
    reset_sigpipe();
    let cli = Cli::parse();

    // GNU wc rejects invalid --total values before reading anything.
    let Some(total_mode) = wc::TotalMode::parse(&cli.total) else {
        eprintln!("wcx: invalid argument '{}' for '--total'", cli.total);
        eprintln!("Valid arguments are:");
        eprintln!("  - 'auto'");
        eprintln!("  - 'always'");
        eprintln!("  - 'only'");
        eprintln!("  - 'never'");
        eprintln!("Try 'fwcx --help' for more information.");
        process::exit(1);
    };

    let options = wc::RunOptions {
        selection: wc::CountSelection::from_flags(
            cli.lines,
            cli.words,
            cli.chars,
            cli.bytes,
            cli.max_line_length,
        ),
        total_mode,
        json: cli.json,
    };

    match run(&cli, &options) {
        Ok(had_errors) => {
            if had_errors {
                process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("wcx: {err:#}");
            process::exit(1);
        }
    }
}

fn run(cli: &Cli, options: &wc::RunOptions) -> anyhow::Result<bool> {
    let inputs = wc::resolve_inputs(&cli.files, cli.files0_from.as_deref())?;

    let result = wc::run(&inputs, options);

    // Per-input failures go to stderr ahead of the rendered rows; the run
    // keeps going for the other inputs.
    for row in &result.rows {
        if let Err(err) = &row.outcome {
            let name = if row.name.is_empty() {
                "-"
            } else {
                row.name.as_str()
            };
            eprintln!("wcx: {}: {}", name, io_error_msg(err));
        }
    }

    let output = wc::render(&result, options).context("rendering output")?;
    if !output.is_empty() {
        println!("{output}");
    }

    Ok(result.had_errors)
}
