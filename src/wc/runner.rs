use std::env;
use std::io;
use std::thread;

use rayon::prelude::*;

use super::core::{CountSelection, Counts, count_reader};
use super::input::{InputSource, open_input};

/// When to print the aggregate total row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TotalMode {
    #[default]
    Auto,
    Always,
    Only,
    Never,
}

impl TotalMode {
    /// Parse a --total value. Returns None for anything unrecognized.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "always" => Some(Self::Always),
            "only" => Some(Self::Only),
            "never" => Some(Self::Never),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub selection: CountSelection,
    pub total_mode: TotalMode,
    pub json: bool,
}

/// One display row: counts for the input, or the failure that prevented
/// them. Rows correspond 1:1 with the inputs, in input order.
#[derive(Debug)]
pub struct OutputRow {
    pub name: String,
    pub outcome: Result<Counts, io::Error>,
}

#[derive(Debug)]
pub struct RunResult {
    pub rows: Vec<OutputRow>,
    pub total: Counts,
    pub show_total: bool,
    pub had_errors: bool,
}

/// Count every input, preserving input order in the returned rows even when
/// file counting runs in parallel. A failed input produces an error row and
/// never aborts the others.
pub fn run(inputs: &[InputSource], options: &RunOptions) -> RunResult {
    // Read once per dispatch and threaded down as a parameter; the hot loop
    // never touches the environment.
    let posix_mode = env::var_os("POSIXLY_CORRECT").is_some_and(|v| !v.is_empty());

    let rows = if can_run_in_parallel(inputs) {
        run_parallel(inputs, options.selection, posix_mode)
    } else {
        inputs
            .iter()
            .map(|input| process_input(input, options.selection, posix_mode))
            .collect()
    };

    let mut total = Counts::default();
    let mut success_count = 0usize;
    let mut had_errors = false;

    for row in &rows {
        match &row.outcome {
            Ok(counts) => {
                success_count += 1;
                total.lines += counts.lines;
                total.words += counts.words;
                total.chars += counts.chars;
                total.bytes += counts.bytes;
                // Line width aggregates as a maximum, never a sum.
                total.max_line_length = total.max_line_length.max(counts.max_line_length);
            }
            Err(_) => had_errors = true,
        }
    }

    let show_total = should_show_total(options.total_mode, inputs.len(), success_count);

    RunResult {
        rows,
        total,
        show_total,
        had_errors,
    }
}

/// Parallelism only pays across several inputs, and is never sound when one
/// of them is the shared single-consumer standard-input stream.
fn can_run_in_parallel(inputs: &[InputSource]) -> bool {
    inputs.len() >= 2 && inputs.iter().all(|input| !input.from_stdin)
}

/// Fan out over a pool of min(available parallelism, inputs) workers. The
/// indexed collect writes every row into its input-order slot, so completion
/// order never shows in the output.
fn run_parallel(
    inputs: &[InputSource],
    selection: CountSelection,
    posix_mode: bool,
) -> Vec<OutputRow> {
    let workers = thread::available_parallelism()
        .map_or(1, |n| n.get())
        .min(inputs.len());

    match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool.install(|| {
            inputs
                .par_iter()
                .map(|input| process_input(input, selection, posix_mode))
                .collect()
        }),
        Err(_) => inputs
            .iter()
            .map(|input| process_input(input, selection, posix_mode))
            .collect(),
    }
}

fn process_input(input: &InputSource, selection: CountSelection, posix_mode: bool) -> OutputRow {
    let outcome =
        open_input(input).and_then(|reader| count_reader(reader, selection, posix_mode));

    OutputRow {
        name: input.display_name.clone(),
        outcome,
    }
}

fn should_show_total(mode: TotalMode, input_count: usize, success_count: usize) -> bool {
    if success_count == 0 {
        return false;
    }

    match mode {
        TotalMode::Always | TotalMode::Only => true,
        TotalMode::Never => false,
        TotalMode::Auto => input_count > 1,
    }
}
