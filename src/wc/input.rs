use std::fs::File;
use std::io::{self, Read};

use thiserror::Error;

/// One byte source to count: a file path or the process's standard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSource {
    pub path: String,
    /// Name shown next to the counts. Empty means "unnamed stdin" and is
    /// omitted from text output.
    pub display_name: String,
    pub from_stdin: bool,
}

impl InputSource {
    pub fn stdin(display_name: &str) -> Self {
        Self {
            path: "-".to_string(),
            display_name: display_name.to_string(),
            from_stdin: true,
        }
    }

    pub fn file(path: &str) -> Self {
        Self {
            path: path.to_string(),
            display_name: path.to_string(),
            from_stdin: false,
        }
    }
}

/// Errors in how inputs were requested. Fatal before any counting starts.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("file operands cannot be combined with --files0-from")]
    OperandsWithFileList,

    #[error("cannot read file list from '{path}': {source}")]
    FileList { path: String, source: io::Error },
}

/// Normalize operands into input sources, enforcing GNU wc operand rules.
/// With --files0-from, positional operands are not allowed; with neither,
/// counting reads standard input under an empty display name. A bare "-"
/// operand reads standard input under the display name "-".
pub fn resolve_inputs(
    args: &[String],
    files0_from: Option<&str>,
) -> Result<Vec<InputSource>, UsageError> {
    if let Some(list_path) = files0_from {
        if !args.is_empty() {
            return Err(UsageError::OperandsWithFileList);
        }

        let names = read_files0_from(list_path).map_err(|source| UsageError::FileList {
            path: list_path.to_string(),
            source,
        })?;
        return Ok(names_to_inputs(&names));
    }

    if args.is_empty() {
        return Ok(vec![InputSource::stdin("")]);
    }

    Ok(names_to_inputs(args))
}

/// Parse a NUL-delimited name list (--files0-from). Empty entries are
/// skipped; the path "-" reads the list itself from standard input.
pub fn read_files0_from(path: &str) -> io::Result<Vec<String>> {
    let raw = if path == "-" {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        data
    } else {
        std::fs::read(path)?
    };

    Ok(raw
        .split(|&b| b == 0)
        .filter(|name| !name.is_empty())
        .map(|name| String::from_utf8_lossy(name).into_owned())
        .collect())
}

fn names_to_inputs(names: &[String]) -> Vec<InputSource> {
    names
        .iter()
        .map(|name| {
            if name == "-" {
                InputSource::stdin("-")
            } else {
                InputSource::file(name)
            }
        })
        .collect()
}

/// Open a byte stream for one input. The stdin variant wraps the process
/// handle without taking ownership, so it is never closed here.
pub fn open_input(input: &InputSource) -> io::Result<Box<dyn Read>> {
    if input.from_stdin {
        Ok(Box::new(io::stdin()))
    } else {
        Ok(Box::new(File::open(&input.path)?))
    }
}
